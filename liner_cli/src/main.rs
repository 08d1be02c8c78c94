//! # Liner Cementing CLI
//!
//! Command-line front end for `liner_core`.
//!
//! ```text
//! liner_cli run job.json               # text report
//! liner_cli run job.json --json        # full run record as JSON
//! liner_cli demo --write job.json      # write the example job to a file
//! liner_cli tubulars --kind casing     # list reference sizes
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level) so `--json` output can
//! be piped.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use liner_core::config::EngineSettings;
use liner_core::job::{self, JobInput, JobRun};
use liner_core::materials::{builtin_tubulars, TubularKind, TubularTable};
use liner_core::report::render_text;
use liner_core::JobStatus;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "liner_cli")]
#[command(about = "Liner cementing placement, hydrostatics and torque-drag calculator")]
#[command(version)]
struct CliArgs {
    /// Engine settings TOML; without it LINER_ENGINE_CONFIG, then
    /// ./liner_engine.toml, then built-in defaults are used
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a job from a JSON input file
    Run {
        /// Path to the job JSON
        job: PathBuf,

        /// Print the run record as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Compute the built-in example job
    Demo {
        /// Print the run record as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Write the example job input to this path and exit
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },

    /// List tubular sizes from the built-in table or a CSV file
    Tubulars {
        /// CSV with label,kind,od_in,id_in,weight_ppf,grade columns
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Only list one kind (casing, dp, hwdp)
        #[arg(long)]
        kind: Option<TubularKind>,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match dispatch(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn dispatch(args: CliArgs) -> Result<ExitCode> {
    match args.command {
        Command::Run { job, json } => {
            let settings = load_settings(args.config.as_ref())?;
            let text = std::fs::read_to_string(&job).with_context(|| format!("reading {}", job.display()))?;
            let input: JobInput =
                serde_json::from_str(&text).with_context(|| format!("parsing job {}", job.display()))?;
            info!(path = %job.display(), "Loaded job input");
            compute_and_print(&input, &settings, json)
        }
        Command::Demo { json, write } => {
            let input = JobInput::example();
            if let Some(path) = write {
                let text = serde_json::to_string_pretty(&input)?;
                std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
                println!("Example job written to {}", path.display());
                return Ok(ExitCode::SUCCESS);
            }
            let settings = load_settings(args.config.as_ref())?;
            compute_and_print(&input, &settings, json)
        }
        Command::Tubulars { csv, kind } => {
            let loaded;
            let table: &TubularTable = match &csv {
                Some(path) => {
                    loaded = TubularTable::load_from_csv(&path.to_string_lossy())
                        .with_context(|| format!("loading {}", path.display()))?;
                    &loaded
                }
                None => builtin_tubulars(),
            };
            print_tubulars(table, kind);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<EngineSettings> {
    match path {
        Some(p) => {
            let settings = EngineSettings::load_from_file(p)
                .with_context(|| format!("loading settings {}", p.display()))?;
            debug!(path = %p.display(), "Using settings from --config");
            Ok(settings)
        }
        None => Ok(EngineSettings::load()),
    }
}

/// Exit 0 on success, 1 on a warning or failure status
fn compute_and_print(input: &JobInput, settings: &EngineSettings, json: bool) -> Result<ExitCode> {
    let run: JobRun = match job::run(input, settings) {
        Ok(run) => run,
        Err(e) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&e)?);
            }
            return Err(e).context("job rejected");
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&run)?);
    } else {
        println!("Liner job: {}", if run.label.is_empty() { "(unnamed)" } else { run.label.as_str() });
        println!("Run {}  computed {}", run.id, run.computed_at.format("%Y-%m-%d %H:%M:%S UTC"));
        println!();
        print!("{}", render_text(&run.result));
    }

    Ok(match run.result.status.status {
        JobStatus::Success => ExitCode::SUCCESS,
        JobStatus::Warning | JobStatus::Failure => ExitCode::from(1),
    })
}

fn print_tubulars(table: &TubularTable, kind: Option<TubularKind>) {
    println!("Tubulars ({})", table.source.as_deref().unwrap_or("unknown"));
    println!("{:<26} {:<12} {:>8} {:>8} {:>8}  {}", "Label", "Kind", "OD in", "ID in", "lb/ft", "Grade");
    for size in table.iter().filter(|s| kind.map_or(true, |k| s.kind == k)) {
        println!(
            "{:<26} {:<12} {:>8.3} {:>8.3} {:>8.2}  {}",
            size.label,
            size.kind.to_string(),
            size.od_in,
            size.id_in,
            size.weight_ppf,
            size.grade
        );
    }
}
