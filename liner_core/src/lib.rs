//! # liner_core - Liner Cementing Engine
//!
//! `liner_core` computes the drilling-mechanics side of a liner cementing
//! job: where every pumped fluid ends up, the pressures and forces that
//! placement creates, string weights and stretch, plug travel, and the
//! surface force needed to set the liner. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `compute(input, settings)` is a pure function
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Reported, not thrown**: Overflow, thin margins and non-convergence
//!   are findings in the result; only invalid input is an error
//!
//! ## Quick Start
//!
//! ```rust
//! use liner_core::{compute, EngineSettings, JobInput, JobStatus};
//!
//! let input = JobInput::example();
//! let result = compute(&input, &EngineSettings::default()).unwrap();
//!
//! println!("TOC: {:?} ft MD", result.placement.top_of_cement_md_ft);
//! println!("Hookload: {:.0} lbf", result.mechanics.hookload_lbf);
//! assert_ne!(result.status.status, JobStatus::Failure);
//! ```
//!
//! ## Modules
//!
//! - [`job`] - Input record, validation and the engine entry point
//! - [`calculations`] - Geometry, placement, hydrostatics, mechanics, plug, torque-drag, status
//! - [`survey`] - MD to TVD interpolation
//! - [`materials`] - Tubular size table
//! - [`equations`] - Closed-form drilling formulas
//! - [`config`] - Engine settings from TOML
//! - [`report`] - Typed report sections
//! - [`units`] - Field-unit constants and lenient number parsing
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod equations;
pub mod errors;
pub mod job;
pub mod materials;
pub mod report;
pub mod survey;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{JobStatus, JobWarning, StatusReport};
pub use config::EngineSettings;
pub use errors::{CalcError, CalcResult};
pub use job::{
    compute, run, FluidBatch, FluidProgram, HoleGeometry, JobInput, JobResult, JobRun, PipeSection, TubularSpec,
};
pub use survey::{Survey, SurveyStation};
