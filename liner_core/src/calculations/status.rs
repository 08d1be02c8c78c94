//! # Job Status
//!
//! Folds every check into one of three outcomes.
//!
//! - **Failure**: hookload over rig capacity, bump force over plug shear
//!   capacity, or cement short of the landing collar.
//! - **Warning**: force margins under the configured minimum, cement excess
//!   over the allowed fraction, annulus or inside overflow, unconverged
//!   torque-drag, or dart shear or bump not confirmed by volume.
//! - **Success**: none of the above.
//!
//! Informational notes (for example a missing survey) are listed but never
//! change the status.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::WellGeometry;
use crate::calculations::mechanics::MechanicsResult;
use crate::calculations::placement::PlacementResult;
use crate::calculations::plug::PlugResult;
use crate::calculations::torque_drag::TorqueDragResult;
use crate::config::StatusSettings;
use crate::job::JobInput;
use crate::survey::Survey;

/// Overall outcome, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Success,
    Warning,
    Failure,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Success => write!(f, "SUCCESS"),
            JobStatus::Warning => write!(f, "WARNING"),
            JobStatus::Failure => write!(f, "FAILURE"),
        }
    }
}

/// How much a single finding weighs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Failure,
}

/// A finding raised while computing a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobWarning {
    /// Annular batch did not fit below the liner top
    AnnulusOverflow { label: String, excess_bbl: f64 },

    /// Inside batch ran past the liner shoe
    InsideOverflow { label: String, overflow_bbl: f64 },

    CementExcess { excess_bbl: f64, pumped_bbl: f64 },

    CementBelowLandingCollar {
        top_of_cement_md_ft: Option<f64>,
        landing_collar_md_ft: f64,
    },

    RigCapacityExceeded { hookload_lbf: f64, capacity_lbf: f64 },

    RigMarginLow { margin: f64, minimum: f64 },

    PlugShearExceeded { bump_force_lbf: f64, shear_capacity_lbf: f64 },

    PlugMarginLow { safety_factor: f64, minimum: f64 },

    DartShearNotConfirmed { launch_bbl: f64, threshold_bbl: f64 },

    BumpNotReached { after_latch_bbl: f64, required_bbl: f64 },

    SolverNotConverged { residual_lbf: f64, iterations: u32 },

    /// Work string does not end at the liner top
    WorkStringMismatch { string_bottom_md_ft: f64, top_of_liner_md_ft: f64 },

    /// No usable survey; TVD equals MD
    FlatSurveyFallback,
}

impl JobWarning {
    pub fn severity(&self) -> Severity {
        match self {
            JobWarning::CementBelowLandingCollar { .. }
            | JobWarning::RigCapacityExceeded { .. }
            | JobWarning::PlugShearExceeded { .. } => Severity::Failure,
            JobWarning::FlatSurveyFallback => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for JobWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobWarning::AnnulusOverflow { label, excess_bbl } => {
                write!(f, "{}: {:.2} bbl does not fit below the liner top", label, excess_bbl)
            }
            JobWarning::InsideOverflow { label, overflow_bbl } => {
                write!(f, "{}: {:.2} bbl overruns the liner shoe", label, overflow_bbl)
            }
            JobWarning::CementExcess { excess_bbl, pumped_bbl } => {
                write!(f, "Cement excess {:.2} bbl of {:.2} bbl pumped", excess_bbl, pumped_bbl)
            }
            JobWarning::CementBelowLandingCollar {
                top_of_cement_md_ft,
                landing_collar_md_ft,
            } => match top_of_cement_md_ft {
                Some(toc) => write!(
                    f,
                    "Top of cement {:.1} ft is below the landing collar at {:.1} ft",
                    toc, landing_collar_md_ft
                ),
                None => write!(f, "No cement placed in the annulus"),
            },
            JobWarning::RigCapacityExceeded {
                hookload_lbf,
                capacity_lbf,
            } => write!(f, "Hookload {:.0} lbf exceeds rig capacity {:.0} lbf", hookload_lbf, capacity_lbf),
            JobWarning::RigMarginLow { margin, minimum } => write!(
                f,
                "Rig margin {:.1}% is below {:.1}%",
                margin * 100.0,
                minimum * 100.0
            ),
            JobWarning::PlugShearExceeded {
                bump_force_lbf,
                shear_capacity_lbf,
            } => write!(
                f,
                "Bump force {:.0} lbf exceeds plug shear capacity {:.0} lbf",
                bump_force_lbf, shear_capacity_lbf
            ),
            JobWarning::PlugMarginLow { safety_factor, minimum } => {
                write!(f, "Plug safety factor {:.2} is below {:.2}", safety_factor, minimum)
            }
            JobWarning::DartShearNotConfirmed {
                launch_bbl,
                threshold_bbl,
            } => write!(
                f,
                "Dart launched at {:.2} bbl, shear expected at {:.2} bbl",
                launch_bbl, threshold_bbl
            ),
            JobWarning::BumpNotReached {
                after_latch_bbl,
                required_bbl,
            } => write!(
                f,
                "Displacement past latch {:.2} bbl is short of {:.2} bbl to bump",
                after_latch_bbl, required_bbl
            ),
            JobWarning::SolverNotConverged {
                residual_lbf,
                iterations,
            } => write!(
                f,
                "Torque-drag did not converge (residual {:.1} lbf after {} iterations)",
                residual_lbf, iterations
            ),
            JobWarning::WorkStringMismatch {
                string_bottom_md_ft,
                top_of_liner_md_ft,
            } => write!(
                f,
                "Work string ends at {:.1} ft, liner top is at {:.1} ft",
                string_bottom_md_ft, top_of_liner_md_ft
            ),
            JobWarning::FlatSurveyFallback => write!(f, "No survey supplied, TVD taken equal to MD"),
        }
    }
}

/// Final status with every finding that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    pub warnings: Vec<JobWarning>,
}

impl StatusReport {
    /// Build a report, deriving the status from the findings.
    pub fn from_warnings(warnings: Vec<JobWarning>) -> Self {
        let status = match warnings.iter().map(JobWarning::severity).max() {
            Some(Severity::Failure) => JobStatus::Failure,
            Some(Severity::Warning) => JobStatus::Warning,
            _ => JobStatus::Success,
        };
        StatusReport { status, warnings }
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobWarning> {
        self.warnings.iter().filter(|w| w.severity() == Severity::Failure)
    }
}

/// Everything the classifier reads
pub struct StatusInputs<'a> {
    pub input: &'a JobInput,
    pub geometry: &'a WellGeometry,
    pub survey: &'a Survey,
    pub placement: &'a PlacementResult,
    pub mechanics: &'a MechanicsResult,
    pub plug: &'a PlugResult,
    pub torque_drag: &'a TorqueDragResult,
}

/// Work-string end further than this from the liner top is flagged (ft)
const WORK_STRING_MISMATCH_FT: f64 = 1.0;

/// Classify a computed job.
pub fn classify(inputs: &StatusInputs<'_>, settings: &StatusSettings) -> StatusReport {
    let StatusInputs {
        input,
        geometry,
        survey,
        placement,
        mechanics,
        plug,
        torque_drag,
    } = inputs;
    let mut warnings: Vec<JobWarning> = placement.warnings.clone();

    if survey.is_fallback() {
        warnings.push(JobWarning::FlatSurveyFallback);
    }

    let string_bottom = input.work_string.iter().map(|s| s.bottom_md_ft).fold(0.0, f64::max);
    if (string_bottom - geometry.top_of_liner_md_ft).abs() > WORK_STRING_MISMATCH_FT {
        warnings.push(JobWarning::WorkStringMismatch {
            string_bottom_md_ft: string_bottom,
            top_of_liner_md_ft: geometry.top_of_liner_md_ft,
        });
    }

    // Cement coverage
    if !placement.reached_landing_collar {
        warnings.push(JobWarning::CementBelowLandingCollar {
            top_of_cement_md_ft: placement.top_of_cement_md_ft,
            landing_collar_md_ft: geometry.landing_collar_md_ft,
        });
    }
    if placement.cement_pumped_bbl > 0.0
        && placement.cement_excess_bbl > settings.max_cement_excess_fraction * placement.cement_pumped_bbl
    {
        warnings.push(JobWarning::CementExcess {
            excess_bbl: placement.cement_excess_bbl,
            pumped_bbl: placement.cement_pumped_bbl,
        });
    }

    // Rig
    if let (Some(capacity), Some(margin)) = (mechanics.rig_capacity_lbf, mechanics.rig_margin) {
        if mechanics.hookload_lbf > capacity {
            warnings.push(JobWarning::RigCapacityExceeded {
                hookload_lbf: mechanics.hookload_lbf,
                capacity_lbf: capacity,
            });
        } else if margin < settings.min_force_margin {
            warnings.push(JobWarning::RigMarginLow {
                margin,
                minimum: settings.min_force_margin,
            });
        }
    }

    // Plug
    if !plug.seat_holds() {
        warnings.push(JobWarning::PlugShearExceeded {
            bump_force_lbf: plug.bump_force_lbf,
            shear_capacity_lbf: plug.shear_capacity_lbf,
        });
    } else if let Some(sf) = plug.safety_factor {
        let minimum = 1.0 + settings.min_force_margin;
        if sf < minimum {
            warnings.push(JobWarning::PlugMarginLow {
                safety_factor: sf,
                minimum,
            });
        }
    }
    if !plug.shear_success {
        warnings.push(JobWarning::DartShearNotConfirmed {
            launch_bbl: plug.dart_launch_volume_bbl,
            threshold_bbl: plug.shear_threshold_bbl,
        });
    }
    if !plug.bump_reached {
        warnings.push(JobWarning::BumpNotReached {
            after_latch_bbl: plug.displacement_after_latch_bbl,
            required_bbl: plug.volume_to_bump_bbl,
        });
    }

    if !torque_drag.converged {
        warnings.push(JobWarning::SolverNotConverged {
            residual_lbf: torque_drag.residual_lbf,
            iterations: torque_drag.iterations,
        });
    }

    StatusReport::from_warnings(warnings)
}
