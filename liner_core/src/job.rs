//! # Liner Job
//!
//! The job input record, its validation, and the single engine entry point.
//!
//! ## Pipeline
//!
//! ```text
//! JobInput ──validate──► WellGeometry + Survey
//!                            │
//!                            ├─► placement ─► hydrostatics ─► mechanics ─► plug travel
//!                            │
//!                            └─► torque & drag (independent)
//!                                         │
//!                                         ▼
//!                                    JobResult ─► status
//! ```
//!
//! [`compute`] is pure: identical inputs and settings give bit-identical
//! results. [`run`] wraps a result with an id and wall-clock timestamp, kept
//! outside the numeric record.
//!
//! ## Example
//!
//! ```rust
//! use liner_core::config::EngineSettings;
//! use liner_core::job::{compute, JobInput};
//!
//! let input = JobInput::example();
//! let result = compute(&input, &EngineSettings::default()).unwrap();
//! assert!(result.geometry.top_of_liner_md_ft > 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calculations::geometry::{self, WellGeometry};
use crate::calculations::hydrostatic::{self, HydrostaticResult};
use crate::calculations::mechanics::{self, MechanicsResult};
use crate::calculations::placement::{self, PlacementResult};
use crate::calculations::plug::{self, PlugResult};
use crate::calculations::status::{self, StatusReport};
use crate::calculations::torque_drag::{self, TorqueDragResult};
use crate::config::EngineSettings;
use crate::equations::{capacity_internal, pipe_steel_area};
use crate::errors::{CalcError, CalcResult};
use crate::materials::TubularTable;
use crate::survey::{Survey, SurveyStation};
use crate::units::{lenient_f64, STEEL_DENSITY_PPG};

/// Version string stamped on every run
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Tubulars
// ============================================================================

/// Dimensions of a casing or liner string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubularSpec {
    /// Size label (e.g., "7in 26# P-110")
    #[serde(default)]
    pub label: String,

    /// Outer diameter (in)
    pub od_in: f64,

    /// Inner diameter (in)
    pub id_in: f64,

    /// Weight per foot (lb/ft)
    pub weight_ppf: f64,

    /// Steel grade, display only
    #[serde(default)]
    pub grade: String,
}

impl TubularSpec {
    /// Resolve a size from the reference table
    pub fn from_table(table: &TubularTable, label: &str) -> CalcResult<Self> {
        let size = table.lookup(label)?;
        Ok(TubularSpec {
            label: size.label.clone(),
            od_in: size.od_in,
            id_in: size.id_in,
            weight_ppf: size.weight_ppf,
            grade: size.grade.clone(),
        })
    }

    /// Internal capacity (bbl/ft)
    pub fn internal_capacity(&self) -> f64 {
        capacity_internal(self.id_in)
    }

    /// Steel cross-section (in²)
    pub fn steel_area_in2(&self) -> f64 {
        pipe_steel_area(self.od_in, self.id_in)
    }

    fn validate(&self, field: &str) -> CalcResult<()> {
        validate_diameters(field, self.od_in, self.id_in)?;
        if !(self.weight_ppf >= 0.0) {
            return Err(CalcError::invalid_input(
                format!("{}.weight_ppf", field),
                self.weight_ppf.to_string(),
                "Weight per foot cannot be negative",
            ));
        }
        Ok(())
    }
}

/// A tubular interval of the running string, positioned by MD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSection {
    /// Section label (e.g., "DP1")
    pub label: String,

    /// Outer diameter (in)
    pub od_in: f64,

    /// Inner diameter (in)
    pub id_in: f64,

    /// Weight per foot (lb/ft)
    pub weight_ppf: f64,

    /// Steel grade, display only
    #[serde(default)]
    pub grade: String,

    /// Top of the section (ft MD)
    pub top_md_ft: f64,

    /// Bottom of the section (ft MD)
    pub bottom_md_ft: f64,
}

impl PipeSection {
    /// Build a section from a reference-table size
    pub fn from_table(
        table: &TubularTable,
        size_label: &str,
        label: impl Into<String>,
        top_md_ft: f64,
        bottom_md_ft: f64,
    ) -> CalcResult<Self> {
        let size = table.lookup(size_label)?;
        Ok(PipeSection {
            label: label.into(),
            od_in: size.od_in,
            id_in: size.id_in,
            weight_ppf: size.weight_ppf,
            grade: size.grade.clone(),
            top_md_ft,
            bottom_md_ft,
        })
    }

    /// Section length (ft)
    pub fn length_ft(&self) -> f64 {
        (self.bottom_md_ft - self.top_md_ft).max(0.0)
    }

    /// Internal capacity (bbl/ft)
    pub fn internal_capacity(&self) -> f64 {
        capacity_internal(self.id_in)
    }

    /// Steel cross-section (in²)
    pub fn steel_area_in2(&self) -> f64 {
        pipe_steel_area(self.od_in, self.id_in)
    }
}

// ============================================================================
// Hole geometry
// ============================================================================

/// Static well dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleGeometry {
    /// Open-hole diameter below the casing shoe (in)
    pub open_hole_id_in: f64,

    /// Previous casing shoe (ft MD)
    pub casing_shoe_md_ft: f64,

    /// Liner shoe (ft MD)
    pub liner_shoe_md_ft: f64,

    /// Liner lap inside the previous casing (ft)
    pub liner_overlap_ft: f64,

    /// Shoe-track length (ft)
    pub shoe_track_ft: f64,

    /// Landing collar (ft MD); 0 places it one shoe track above the shoe
    #[serde(default)]
    pub landing_collar_md_ft: f64,

    /// Total depth of the hole (ft MD); 0 means no rat hole
    #[serde(default)]
    pub total_depth_md_ft: f64,
}

impl HoleGeometry {
    /// Landing collar MD with the shoe-track default applied
    pub fn landing_collar_md(&self) -> f64 {
        if self.landing_collar_md_ft > 0.0 {
            self.landing_collar_md_ft
        } else {
            self.liner_shoe_md_ft - self.shoe_track_ft
        }
    }

    /// Total depth with the no-rat-hole default applied
    pub fn total_depth_md(&self) -> f64 {
        if self.total_depth_md_ft > 0.0 {
            self.total_depth_md_ft
        } else {
            self.liner_shoe_md_ft
        }
    }
}

// ============================================================================
// Fluids
// ============================================================================

/// A pumped volume of one fluid.
///
/// Volume and density deserialize leniently: unparsable or non-finite
/// values become zero, and zero-volume batches are skipped by placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidBatch {
    pub label: String,

    /// Pumped volume (bbl)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume_bbl: f64,

    /// Density (ppg)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub density_ppg: f64,
}

impl FluidBatch {
    pub fn new(label: impl Into<String>, volume_bbl: f64, density_ppg: f64) -> Self {
        FluidBatch {
            label: label.into(),
            volume_bbl,
            density_ppg,
        }
    }

    /// Whether the batch takes part in placement
    pub fn is_pumped(&self) -> bool {
        self.volume_bbl.is_finite() && self.volume_bbl > 0.0
    }
}

/// Ordered fluid batches, each list in pumped order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FluidProgram {
    #[serde(default)]
    pub spacers: Vec<FluidBatch>,

    #[serde(default)]
    pub cements: Vec<FluidBatch>,

    #[serde(default)]
    pub displacement: Vec<FluidBatch>,
}

impl FluidProgram {
    /// Total cement volume pumped (bbl)
    pub fn cement_volume_bbl(&self) -> f64 {
        self.cements.iter().filter(|b| b.is_pumped()).map(|b| b.volume_bbl).sum()
    }

    /// Total displacement volume pumped (bbl)
    pub fn displacement_volume_bbl(&self) -> f64 {
        self.displacement.iter().filter(|b| b.is_pumped()).map(|b| b.volume_bbl).sum()
    }
}

// ============================================================================
// Operational inputs
// ============================================================================

/// Rig-floor parameters of the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationalInputs {
    /// Friction factor inside casing
    pub friction_cased: f64,

    /// Friction factor in open hole
    pub friction_open_hole: f64,

    /// Target downhole set-down (compression) on the liner (lbf)
    pub set_down_force_lbf: f64,

    /// Design factor applied to the hanger force for reporting
    pub safety_factor: f64,

    /// Volume pumped behind the dart when it sheared (bbl)
    pub dart_launch_volume_bbl: f64,

    /// Overrides the settings pump-stroke tolerance (bbl)
    pub pump_stroke_tolerance_bbl: Option<f64>,

    /// Overrides the settings plug shear strength (psi)
    pub shear_strength_psi: Option<f64>,

    /// Rig hoisting capacity (lbf); no rig check when absent
    pub rig_capacity_lbf: Option<f64>,

    /// Rotate the string while running (enables torque)
    pub rotate: bool,

    /// Torque-and-drag target MD; defaults to the liner shoe
    pub torque_drag_target_md_ft: Option<f64>,
}

impl Default for OperationalInputs {
    fn default() -> Self {
        OperationalInputs {
            friction_cased: 0.25,
            friction_open_hole: 0.35,
            set_down_force_lbf: 0.0,
            safety_factor: 1.25,
            dart_launch_volume_bbl: 0.0,
            pump_stroke_tolerance_bbl: None,
            shear_strength_psi: None,
            rig_capacity_lbf: None,
            rotate: false,
            torque_drag_target_md_ft: None,
        }
    }
}

// ============================================================================
// Job input
// ============================================================================

/// Complete configuration snapshot for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInput {
    /// Job label (well name, run number)
    #[serde(default)]
    pub label: String,

    /// Previous casing the liner hangs in
    pub casing: TubularSpec,

    /// Liner being cemented
    pub liner: TubularSpec,

    /// Running string from surface to the liner top, shallowest first
    #[serde(default)]
    pub work_string: Vec<PipeSection>,

    pub hole: HoleGeometry,

    /// Drilling mud density (ppg)
    pub mud_density_ppg: f64,

    #[serde(default)]
    pub fluids: FluidProgram,

    #[serde(default)]
    pub survey: Vec<SurveyStation>,

    #[serde(default)]
    pub operations: OperationalInputs,
}

impl JobInput {
    /// Validate the snapshot. Failures here are fatal and stop the run.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.mud_density_ppg > 0.0 && self.mud_density_ppg < STEEL_DENSITY_PPG) {
            return Err(CalcError::invalid_input(
                "mud_density_ppg",
                self.mud_density_ppg.to_string(),
                "Mud density must be positive and lighter than steel",
            ));
        }

        self.casing.validate("casing")?;
        self.liner.validate("liner")?;
        for (i, section) in self.work_string.iter().enumerate() {
            let field = format!("work_string[{}]", i);
            validate_diameters(&field, section.od_in, section.id_in)?;
            if !(section.top_md_ft >= 0.0 && section.bottom_md_ft >= section.top_md_ft) {
                return Err(CalcError::invalid_input(
                    format!("{}.bottom_md_ft", field),
                    section.bottom_md_ft.to_string(),
                    "Section MD range must start at or below surface and run downward",
                ));
            }
        }

        let hole = &self.hole;
        if !(hole.open_hole_id_in > 0.0) {
            return Err(CalcError::invalid_input(
                "hole.open_hole_id_in",
                hole.open_hole_id_in.to_string(),
                "Open-hole diameter must be positive",
            ));
        }
        if !(hole.liner_overlap_ft >= 0.0) {
            return Err(CalcError::invalid_input(
                "hole.liner_overlap_ft",
                hole.liner_overlap_ft.to_string(),
                "Liner overlap cannot be negative",
            ));
        }
        if !(hole.shoe_track_ft >= 0.0) {
            return Err(CalcError::invalid_input(
                "hole.shoe_track_ft",
                hole.shoe_track_ft.to_string(),
                "Shoe track length cannot be negative",
            ));
        }
        if !(hole.casing_shoe_md_ft > hole.liner_overlap_ft) {
            return Err(CalcError::invalid_input(
                "hole.casing_shoe_md_ft",
                hole.casing_shoe_md_ft.to_string(),
                "Casing shoe must be deeper than the liner overlap",
            ));
        }
        if !(hole.liner_shoe_md_ft > hole.casing_shoe_md_ft) {
            return Err(CalcError::invalid_input(
                "hole.liner_shoe_md_ft",
                hole.liner_shoe_md_ft.to_string(),
                "Liner shoe must be below the casing shoe",
            ));
        }
        let landing_collar = hole.landing_collar_md();
        if landing_collar >= hole.liner_shoe_md_ft {
            return Err(CalcError::invalid_input(
                "hole.landing_collar_md_ft",
                landing_collar.to_string(),
                "Landing collar must be above the liner shoe",
            ));
        }
        let top_of_liner = hole.casing_shoe_md_ft - hole.liner_overlap_ft;
        if landing_collar <= top_of_liner {
            return Err(CalcError::invalid_input(
                "hole.landing_collar_md_ft",
                landing_collar.to_string(),
                "Landing collar must be below the top of the liner",
            ));
        }

        for (group, batches) in [
            ("spacers", &self.fluids.spacers),
            ("cements", &self.fluids.cements),
            ("displacement", &self.fluids.displacement),
        ] {
            for (i, batch) in batches.iter().enumerate() {
                if batch.volume_bbl < 0.0 {
                    return Err(CalcError::invalid_input(
                        format!("fluids.{}[{}].volume_bbl", group, i),
                        batch.volume_bbl.to_string(),
                        "Volume cannot be negative",
                    ));
                }
                if batch.is_pumped() && !(batch.density_ppg > 0.0) {
                    return Err(CalcError::invalid_input(
                        format!("fluids.{}[{}].density_ppg", group, i),
                        batch.density_ppg.to_string(),
                        "Density must be positive for a pumped batch",
                    ));
                }
            }
        }

        let ops = &self.operations;
        if !(ops.friction_cased >= 0.0 && ops.friction_open_hole >= 0.0) {
            return Err(CalcError::invalid_input(
                "operations.friction",
                format!("{}/{}", ops.friction_cased, ops.friction_open_hole),
                "Friction factors cannot be negative",
            ));
        }
        if !(ops.safety_factor > 0.0) {
            return Err(CalcError::invalid_input(
                "operations.safety_factor",
                ops.safety_factor.to_string(),
                "Safety factor must be positive",
            ));
        }
        for (field, value) in [
            ("operations.set_down_force_lbf", ops.set_down_force_lbf),
            ("operations.dart_launch_volume_bbl", ops.dart_launch_volume_bbl),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a finite, non-negative number",
                ));
            }
        }
        if let Some(target) = ops.torque_drag_target_md_ft {
            if !(target > 0.0 && target <= hole.total_depth_md()) {
                return Err(CalcError::invalid_input(
                    "operations.torque_drag_target_md_ft",
                    target.to_string(),
                    "Torque-drag target must lie between surface and total depth",
                ));
            }
        }
        Ok(())
    }

    /// A representative 7" liner job in 8-1/2" hole below 9-5/8" casing.
    ///
    /// Used by the CLI demo and as a test fixture.
    pub fn example() -> Self {
        JobInput {
            label: "Example 7in liner".to_string(),
            casing: TubularSpec {
                label: "9-5/8in 47# P-110".to_string(),
                od_in: 9.625,
                id_in: 8.681,
                weight_ppf: 47.0,
                grade: "P-110".to_string(),
            },
            liner: TubularSpec {
                label: "7in 26# P-110".to_string(),
                od_in: 7.0,
                id_in: 6.276,
                weight_ppf: 26.0,
                grade: "P-110".to_string(),
            },
            work_string: vec![
                PipeSection {
                    label: "DP1".to_string(),
                    od_in: 5.0,
                    id_in: 4.276,
                    weight_ppf: 19.5,
                    grade: "S-135".to_string(),
                    top_md_ft: 0.0,
                    bottom_md_ft: 3000.0,
                },
                PipeSection {
                    label: "DP2".to_string(),
                    od_in: 4.0,
                    id_in: 3.340,
                    weight_ppf: 14.0,
                    grade: "S-135".to_string(),
                    top_md_ft: 3000.0,
                    bottom_md_ft: 4800.0,
                },
            ],
            hole: HoleGeometry {
                open_hole_id_in: 8.5,
                casing_shoe_md_ft: 5100.0,
                liner_shoe_md_ft: 9280.0,
                liner_overlap_ft: 300.0,
                shoe_track_ft: 80.0,
                landing_collar_md_ft: 9200.0,
                total_depth_md_ft: 9300.0,
            },
            mud_density_ppg: 12.5,
            fluids: FluidProgram {
                spacers: vec![FluidBatch::new("Spacer 1", 20.0, 13.5)],
                cements: vec![FluidBatch::new("Lead", 40.0, 15.8), FluidBatch::new("Tail", 30.0, 16.7)],
                displacement: vec![FluidBatch::new("Displacement", 150.0, 12.5)],
            },
            survey: vec![
                SurveyStation::without_tvd(0.0, 0.0),
                SurveyStation::without_tvd(2000.0, 0.0),
                SurveyStation::without_tvd(4000.0, 20.0),
                SurveyStation::without_tvd(6000.0, 35.0),
                SurveyStation::without_tvd(9300.0, 35.0),
            ],
            operations: OperationalInputs {
                set_down_force_lbf: 30_000.0,
                dart_launch_volume_bbl: 75.0,
                rig_capacity_lbf: Some(500_000.0),
                ..OperationalInputs::default()
            },
        }
    }
}

fn validate_diameters(field: &str, od_in: f64, id_in: f64) -> CalcResult<()> {
    if !(id_in > 0.0) {
        return Err(CalcError::invalid_input(
            format!("{}.id_in", field),
            id_in.to_string(),
            "Inner diameter must be positive",
        ));
    }
    if !(od_in > id_in) {
        return Err(CalcError::invalid_input(
            format!("{}.od_in", field),
            od_in.to_string(),
            "Outer diameter must exceed inner diameter",
        ));
    }
    Ok(())
}

// ============================================================================
// Results
// ============================================================================

/// Every derived quantity of one run. Contains no timestamps or ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub geometry: WellGeometry,
    pub placement: PlacementResult,
    pub hydrostatics: HydrostaticResult,
    pub mechanics: MechanicsResult,
    pub plug: PlugResult,
    pub torque_drag: TorqueDragResult,
    pub status: StatusReport,
}

/// A result stamped with an id and the wall-clock time it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRun {
    pub id: Uuid,
    pub label: String,
    pub engine_version: String,
    pub computed_at: DateTime<Utc>,
    pub result: JobResult,
}

/// Run the full engine on one input snapshot.
///
/// Returns `Err` only for invalid input or settings. Overflowing volumes, thin
/// margins and solver non-convergence are reported in `result.status`.
pub fn compute(input: &JobInput, settings: &EngineSettings) -> CalcResult<JobResult> {
    settings
        .validate()
        .map_err(|reason| CalcError::config_error("engine settings", reason))?;
    input.validate()?;
    info!(job = %input.label, "Computing liner job");

    let survey = Survey::new(input.survey.clone());
    let geometry = geometry::resolve(input)?;
    debug!(
        top_of_liner_md = geometry.top_of_liner_md_ft,
        rat_hole_ft = geometry.rat_hole_ft,
        "Geometry resolved"
    );

    let placement = placement::place(input, &geometry, &survey);
    let hydrostatics = hydrostatic::analyze(&placement, &geometry, &survey, input.mud_density_ppg, input.liner.od_in);
    let mechanics = mechanics::calculate(input, &geometry, hydrostatics.u_tube_force_lbf);
    let plug = plug::simulate(input, &geometry, hydrostatics.cement_u_tube_force_lbf, &settings.plug);
    let torque_drag = torque_drag::solve(input, &geometry, &survey, &settings.torque_drag);

    let status = status::classify(
        &status::StatusInputs {
            input,
            geometry: &geometry,
            survey: &survey,
            placement: &placement,
            mechanics: &mechanics,
            plug: &plug,
            torque_drag: &torque_drag,
        },
        &settings.status,
    );
    info!(job = %input.label, status = ?status.status, warnings = status.warnings.len(), "Liner job computed");

    Ok(JobResult {
        geometry,
        placement,
        hydrostatics,
        mechanics,
        plug,
        torque_drag,
        status,
    })
}

/// Compute and stamp a run with a fresh id and the current time.
pub fn run(input: &JobInput, settings: &EngineSettings) -> CalcResult<JobRun> {
    let result = compute(input, settings)?;
    Ok(JobRun {
        id: Uuid::new_v4(),
        label: input.label.clone(),
        engine_version: ENGINE_VERSION.to_string(),
        computed_at: Utc::now(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::status::JobStatus;
    use crate::materials::builtin_tubulars;

    /// Casing shoe 5100, liner shoe 9280, 8.5" hole, 7" liner, 300 ft lap,
    /// two 100 bbl spacers then 100 bbl @ 15.8 and 100 bbl @ 16.7.
    fn scenario_job() -> JobInput {
        let mut job = JobInput::example();
        job.hole = HoleGeometry {
            open_hole_id_in: 8.5,
            casing_shoe_md_ft: 5100.0,
            liner_shoe_md_ft: 9280.0,
            liner_overlap_ft: 300.0,
            shoe_track_ft: 80.0,
            landing_collar_md_ft: 9200.0,
            total_depth_md_ft: 9350.0,
        };
        job.fluids = FluidProgram {
            spacers: vec![FluidBatch::new("Spacer A", 100.0, 13.0), FluidBatch::new("Spacer B", 100.0, 13.5)],
            cements: vec![FluidBatch::new("Lead", 100.0, 15.8), FluidBatch::new("Tail", 100.0, 16.7)],
            displacement: vec![FluidBatch::new("Displacement", 150.0, 12.5)],
        };
        job
    }

    #[test]
    fn test_scenario_geometry_and_cement_conservation() {
        let result = compute(&scenario_job(), &EngineSettings::default()).unwrap();
        assert_eq!(result.geometry.top_of_liner_md_ft, 4800.0);

        let p = &result.placement;
        let toc = p.top_of_cement_md_ft.unwrap();
        assert!(toc >= result.geometry.top_of_liner_md_ft && toc < 9350.0);
        assert!((p.cement_placed_bbl + p.cement_excess_bbl - 200.0).abs() < 1e-6);
        // Annulus below the liner top holds far less than 200 bbl
        assert!(p.cement_excess_bbl > 0.0);
        assert_eq!(toc, result.geometry.top_of_liner_md_ft);
        assert_ne!(result.status.status, JobStatus::Success);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let job = JobInput::example();
        let a = compute(&job, &EngineSettings::default()).unwrap();
        let b = compute(&job, &EngineSettings::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_example_job_runs() {
        let result = compute(&JobInput::example(), &EngineSettings::default()).unwrap();
        assert!(result.mechanics.hookload_lbf > 0.0);
        assert!(result.placement.reached_landing_collar);
        assert!(result.torque_drag.converged);
        assert!(!result.torque_drag.points.is_empty());
    }

    #[test]
    fn test_landing_collar_below_shoe_rejected() {
        let mut job = JobInput::example();
        job.hole.landing_collar_md_ft = 9300.0;
        let err = compute(&job, &EngineSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_landing_collar_default_from_shoe_track() {
        let mut job = JobInput::example();
        job.hole.landing_collar_md_ft = 0.0;
        assert_eq!(job.hole.landing_collar_md(), 9200.0);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_non_positive_diameter_rejected() {
        let mut job = JobInput::example();
        job.liner.id_in = 0.0;
        assert!(job.validate().is_err());

        let mut job = JobInput::example();
        job.work_string[0].od_in = 4.0;
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_non_positive_density_rejected() {
        let mut job = JobInput::example();
        job.fluids.cements[0].density_ppg = 0.0;
        assert!(job.validate().is_err());

        // Zero-volume batches do not need a density
        let mut job = JobInput::example();
        job.fluids.cements.push(FluidBatch::new("Unused", 0.0, 0.0));
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_bump_force_counts_cement_only() {
        let mut job = JobInput::example();
        job.fluids.spacers = vec![FluidBatch::new("Heavy spacer", 60.0, 18.0)];
        for b in job.fluids.cements.iter_mut() {
            b.density_ppg = job.mud_density_ppg;
        }
        let result = compute(&job, &EngineSettings::default()).unwrap();
        let set_down = job.operations.set_down_force_lbf;
        let cement = result.hydrostatics.cement_u_tube_force_lbf;

        assert!(cement.abs() < 1.0);
        assert!(result.hydrostatics.u_tube_force_lbf > 1000.0);
        assert!((result.plug.bump_force_lbf - (set_down + cement)).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_settings_rejected_by_compute() {
        let mut settings = EngineSettings::default();
        settings.torque_drag.step_ft = 0.0;
        let err = compute(&JobInput::example(), &settings).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let mut settings = EngineSettings::default();
        settings.torque_drag.step_ft = -25.0;
        assert!(compute(&JobInput::example(), &settings).is_err());
    }

    #[test]
    fn test_torque_drag_target_bounded_by_total_depth() {
        let mut job = JobInput::example();
        job.operations.torque_drag_target_md_ft = Some(1.0e12);
        let err = compute(&job, &EngineSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        job.operations.torque_drag_target_md_ft = Some(f64::NAN);
        assert!(job.validate().is_err());

        job.operations.torque_drag_target_md_ft = Some(9300.0);
        let result = compute(&job, &EngineSettings::default()).unwrap();
        let last = result.torque_drag.points.last().unwrap();
        assert_eq!(last.md_ft, 9300.0);
    }

    #[test]
    fn test_negative_or_nan_operations_rejected() {
        let mut job = JobInput::example();
        job.operations.set_down_force_lbf = -1.0;
        assert!(job.validate().is_err());

        let mut job = JobInput::example();
        job.operations.set_down_force_lbf = f64::NAN;
        assert!(job.validate().is_err());

        let mut job = JobInput::example();
        job.operations.dart_launch_volume_bbl = f64::INFINITY;
        assert!(job.validate().is_err());

        let mut job = JobInput::example();
        job.operations.dart_launch_volume_bbl = -10.0;
        let err = compute(&job, &EngineSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_lenient_fluid_json() {
        let json = r#"{"label": "Lead", "volume_bbl": "abc", "density_ppg": "15.8"}"#;
        let batch: FluidBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.volume_bbl, 0.0);
        assert_eq!(batch.density_ppg, 15.8);
        assert!(!batch.is_pumped());
    }

    #[test]
    fn test_input_json_roundtrip() {
        let job = JobInput::example();
        let json = serde_json::to_string_pretty(&job).unwrap();
        let back: JobInput = serde_json::from_str(&json).unwrap();
        assert_eq!(job, back);
    }

    #[test]
    fn test_sample_job_file_matches_example() {
        let text = include_str!("../../demos/sample_job.json");
        let job: JobInput = serde_json::from_str(text).unwrap();
        assert_eq!(job, JobInput::example());
    }

    #[test]
    fn test_from_table() {
        let table = builtin_tubulars();
        let liner = TubularSpec::from_table(table, "7in 29# P-110").unwrap();
        assert_eq!(liner.id_in, 6.184);

        let dp = PipeSection::from_table(table, "5in 19.5# S-135", "DP1", 0.0, 4000.0).unwrap();
        assert_eq!(dp.length_ft(), 4000.0);
        assert!(PipeSection::from_table(table, "nope", "DP1", 0.0, 1.0).is_err());
    }

    #[test]
    fn test_run_stamps_metadata() {
        let job = JobInput::example();
        let run = run(&job, &EngineSettings::default()).unwrap();
        assert_eq!(run.label, job.label);
        assert_eq!(run.engine_version, ENGINE_VERSION);
        // Timestamp lives outside the numeric result
        let json = serde_json::to_string(&run.result).unwrap();
        assert!(!json.contains("computed_at"));
    }
}
