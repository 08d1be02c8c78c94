//! # Well Geometry
//!
//! Resolves the derived depths and capacities every later stage works from.
//!
//! ## Depths
//!
//! ```text
//!  surface ─────────────────────────── 0
//!     │ work string
//!  top of liner ────────────────────── casing shoe − overlap
//!     │ overlap (casing ID × liner OD)
//!  casing shoe ─────────────────────── casing_shoe_md
//!     │ open-hole annulus (hole × liner OD)
//!  landing collar ──────────────────── shoe − shoe track (default)
//!     │ shoe track
//!  liner shoe ──────────────────────── liner_shoe_md
//!     │ rat hole (hole ID)
//!  TD ──────────────────────────────── total_depth_md
//! ```
//!
//! Capacities use `ID² / 1029.4` (bbl/ft).

use serde::{Deserialize, Serialize};

use crate::equations::{capacity_annular, capacity_internal, circle_area};
use crate::errors::{CalcError, CalcResult};
use crate::job::JobInput;

/// Internal capacity of one work-string section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCapacity {
    pub label: String,
    pub top_md_ft: f64,
    pub bottom_md_ft: f64,
    pub capacity_bbl_ft: f64,
    pub volume_bbl: f64,
}

/// Derived depths, lengths, capacities and volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellGeometry {
    // Depths (ft MD)
    pub top_of_liner_md_ft: f64,
    pub casing_shoe_md_ft: f64,
    pub landing_collar_md_ft: f64,
    pub liner_shoe_md_ft: f64,
    pub total_depth_md_ft: f64,

    // Lengths (ft)
    pub liner_length_ft: f64,
    pub overlap_length_ft: f64,
    pub open_hole_length_ft: f64,
    pub rat_hole_ft: f64,
    pub shoe_track_ft: f64,

    // Capacities (bbl/ft)
    pub overlap_annular_capacity: f64,
    pub open_hole_annular_capacity: f64,
    pub rat_hole_capacity: f64,
    pub liner_internal_capacity: f64,
    pub casing_internal_capacity: f64,

    // Volumes (bbl)
    pub overlap_annular_volume_bbl: f64,
    pub open_hole_annular_volume_bbl: f64,
    pub rat_hole_volume_bbl: f64,
    pub liner_volume_above_landing_collar_bbl: f64,
    pub shoe_track_volume_bbl: f64,
    pub work_string_volume_bbl: f64,

    /// Work-string sections with their internal capacity
    pub work_string: Vec<SectionCapacity>,

    /// Area enclosed by the liner OD (in²)
    pub liner_outer_area_in2: f64,

    /// Area enclosed by the liner ID (in²)
    pub liner_inner_area_in2: f64,
}

impl WellGeometry {
    /// Annular volume available for cement below the top of the liner (bbl)
    pub fn annular_volume_below_liner_top_bbl(&self) -> f64 {
        self.rat_hole_volume_bbl + self.open_hole_annular_volume_bbl + self.overlap_annular_volume_bbl
    }
}

/// Resolve geometry from a validated job input.
///
/// Fails when a cemented interval has a non-positive capacity, which means
/// the liner OD does not fit inside the casing or hole.
pub fn resolve(input: &JobInput) -> CalcResult<WellGeometry> {
    let hole = &input.hole;
    let liner = &input.liner;

    let top_of_liner = hole.casing_shoe_md_ft - hole.liner_overlap_ft;
    let landing_collar = hole.landing_collar_md();
    let total_depth = hole.total_depth_md();
    if total_depth < hole.liner_shoe_md_ft {
        return Err(CalcError::invalid_input(
            "hole.total_depth_md_ft",
            total_depth.to_string(),
            "Total depth cannot be above the liner shoe",
        ));
    }

    let overlap_length = hole.casing_shoe_md_ft - top_of_liner;
    let open_hole_length = hole.liner_shoe_md_ft - hole.casing_shoe_md_ft;
    let rat_hole = total_depth - hole.liner_shoe_md_ft;

    let overlap_cap = capacity_annular(input.casing.id_in, liner.od_in);
    let open_hole_cap = capacity_annular(hole.open_hole_id_in, liner.od_in);
    let rat_hole_cap = capacity_internal(hole.open_hole_id_in);
    let liner_cap = capacity_internal(liner.id_in);

    if overlap_length > 0.0 && !(overlap_cap > 0.0) {
        return Err(CalcError::invalid_input(
            "liner.od_in",
            liner.od_in.to_string(),
            format!("Liner OD does not fit inside casing ID {}", input.casing.id_in),
        ));
    }
    if open_hole_length > 0.0 && !(open_hole_cap > 0.0) {
        return Err(CalcError::invalid_input(
            "liner.od_in",
            liner.od_in.to_string(),
            format!("Liner OD does not fit inside open hole {}", hole.open_hole_id_in),
        ));
    }

    let work_string: Vec<SectionCapacity> = input
        .work_string
        .iter()
        .map(|s| {
            let cap = s.internal_capacity();
            SectionCapacity {
                label: s.label.clone(),
                top_md_ft: s.top_md_ft,
                bottom_md_ft: s.bottom_md_ft,
                capacity_bbl_ft: cap,
                volume_bbl: cap * s.length_ft(),
            }
        })
        .collect();
    let work_string_volume = work_string.iter().map(|s| s.volume_bbl).sum();

    Ok(WellGeometry {
        top_of_liner_md_ft: top_of_liner,
        casing_shoe_md_ft: hole.casing_shoe_md_ft,
        landing_collar_md_ft: landing_collar,
        liner_shoe_md_ft: hole.liner_shoe_md_ft,
        total_depth_md_ft: total_depth,

        liner_length_ft: hole.liner_shoe_md_ft - top_of_liner,
        overlap_length_ft: overlap_length,
        open_hole_length_ft: open_hole_length,
        rat_hole_ft: rat_hole,
        shoe_track_ft: hole.liner_shoe_md_ft - landing_collar,

        overlap_annular_capacity: overlap_cap,
        open_hole_annular_capacity: open_hole_cap,
        rat_hole_capacity: rat_hole_cap,
        liner_internal_capacity: liner_cap,
        casing_internal_capacity: input.casing.internal_capacity(),

        overlap_annular_volume_bbl: overlap_cap * overlap_length,
        open_hole_annular_volume_bbl: open_hole_cap * open_hole_length,
        rat_hole_volume_bbl: rat_hole_cap * rat_hole,
        liner_volume_above_landing_collar_bbl: liner_cap * (landing_collar - top_of_liner),
        shoe_track_volume_bbl: liner_cap * (hole.liner_shoe_md_ft - landing_collar),
        work_string_volume_bbl: work_string_volume,

        work_string,
        liner_outer_area_in2: circle_area(liner.od_in),
        liner_inner_area_in2: circle_area(liner.id_in),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_depths() {
        let g = resolve(&JobInput::example()).unwrap();
        assert_eq!(g.top_of_liner_md_ft, 4800.0);
        assert_eq!(g.liner_length_ft, 4480.0);
        assert_eq!(g.open_hole_length_ft, 4180.0);
        assert_eq!(g.rat_hole_ft, 20.0);
        assert_eq!(g.shoe_track_ft, 80.0);
    }

    #[test]
    fn test_capacities() {
        let g = resolve(&JobInput::example()).unwrap();
        assert!((g.open_hole_annular_capacity - (8.5 * 8.5 - 49.0) / 1029.4).abs() < 1e-12);
        assert!((g.overlap_annular_capacity - (8.681 * 8.681 - 49.0) / 1029.4).abs() < 1e-12);
        assert!((g.liner_internal_capacity - 6.276 * 6.276 / 1029.4).abs() < 1e-12);
        assert!(
            (g.liner_volume_above_landing_collar_bbl - g.liner_internal_capacity * 4400.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_work_string_volume() {
        let g = resolve(&JobInput::example()).unwrap();
        let expected = 3000.0 * 4.276 * 4.276 / 1029.4 + 1800.0 * 3.340 * 3.340 / 1029.4;
        assert!((g.work_string_volume_bbl - expected).abs() < 1e-9);
        assert_eq!(g.work_string.len(), 2);
    }

    #[test]
    fn test_no_rat_hole_when_td_unset() {
        let mut job = JobInput::example();
        job.hole.total_depth_md_ft = 0.0;
        let g = resolve(&job).unwrap();
        assert_eq!(g.rat_hole_ft, 0.0);
        assert_eq!(g.rat_hole_volume_bbl, 0.0);
    }

    #[test]
    fn test_liner_larger_than_hole_rejected() {
        let mut job = JobInput::example();
        job.hole.open_hole_id_in = 6.5;
        let err = resolve(&job).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_liner_larger_than_casing_rejected() {
        let mut job = JobInput::example();
        job.casing.id_in = 6.9;
        assert!(resolve(&job).is_err());
    }

    #[test]
    fn test_td_above_shoe_rejected() {
        let mut job = JobInput::example();
        job.hole.total_depth_md_ft = 9000.0;
        assert!(resolve(&job).is_err());
    }
}
