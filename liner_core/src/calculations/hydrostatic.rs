//! # Hydrostatics
//!
//! Pressure from stacked fluid columns and the U-tube force they put on
//! the liner.
//!
//! ## Pressure
//!
//! `P(tvd) = 0.052 × Σ ρᵢ × hᵢ` over every column above `tvd`. Columns are
//! taken in TVD order and each foot of vertical height counts once: an
//! interval two columns claim is charged to the shallower one, and an
//! interval nobody claims is charged to mud.
//!
//! ## U-tube
//!
//! For each placed (non-mud) annular column alongside the liner:
//!
//! ```text
//! ΔP = (ρ_annulus − ρ̄_inside) × 0.052 × Δtvd
//! F  = ΔP × π/4 × OD²
//! ```
//!
//! `ρ̄_inside` is the equivalent density of the inside stack over the same
//! TVD interval. Positive force pushes the liner down. The cement-only
//! share is reported separately as the load on the landed plug.

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::WellGeometry;
use crate::calculations::placement::{FluidKind, PlacedColumn, PlacementResult};
use crate::equations::circle_area;
use crate::survey::Survey;
use crate::units::{hydrostatic_psi, PSI_PER_FT_PER_PPG};

/// A column reduced to density and vertical extent
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slab {
    density_ppg: f64,
    top_tvd_ft: f64,
    bottom_tvd_ft: f64,
}

/// Fluid columns on one side of the string, sorted by top TVD.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStack {
    slabs: Vec<Slab>,
    base_density_ppg: f64,
}

impl ColumnStack {
    /// Build a stack; heights no column covers count as `base_density_ppg`.
    pub fn new<'a>(columns: impl IntoIterator<Item = &'a PlacedColumn>, base_density_ppg: f64) -> Self {
        let mut slabs: Vec<Slab> = columns
            .into_iter()
            .filter(|c| c.bottom_tvd_ft > c.top_tvd_ft)
            .map(|c| Slab {
                density_ppg: c.density_ppg,
                top_tvd_ft: c.top_tvd_ft,
                bottom_tvd_ft: c.bottom_tvd_ft,
            })
            .collect();
        slabs.sort_by(|a, b| a.top_tvd_ft.total_cmp(&b.top_tvd_ft));
        ColumnStack {
            slabs,
            base_density_ppg,
        }
    }

    /// Hydrostatic pressure at a TVD (psi). Zero at or above surface.
    pub fn pressure_at(&self, tvd_ft: f64) -> f64 {
        if !(tvd_ft > 0.0) {
            return 0.0;
        }

        let mut weight = 0.0; // Σ ρ·h (ppg·ft)
        let mut covered_to = 0.0;
        for slab in &self.slabs {
            if covered_to >= tvd_ft {
                break;
            }
            let top = slab.top_tvd_ft.max(covered_to);
            if top > covered_to {
                let gap_bottom = top.min(tvd_ft);
                weight += self.base_density_ppg * (gap_bottom - covered_to);
                covered_to = gap_bottom;
            }
            let bottom = slab.bottom_tvd_ft.min(tvd_ft);
            if bottom > covered_to {
                weight += slab.density_ppg * (bottom - covered_to);
                covered_to = bottom;
            }
        }
        if covered_to < tvd_ft {
            weight += self.base_density_ppg * (tvd_ft - covered_to);
        }
        weight * PSI_PER_FT_PER_PPG
    }

    /// Equivalent density over a TVD interval (ppg).
    ///
    /// An empty or inverted interval returns the base density.
    pub fn equivalent_density(&self, top_tvd_ft: f64, bottom_tvd_ft: f64) -> f64 {
        let height = bottom_tvd_ft - top_tvd_ft;
        if !(height > 0.0) {
            return self.base_density_ppg;
        }
        (self.pressure_at(bottom_tvd_ft) - self.pressure_at(top_tvd_ft)) / (PSI_PER_FT_PER_PPG * height)
    }
}

/// U-tube contribution of one annular column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UTubeColumn {
    pub label: String,
    pub kind: FluidKind,
    pub annulus_density_ppg: f64,
    pub inside_equivalent_ppg: f64,
    pub top_tvd_ft: f64,
    pub bottom_tvd_ft: f64,
    pub differential_psi: f64,
    pub force_lbf: f64,
}

/// Pressures at the key depths and the net U-tube load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrostaticResult {
    pub top_of_liner_tvd_ft: f64,
    pub landing_collar_tvd_ft: f64,
    pub shoe_tvd_ft: f64,

    pub annulus_pressure_top_of_liner_psi: f64,
    pub annulus_pressure_landing_collar_psi: f64,
    pub annulus_pressure_shoe_psi: f64,

    pub inside_pressure_top_of_liner_psi: f64,
    pub inside_pressure_landing_collar_psi: f64,
    pub inside_pressure_shoe_psi: f64,

    /// Annulus minus inside at the shoe (psi)
    pub shoe_differential_psi: f64,

    /// Mud-only pressure at the shoe for reference (psi)
    pub mud_pressure_shoe_psi: f64,

    /// Σ of per-column differentials (psi)
    pub u_tube_differential_psi: f64,

    /// Σ of per-column forces; positive pushes the liner down (lbf)
    pub u_tube_force_lbf: f64,

    /// Σ of forces from cement columns only (lbf)
    pub cement_u_tube_force_lbf: f64,

    pub columns: Vec<UTubeColumn>,
}

/// Integrate both stacks and compute the U-tube load on the liner.
pub fn analyze(
    placement: &PlacementResult,
    geometry: &WellGeometry,
    survey: &Survey,
    mud_ppg: f64,
    liner_od_in: f64,
) -> HydrostaticResult {
    let annulus = ColumnStack::new(&placement.annulus, mud_ppg);
    let inside = ColumnStack::new(&placement.inside, mud_ppg);

    let tol_tvd = survey.tvd_at(geometry.top_of_liner_md_ft);
    let lc_tvd = survey.tvd_at(geometry.landing_collar_md_ft);
    let shoe_tvd = survey.tvd_at(geometry.liner_shoe_md_ft);
    let area = circle_area(liner_od_in);

    // Only the part of each column that runs alongside the liner
    let columns: Vec<UTubeColumn> = placement
        .annulus
        .iter()
        .filter(|c| c.kind != FluidKind::Mud)
        .filter_map(|c| {
            let top = c.top_tvd_ft.max(tol_tvd);
            let bottom = c.bottom_tvd_ft.min(shoe_tvd);
            if !(bottom > top) {
                return None;
            }
            let inside_eq = inside.equivalent_density(top, bottom);
            let differential = (c.density_ppg - inside_eq) * PSI_PER_FT_PER_PPG * (bottom - top);
            Some(UTubeColumn {
                label: c.label.clone(),
                kind: c.kind,
                annulus_density_ppg: c.density_ppg,
                inside_equivalent_ppg: inside_eq,
                top_tvd_ft: top,
                bottom_tvd_ft: bottom,
                differential_psi: differential,
                force_lbf: differential * area,
            })
        })
        .collect();

    let annulus_shoe = annulus.pressure_at(shoe_tvd);
    let inside_shoe = inside.pressure_at(shoe_tvd);

    HydrostaticResult {
        top_of_liner_tvd_ft: tol_tvd,
        landing_collar_tvd_ft: lc_tvd,
        shoe_tvd_ft: shoe_tvd,
        annulus_pressure_top_of_liner_psi: annulus.pressure_at(tol_tvd),
        annulus_pressure_landing_collar_psi: annulus.pressure_at(lc_tvd),
        annulus_pressure_shoe_psi: annulus_shoe,
        inside_pressure_top_of_liner_psi: inside.pressure_at(tol_tvd),
        inside_pressure_landing_collar_psi: inside.pressure_at(lc_tvd),
        inside_pressure_shoe_psi: inside_shoe,
        shoe_differential_psi: annulus_shoe - inside_shoe,
        mud_pressure_shoe_psi: hydrostatic_psi(mud_ppg, shoe_tvd),
        u_tube_differential_psi: columns.iter().map(|c| c.differential_psi).sum(),
        u_tube_force_lbf: columns.iter().map(|c| c.force_lbf).sum(),
        cement_u_tube_force_lbf: columns
            .iter()
            .filter(|c| c.kind == FluidKind::Cement)
            .map(|c| c.force_lbf)
            .sum(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::placement::ColumnLocation;
    use crate::calculations::{geometry, placement};
    use crate::job::{FluidBatch, JobInput};

    fn col(density: f64, top: f64, bottom: f64) -> PlacedColumn {
        PlacedColumn {
            label: "test".to_string(),
            kind: FluidKind::Cement,
            location: ColumnLocation::Annulus,
            segment: "test".to_string(),
            density_ppg: density,
            top_md_ft: top,
            bottom_md_ft: bottom,
            top_tvd_ft: top,
            bottom_tvd_ft: bottom,
            volume_bbl: 0.0,
        }
    }

    #[test]
    fn test_uniform_mud() {
        let stack = ColumnStack::new(std::iter::empty(), 10.0);
        assert!((stack.pressure_at(10_000.0) - 5200.0).abs() < 1e-9);
        assert_eq!(stack.pressure_at(0.0), 0.0);
        assert_eq!(stack.pressure_at(-50.0), 0.0);
    }

    #[test]
    fn test_layered_columns() {
        let cols = vec![col(16.0, 8000.0, 10_000.0), col(12.0, 0.0, 8000.0)];
        let stack = ColumnStack::new(&cols, 10.0);
        let expected = 0.052 * (12.0 * 8000.0 + 16.0 * 2000.0);
        assert!((stack.pressure_at(10_000.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gap_counts_as_base() {
        let cols = vec![col(16.0, 5000.0, 6000.0)];
        let stack = ColumnStack::new(&cols, 10.0);
        let expected = 0.052 * (10.0 * 5000.0 + 16.0 * 1000.0 + 10.0 * 1000.0);
        assert!((stack.pressure_at(7000.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_not_double_counted() {
        let cols = vec![col(12.0, 0.0, 6000.0), col(16.0, 5000.0, 7000.0)];
        let stack = ColumnStack::new(&cols, 10.0);
        let expected = 0.052 * (12.0 * 6000.0 + 16.0 * 1000.0);
        assert!((stack.pressure_at(7000.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_with_depth() {
        let cols = vec![col(8.5, 0.0, 3000.0), col(16.7, 3000.0, 9000.0)];
        let stack = ColumnStack::new(&cols, 12.0);
        let mut prev = 0.0;
        for i in 1..120 {
            let p = stack.pressure_at(i as f64 * 100.0);
            assert!(p >= prev);
            prev = p;
        }
    }

    #[test]
    fn test_equivalent_density() {
        let cols = vec![col(16.0, 1000.0, 2000.0)];
        let stack = ColumnStack::new(&cols, 10.0);
        assert!((stack.equivalent_density(1000.0, 2000.0) - 16.0).abs() < 1e-9);
        assert!((stack.equivalent_density(500.0, 1500.0) - 13.0).abs() < 1e-9);
        assert_eq!(stack.equivalent_density(2000.0, 2000.0), 10.0);
        assert_eq!(stack.equivalent_density(2000.0, 1000.0), 10.0);
    }

    #[test]
    fn test_heavy_annulus_pushes_liner_down() {
        let job = JobInput::example();
        let survey = Survey::new(job.survey.clone());
        let g = geometry::resolve(&job).unwrap();
        let p = placement::place(&job, &g, &survey);
        let h = analyze(&p, &g, &survey, job.mud_density_ppg, job.liner.od_in);

        assert!(h.u_tube_force_lbf > 0.0);
        assert!(h.annulus_pressure_shoe_psi > h.mud_pressure_shoe_psi);
        assert!(h.annulus_pressure_top_of_liner_psi <= h.annulus_pressure_landing_collar_psi);
        assert!(h.annulus_pressure_landing_collar_psi <= h.annulus_pressure_shoe_psi);
        for c in &h.columns {
            assert!(c.top_tvd_ft >= h.top_of_liner_tvd_ft - 1e-9);
            assert!(c.bottom_tvd_ft <= h.shoe_tvd_ft + 1e-9);
        }
    }

    #[test]
    fn test_heavy_spacer_excluded_from_cement_force() {
        let mut job = JobInput::example();
        job.fluids.spacers = vec![FluidBatch::new("Heavy spacer", 60.0, 18.0)];
        for b in job.fluids.cements.iter_mut() {
            b.density_ppg = job.mud_density_ppg;
        }
        let survey = Survey::new(job.survey.clone());
        let g = geometry::resolve(&job).unwrap();
        let p = placement::place(&job, &g, &survey);
        let h = analyze(&p, &g, &survey, job.mud_density_ppg, job.liner.od_in);

        assert!(h.u_tube_force_lbf > 0.0);
        assert!(h.cement_u_tube_force_lbf.abs() < h.u_tube_force_lbf);
        let spacer: f64 = h
            .columns
            .iter()
            .filter(|c| c.kind == FluidKind::Spacer)
            .map(|c| c.force_lbf)
            .sum();
        assert!((h.u_tube_force_lbf - spacer - h.cement_u_tube_force_lbf).abs() < 1e-6);
    }

    #[test]
    fn test_balanced_fluids_have_no_u_tube() {
        let mut job = JobInput::example();
        for b in job
            .fluids
            .spacers
            .iter_mut()
            .chain(job.fluids.cements.iter_mut())
            .chain(job.fluids.displacement.iter_mut())
        {
            b.density_ppg = job.mud_density_ppg;
        }
        let survey = Survey::new(job.survey.clone());
        let g = geometry::resolve(&job).unwrap();
        let p = placement::place(&job, &g, &survey);
        let h = analyze(&p, &g, &survey, job.mud_density_ppg, job.liner.od_in);
        assert!(h.u_tube_force_lbf.abs() < 1e-6);
        assert!(h.shoe_differential_psi.abs() < 1e-6);
    }
}
