//! # Job Report
//!
//! Fixed, typed sections over a [`JobResult`] for display. Each section
//! borrows its part of the result; nothing is recomputed here.
//!
//! ```rust
//! use liner_core::config::EngineSettings;
//! use liner_core::job::{compute, JobInput};
//! use liner_core::report::{render_text, sections};
//!
//! let result = compute(&JobInput::example(), &EngineSettings::default()).unwrap();
//! assert_eq!(sections(&result).len(), 7);
//! assert!(render_text(&result).contains("PLUG TRAVEL"));
//! ```

use std::fmt::Write as _;

use serde::Serialize;

use crate::calculations::{
    HydrostaticResult, MechanicsResult, PlacementResult, PlugResult, StatusReport, TorqueDragResult,
    WellGeometry,
};
use crate::job::JobResult;

/// One labelled value in a section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: String,
    pub value: String,
    pub unit: &'static str,
}

impl ReportRow {
    fn num(label: impl Into<String>, value: f64, decimals: usize, unit: &'static str) -> Self {
        ReportRow {
            label: label.into(),
            value: format!("{:.*}", decimals, value),
            unit,
        }
    }

    fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        ReportRow {
            label: label.into(),
            value: value.into(),
            unit: "",
        }
    }

    fn flag(label: impl Into<String>, ok: bool) -> Self {
        Self::text(label, if ok { "yes" } else { "no" })
    }

    fn opt(label: impl Into<String>, value: Option<f64>, decimals: usize, unit: &'static str) -> Self {
        match value {
            Some(v) => Self::num(label, v, decimals, unit),
            None => Self::text(label, "n/a"),
        }
    }
}

/// A report section, in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", content = "data", rename_all = "snake_case")]
pub enum ReportSection<'a> {
    Geometry(&'a WellGeometry),
    Placement(&'a PlacementResult),
    Hydrostatics(&'a HydrostaticResult),
    Mechanics(&'a MechanicsResult),
    PlugTravel(&'a PlugResult),
    TorqueDrag(&'a TorqueDragResult),
    Status(&'a StatusReport),
}

impl ReportSection<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Geometry(_) => "WELL GEOMETRY",
            ReportSection::Placement(_) => "FLUID PLACEMENT",
            ReportSection::Hydrostatics(_) => "HYDROSTATICS",
            ReportSection::Mechanics(_) => "STRING MECHANICS",
            ReportSection::PlugTravel(_) => "PLUG TRAVEL",
            ReportSection::TorqueDrag(_) => "TORQUE & DRAG",
            ReportSection::Status(_) => "JOB STATUS",
        }
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        match self {
            ReportSection::Geometry(g) => vec![
                ReportRow::num("Top of liner", g.top_of_liner_md_ft, 1, "ft MD"),
                ReportRow::num("Casing shoe", g.casing_shoe_md_ft, 1, "ft MD"),
                ReportRow::num("Landing collar", g.landing_collar_md_ft, 1, "ft MD"),
                ReportRow::num("Liner shoe", g.liner_shoe_md_ft, 1, "ft MD"),
                ReportRow::num("Total depth", g.total_depth_md_ft, 1, "ft MD"),
                ReportRow::num("Liner length", g.liner_length_ft, 1, "ft"),
                ReportRow::num("Rat hole", g.rat_hole_ft, 1, "ft"),
                ReportRow::num("Overlap annular capacity", g.overlap_annular_capacity, 5, "bbl/ft"),
                ReportRow::num("Open-hole annular capacity", g.open_hole_annular_capacity, 5, "bbl/ft"),
                ReportRow::num("Liner internal capacity", g.liner_internal_capacity, 5, "bbl/ft"),
                ReportRow::num("Annulus below liner top", g.annular_volume_below_liner_top_bbl(), 2, "bbl"),
                ReportRow::num("Work string volume", g.work_string_volume_bbl, 2, "bbl"),
            ],
            ReportSection::Placement(p) => {
                let mut rows = vec![
                    ReportRow::opt("Top of cement", p.top_of_cement_md_ft, 1, "ft MD"),
                    ReportRow::opt("Top of cement", p.top_of_cement_tvd_ft, 1, "ft TVD"),
                    ReportRow::flag("Cement covers landing collar", p.reached_landing_collar),
                    ReportRow::num("Cement pumped", p.cement_pumped_bbl, 2, "bbl"),
                    ReportRow::num("Cement placed", p.cement_placed_bbl, 2, "bbl"),
                    ReportRow::num("Cement excess", p.cement_excess_bbl, 2, "bbl"),
                    ReportRow::num("Spacer excess", p.spacer_excess_bbl, 2, "bbl"),
                    ReportRow::num("Inside overflow", p.inside_overflow_bbl, 2, "bbl"),
                ];
                rows.extend(p.cement_segments().map(|c| {
                    ReportRow::text(
                        format!("  {} ({:?}, {})", c.label, c.location, c.segment),
                        format!("{:.1} - {:.1} ft MD, {:.2} bbl", c.top_md_ft, c.bottom_md_ft, c.volume_bbl),
                    )
                }));
                rows
            }
            ReportSection::Hydrostatics(h) => vec![
                ReportRow::num("Annulus @ top of liner", h.annulus_pressure_top_of_liner_psi, 0, "psi"),
                ReportRow::num("Annulus @ landing collar", h.annulus_pressure_landing_collar_psi, 0, "psi"),
                ReportRow::num("Annulus @ shoe", h.annulus_pressure_shoe_psi, 0, "psi"),
                ReportRow::num("Inside @ top of liner", h.inside_pressure_top_of_liner_psi, 0, "psi"),
                ReportRow::num("Inside @ landing collar", h.inside_pressure_landing_collar_psi, 0, "psi"),
                ReportRow::num("Inside @ shoe", h.inside_pressure_shoe_psi, 0, "psi"),
                ReportRow::num("Shoe differential", h.shoe_differential_psi, 0, "psi"),
                ReportRow::num("U-tube differential", h.u_tube_differential_psi, 0, "psi"),
                ReportRow::num("U-tube force", h.u_tube_force_lbf, 0, "lbf"),
                ReportRow::num("Cement U-tube force", h.cement_u_tube_force_lbf, 0, "lbf"),
            ],
            ReportSection::Mechanics(m) => {
                let mut rows = vec![
                    ReportRow::num("Buoyancy factor", m.buoyancy_factor, 4, ""),
                    ReportRow::num("Liner weight in air", m.liner_air_weight_lbf, 0, "lbf"),
                    ReportRow::num("Liner buoyed weight", m.liner_buoyed_weight_lbf, 0, "lbf"),
                    ReportRow::num("Work string buoyed weight", m.work_string_buoyed_weight_lbf, 0, "lbf"),
                    ReportRow::num("Hookload", m.hookload_lbf, 0, "lbf"),
                    ReportRow::opt("Rig capacity", m.rig_capacity_lbf, 0, "lbf"),
                    ReportRow::opt("Rig margin", m.rig_margin.map(|r| r * 100.0), 1, "%"),
                    ReportRow::num("Net hanger force", m.net_hanger_force_lbf, 0, "lbf"),
                    ReportRow::num("Factored hanger force", m.factored_hanger_force_lbf, 0, "lbf"),
                    ReportRow::num("Total stretch", m.total_stretch_in, 2, "in"),
                ];
                rows.extend(
                    m.sections
                        .iter()
                        .map(|s| ReportRow::num(format!("  Stretch {}", s.label), s.stretch_in, 2, "in")),
                );
                rows
            }
            ReportSection::PlugTravel(p) => vec![
                ReportRow::num("String internal volume", p.string_internal_volume_bbl, 2, "bbl"),
                ReportRow::num("Shear threshold", p.shear_threshold_bbl, 2, "bbl"),
                ReportRow::num("Dart launch volume", p.dart_launch_volume_bbl, 2, "bbl"),
                ReportRow::flag("Dart shear confirmed", p.shear_success),
                ReportRow::num("Volume to bump", p.volume_to_bump_bbl, 2, "bbl"),
                ReportRow::num("Displacement past latch", p.displacement_after_latch_bbl, 2, "bbl"),
                ReportRow::flag("Bump reached", p.bump_reached),
                ReportRow::num("Bump force", p.bump_force_lbf, 0, "lbf"),
                ReportRow::num("Seat shear capacity", p.shear_capacity_lbf, 0, "lbf"),
                ReportRow::opt("Seat safety factor", p.safety_factor, 2, ""),
            ],
            ReportSection::TorqueDrag(t) => vec![
                ReportRow::num("Target depth", t.target_md_ft, 1, "ft MD"),
                ReportRow::num("Set-down force", t.set_down_force_lbf, 0, "lbf"),
                ReportRow::num("Surface force", t.surface_force_lbf, 0, "lbf"),
                ReportRow::num("Free weight", t.free_weight_lbf, 0, "lbf"),
                ReportRow::num("Slack-off", t.slack_off_lbf, 0, "lbf"),
                ReportRow::num("Total drag", t.total_drag_lbf, 0, "lbf"),
                ReportRow::num("Peak torque", t.peak_torque_ftlbf, 0, "ft-lbf"),
                ReportRow::flag("Converged", t.converged),
                ReportRow::text("Iterations", t.iterations.to_string()),
            ],
            ReportSection::Status(s) => {
                let mut rows = vec![ReportRow::text("Result", s.status.to_string())];
                rows.extend(
                    s.warnings
                        .iter()
                        .map(|w| ReportRow::text(format!("  {:?}", w.severity()), w.to_string())),
                );
                rows
            }
        }
    }
}

/// Sections of a result in display order
pub fn sections(result: &JobResult) -> Vec<ReportSection<'_>> {
    vec![
        ReportSection::Geometry(&result.geometry),
        ReportSection::Placement(&result.placement),
        ReportSection::Hydrostatics(&result.hydrostatics),
        ReportSection::Mechanics(&result.mechanics),
        ReportSection::PlugTravel(&result.plug),
        ReportSection::TorqueDrag(&result.torque_drag),
        ReportSection::Status(&result.status),
    ]
}

/// Plain-text rendering for terminals
pub fn render_text(result: &JobResult) -> String {
    const RULE: &str = "═══════════════════════════════════════════════════════";
    let mut out = String::new();
    for section in sections(result) {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  {}", section.title());
        let _ = writeln!(out, "{}", RULE);
        for row in section.rows() {
            if row.unit.is_empty() {
                let _ = writeln!(out, "  {:<34} {}", row.label, row.value);
            } else {
                let _ = writeln!(out, "  {:<34} {} {}", row.label, row.value, row.unit);
            }
        }
        out.push('\n');
    }
    out
}
