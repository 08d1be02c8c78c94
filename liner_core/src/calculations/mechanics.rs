//! # String Mechanics
//!
//! Buoyed weights, stretch, hookload and the net force on the liner hanger.
//!
//! ## Stretch
//!
//! Each section carries the buoyed weight of everything below it plus half
//! its own weight on average. Stretch is Hooke's law on that average load:
//!
//! ```text
//! ΔL (in) = F_avg × L × 12 / (E × A_steel)
//! ```
//!
//! ## Hanger Force
//!
//! `F_net = W_liner,buoyed + F_set-down + F_u-tube`. The factored value
//! (`F_net × safety factor`) is reported next to the raw force, never in
//! place of it.

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::WellGeometry;
use crate::equations::{air_weight, buoyancy_factor, buoyed_weight, stretch_in};
use crate::job::JobInput;

/// Loads on one tubular section of the running string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLoad {
    pub label: String,
    pub top_md_ft: f64,
    pub bottom_md_ft: f64,
    pub length_ft: f64,
    pub air_weight_lbf: f64,
    pub buoyed_weight_lbf: f64,
    pub steel_area_in2: f64,
    /// Buoyed weight hanging below the section (lbf)
    pub load_below_lbf: f64,
    /// Mean axial load used for stretch (lbf)
    pub average_load_lbf: f64,
    pub stretch_in: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicsResult {
    pub buoyancy_factor: f64,

    pub liner_air_weight_lbf: f64,
    pub liner_buoyed_weight_lbf: f64,
    pub work_string_air_weight_lbf: f64,
    pub work_string_buoyed_weight_lbf: f64,

    /// Static buoyed hookload of work string plus liner (lbf)
    pub hookload_lbf: f64,

    /// Work-string sections then the liner, top to bottom
    pub sections: Vec<SectionLoad>,
    pub total_stretch_in: f64,

    pub set_down_force_lbf: f64,
    pub u_tube_force_lbf: f64,
    pub net_hanger_force_lbf: f64,
    pub safety_factor: f64,
    pub factored_hanger_force_lbf: f64,

    pub rig_capacity_lbf: Option<f64>,
    /// `(capacity − hookload) / capacity`
    pub rig_margin: Option<f64>,
}

/// Compute weights, stretch and hanger force.
pub fn calculate(input: &JobInput, geometry: &WellGeometry, u_tube_force_lbf: f64) -> MechanicsResult {
    let bf = buoyancy_factor(input.mud_density_ppg);

    // (label, top, bottom, ppf, steel area), top to bottom
    let mut strings: Vec<(String, f64, f64, f64, f64)> = input
        .work_string
        .iter()
        .map(|s| (s.label.clone(), s.top_md_ft, s.bottom_md_ft, s.weight_ppf, s.steel_area_in2()))
        .collect();
    let liner_label = if input.liner.label.is_empty() {
        "Liner".to_string()
    } else {
        input.liner.label.clone()
    };
    strings.push((
        liner_label,
        geometry.top_of_liner_md_ft,
        geometry.liner_shoe_md_ft,
        input.liner.weight_ppf,
        input.liner.steel_area_in2(),
    ));

    let mut sections: Vec<SectionLoad> = strings
        .into_iter()
        .map(|(label, top, bottom, ppf, area)| {
            let length = (bottom - top).max(0.0);
            SectionLoad {
                label,
                top_md_ft: top,
                bottom_md_ft: bottom,
                length_ft: length,
                air_weight_lbf: air_weight(length, ppf),
                buoyed_weight_lbf: buoyed_weight(length, ppf, bf),
                steel_area_in2: area,
                load_below_lbf: 0.0,
                average_load_lbf: 0.0,
                stretch_in: 0.0,
            }
        })
        .collect();

    // Accumulate from the bottom up
    let mut below = 0.0;
    for s in sections.iter_mut().rev() {
        s.load_below_lbf = below;
        s.average_load_lbf = below + s.buoyed_weight_lbf / 2.0;
        s.stretch_in = stretch_in(s.average_load_lbf, s.length_ft, s.steel_area_in2);
        below += s.buoyed_weight_lbf;
    }

    let n_ws = input.work_string.len();
    let (ws, liner) = sections.split_at(n_ws);
    let work_string_air: f64 = ws.iter().map(|s| s.air_weight_lbf).sum();
    let work_string_buoyed: f64 = ws.iter().map(|s| s.buoyed_weight_lbf).sum();
    let liner_air: f64 = liner.iter().map(|s| s.air_weight_lbf).sum();
    let liner_buoyed: f64 = liner.iter().map(|s| s.buoyed_weight_lbf).sum();
    let hookload = work_string_buoyed + liner_buoyed;

    let ops = &input.operations;
    let net = liner_buoyed + ops.set_down_force_lbf + u_tube_force_lbf;
    let rig_capacity = ops.rig_capacity_lbf.filter(|c| *c > 0.0);

    MechanicsResult {
        buoyancy_factor: bf,
        liner_air_weight_lbf: liner_air,
        liner_buoyed_weight_lbf: liner_buoyed,
        work_string_air_weight_lbf: work_string_air,
        work_string_buoyed_weight_lbf: work_string_buoyed,
        hookload_lbf: hookload,
        total_stretch_in: sections.iter().map(|s| s.stretch_in).sum(),
        sections,
        set_down_force_lbf: ops.set_down_force_lbf,
        u_tube_force_lbf,
        net_hanger_force_lbf: net,
        safety_factor: ops.safety_factor,
        factored_hanger_force_lbf: net * ops.safety_factor,
        rig_capacity_lbf: rig_capacity,
        rig_margin: rig_capacity.map(|c| (c - hookload) / c),
    }
}
