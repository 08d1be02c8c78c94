//! # Plug Travel
//!
//! Tracks the dart down the work string and the liner wiper plug to the
//! landing collar.
//!
//! ## Checks
//!
//! - **Shear**: the dart latches the wiper plug once the pumped volume
//!   reaches the work-string volume less the pump-stroke tolerance.
//!   Reaching the threshold exactly counts as sheared.
//! - **Bump**: after latching, the plug travels the liner from its top to
//!   the landing collar. Bump is expected once the displacement pumped past
//!   the latch covers that volume less the tolerance.
//! - **Seat**: the landed plug must hold the cement U-tube force plus
//!   set-down without shearing out of the landing collar:
//!
//! ```text
//! F_shear = τ × π/4 × ID_liner²
//! SF      = F_shear / F_bump
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::geometry::WellGeometry;
use crate::config::PlugSettings;
use crate::job::JobInput;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlugResult {
    pub string_internal_volume_bbl: f64,
    pub pump_stroke_tolerance_bbl: f64,

    /// Pumped volume at which the dart should shear (bbl)
    pub shear_threshold_bbl: f64,
    pub dart_launch_volume_bbl: f64,
    pub shear_success: bool,

    pub liner_volume_above_landing_collar_bbl: f64,
    /// Volume past the latch needed to bump (bbl)
    pub volume_to_bump_bbl: f64,
    pub displacement_pumped_bbl: f64,
    pub displacement_after_latch_bbl: f64,
    pub bump_reached: bool,

    pub shear_strength_psi: f64,
    pub contact_area_in2: f64,
    pub shear_capacity_lbf: f64,

    /// Hydrostatic force from cement plus set-down (lbf)
    pub bump_force_lbf: f64,

    /// `shear capacity / bump force`; None when nothing pushes the plug
    pub safety_factor: Option<f64>,
}

impl PlugResult {
    /// The seat holds the bump force
    pub fn seat_holds(&self) -> bool {
        self.bump_force_lbf <= self.shear_capacity_lbf
    }
}

/// Run the plug checks.
pub fn simulate(
    input: &JobInput,
    geometry: &WellGeometry,
    cement_force_lbf: f64,
    settings: &PlugSettings,
) -> PlugResult {
    let ops = &input.operations;
    let tolerance = ops
        .pump_stroke_tolerance_bbl
        .filter(|t| t.is_finite() && *t >= 0.0)
        .unwrap_or(settings.pump_stroke_tolerance_bbl);
    let shear_strength = ops
        .shear_strength_psi
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(settings.default_shear_strength_psi);

    let string_volume = geometry.work_string_volume_bbl;
    let shear_threshold = string_volume - tolerance;
    let shear_success = ops.dart_launch_volume_bbl >= shear_threshold;

    let liner_volume = geometry.liner_volume_above_landing_collar_bbl;
    let volume_to_bump = liner_volume - tolerance;
    let displacement = input.fluids.displacement_volume_bbl();
    let after_latch = (displacement - string_volume).max(0.0);

    let contact_area = geometry.liner_inner_area_in2;
    let shear_capacity = shear_strength * contact_area;
    let bump_force = cement_force_lbf + ops.set_down_force_lbf;
    let safety_factor = if bump_force > 0.0 {
        Some(shear_capacity / bump_force)
    } else {
        None
    };

    debug!(
        shear_threshold_bbl = shear_threshold,
        shear_success,
        bump_force_lbf = bump_force,
        shear_capacity_lbf = shear_capacity,
        "Plug travel evaluated"
    );

    PlugResult {
        string_internal_volume_bbl: string_volume,
        pump_stroke_tolerance_bbl: tolerance,
        shear_threshold_bbl: shear_threshold,
        dart_launch_volume_bbl: ops.dart_launch_volume_bbl,
        shear_success,
        liner_volume_above_landing_collar_bbl: liner_volume,
        volume_to_bump_bbl: volume_to_bump,
        displacement_pumped_bbl: displacement,
        displacement_after_latch_bbl: after_latch,
        bump_reached: after_latch >= volume_to_bump,
        shear_strength_psi: shear_strength,
        contact_area_in2: contact_area,
        shear_capacity_lbf: shear_capacity,
        bump_force_lbf: bump_force,
        safety_factor,
    }
}
