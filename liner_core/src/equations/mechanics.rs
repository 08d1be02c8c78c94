//! # Mechanics Formulas
//!
//! Buoyancy, weight and axial stretch of a steel string in mud.
//!
//! ## Sign Conventions
//!
//! - Axial load: positive in tension
//! - Stretch: positive when the string elongates
//!
//! ## References
//!
//! - Bourgoyne et al., Applied Drilling Engineering, Chapter 7
//! - API TR 5C3: Casing and Tubing Performance Properties

use crate::units::{INCHES_PER_FOOT, STEEL_DENSITY_PPG, STEEL_MODULUS_PSI};

/// Buoyancy factor of steel in a fluid
///
/// # Formula
/// BF = (65.5 − ρ_mud) / 65.5
///
/// # Example
/// ```rust
/// use liner_core::equations::mechanics::buoyancy_factor;
///
/// let bf = buoyancy_factor(13.0);
/// assert!((bf - 0.80153).abs() < 1e-5);
/// ```
#[inline]
pub fn buoyancy_factor(mud_ppg: f64) -> f64 {
    (STEEL_DENSITY_PPG - mud_ppg) / STEEL_DENSITY_PPG
}

/// Weight of a pipe section in air (lbf)
#[inline]
pub fn air_weight(length_ft: f64, weight_ppf: f64) -> f64 {
    length_ft * weight_ppf
}

/// Weight of a pipe section in mud (lbf)
#[inline]
pub fn buoyed_weight(length_ft: f64, weight_ppf: f64, buoyancy_factor: f64) -> f64 {
    air_weight(length_ft, weight_ppf) * buoyancy_factor
}

/// Axial stretch under load (in), Hooke's law with a fixed steel modulus
///
/// # Formula
/// ΔL = (F × L) / (A × E) × 12
///
/// Returns 0 when the steel area is zero or negative.
#[inline]
pub fn stretch_in(axial_load_lbf: f64, length_ft: f64, steel_area_in2: f64) -> f64 {
    if steel_area_in2 <= 0.0 {
        return 0.0;
    }
    axial_load_lbf * length_ft / (steel_area_in2 * STEEL_MODULUS_PSI) * INCHES_PER_FOOT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buoyancy_bounds() {
        let mut ppg = 8.0;
        while ppg <= 20.0 {
            let bf = buoyancy_factor(ppg);
            assert!(bf > 0.0 && bf < 1.0, "BF out of range at {} ppg", ppg);
            ppg += 0.25;
        }
    }

    #[test]
    fn test_weights() {
        assert_eq!(air_weight(1000.0, 26.0), 26_000.0);
        let bf = buoyancy_factor(13.0);
        assert!((buoyed_weight(1000.0, 26.0, bf) - 26_000.0 * bf).abs() < 1e-9);
    }

    #[test]
    fn test_stretch() {
        // 100,000 lbf on 10,000 ft of 5.275 in² pipe
        // 1e5 * 1e4 / (5.275 * 3e7) * 12 = 75.83 in
        let s = stretch_in(100_000.0, 10_000.0, 5.275);
        assert!((s - 75.83).abs() < 0.01);
    }

    #[test]
    fn test_stretch_zero_area() {
        assert_eq!(stretch_in(1000.0, 100.0, 0.0), 0.0);
    }
}
