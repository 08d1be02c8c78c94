//! # Tubular Geometry Formulas
//!
//! Capacities and areas of pipe, casing and open hole.
//!
//! ## Notation
//!
//! - `od` = outer diameter (in)
//! - `id` = inner diameter (in), or open-hole diameter when used as the outer
//!   wall of an annulus
//! - Capacity is volume per unit length (bbl/ft)
//!
//! ## References
//!
//! - API RP 7G: Drill Stem Design and Operating Limits
//! - Bourgoyne et al., Applied Drilling Engineering, Chapter 4

use std::f64::consts::PI;

use crate::units::BBL_PER_FT_DIVISOR;

/// Internal capacity of a pipe or open hole (bbl/ft)
///
/// # Formula
/// C = id² / 1029.4
///
/// # Example
/// ```rust
/// use liner_core::equations::tubular::capacity_internal;
///
/// // 8.5" open hole
/// let cap = capacity_internal(8.5);
/// assert!((cap - 0.070187).abs() < 1e-5);
/// ```
#[inline]
pub fn capacity_internal(id: f64) -> f64 {
    id * id / BBL_PER_FT_DIVISOR
}

/// Annular capacity between an outer wall and an inner pipe (bbl/ft)
///
/// ```text
///   │░░│      │░░│
///   │░░│ pipe │░░│   ░ = annulus
///   │░░│      │░░│
///   ←── outer wall (od_outer) ──→
/// ```
///
/// # Formula
/// C = (outer² − inner²) / 1029.4
///
/// # Arguments
/// * `outer` - Inner diameter of the outer wall (hole or casing ID)
/// * `inner` - Outer diameter of the inner pipe
///
/// Positive whenever `outer > inner`.
#[inline]
pub fn capacity_annular(outer: f64, inner: f64) -> f64 {
    (outer * outer - inner * inner) / BBL_PER_FT_DIVISOR
}

/// Steel cross-section area of a pipe (in²)
///
/// # Formula
/// A = (π/4)(od² − id²)
#[inline]
pub fn pipe_steel_area(od: f64, id: f64) -> f64 {
    PI / 4.0 * (od * od - id * id)
}

/// Full area enclosed by a diameter (in²)
///
/// Used for the liner outer area in the U-tube balance and for the plug seat
/// contact area.
#[inline]
pub fn circle_area(d: f64) -> f64 {
    PI / 4.0 * d * d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_internal() {
        // 7" 26# liner, ID 6.276"
        let cap = capacity_internal(6.276);
        assert!((cap - 0.038263).abs() < 1e-5);
    }

    #[test]
    fn test_capacity_annular() {
        // 8.5" hole x 7" liner
        let cap = capacity_annular(8.5, 7.0);
        assert!((cap - 0.022586).abs() < 1e-5);
    }

    #[test]
    fn test_annular_positive_when_outer_larger() {
        for (outer, inner) in [(8.5, 7.0), (6.0, 5.999), (12.25, 9.625), (2.0, 0.0)] {
            assert!(capacity_annular(outer, inner) > 0.0);
        }
        assert!(capacity_annular(7.0, 7.0) == 0.0);
    }

    #[test]
    fn test_steel_area() {
        // 5" 19.5# drill pipe, ID 4.276"
        let area = pipe_steel_area(5.0, 4.276);
        assert!((area - 5.275).abs() < 0.01);
    }

    #[test]
    fn test_circle_area() {
        assert!((circle_area(7.0) - 38.4845).abs() < 1e-3);
    }
}
