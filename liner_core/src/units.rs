//! # Oilfield Units
//!
//! Every formula in the engine works in US oilfield units:
//! - Length: feet (ft) for depths and lengths, inches (in) for diameters
//! - Volume: barrels (bbl)
//! - Density: pounds per gallon (ppg)
//! - Pressure: pounds per square inch (psi)
//! - Force: pounds-force (lbf)
//!
//! The conversion constants live here so that each formula states its units
//! once instead of repeating magic numbers.
//!
//! ## Example
//!
//! ```rust
//! use liner_core::units::{hydrostatic_psi, PSI_PER_FT_PER_PPG};
//!
//! // 1000 ft of 10 ppg mud
//! let p = hydrostatic_psi(10.0, 1000.0);
//! assert!((p - 520.0).abs() < 1e-9);
//! assert_eq!(PSI_PER_FT_PER_PPG, 0.052);
//! ```

use serde::{Deserialize, Deserializer};

/// Divisor turning in² into bbl/ft (id² / 1029.4)
pub const BBL_PER_FT_DIVISOR: f64 = 1029.4;

/// Hydrostatic gradient of a 1 ppg fluid (psi/ft)
pub const PSI_PER_FT_PER_PPG: f64 = 0.052;

/// Density of steel in ppg, used by the buoyancy factor
pub const STEEL_DENSITY_PPG: f64 = 65.5;

/// Young's modulus of steel (psi)
pub const STEEL_MODULUS_PSI: f64 = 30.0e6;

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Hydrostatic pressure of a fluid column (psi).
#[inline]
pub fn hydrostatic_psi(density_ppg: f64, height_ft: f64) -> f64 {
    density_ppg * PSI_PER_FT_PER_PPG * height_ft
}

/// Convert inches to feet
#[inline]
pub fn inches_to_feet(inches: f64) -> f64 {
    inches / INCHES_PER_FOOT
}

/// Parse a numeric field leniently.
///
/// Returns `0.0` for empty strings, dashes, unparsable text, NaN and
/// infinities, so a bad cell never propagates NaN into the engine.
pub fn parse_lenient_f64(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "—" {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Serde helper accepting a number, a numeric string, or null.
///
/// Use with `#[serde(deserialize_with = "crate::units::lenient_f64")]`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(Option<()>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(v) if v.is_finite() => v,
        Raw::Number(_) => 0.0,
        Raw::Text(s) => parse_lenient_f64(&s),
        Raw::Missing(_) => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrostatic() {
        // 15.8 ppg cement over 500 ft
        assert!((hydrostatic_psi(15.8, 500.0) - 410.8).abs() < 1e-9);
    }

    #[test]
    fn test_length_conversions() {
        assert_eq!(inches_to_feet(6.0), 0.5);
        assert_eq!(inches_to_feet(30.0), 2.5);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient_f64("123.5"), 123.5);
        assert_eq!(parse_lenient_f64("  42 "), 42.0);
        assert_eq!(parse_lenient_f64(""), 0.0);
        assert_eq!(parse_lenient_f64("-"), 0.0);
        assert_eq!(parse_lenient_f64("abc"), 0.0);
        assert_eq!(parse_lenient_f64("NaN"), 0.0);
        assert_eq!(parse_lenient_f64("inf"), 0.0);
    }

    #[test]
    fn test_lenient_deserialize() {
        #[derive(Deserialize)]
        struct Cell {
            #[serde(deserialize_with = "lenient_f64")]
            v: f64,
        }

        let from_number: Cell = serde_json::from_str(r#"{"v": 12.5}"#).unwrap();
        assert_eq!(from_number.v, 12.5);

        let from_text: Cell = serde_json::from_str(r#"{"v": "16.7"}"#).unwrap();
        assert_eq!(from_text.v, 16.7);

        let from_junk: Cell = serde_json::from_str(r#"{"v": "n/a"}"#).unwrap();
        assert_eq!(from_junk.v, 0.0);

        let from_null: Cell = serde_json::from_str(r#"{"v": null}"#).unwrap();
        assert_eq!(from_null.v, 0.0);
    }
}
