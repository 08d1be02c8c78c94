//! # Engine Settings
//!
//! Tunable constants of the engine, loaded from TOML. Every field has a
//! default equal to the engine's built-in value, so an empty or missing file
//! changes nothing.
//!
//! ## Loading Order
//!
//! 1. `LINER_ENGINE_CONFIG` environment variable (path to a TOML file)
//! 2. `liner_engine.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Settings are plain values passed into [`crate::job::compute`]; the engine
//! never reads a global.
//!
//! ## Example
//!
//! ```toml
//! [plug]
//! pump_stroke_tolerance_bbl = 0.5
//!
//! [torque_drag]
//! step_ft = 25.0
//! max_iterations = 60
//!
//! [status]
//! min_force_margin = 0.20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{CalcError, CalcResult};

/// Environment variable naming a settings file
pub const CONFIG_ENV_VAR: &str = "LINER_ENGINE_CONFIG";

/// Settings file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "liner_engine.toml";

/// Root settings container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub plug: PlugSettings,

    #[serde(default)]
    pub torque_drag: TorqueDragSettings,

    #[serde(default)]
    pub status: StatusSettings,
}

/// Plug-travel defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlugSettings {
    /// Pump-stroke counting tolerance (bbl)
    pub pump_stroke_tolerance_bbl: f64,

    /// Plug seat shear strength when the job does not provide one (psi)
    pub default_shear_strength_psi: f64,
}

impl Default for PlugSettings {
    fn default() -> Self {
        Self {
            pump_stroke_tolerance_bbl: 0.5,
            default_shear_strength_psi: 3000.0,
        }
    }
}

/// Torque-and-drag discretization and solver limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorqueDragSettings {
    /// Node spacing along the well path (ft)
    pub step_ft: f64,

    /// Bisection iteration budget
    pub max_iterations: u32,

    /// Residual tolerance on downhole load (lbf)
    pub tolerance_lbf: f64,

    /// Lower bisection bound on surface force (lbf)
    pub lower_bound_lbf: f64,

    /// Upper bisection bound on surface force (lbf)
    pub upper_bound_lbf: f64,
}

impl Default for TorqueDragSettings {
    fn default() -> Self {
        Self {
            step_ft: 25.0,
            max_iterations: 60,
            tolerance_lbf: 1.0e-3,
            lower_bound_lbf: 0.0,
            upper_bound_lbf: 1.0e6,
        }
    }
}

/// Job-status thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    /// Minimum fractional margin on rig capacity and plug shear (0.20 = 20%)
    pub min_force_margin: f64,

    /// Maximum cement excess as a fraction of cement pumped
    pub max_cement_excess_fraction: f64,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            min_force_margin: 0.20,
            max_cement_excess_fraction: 0.10,
        }
    }
}

impl EngineSettings {
    /// Load settings using the standard search order, falling back to
    /// defaults when no file is usable.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(settings) => {
                        info!(path = %p.display(), "Loaded engine settings from {}", CONFIG_ENV_VAR);
                        return settings;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load engine settings, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{} points to a non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(settings) => {
                    info!("Loaded engine settings from ./{}", LOCAL_CONFIG_FILE);
                    return settings;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No engine settings file found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file.
    pub fn load_from_file(path: &Path) -> CalcResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(contents: &str, source_name: &str) -> CalcResult<Self> {
        let settings: Self =
            toml::from_str(contents).map_err(|e| CalcError::config_error(source_name, e.to_string()))?;
        settings.validate().map_err(|reason| CalcError::config_error(source_name, reason))?;
        Ok(settings)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::SerializationError { reason: e.to_string() })
    }

    /// Check internal consistency. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let td = &self.torque_drag;
        if !(td.step_ft > 0.0) {
            return Err(format!("torque_drag.step_ft must be positive, got {}", td.step_ft));
        }
        if td.max_iterations == 0 {
            return Err("torque_drag.max_iterations must be at least 1".to_string());
        }
        if !(td.tolerance_lbf > 0.0) {
            return Err(format!("torque_drag.tolerance_lbf must be positive, got {}", td.tolerance_lbf));
        }
        if !(td.upper_bound_lbf > td.lower_bound_lbf) {
            return Err(format!(
                "torque_drag bounds inverted: lower {} >= upper {}",
                td.lower_bound_lbf, td.upper_bound_lbf
            ));
        }
        if !(self.plug.pump_stroke_tolerance_bbl >= 0.0) {
            return Err("plug.pump_stroke_tolerance_bbl must be non-negative".to_string());
        }
        if !(self.plug.default_shear_strength_psi > 0.0) {
            return Err("plug.default_shear_strength_psi must be positive".to_string());
        }
        if !(self.status.min_force_margin >= 0.0) {
            return Err("status.min_force_margin must be non-negative".to_string());
        }
        if !(self.status.max_cement_excess_fraction >= 0.0) {
            return Err("status.max_cement_excess_fraction must be non-negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let s = EngineSettings::default();
        assert!(s.validate().is_ok());
        assert_eq!(s.plug.pump_stroke_tolerance_bbl, 0.5);
        assert_eq!(s.torque_drag.step_ft, 25.0);
        assert_eq!(s.torque_drag.max_iterations, 60);
        assert_eq!(s.torque_drag.upper_bound_lbf, 1.0e6);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let s = EngineSettings::from_toml_str("[torque_drag]\nstep_ft = 10.0\n", "inline").unwrap();
        assert_eq!(s.torque_drag.step_ft, 10.0);
        assert_eq!(s.torque_drag.max_iterations, 60);
        assert_eq!(s.status, StatusSettings::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let s = EngineSettings::from_toml_str("", "inline").unwrap();
        assert_eq!(s, EngineSettings::default());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let toml = "[torque_drag]\nlower_bound_lbf = 5.0\nupper_bound_lbf = 1.0\n";
        let err = EngineSettings::from_toml_str(toml, "inline").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(EngineSettings::from_toml_str("[plug\n", "inline").is_err());
    }

    #[test]
    fn test_sample_settings_file_is_default() {
        let text = include_str!("../../demos/liner_engine.toml");
        let s = EngineSettings::from_toml_str(text, "demos/liner_engine.toml").unwrap();
        assert_eq!(s, EngineSettings::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let s = EngineSettings::default();
        let text = s.to_toml().unwrap();
        let back = EngineSettings::from_toml_str(&text, "roundtrip").unwrap();
        assert_eq!(s, back);
    }
}
