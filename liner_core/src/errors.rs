//! # Error Types
//!
//! Structured error types for liner_core. Only input validation and
//! configuration loading return errors; once a job passes validation every
//! problem (overflowing fluid, non-converged solver, thin margins) is carried
//! in the result record instead.
//!
//! ## Example
//!
//! ```rust
//! use liner_core::errors::{CalcError, CalcResult};
//!
//! fn validate_shoe(landing_collar_md: f64, liner_shoe_md: f64) -> CalcResult<()> {
//!     if landing_collar_md >= liner_shoe_md {
//!         return Err(CalcError::InvalidInput {
//!             field: "landing_collar_md_ft".to_string(),
//!             value: landing_collar_md.to_string(),
//!             reason: "Landing collar must be above the liner shoe".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for liner_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, inconsistent geometry, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Tubular size not found in the reference table
    #[error("Tubular not found: {label}")]
    TubularNotFound { label: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Engine settings could not be loaded or are inconsistent
    #[error("Config error in '{source_name}': {reason}")]
    ConfigError { source_name: String, reason: String },

    /// Settings could not be serialized
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a TubularNotFound error
    pub fn tubular_not_found(label: impl Into<String>) -> Self {
        CalcError::TubularNotFound { label: label.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config_error(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the job input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(self, CalcError::InvalidInput { .. } | CalcError::TubularNotFound { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::TubularNotFound { .. } => "TUBULAR_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("liner_od_in", "-7.0", "Diameter must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("InvalidInput"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_input("a", "1", "b").error_code(), "INVALID_INPUT");
        assert_eq!(CalcError::tubular_not_found("7in 99#").error_code(), "TUBULAR_NOT_FOUND");
        assert_eq!(CalcError::config_error("liner_engine.toml", "bad").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validation_classification() {
        assert!(CalcError::invalid_input("a", "1", "b").is_validation());
        assert!(!CalcError::file_error("open", "x.json", "missing").is_validation());
    }
}
