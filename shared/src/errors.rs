//! Error types for the FitCalc calculators

use thiserror::Error;

use crate::validation::field_display_label;

/// Errors raised by the calculator functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("{}: {reason}", field_display_label(.field))]
    InvalidMeasurement { field: &'static str, reason: String },

    #[error("No {standard} age band covers age {age}")]
    UnsupportedAgeBand { standard: &'static str, age: f64 },

    #[error("Unsupported category: {0}")]
    UnsupportedCategory(String),
}

impl CalculatorError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalculatorError::InvalidMeasurement {
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::invalid(field, "value is required")
    }
}

/// Key/value persistence error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result alias for calculator operations
pub type CalcResult<T> = Result<T, CalculatorError>;
