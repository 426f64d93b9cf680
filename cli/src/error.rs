//! CLI error handling
//!
//! Unifies calculator, storage and usage errors and maps each one to a
//! process exit code (sysexits-style) and a machine-readable error code for
//! `--json` output.

use fitcalc_shared::{CalculatorError, StorageError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// CLI error type that can be converted to an exit code
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error("Missing --{0}: pass it once and it will be remembered")]
    MissingValue(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Error output body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl CliError {
    /// Process exit code (see sysexits.h)
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Calculator(_) => 65,
            CliError::MissingValue(_) => 64,
            CliError::Storage(_) => 74,
            CliError::Serialization(_) | CliError::Internal(_) => 70,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CliError::Calculator(CalculatorError::InvalidMeasurement { .. }) => "INVALID_MEASUREMENT",
            CliError::Calculator(CalculatorError::UnsupportedAgeBand { .. }) => "UNSUPPORTED_AGE_BAND",
            CliError::Calculator(CalculatorError::UnsupportedCategory(_)) => "UNSUPPORTED_CATEGORY",
            CliError::MissingValue(_) => "MISSING_VALUE",
            CliError::Storage(_) => "STORAGE_ERROR",
            CliError::Serialization(_) | CliError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let field = match self {
            CliError::Calculator(CalculatorError::InvalidMeasurement { field, .. }) => {
                Some(field.to_string())
            }
            CliError::MissingValue(field) => Some(field.to_string()),
            _ => None,
        };
        let message = match self {
            CliError::Internal(err) => {
                error!("Internal error: {:?}", err);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                field,
            },
        }
    }
}

/// Result type alias for commands
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_measurement_exit_code() {
        let error = CliError::from(CalculatorError::invalid("waist", "must be greater than neck"));
        assert_eq!(error.exit_code(), 65);
        let response = error.to_response();
        assert_eq!(response.error.code, "INVALID_MEASUREMENT");
        assert_eq!(response.error.field.as_deref(), Some("waist"));
    }

    #[test]
    fn test_missing_value_exit_code() {
        let error = CliError::MissingValue("height");
        assert_eq!(error.exit_code(), 64);
        assert_eq!(error.to_string(), "Missing --height: pass it once and it will be remembered");
    }

    #[test]
    fn test_storage_error_exit_code() {
        let error = CliError::from(StorageError::Backend("disk full".to_string()));
        assert_eq!(error.exit_code(), 74);
        assert_eq!(error.code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let error = CliError::from(anyhow::anyhow!("secret detail"));
        let response = error.to_response();
        assert_eq!(response.error.message, "An internal error occurred");
        assert!(response.error.field.is_none());
    }
}
