//! Error types for the forecasting engine

use thiserror::Error;

/// Errors raised at the engine boundary
///
/// Only structural problems are errors. Degenerate numeric states (zero burn,
/// no data loaded) are represented in the results instead.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("unknown scenario: {0}")]
    InvalidScenario(String),

    #[error("invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("invalid data source transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ForecastError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        ForecastError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Reject NaN and infinite values before they reach the arithmetic
pub(crate) fn ensure_finite(field: &str, value: f64) -> ForecastResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::invalid_input(field, format!("must be finite, got {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("cash", 10.0).is_ok());
        assert!(ensure_finite("cash", f64::NAN).is_err());
        assert!(ensure_finite("cash", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ForecastError::invalid_input("horizon_months", "must be at least 1");
        assert_eq!(err.to_string(), "invalid input: horizon_months (must be at least 1)");

        let err = ForecastError::InvalidScenario("Aggressive".into());
        assert_eq!(err.to_string(), "unknown scenario: Aggressive");
    }
}
