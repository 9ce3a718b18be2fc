//! Error taxonomy shared by every engine

use thiserror::Error;

/// Errors raised for structurally invalid calculator input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid term: {field} = {value} (a positive period count is required)")]
    InvalidTerm { field: String, value: f64 },

    #[error("Invalid rate: {field} = {value}")]
    InvalidRate { field: String, value: f64 },

    #[error("Invalid principal: {value} (must be >= 0)")]
    InvalidPrincipal { value: f64 },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub(crate) fn term(field: &str, value: impl Into<f64>) -> Self {
        CalcError::InvalidTerm { field: field.into(), value: value.into() }
    }

    pub(crate) fn rate(field: &str, value: f64) -> Self {
        CalcError::InvalidRate { field: field.into(), value }
    }

    pub(crate) fn input(field: &str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput { field: field.into(), reason: reason.into() }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for CalcError {
    fn from(e: csv::Error) -> Self {
        CalcError::Io(e.to_string())
    }
}

impl From<std::io::Error> for CalcError {
    fn from(e: std::io::Error) -> Self {
        CalcError::Io(e.to_string())
    }
}

/// Reject NaN and infinities before they reach any arithmetic
pub(crate) fn ensure_finite(field: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::input(field, format!("must be a finite number, got {}", value)))
    }
}

/// Division that reports a zero denominator instead of producing inf/NaN.
/// Every caller special-cases the zero denominator first, so the error arm is never taken.
pub(crate) fn checked_div(numerator: f64, denominator: f64, context: &str) -> CalcResult<f64> {
    if denominator == 0.0 {
        return Err(CalcError::DivisionByZero { context: context.into() });
    }
    Ok(numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite_rejects_nan() {
        assert!(ensure_finite("principal", 1.0).is_ok());
        let err = ensure_finite("principal", f64::NAN).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "principal"));
        assert!(ensure_finite("rate", f64::INFINITY).is_err());
    }

    #[test]
    fn test_checked_div() {
        assert_eq!(checked_div(10.0, 4.0, "test").unwrap(), 2.5);
        assert!(matches!(
            checked_div(1.0, 0.0, "test"),
            Err(CalcError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = CalcError::term("term_periods", -3);
        assert_eq!(
            err.to_string(),
            "Invalid term: term_periods = -3 (a positive period count is required)"
        );
    }
}
