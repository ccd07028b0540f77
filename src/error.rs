//! Error types for the odds math core
//!
//! Every failure is a violated precondition on the caller's input. Nothing
//! here is retryable; the math either has a defined answer or it rejects.

use thiserror::Error;

/// Validation failures raised by conversion, value and arbitrage functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OddsError {
    #[error("invalid American odds {0}: zero has no payout")]
    InvalidAmericanOdds(i32),

    #[error("invalid decimal odds {0}: must be finite and greater than 1.0")]
    InvalidDecimalOdds(f64),

    #[error("invalid probability {value}: expected a value in {expected}")]
    InvalidProbability { value: f64, expected: &'static str },

    #[error("invalid {field} {value}: must be finite and greater than zero")]
    InvalidStake { field: &'static str, value: f64 },

    #[error("invalid Kelly fraction {0}: expected a value in (0, 1]")]
    InvalidFraction(f64),

    #[error("at least {required} outcomes required, got {actual}")]
    InsufficientOutcomes { required: usize, actual: usize },

    #[error("{what} mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, OddsError>;

/// Rejects anything outside the closed unit interval.
pub(crate) fn ensure_probability(value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(OddsError::InvalidProbability {
            value,
            expected: "[0, 1]",
        })
    }
}

/// Rejects the endpoints as well, for formulas that divide by `p` or `1 - p`.
pub(crate) fn ensure_open_probability(value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(OddsError::InvalidProbability {
            value,
            expected: "(0, 1)",
        })
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(OddsError::InvalidStake { field, value })
    }
}

pub(crate) fn ensure_outcome_count(actual: usize) -> Result<()> {
    if actual < 2 {
        return Err(OddsError::InsufficientOutcomes {
            required: 2,
            actual,
        });
    }
    Ok(())
}
