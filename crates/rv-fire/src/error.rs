//! Error types for fire-case calculations.

use rv_core::RvError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FireError {
    #[error("{what} must be positive")]
    NonPositive { what: &'static str },

    #[error("{what} must not be negative")]
    Negative { what: &'static str },
}

pub type FireResult<T> = Result<T, FireError>;

impl From<FireError> for RvError {
    fn from(e: FireError) -> Self {
        RvError::NonPhysical {
            what: e.to_string(),
        }
    }
}

/// Positive and finite, or `NonPositive`.
pub(crate) fn require_positive(value: f64, what: &'static str) -> FireResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FireError::NonPositive { what })
    }
}

/// Non-negative and finite, or `Negative`.
pub(crate) fn require_non_negative(value: f64, what: &'static str) -> FireResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FireError::Negative { what })
    }
}
