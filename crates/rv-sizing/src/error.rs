//! Error types for sizing and orifice selection.

use rv_core::RvError;
use thiserror::Error;

/// Errors from orifice tables and selection.
///
/// The equation sets themselves do not fail: they assume validated input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("Invalid orifice table: {what}")]
    InvalidOrificeTable { what: &'static str },

    #[error("Unknown orifice designation: {designation}")]
    UnknownOrifice { designation: String },

    #[error("Number of valves must be at least one")]
    InvalidValveCount,
}

pub type SizingResult<T> = Result<T, SizingError>;

impl From<SizingError> for RvError {
    fn from(e: SizingError) -> Self {
        RvError::InvalidArg {
            what: e.to_string(),
        }
    }
}
