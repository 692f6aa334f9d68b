//! Fluid property errors.

use rv_core::RvError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur when checking or deriving fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, zero viscosity, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },
}

impl From<FluidError> for RvError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => RvError::NonPhysical {
                what: format!("fluid {what}"),
            },
            FluidError::OutOfRange { what } => RvError::InvalidArg {
                what: format!("fluid {what} out of range"),
            },
        }
    }
}
