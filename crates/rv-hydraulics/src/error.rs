//! Error types for hydraulics calculations.

use rv_core::RvError;
use rv_fluids::FluidError;
use thiserror::Error;

/// Errors that stop a network solve.
///
/// Choked flow, high Mach number and erosional velocity are not errors; they
/// are reported as flags and warnings on the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicsError {
    #[error("Invalid fluid state: {0}")]
    InvalidFluidState(#[from] FluidError),

    #[error("Invalid segment {index}: {what}")]
    InvalidSegment { index: usize, what: &'static str },

    #[error("Invalid flow rate: {what}")]
    InvalidFlowRate { what: &'static str },

    #[error("Invalid boundary: {what}")]
    InvalidBoundary { what: &'static str },

    #[error("Pressure exhausted in segment {index}: absolute pressure fell to {pressure_pa:.1} Pa")]
    PressureExhausted { index: usize, pressure_pa: f64 },
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;

impl From<HydraulicsError> for RvError {
    fn from(e: HydraulicsError) -> Self {
        match e {
            HydraulicsError::InvalidFluidState(inner) => inner.into(),
            HydraulicsError::InvalidSegment { index, what } => RvError::InvalidArg {
                what: format!("segment {index}: {what}"),
            },
            HydraulicsError::InvalidFlowRate { what } | HydraulicsError::InvalidBoundary { what } => {
                RvError::InvalidArg {
                    what: what.to_string(),
                }
            }
            HydraulicsError::PressureExhausted { index, .. } => RvError::NonPhysical {
                what: format!("pressure exhausted in segment {index}"),
            },
        }
    }
}
