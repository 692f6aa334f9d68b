//! Error types for the rv-app service layer.

use std::path::PathBuf;

use rv_case::ValidationReport;

/// Application error type that wraps errors from the engine crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Case error: {0}")]
    Case(String),

    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: rv_case::CaseError,
    },

    #[error("Failed to write case file: {path}")]
    CaseFileWrite {
        path: PathBuf,
        source: rv_case::CaseError,
    },

    #[error("Case validation failed:\n{0}")]
    Validation(ValidationReport),

    #[error("Hydraulics error: {0}")]
    Hydraulics(String),

    #[error("Sizing error: {0}")]
    Sizing(String),

    #[error("Fire case error: {0}")]
    Fire(String),

    #[error("Case has no {0} block")]
    MissingBlock(&'static str),

    #[error("Report error: {0}")]
    Report(String),
}

/// Result type for rv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<rv_case::CaseError> for AppError {
    fn from(err: rv_case::CaseError) -> Self {
        AppError::Case(err.to_string())
    }
}

impl From<rv_hydraulics::HydraulicsError> for AppError {
    fn from(err: rv_hydraulics::HydraulicsError) -> Self {
        AppError::Hydraulics(err.to_string())
    }
}

impl From<rv_sizing::SizingError> for AppError {
    fn from(err: rv_sizing::SizingError) -> Self {
        AppError::Sizing(err.to_string())
    }
}

impl From<rv_fire::FireError> for AppError {
    fn from(err: rv_fire::FireError) -> Self {
        AppError::Fire(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Report(err.to_string())
    }
}
