//! rv-case: relief case file format, validation and resolution.
//!
//! A case file describes one relief scenario in plain SI values: the
//! relieving fluid, sizing choices, optional inlet and outlet piping, an
//! optional fire block and numeric options. `validate` checks a case in one
//! pass; the `resolve_*` functions turn a valid case into engine inputs.

pub mod migrate;
pub mod resolve;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use resolve::{
    CaseConfig, backpressure_kind, resolve_fire, resolve_fluid, resolve_network, resolve_options,
    resolve_sizing, set_pressure_gauge,
};
pub use schema::*;
pub use validate::{ValidationIssue, ValidationReport, validate, validate_fluid};

pub type CaseResult<T> = Result<T, CaseError>;

#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    #[error("Cannot resolve {field}: value missing")]
    Resolve { field: String },

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CaseError> for rv_core::RvError {
    fn from(e: CaseError) -> Self {
        rv_core::RvError::InvalidArg {
            what: e.to_string(),
        }
    }
}

/// Parse a YAML case and bring it to the latest version. Validation is
/// separate so that every issue can be reported at once.
pub fn load_yaml(path: &std::path::Path) -> CaseResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseFile = serde_yaml::from_str(&content)?;
    migrate_to_latest(case)
}

pub fn save_yaml(path: &std::path::Path, case: &CaseFile) -> CaseResult<()> {
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> CaseResult<CaseFile> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseFile = serde_json::from_str(&content)?;
    migrate_to_latest(case)
}

pub fn save_json(path: &std::path::Path, case: &CaseFile) -> CaseResult<()> {
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> CaseResult<CaseFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
