//! Case loading, saving and validation.

use std::path::Path;

use rv_case::{CaseFile, ValidationReport};

use crate::error::{AppError, AppResult};

/// Load a case file (YAML, or JSON by extension) at the latest version.
pub fn load_case(path: &Path) -> AppResult<CaseFile> {
    rv_case::load(path).map_err(|e| AppError::CaseFileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a case as YAML, or JSON when the extension says so.
pub fn save_case(path: &Path, case: &CaseFile) -> AppResult<()> {
    let result = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => rv_case::save_json(path, case),
        _ => rv_case::save_yaml(path, case),
    };
    result.map_err(|e| AppError::CaseFileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate a case. Errors become `AppError::Validation`; a passing report
/// is returned so that its warnings can be shown.
pub fn validate_case(case: &CaseFile) -> AppResult<ValidationReport> {
    let report = rv_case::validate(case);
    if report.is_valid() {
        Ok(report)
    } else {
        Err(AppError::Validation(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_case::{FluidDef, PhaseDef, SizingDef};

    #[test]
    fn invalid_case_reports_every_error() {
        let case = CaseFile {
            version: rv_case::LATEST_VERSION,
            name: "empty liquid".to_string(),
            fluid: FluidDef::new(PhaseDef::Liquid),
            sizing: SizingDef::default(),
            inlet: None,
            outlet: None,
            fire: None,
            options: Default::default(),
        };
        match validate_case(&case) {
            Err(AppError::Validation(report)) => assert!(report.errors.len() > 1),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
