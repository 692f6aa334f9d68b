//! Shared application service layer for relief-valve cases.
//!
//! Centralizes the case workflow for the CLI: loading and validating case
//! files, running fire, hydraulics and sizing in order, and flattening the
//! outcome into a serializable report.

pub mod case_service;
pub mod error;
pub mod report;
pub mod run_service;

pub use case_service::{load_case, save_case, validate_case};
pub use error::{AppError, AppResult};
pub use report::{CaseReport, FireReport, NetworkReport, SegmentReport, SizingReport};
pub use run_service::{CaseRun, run_case, run_fire, run_hydraulics};
