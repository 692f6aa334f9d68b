//! rv-sizing: required relief area and standard orifice selection.
//!
//! Provides:
//! - Gas/vapor, liquid and steam equation sets (API 520 Part I) and the
//!   homogeneous omega method for two-phase flow (Annex C)
//! - Backpressure, viscosity, Napier, superheat and rupture-disc corrections
//! - Standard orifice tables (API 526) and orifice selection
//!
//! Sizing assumes validated input. It never fails on physics; the only error
//! paths are orifice-table and valve-count problems.

pub mod backpressure;
pub mod calculator;
pub mod config;
pub mod error;
pub mod gas;
pub mod inputs;
pub mod liquid;
pub mod orifice;
pub mod outputs;
pub mod steam;
pub mod two_phase;

pub use calculator::{size, size_with};
pub use config::SizingConfig;
pub use error::{SizingError, SizingResult};
pub use inputs::{BackpressureKind, SizingInputs, ValveDesign};
pub use orifice::{Orifice, OrificeTable, Selection, select, select_manual};
pub use outputs::{Corrections, SizingOutputs};
