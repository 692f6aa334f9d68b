//! rv-core: shared foundation for the relief-valve engine.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real, tolerances, bounded bisection)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RvError, RvResult};
pub use numeric::*;
pub use units::*;
