//! rv-fire: fire-exposure relief loads for liquid-filled vessels.
//!
//! Wetted area is integrated over the vessel heads and shell up to the
//! liquid level, limited to the credited height above grade, and turned into
//! a heat input and relief rate with the API 521 correlation.

pub mod config;
pub mod error;
pub mod geometry;
pub mod load;

pub use config::FireConfig;
pub use error::{FireError, FireResult};
pub use geometry::{HeadType, Vessel, VesselOrientation, WettedArea, wetted_area};
pub use load::{
    Drainage, EnvironmentalFactor, FireCaseInputs, FireCaseResult, FireLoad, fire_case, fire_load,
};
