//! rv-fluids: phase-tagged fluid property bundles for relief calculations.
//!
//! Provides:
//! - `FluidState`, a tagged union over gas, liquid, steam and two-phase service
//! - Gas and liquid property bundles with the derived quantities the
//!   hydraulics and sizing crates need (local density, sonic velocity,
//!   critical pressure ratio, homogeneous two-phase mixture)
//!
//! Every variant carries only the fields its phase needs. Property data is
//! supplied by the caller; this crate does no equation-of-state flashing.
//!
//! # Example
//!
//! ```
//! use rv_core::units::{k, kgph, pas};
//! use rv_fluids::{Conditions, FluidState, GasProperties};
//! use rv_core::units::bar;
//!
//! let gas = GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5));
//! let state = FluidState::Gas {
//!     conditions: Conditions::new(k(350.0), bar(11.0), kgph(5000.0)),
//!     gas,
//! };
//!
//! let rho = state.density_at(state.pressure(), state.temperature());
//! println!("Density: {} kg/m³", rho.value);
//! ```

pub mod error;
pub mod properties;
pub mod state;

// Re-exports for ergonomics
pub use error::{FluidError, FluidResult};
pub use properties::{GasProperties, LiquidProperties, SteamProperties};
pub use state::{Conditions, FluidState, Phase};
