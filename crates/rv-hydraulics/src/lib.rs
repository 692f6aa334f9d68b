//! rv-hydraulics: pressure drop through relief-device piping.
//!
//! Provides:
//! - A fitting resistance table (Crane L/D and constant-K forms)
//! - Darcy friction factor by bounded Colebrook iteration
//! - Series pipe networks anchored at their inlet or outlet
//! - Incompressible and compressible (isothermal / adiabatic) segment models
//!   with choked-flow capping, Mach and erosional-velocity flags
//!
//! The solver is a pure function of its arguments: networks and fluid state
//! are borrowed, and a fresh result is returned on every call.
//!
//! # Example
//!
//! ```
//! use rv_core::units::{bar, k, kgpm3, kgps, m, pas};
//! use rv_fluids::{Conditions, FluidState, LiquidProperties};
//! use rv_hydraulics::{BoundaryAnchor, Direction, PipeSegment, PipelineNetwork, solve};
//!
//! let fluid = FluidState::Liquid {
//!     conditions: Conditions::new(k(300.0), bar(10.0), kgps(5.0)),
//!     liquid: LiquidProperties::new(kgpm3(998.0), pas(1.0e-3)),
//! };
//! let network = PipelineNetwork::new(Direction::Forward, BoundaryAnchor::pressure(bar(10.0)))
//!     .with_segment(PipeSegment::new(m(0.05), m(12.0), m(4.5e-5)));
//!
//! let result = solve(&network, &fluid, fluid.mass_flow()).unwrap();
//! println!("Pressure drop: {} Pa", result.total_pressure_drop.value);
//! ```

pub mod compressible;
pub mod config;
pub mod error;
pub mod fittings;
pub mod friction;
pub mod network;
pub mod results;
pub mod solver;

pub use config::SolverConfig;
pub use error::{HydraulicsError, HydraulicsResult};
pub use fittings::{ElbowRadius, Fitting, FittingKind, FittingLossTable, LossCoefficient};
pub use friction::{FrictionFactor, darcy_friction_factor, fully_turbulent_friction_factor};
pub use network::{BoundaryAnchor, CompressibleModel, Direction, PipeSegment, PipelineNetwork};
pub use results::{NetworkPressureDropResult, SegmentResult};
pub use solver::{solve, solve_with};
