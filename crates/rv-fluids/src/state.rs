//! Phase-tagged fluid state.

use rv_core::units::{Density, DynVisc, MassRate, Pressure, Temperature, kgpm3, pas};

use crate::error::{FluidError, FluidResult};
use crate::properties::{GasProperties, LiquidProperties, SteamProperties};

/// Relief service phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Gas,
    Liquid,
    Steam,
    TwoPhase,
}

impl Phase {
    pub fn is_gas_bearing(self) -> bool {
        !matches!(self, Phase::Liquid)
    }

    pub fn is_liquid_bearing(self) -> bool {
        matches!(self, Phase::Liquid | Phase::TwoPhase)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Gas => "gas",
            Phase::Liquid => "liquid",
            Phase::Steam => "steam",
            Phase::TwoPhase => "two-phase",
        };
        f.write_str(name)
    }
}

/// Conditions common to every phase. Pressure and temperature are absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub mass_flow: MassRate,
}

impl Conditions {
    pub fn new(temperature: Temperature, pressure: Pressure, mass_flow: MassRate) -> Self {
        Self {
            temperature,
            pressure,
            mass_flow,
        }
    }
}

/// Fluid state consumed by the hydraulics and sizing calculators.
#[derive(Debug, Clone, PartialEq)]
pub enum FluidState {
    Gas {
        conditions: Conditions,
        gas: GasProperties,
    },
    Liquid {
        conditions: Conditions,
        liquid: LiquidProperties,
    },
    Steam {
        conditions: Conditions,
        steam: SteamProperties,
    },
    TwoPhase {
        conditions: Conditions,
        /// Vapor mass fraction x ∈ [0, 1]
        vapor_fraction: f64,
        gas: GasProperties,
        liquid: LiquidProperties,
    },
}

impl FluidState {
    pub fn phase(&self) -> Phase {
        match self {
            FluidState::Gas { .. } => Phase::Gas,
            FluidState::Liquid { .. } => Phase::Liquid,
            FluidState::Steam { .. } => Phase::Steam,
            FluidState::TwoPhase { .. } => Phase::TwoPhase,
        }
    }

    pub fn conditions(&self) -> &Conditions {
        match self {
            FluidState::Gas { conditions, .. }
            | FluidState::Liquid { conditions, .. }
            | FluidState::Steam { conditions, .. }
            | FluidState::TwoPhase { conditions, .. } => conditions,
        }
    }

    fn conditions_mut(&mut self) -> &mut Conditions {
        match self {
            FluidState::Gas { conditions, .. }
            | FluidState::Liquid { conditions, .. }
            | FluidState::Steam { conditions, .. }
            | FluidState::TwoPhase { conditions, .. } => conditions,
        }
    }

    pub fn pressure(&self) -> Pressure {
        self.conditions().pressure
    }

    pub fn temperature(&self) -> Temperature {
        self.conditions().temperature
    }

    pub fn mass_flow(&self) -> MassRate {
        self.conditions().mass_flow
    }

    /// Same fluid with a different mass flow rate.
    pub fn with_mass_flow(mut self, mass_flow: MassRate) -> Self {
        self.conditions_mut().mass_flow = mass_flow;
        self
    }

    /// Same fluid at a different absolute pressure.
    pub fn with_pressure(mut self, pressure: Pressure) -> Self {
        self.conditions_mut().pressure = pressure;
        self
    }

    /// Gas properties for gas-bearing phases (steam is viewed as a gas of water).
    pub fn gas_properties(&self) -> Option<GasProperties> {
        match self {
            FluidState::Gas { gas, .. } | FluidState::TwoPhase { gas, .. } => Some(*gas),
            FluidState::Steam { steam, .. } => Some(steam.as_gas()),
            FluidState::Liquid { .. } => None,
        }
    }

    pub fn liquid_properties(&self) -> Option<&LiquidProperties> {
        match self {
            FluidState::Liquid { liquid, .. } | FluidState::TwoPhase { liquid, .. } => Some(liquid),
            _ => None,
        }
    }

    /// Whether pressure-drop calculations treat this fluid as compressible.
    pub fn is_compressible(&self) -> bool {
        matches!(self, FluidState::Gas { .. } | FluidState::Steam { .. })
    }

    /// Density at a local pressure and temperature.
    ///
    /// Two-phase density is the homogeneous mixture value
    /// 1/ρm = x/ρg + (1−x)/ρl with the gas density taken at the local pressure.
    pub fn density_at(&self, p: Pressure, t: Temperature) -> Density {
        match self {
            FluidState::Gas { gas, .. } => gas.density(p, t),
            FluidState::Steam { steam, .. } => steam.as_gas().density(p, t),
            FluidState::Liquid { liquid, .. } => liquid.density,
            FluidState::TwoPhase {
                vapor_fraction,
                gas,
                liquid,
                ..
            } => {
                let x = *vapor_fraction;
                let rho_g = gas.density(p, t).value;
                let rho_l = liquid.density.value;
                kgpm3(1.0 / (x / rho_g + (1.0 - x) / rho_l))
            }
        }
    }

    /// Dynamic viscosity; two-phase uses the mass-weighted mixture value.
    pub fn viscosity(&self) -> DynVisc {
        match self {
            FluidState::Gas { gas, .. } => gas.viscosity,
            FluidState::Steam { steam, .. } => steam.viscosity,
            FluidState::Liquid { liquid, .. } => liquid.viscosity,
            FluidState::TwoPhase {
                vapor_fraction,
                gas,
                liquid,
                ..
            } => {
                let x = *vapor_fraction;
                pas(x * gas.viscosity.value + (1.0 - x) * liquid.viscosity.value)
            }
        }
    }

    /// Checks every carried property is physical.
    ///
    /// The sizing equations do not call this; validation of raw input happens
    /// before a `FluidState` is built. The hydraulics solver calls it so that a
    /// bad state fails loudly instead of producing NaN.
    pub fn check(&self) -> FluidResult<()> {
        let c = self.conditions();
        if !(c.pressure.value.is_finite() && c.pressure.value > 0.0) {
            return Err(FluidError::NonPhysical { what: "pressure" });
        }
        if !(c.temperature.value.is_finite() && c.temperature.value > 0.0) {
            return Err(FluidError::NonPhysical { what: "temperature" });
        }
        if !(c.mass_flow.value.is_finite() && c.mass_flow.value >= 0.0) {
            return Err(FluidError::NonPhysical { what: "mass flow rate" });
        }
        match self {
            FluidState::Gas { gas, .. } => gas.check(),
            FluidState::Steam { steam, .. } => steam.as_gas().check(),
            FluidState::Liquid { liquid, .. } => liquid.check(),
            FluidState::TwoPhase {
                vapor_fraction,
                gas,
                liquid,
                ..
            } => {
                if !(0.0..=1.0).contains(vapor_fraction) {
                    return Err(FluidError::OutOfRange { what: "vapor fraction" });
                }
                gas.check()?;
                liquid.check()
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rv_core::units::{bar, k, kgps};

    proptest! {
        #[test]
        fn two_phase_density_lies_between_phases(
            x in 0.0_f64..=1.0,
            p_bar in 1.0_f64..100.0,
            t in 250.0_f64..600.0,
            rho_l in 500.0_f64..1500.0,
        ) {
            let gas = GasProperties::new(28.0, 1.0, 1.4, pas(1.8e-5));
            let state = FluidState::TwoPhase {
                conditions: Conditions::new(k(t), bar(p_bar), kgps(1.0)),
                vapor_fraction: x,
                gas,
                liquid: LiquidProperties::new(kgpm3(rho_l), pas(1e-3)),
            };
            let rho = state.density_at(bar(p_bar), k(t)).value;
            let rho_g = gas.density(bar(p_bar), k(t)).value;
            let slack = 1e-9 * rho_l;
            prop_assert!(rho >= rho_g - slack && rho <= rho_l + slack);

            let mu = state.viscosity().value;
            prop_assert!((1.8e-5 - 1e-18..=1e-3 + 1e-18).contains(&mu));
        }
    }
}
