//! Gas, liquid and steam property bundles.

use rv_core::constants::{MW_WATER, R_UNIVERSAL};
use rv_core::units::{Density, DynVisc, MolecularWeight, Pressure, Temperature, Velocity, kgpm3, mps};

use crate::error::{FluidError, FluidResult};

/// Properties carried by gas-bearing phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasProperties {
    /// Molecular weight [kg/kmol]
    pub molecular_weight: MolecularWeight,
    /// Compressibility factor Z
    pub compressibility: f64,
    /// Ideal-gas specific heat ratio k = cp/cv
    pub k: f64,
    pub viscosity: DynVisc,
}

impl GasProperties {
    pub fn new(molecular_weight: MolecularWeight, compressibility: f64, k: f64, viscosity: DynVisc) -> Self {
        Self {
            molecular_weight,
            compressibility,
            k,
            viscosity,
        }
    }

    /// Specific gas constant corrected for compressibility, Z·R/M [J/(kg·K)].
    pub fn zr_over_m(&self) -> f64 {
        self.compressibility * R_UNIVERSAL / self.molecular_weight
    }

    /// Real-gas density ρ = pM/(ZRT).
    pub fn density(&self, p: Pressure, t: Temperature) -> Density {
        kgpm3(p.value / (self.zr_over_m() * t.value))
    }

    /// Local sonic velocity c = √(kZRT/M).
    pub fn sonic_velocity(&self, t: Temperature) -> Velocity {
        mps((self.k * self.zr_over_m() * t.value).sqrt())
    }

    /// Critical (choking) pressure ratio (2/(k+1))^(k/(k-1)).
    pub fn critical_pressure_ratio(&self) -> f64 {
        let k = self.k;
        (2.0 / (k + 1.0)).powf(k / (k - 1.0))
    }

    pub fn check(&self) -> FluidResult<()> {
        if !(self.molecular_weight.is_finite() && self.molecular_weight > 0.0) {
            return Err(FluidError::NonPhysical { what: "molecular weight" });
        }
        if !(self.compressibility.is_finite() && self.compressibility > 0.0) {
            return Err(FluidError::NonPhysical { what: "compressibility factor" });
        }
        if !(self.k.is_finite() && self.k > 1.0) {
            return Err(FluidError::OutOfRange { what: "specific heat ratio" });
        }
        if !(self.viscosity.value.is_finite() && self.viscosity.value > 0.0) {
            return Err(FluidError::NonPhysical { what: "gas viscosity" });
        }
        Ok(())
    }
}

/// Properties carried by liquid-bearing phases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidProperties {
    pub density: Density,
    pub viscosity: DynVisc,
}

impl LiquidProperties {
    pub fn new(density: Density, viscosity: DynVisc) -> Self {
        Self { density, viscosity }
    }

    pub fn check(&self) -> FluidResult<()> {
        if !(self.density.value.is_finite() && self.density.value > 0.0) {
            return Err(FluidError::NonPhysical { what: "liquid density" });
        }
        if !(self.viscosity.value.is_finite() && self.viscosity.value > 0.0) {
            return Err(FluidError::NonPhysical { what: "liquid viscosity" });
        }
        Ok(())
    }
}

/// Steam properties. Molecular weight is fixed to water.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteamProperties {
    pub compressibility: f64,
    pub k: f64,
    pub viscosity: DynVisc,
    /// Saturation temperature at relieving pressure, when known.
    /// Enables the superheat correction.
    pub saturation_temperature: Option<Temperature>,
}

impl SteamProperties {
    pub fn new(compressibility: f64, k: f64, viscosity: DynVisc) -> Self {
        Self {
            compressibility,
            k,
            viscosity,
            saturation_temperature: None,
        }
    }

    pub fn with_saturation_temperature(mut self, t_sat: Temperature) -> Self {
        self.saturation_temperature = Some(t_sat);
        self
    }

    /// Gas view of the steam with M fixed to water.
    pub fn as_gas(&self) -> GasProperties {
        GasProperties::new(MW_WATER, self.compressibility, self.k, self.viscosity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::units::{k, pa, pas};

    fn air() -> GasProperties {
        GasProperties::new(28.96, 1.0, 1.4, pas(1.8e-5))
    }

    #[test]
    fn air_density_at_standard_conditions() {
        let rho = air().density(pa(101_325.0), k(288.15));
        assert!((rho.value - 1.225).abs() < 0.002, "rho = {}", rho.value);
    }

    #[test]
    fn air_sonic_velocity() {
        let c = air().sonic_velocity(k(288.15));
        assert!((c.value - 340.3).abs() < 0.5, "c = {}", c.value);
    }

    #[test]
    fn critical_ratio_for_k_1_4() {
        assert!((air().critical_pressure_ratio() - 0.5283).abs() < 1e-4);
    }

    #[test]
    fn check_rejects_k_at_or_below_one() {
        let mut gas = air();
        gas.k = 1.0;
        assert_eq!(gas.check(), Err(FluidError::OutOfRange { what: "specific heat ratio" }));
    }

    #[test]
    fn liquid_check_rejects_zero_density() {
        let liquid = LiquidProperties::new(kgpm3(0.0), pas(1e-3));
        assert!(liquid.check().is_err());
    }

    #[test]
    fn steam_uses_water_molecular_weight() {
        let steam = SteamProperties::new(0.95, 1.3, pas(1.5e-5));
        assert_eq!(steam.as_gas().molecular_weight, MW_WATER);
    }
}
