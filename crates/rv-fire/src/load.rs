//! Fire heat absorption and relief rate (API 521).

use rv_core::units::{Area, LatentHeat, Length, MassRate, Power, kgps, w};
use tracing::{debug, warn};

use crate::config::FireConfig;
use crate::error::{FireResult, require_non_negative, require_positive};
use crate::geometry::{Vessel, WettedArea, wetted_area};

/// Standard environmental credit for insulation and water spray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentalFactor {
    #[default]
    Bare,
    Insulated,
    WaterSpray,
    InsulatedWaterSpray,
}

impl EnvironmentalFactor {
    pub fn value(self) -> f64 {
        match self {
            EnvironmentalFactor::Bare => 1.0,
            EnvironmentalFactor::Insulated => 0.3,
            EnvironmentalFactor::WaterSpray => 0.15,
            EnvironmentalFactor::InsulatedWaterSpray => 0.075,
        }
    }

    pub fn assumes_insulation(self) -> bool {
        matches!(
            self,
            EnvironmentalFactor::Insulated | EnvironmentalFactor::InsulatedWaterSpray
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Drainage {
    /// Adequate drainage and prompt firefighting
    #[default]
    Adequate,
    Inadequate,
}

impl Drainage {
    pub fn coefficient(self, config: &FireConfig) -> f64 {
        match self {
            Drainage::Adequate => config.adequate_drainage_c,
            Drainage::Inadequate => config.inadequate_drainage_c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireLoad {
    /// Wetted area the heat input is based on
    pub limited_wetted_area: Area,
    pub heat_absorption: Power,
    pub relief_rate: MassRate,
}

/// Heat input Q = C·F·A^0.82 and relief rate Q/λ.
///
/// `latent_heat` is in J/kg. `factor` is the environmental factor F.
pub fn fire_load(
    credited_area: Area,
    latent_heat: LatentHeat,
    factor: f64,
    drainage: Drainage,
    config: &FireConfig,
) -> FireResult<FireLoad> {
    require_positive(credited_area.value, "wetted area")?;
    require_positive(latent_heat, "latent heat")?;
    require_positive(factor, "environmental factor")?;

    let q = drainage.coefficient(config) * factor * credited_area.value.powf(0.82);
    Ok(FireLoad {
        limited_wetted_area: credited_area,
        heat_absorption: w(q),
        relief_rate: kgps(q / latent_heat),
    })
}

/// A complete fire scenario for one vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireCaseInputs {
    pub vessel: Vessel,
    /// Liquid level from the vessel bottom
    pub liquid_level: Length,
    pub insulated: bool,
    pub environmental_factor: EnvironmentalFactor,
    pub drainage: Drainage,
    /// Elevation of the vessel bottom above grade
    pub height_above_grade: Length,
    /// Latent heat of vaporization [J/kg]
    pub latent_heat: LatentHeat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireCaseResult {
    pub wetted: WettedArea,
    pub load: FireLoad,
    pub warnings: Vec<String>,
}

/// Wetted area then fire load, with consistency warnings.
pub fn fire_case(inputs: &FireCaseInputs, config: &FireConfig) -> FireResult<FireCaseResult> {
    require_non_negative(inputs.height_above_grade.value, "height above grade")?;
    let wetted = wetted_area(
        &inputs.vessel,
        inputs.liquid_level,
        inputs.height_above_grade,
        config.credited_height,
        config.integration_panels,
    )?;

    let mut warnings = Vec::new();
    let top = inputs.vessel.internal_height();
    if inputs.liquid_level > top {
        warnings.push(format!(
            "liquid level {:.2} m is above the vessel top ({:.2} m); clamped",
            inputs.liquid_level.value, top.value
        ));
    }
    if wetted.credited < wetted.physical {
        warnings.push(format!(
            "wetted area limited to {:.1} m above grade: {:.2} of {:.2} m² credited",
            config.credited_height.value, wetted.credited.value, wetted.physical.value
        ));
    }
    if inputs.insulated != inputs.environmental_factor.assumes_insulation() {
        warnings.push(format!(
            "insulation flag ({}) does not match environmental factor {:?}",
            inputs.insulated, inputs.environmental_factor
        ));
    }

    let load = fire_load(
        wetted.credited,
        inputs.latent_heat,
        inputs.environmental_factor.value(),
        inputs.drainage,
        config,
    )?;

    debug!(
        physical_m2 = wetted.physical.value,
        credited_m2 = wetted.credited.value,
        heat_w = load.heat_absorption.value,
        relief_kgps = load.relief_rate.value,
        "fire case"
    );
    for message in &warnings {
        warn!("{message}");
    }

    Ok(FireCaseResult {
        wetted,
        load,
        warnings,
    })
}
