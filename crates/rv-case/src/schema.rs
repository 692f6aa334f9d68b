//! Case file schema.
//!
//! Every physical field is a plain `f64` in SI base units, named with a unit
//! suffix. Pressures are absolute unless the name ends in `_pa_g`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    #[serde(default)]
    pub sizing: SizingDef,
    /// Piping from the protected equipment to the valve inlet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet: Option<NetworkDef>,
    /// Piping from the valve outlet to the discharge point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet: Option<NetworkDef>,
    /// When present, the fire relief rate replaces `fluid.mass_flow_kg_s`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fire: Option<FireDef>,
    #[serde(default)]
    pub options: OptionsDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhaseDef {
    Gas,
    Liquid,
    Steam,
    TwoPhase,
}

/// Relieving fluid. Which fields are needed depends on `phase`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub phase: PhaseDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_flow_kg_s: Option<f64>,
    /// Relieving temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_k: Option<f64>,
    /// Relieving pressure (absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_pa: Option<f64>,
    /// kg/kmol; ignored for steam
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecular_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressibility: Option<f64>,
    /// Specific-heat ratio Cp/Cv
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_viscosity_pa_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_density_kg_m3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_viscosity_pa_s: Option<f64>,
    /// Legacy generic density
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density_kg_m3: Option<f64>,
    /// Legacy generic viscosity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscosity_pa_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vapor_fraction: Option<f64>,
    /// Steam only; enables the superheat correction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation_temperature_k: Option<f64>,
}

impl FluidDef {
    pub fn new(phase: PhaseDef) -> Self {
        Self {
            phase,
            mass_flow_kg_s: None,
            temperature_k: None,
            pressure_pa: None,
            molecular_weight: None,
            compressibility: None,
            k: None,
            gas_viscosity_pa_s: None,
            liquid_density_kg_m3: None,
            liquid_viscosity_pa_s: None,
            density_kg_m3: None,
            viscosity_pa_s: None,
            vapor_fraction: None,
            saturation_temperature_k: None,
        }
    }

    // Phase-specific fields win over the legacy generic ones. The generic
    // viscosity belongs to the liquid in liquid-bearing phases and to the gas
    // otherwise.

    pub fn liquid_density(&self) -> Option<f64> {
        self.liquid_density_kg_m3.or(self.density_kg_m3)
    }

    pub fn liquid_viscosity(&self) -> Option<f64> {
        self.liquid_viscosity_pa_s.or(self.viscosity_pa_s)
    }

    pub fn gas_viscosity(&self) -> Option<f64> {
        match self.phase {
            PhaseDef::Gas | PhaseDef::Steam => self.gas_viscosity_pa_s.or(self.viscosity_pa_s),
            PhaseDef::Liquid | PhaseDef::TwoPhase => self.gas_viscosity_pa_s,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BackpressureKindDef {
    #[default]
    Superimposed,
    BuiltUp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ValveDesignDef {
    #[default]
    Conventional,
    BalancedBellows,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizingDef {
    /// Superimposed backpressure at the discharge point (absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backpressure_pa: Option<f64>,
    #[serde(default)]
    pub backpressure_kind: BackpressureKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_coefficient: Option<f64>,
    #[serde(default)]
    pub valve_design: ValveDesignDef,
    #[serde(default)]
    pub rupture_disc: bool,
    #[serde(default = "default_valve_count")]
    pub number_of_valves: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_pressure_pa_g: Option<f64>,
    /// Manual orifice designation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orifice: Option<String>,
}

fn default_valve_count() -> u32 {
    1
}

impl Default for SizingDef {
    fn default() -> Self {
        Self {
            backpressure_pa: None,
            backpressure_kind: BackpressureKindDef::default(),
            discharge_coefficient: None,
            valve_design: ValveDesignDef::default(),
            rupture_disc: false,
            number_of_valves: default_valve_count(),
            set_pressure_pa_g: None,
            orifice: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DirectionDef {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    /// Defaults to forward for inlet piping and backward for outlet piping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DirectionDef>,
    /// Defaults to the relieving pressure (inlet) or the backpressure (outlet)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_pressure_pa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_temperature_k: Option<f64>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
}

impl NetworkDef {
    /// Network with default direction and boundary.
    pub fn new(segments: Vec<SegmentDef>) -> Self {
        Self {
            direction: None,
            boundary_pressure_pa: None,
            boundary_temperature_k: None,
            segments,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CompressibleModelDef {
    #[default]
    Isothermal,
    Adiabatic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ElbowRadiusDef {
    #[default]
    LongRadius,
    ShortRadius,
    ShortRadiusCast,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub diameter_m: f64,
    pub length_m: f64,
    #[serde(default)]
    pub elevation_change_m: f64,
    #[serde(default = "default_roughness")]
    pub roughness_m: f64,
    #[serde(default)]
    pub fittings: Vec<FittingDef>,
    #[serde(default)]
    pub elbow_radius: ElbowRadiusDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_loss_pa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_factor: Option<f64>,
    #[serde(default)]
    pub model: CompressibleModelDef,
}

impl SegmentDef {
    /// Straight commercial-steel run with no fittings.
    pub fn new(diameter_m: f64, length_m: f64) -> Self {
        Self {
            diameter_m,
            length_m,
            elevation_change_m: 0.0,
            roughness_m: default_roughness(),
            fittings: Vec::new(),
            elbow_radius: ElbowRadiusDef::default(),
            additional_loss_pa: None,
            safety_factor: None,
            model: CompressibleModelDef::default(),
        }
    }
}

/// Commercial steel.
fn default_roughness() -> f64 {
    4.5e-5
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FittingKindDef {
    Elbow90,
    Elbow45,
    TeeRun,
    TeeBranch,
    GateValve,
    GlobeValve,
    BallValve,
    PlugValve,
    ButterflyValve,
    SwingCheckValve,
    Entrance,
    Exit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingDef {
    pub kind: FittingKindDef,
    #[serde(default = "default_fitting_count")]
    pub count: u32,
}

fn default_fitting_count() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrientationDef {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HeadDef {
    Hemispherical,
    Ellipsoidal,
    Flat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EnvironmentalFactorDef {
    #[default]
    Bare,
    Insulated,
    WaterSpray,
    InsulatedWaterSpray,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DrainageDef {
    #[default]
    Adequate,
    Inadequate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FireDef {
    pub orientation: OrientationDef,
    pub head: HeadDef,
    pub diameter_m: f64,
    /// Tangent-to-tangent
    pub length_m: f64,
    /// From the vessel bottom
    pub liquid_level_m: f64,
    #[serde(default)]
    pub insulated: bool,
    #[serde(default)]
    pub environmental_factor: EnvironmentalFactorDef,
    #[serde(default)]
    pub drainage: DrainageDef,
    /// Elevation of the vessel bottom
    #[serde(default)]
    pub height_above_grade_m: f64,
    pub latent_heat_j_kg: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HydraulicsBasisDef {
    /// Networks carry the required relief rate
    #[default]
    Required,
    /// Networks are re-solved at the rated capacity of the selected orifice
    Rated,
}

/// Overrides for the numeric defaults; absent keys keep the default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OptionsDef {
    #[serde(default)]
    pub hydraulics_basis: HydraulicsBasisDef,
    #[serde(default)]
    pub solver: SolverOptionsDef,
    #[serde(default)]
    pub sizing: SizingOptionsDef,
    #[serde(default)]
    pub fire: FireOptionsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SolverOptionsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friction_tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erosional_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mach_elevated: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mach_high: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SizingOptionsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_discharge_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquid_discharge_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_utilization_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscosity_reynolds_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub built_up_limit_fraction: Option<f64>,
    /// Inlet loss, as a fraction of set pressure, above which a warning is raised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_loss_limit_fraction: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FireOptionsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credited_height_m: Option<f64>,
}
