//! Conversion from the case schema into engine types.
//!
//! Resolution assumes the case passed validation; a missing required field
//! still fails with `CaseError::Resolve` rather than producing NaN.

use rv_core::constants::P_ATM_PA;
use rv_core::units::{k, kgps, kgpm3, m, pa, pas};
use rv_fire::{
    Drainage, EnvironmentalFactor, FireCaseInputs, FireConfig, HeadType, Vessel, VesselOrientation,
};
use rv_fluids::{Conditions, FluidState, GasProperties, LiquidProperties, SteamProperties};
use rv_hydraulics::{
    BoundaryAnchor, CompressibleModel, Direction, ElbowRadius, Fitting, FittingKind, PipeSegment,
    PipelineNetwork, SolverConfig,
};
use rv_sizing::{BackpressureKind, SizingConfig, SizingInputs, ValveDesign};

use crate::CaseError;
use crate::schema::{
    BackpressureKindDef, CaseFile, CompressibleModelDef, DirectionDef, DrainageDef, ElbowRadiusDef,
    EnvironmentalFactorDef, FireDef, FittingKindDef, FluidDef, HeadDef, HydraulicsBasisDef,
    NetworkDef, OptionsDef, OrientationDef, PhaseDef, SegmentDef, SizingDef, ValveDesignDef,
};

/// Gas viscosity used when none is given and no network needs it.
pub const NOMINAL_GAS_VISCOSITY_PA_S: f64 = 1.0e-5;

/// Numeric policy for one case run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseConfig {
    pub solver: SolverConfig,
    pub sizing: SizingConfig,
    pub fire: FireConfig,
    /// Inlet loss above this fraction of set pressure raises a warning
    pub inlet_loss_limit_fraction: f64,
    /// Re-solve the networks at rated capacity after the first selection
    pub rated_basis: bool,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            sizing: SizingConfig::default(),
            fire: FireConfig::default(),
            inlet_loss_limit_fraction: 0.03,
            rated_basis: false,
        }
    }
}

fn required(value: Option<f64>, field: &str) -> Result<f64, CaseError> {
    value.ok_or_else(|| CaseError::Resolve {
        field: field.to_string(),
    })
}

/// Fluid at relieving conditions carrying `mass_flow` [kg/s], or the file's
/// own mass flow when `None`.
pub fn resolve_fluid(fluid: &FluidDef, mass_flow: Option<f64>) -> Result<FluidState, CaseError> {
    let flow = match mass_flow {
        Some(w) => w,
        None => required(fluid.mass_flow_kg_s, "mass_flow_kg_s")?,
    };
    let conditions = Conditions::new(
        k(required(fluid.temperature_k, "temperature_k")?),
        pa(required(fluid.pressure_pa, "pressure_pa")?),
        kgps(flow),
    );
    let gas_viscosity = pas(fluid.gas_viscosity().unwrap_or(NOMINAL_GAS_VISCOSITY_PA_S));

    let gas = || -> Result<GasProperties, CaseError> {
        Ok(GasProperties::new(
            required(fluid.molecular_weight, "molecular_weight")?,
            required(fluid.compressibility, "compressibility")?,
            required(fluid.k, "k")?,
            gas_viscosity,
        ))
    };
    let liquid = || -> Result<LiquidProperties, CaseError> {
        Ok(LiquidProperties::new(
            kgpm3(required(fluid.liquid_density(), "liquid_density")?),
            pas(required(fluid.liquid_viscosity(), "liquid_viscosity")?),
        ))
    };

    let state = match fluid.phase {
        PhaseDef::Gas => FluidState::Gas {
            conditions,
            gas: gas()?,
        },
        PhaseDef::Liquid => FluidState::Liquid {
            conditions,
            liquid: liquid()?,
        },
        PhaseDef::Steam => {
            let mut steam = SteamProperties::new(
                required(fluid.compressibility, "compressibility")?,
                required(fluid.k, "k")?,
                gas_viscosity,
            );
            if let Some(t_sat) = fluid.saturation_temperature_k {
                steam = steam.with_saturation_temperature(k(t_sat));
            }
            FluidState::Steam { conditions, steam }
        }
        PhaseDef::TwoPhase => FluidState::TwoPhase {
            conditions,
            vapor_fraction: required(fluid.vapor_fraction, "vapor_fraction")?,
            gas: gas()?,
            liquid: liquid()?,
        },
    };
    Ok(state)
}

/// Sizing inputs at a given absolute backpressure.
pub fn resolve_sizing(
    sizing: &SizingDef,
    fluid: FluidState,
    backpressure_pa: f64,
    kind: BackpressureKind,
) -> SizingInputs {
    let mut inputs = SizingInputs::new(fluid, pa(backpressure_pa))
        .with_backpressure_kind(kind)
        .with_valve_design(match sizing.valve_design {
            ValveDesignDef::Conventional => ValveDesign::Conventional,
            ValveDesignDef::BalancedBellows => ValveDesign::BalancedBellows,
        })
        .with_rupture_disc(sizing.rupture_disc)
        .with_number_of_valves(sizing.number_of_valves);
    if let Some(kd) = sizing.discharge_coefficient {
        inputs = inputs.with_discharge_coefficient(kd);
    }
    if let Some(set) = sizing.set_pressure_pa_g {
        inputs = inputs.with_set_pressure(pa(set));
    }
    inputs
}

pub fn backpressure_kind(def: BackpressureKindDef) -> BackpressureKind {
    match def {
        BackpressureKindDef::Superimposed => BackpressureKind::Superimposed,
        BackpressureKindDef::BuiltUp => BackpressureKind::BuiltUp,
    }
}

/// Gauge set pressure, falling back to the gauge relieving pressure.
pub fn set_pressure_gauge(case: &CaseFile) -> Option<f64> {
    case.sizing
        .set_pressure_pa_g
        .or_else(|| case.fluid.pressure_pa.map(|p| p - P_ATM_PA))
}

fn fitting_kind(def: FittingKindDef) -> FittingKind {
    match def {
        FittingKindDef::Elbow90 => FittingKind::Elbow90,
        FittingKindDef::Elbow45 => FittingKind::Elbow45,
        FittingKindDef::TeeRun => FittingKind::TeeRun,
        FittingKindDef::TeeBranch => FittingKind::TeeBranch,
        FittingKindDef::GateValve => FittingKind::GateValve,
        FittingKindDef::GlobeValve => FittingKind::GlobeValve,
        FittingKindDef::BallValve => FittingKind::BallValve,
        FittingKindDef::PlugValve => FittingKind::PlugValve,
        FittingKindDef::ButterflyValve => FittingKind::ButterflyValve,
        FittingKindDef::SwingCheckValve => FittingKind::SwingCheckValve,
        FittingKindDef::Entrance => FittingKind::Entrance,
        FittingKindDef::Exit => FittingKind::Exit,
    }
}

fn segment(def: &SegmentDef) -> PipeSegment {
    let mut seg = PipeSegment::new(m(def.diameter_m), m(def.length_m), m(def.roughness_m))
        .with_elevation_change(m(def.elevation_change_m))
        .with_elbow_radius(match def.elbow_radius {
            ElbowRadiusDef::LongRadius => ElbowRadius::LongRadius,
            ElbowRadiusDef::ShortRadius => ElbowRadius::ShortRadius,
            ElbowRadiusDef::ShortRadiusCast => ElbowRadius::ShortRadiusCast,
        })
        .with_compressible_model(match def.model {
            CompressibleModelDef::Isothermal => CompressibleModel::Isothermal,
            CompressibleModelDef::Adiabatic => CompressibleModel::Adiabatic,
        });
    for fitting in &def.fittings {
        seg = seg.with_fitting(Fitting::new(fitting_kind(fitting.kind), fitting.count));
    }
    if let Some(loss) = def.additional_loss_pa {
        seg = seg.with_additional_loss(pa(loss));
    }
    if let Some(sf) = def.safety_factor {
        seg = seg.with_safety_factor(sf);
    }
    seg
}

/// Network with direction and boundary defaults filled in.
pub fn resolve_network(
    def: &NetworkDef,
    default_direction: Direction,
    default_boundary_pa: f64,
) -> PipelineNetwork {
    let direction = match def.direction {
        Some(DirectionDef::Forward) => Direction::Forward,
        Some(DirectionDef::Backward) => Direction::Backward,
        None => default_direction,
    };
    let mut boundary = BoundaryAnchor::pressure(pa(def.boundary_pressure_pa.unwrap_or(default_boundary_pa)));
    if let Some(t) = def.boundary_temperature_k {
        boundary = boundary.with_temperature(k(t));
    }
    def.segments
        .iter()
        .fold(PipelineNetwork::new(direction, boundary), |net, s| {
            net.with_segment(segment(s))
        })
}

pub fn resolve_fire(def: &FireDef) -> FireCaseInputs {
    let orientation = match def.orientation {
        OrientationDef::Vertical => VesselOrientation::Vertical,
        OrientationDef::Horizontal => VesselOrientation::Horizontal,
    };
    let head = match def.head {
        HeadDef::Hemispherical => HeadType::Hemispherical,
        HeadDef::Ellipsoidal => HeadType::Ellipsoidal,
        HeadDef::Flat => HeadType::Flat,
    };
    FireCaseInputs {
        vessel: Vessel::new(orientation, head, m(def.diameter_m), m(def.length_m)),
        liquid_level: m(def.liquid_level_m),
        insulated: def.insulated,
        environmental_factor: match def.environmental_factor {
            EnvironmentalFactorDef::Bare => EnvironmentalFactor::Bare,
            EnvironmentalFactorDef::Insulated => EnvironmentalFactor::Insulated,
            EnvironmentalFactorDef::WaterSpray => EnvironmentalFactor::WaterSpray,
            EnvironmentalFactorDef::InsulatedWaterSpray => EnvironmentalFactor::InsulatedWaterSpray,
        },
        drainage: match def.drainage {
            DrainageDef::Adequate => Drainage::Adequate,
            DrainageDef::Inadequate => Drainage::Inadequate,
        },
        height_above_grade: m(def.height_above_grade_m),
        latent_heat: def.latent_heat_j_kg,
    }
}

/// Defaults overridden by the case `options:` block.
pub fn resolve_options(options: &OptionsDef) -> CaseConfig {
    let mut config = CaseConfig::default();

    let s = &options.solver;
    let solver = &mut config.solver;
    if let Some(v) = s.friction_max_iterations {
        solver.friction_max_iterations = v;
    }
    if let Some(v) = s.friction_tolerance {
        solver.friction_tolerance = v;
    }
    if let Some(v) = s.erosional_c {
        solver.erosional_c = v;
    }
    if let Some(v) = s.mach_elevated {
        solver.mach_elevated = v;
    }
    if let Some(v) = s.mach_high {
        solver.mach_high = v;
    }

    let z = &options.sizing;
    let sizing = &mut config.sizing;
    if let Some(v) = z.gas_discharge_coefficient {
        sizing.gas_discharge_coefficient = v;
    }
    if let Some(v) = z.liquid_discharge_coefficient {
        sizing.liquid_discharge_coefficient = v;
    }
    if let Some(v) = z.high_utilization_percent {
        sizing.high_utilization_percent = v;
    }
    if let Some(v) = z.viscosity_reynolds_limit {
        sizing.viscosity_reynolds_limit = v;
    }
    if let Some(v) = z.built_up_limit_fraction {
        sizing.built_up_limit_fraction = v;
    }
    if let Some(v) = z.inlet_loss_limit_fraction {
        config.inlet_loss_limit_fraction = v;
    }

    if let Some(h) = options.fire.credited_height_m {
        config.fire.credited_height = m(h);
    }
    config.rated_basis = options.hydraulics_basis == HydraulicsBasisDef::Rated;
    config
}
