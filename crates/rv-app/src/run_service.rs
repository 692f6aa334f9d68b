//! Case execution: fire load, piping hydraulics and relief sizing.

use rv_case::{CaseConfig, CaseFile};
use rv_core::units::{MassRate, Pressure, pa};
use rv_fire::FireCaseResult;
use rv_fluids::FluidState;
use rv_hydraulics::{Direction, FittingLossTable, NetworkPressureDropResult, solve_with};
use rv_sizing::{BackpressureKind, OrificeTable, SizingOutputs, size_with};
use tracing::{info, warn};

use crate::case_service::validate_case;
use crate::error::{AppError, AppResult};

/// Everything one case run produced, in engine types.
#[derive(Debug, Clone)]
pub struct CaseRun {
    pub name: String,
    pub fluid: FluidState,
    pub fire: Option<FireCaseResult>,
    pub inlet: Option<NetworkPressureDropResult>,
    pub outlet: Option<NetworkPressureDropResult>,
    /// Absolute backpressure the valve was sized against
    pub backpressure: Pressure,
    pub backpressure_kind: BackpressureKind,
    pub sizing: SizingOutputs,
    /// Flow the networks were solved at
    pub hydraulics_flow: MassRate,
    /// Case-level warnings, in the order they were raised
    pub warnings: Vec<String>,
}

impl CaseRun {
    /// Case warnings followed by the sizing diagnostics.
    pub fn all_warnings(&self) -> Vec<String> {
        let mut all = self.warnings.clone();
        all.extend(self.sizing.diagnostics());
        all
    }
}

struct Pass {
    inlet: Option<NetworkPressureDropResult>,
    outlet: Option<NetworkPressureDropResult>,
    backpressure: Pressure,
    backpressure_kind: BackpressureKind,
    sizing: SizingOutputs,
}

/// Run a case end to end.
///
/// Order: validation, fire load (its relief rate replaces the fluid mass
/// flow), inlet network forward from the relieving pressure, outlet network
/// backward from the backpressure, sizing and orifice selection. With a
/// rated hydraulics basis the networks are solved once more at the rated
/// capacity of the first selection and the valve is re-sized.
pub fn run_case(case: &CaseFile) -> AppResult<CaseRun> {
    let report = validate_case(case)?;
    let config = rv_case::resolve_options(&case.options);
    info!(case = %case.name, "running relief case");

    let mut warnings: Vec<String> = report.warnings.iter().map(|w| w.to_string()).collect();

    let fire = match &case.fire {
        Some(def) => {
            let result = rv_fire::fire_case(&rv_case::resolve_fire(def), &config.fire)?;
            info!(
                relief_rate_kgps = result.load.relief_rate.value,
                "fire relief load computed"
            );
            warnings.extend(result.warnings.iter().cloned());
            Some(result)
        }
        None => None,
    };

    let fluid = rv_case::resolve_fluid(
        &case.fluid,
        fire.as_ref().map(|f| f.load.relief_rate.value),
    )?;
    let table = OrificeTable::api526();

    let mut flow = fluid.mass_flow();
    let mut pass = run_pass(case, &config, &fluid, flow, &table)?;
    if config.rated_basis && (pass.inlet.is_some() || pass.outlet.is_some()) {
        flow = pass.sizing.rated_capacity();
        info!(rated_kgps = flow.value, "re-solving piping at rated capacity");
        pass = run_pass(case, &config, &fluid, flow, &table)?;
    }

    for (label, network) in [("inlet", &pass.inlet), ("outlet", &pass.outlet)] {
        if let Some(result) = network {
            warnings.extend(result.warnings.iter().map(|w| format!("{label}: {w}")));
        }
    }
    if let Some(inlet) = &pass.inlet
        && let Some(warning) = inlet_loss_warning(case, &config, inlet)
    {
        warn!("{warning}");
        warnings.push(warning);
    }

    info!(
        orifice = %pass.sizing.selection.orifice.designation,
        valves = pass.sizing.number_of_valves(),
        percent_utilized = pass.sizing.percent_utilized(),
        "case complete"
    );

    Ok(CaseRun {
        name: case.name.clone(),
        fluid,
        fire,
        inlet: pass.inlet,
        outlet: pass.outlet,
        backpressure: pass.backpressure,
        backpressure_kind: pass.backpressure_kind,
        sizing: pass.sizing,
        hydraulics_flow: flow,
        warnings,
    })
}

fn case_backpressure(case: &CaseFile) -> AppResult<f64> {
    case.sizing
        .backpressure_pa
        .ok_or_else(|| AppError::Case("sizing.backpressure_pa is required".to_string()))
}

fn run_pass(
    case: &CaseFile,
    config: &CaseConfig,
    fluid: &FluidState,
    flow: MassRate,
    table: &OrificeTable,
) -> AppResult<Pass> {
    let fittings = FittingLossTable::crane();
    let case_pb = case_backpressure(case)?;

    let inlet = match &case.inlet {
        Some(def) => {
            let network =
                rv_case::resolve_network(def, Direction::Forward, fluid.pressure().value);
            Some(solve_with(&network, fluid, flow, &config.solver, &fittings)?)
        }
        None => None,
    };

    let outlet = match &case.outlet {
        Some(def) => {
            let network = rv_case::resolve_network(def, Direction::Backward, case_pb);
            Some(solve_with(&network, fluid, flow, &config.solver, &fittings)?)
        }
        None => None,
    };

    // A solved tailpipe sets the pressure at the valve outlet.
    let (backpressure, backpressure_kind) = match &outlet {
        Some(result) => (result.inlet_pressure, BackpressureKind::BuiltUp),
        None => (
            pa(case_pb),
            rv_case::backpressure_kind(case.sizing.backpressure_kind),
        ),
    };

    let inputs =
        rv_case::resolve_sizing(&case.sizing, fluid.clone(), backpressure.value, backpressure_kind);
    let mut sizing = size_with(&inputs, table, &config.sizing)?;
    if let Some(designation) = &case.sizing.orifice {
        sizing.override_orifice(designation, table)?;
    }

    Ok(Pass {
        inlet,
        outlet,
        backpressure,
        backpressure_kind,
        sizing,
    })
}

fn inlet_loss_warning(
    case: &CaseFile,
    config: &CaseConfig,
    inlet: &NetworkPressureDropResult,
) -> Option<String> {
    let set_gauge = rv_case::set_pressure_gauge(case)?;
    if set_gauge <= 0.0 {
        return None;
    }
    let fraction = inlet.total_pressure_drop.value / set_gauge;
    (fraction > config.inlet_loss_limit_fraction).then(|| {
        format!(
            "inlet pressure loss is {:.1}% of set pressure (limit {:.1}%)",
            fraction * 100.0,
            config.inlet_loss_limit_fraction * 100.0
        )
    })
}

/// Solve the case's inlet and outlet piping alone at the case mass flow.
pub fn run_hydraulics(
    case: &CaseFile,
) -> AppResult<(Option<NetworkPressureDropResult>, Option<NetworkPressureDropResult>)> {
    validate_case(case)?;
    if case.inlet.is_none() && case.outlet.is_none() {
        return Err(AppError::MissingBlock("inlet or outlet"));
    }
    let config = rv_case::resolve_options(&case.options);
    let fire_flow = match &case.fire {
        Some(def) => Some(
            rv_fire::fire_case(&rv_case::resolve_fire(def), &config.fire)?
                .load
                .relief_rate
                .value,
        ),
        None => None,
    };
    let fluid = rv_case::resolve_fluid(&case.fluid, fire_flow)?;
    let fittings = FittingLossTable::crane();
    let flow = fluid.mass_flow();
    let case_pb = case_backpressure(case)?;

    let inlet = case
        .inlet
        .as_ref()
        .map(|def| {
            let network =
                rv_case::resolve_network(def, Direction::Forward, fluid.pressure().value);
            solve_with(&network, &fluid, flow, &config.solver, &fittings)
        })
        .transpose()?;
    let outlet = case
        .outlet
        .as_ref()
        .map(|def| {
            let network = rv_case::resolve_network(def, Direction::Backward, case_pb);
            solve_with(&network, &fluid, flow, &config.solver, &fittings)
        })
        .transpose()?;
    Ok((inlet, outlet))
}

/// Fire load for the case's vessel.
pub fn run_fire(case: &CaseFile) -> AppResult<FireCaseResult> {
    let def = case.fire.as_ref().ok_or(AppError::MissingBlock("fire"))?;
    validate_case(case)?;
    let config = rv_case::resolve_options(&case.options);
    Ok(rv_fire::fire_case(&rv_case::resolve_fire(def), &config.fire)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_case::{FluidDef, NetworkDef, PhaseDef, SegmentDef, SizingDef};

    fn gas_case() -> CaseFile {
        let mut fluid = FluidDef::new(PhaseDef::Gas);
        fluid.mass_flow_kg_s = Some(5000.0 / 3600.0);
        fluid.temperature_k = Some(350.0);
        fluid.pressure_pa = Some(11.0e5);
        fluid.molecular_weight = Some(18.0);
        fluid.compressibility = Some(1.0);
        fluid.k = Some(1.3);
        fluid.gas_viscosity_pa_s = Some(1.2e-5);
        CaseFile {
            version: rv_case::LATEST_VERSION,
            name: "gas".to_string(),
            fluid,
            sizing: SizingDef {
                backpressure_pa: Some(1.0e5),
                ..SizingDef::default()
            },
            inlet: None,
            outlet: None,
            fire: None,
            options: Default::default(),
        }
    }

    fn pipe(diameter_m: f64, length_m: f64) -> SegmentDef {
        SegmentDef::new(diameter_m, length_m)
    }

    #[test]
    fn sizing_only_case_matches_direct_sizing() {
        let run = run_case(&gas_case()).unwrap();
        assert!((rv_core::units::area_mm2(run.sizing.required_area) - 780.3).abs() < 1.0);
        assert_eq!(run.sizing.selection.orifice.designation, "J");
        assert!(run.inlet.is_none() && run.outlet.is_none());
        assert_eq!(run.backpressure_kind, BackpressureKind::Superimposed);
        assert!((run.sizing.mass_flow.value - 5000.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn outlet_network_sets_built_up_backpressure() {
        let mut case = gas_case();
        case.outlet = Some(NetworkDef::new(vec![pipe(0.15, 25.0)]));
        let run = run_case(&case).unwrap();
        assert_eq!(run.backpressure_kind, BackpressureKind::BuiltUp);
        let outlet = run.outlet.as_ref().unwrap();
        assert!(run.backpressure.value > 1.0e5);
        assert!((run.backpressure.value - outlet.inlet_pressure.value).abs() < 1e-9);
    }

    #[test]
    fn long_small_inlet_line_raises_loss_warning() {
        let mut case = gas_case();
        case.inlet = Some(NetworkDef::new(vec![pipe(0.05, 10.0)]));
        let run = run_case(&case).unwrap();
        assert!(
            run.warnings
                .iter()
                .any(|w| w.contains("inlet pressure loss")),
            "warnings: {:?}",
            run.warnings
        );
    }

    #[test]
    fn short_inlet_line_has_no_loss_warning() {
        let mut case = gas_case();
        case.inlet = Some(NetworkDef::new(vec![pipe(0.15, 1.0)]));
        let run = run_case(&case).unwrap();
        assert!(!run.warnings.iter().any(|w| w.contains("inlet pressure loss")));
    }

    #[test]
    fn rated_basis_solves_at_rated_capacity() {
        let mut case = gas_case();
        case.inlet = Some(NetworkDef::new(vec![pipe(0.1, 5.0)]));
        case.options.hydraulics_basis = rv_case::HydraulicsBasisDef::Rated;
        let run = run_case(&case).unwrap();
        assert!(run.hydraulics_flow.value > run.fluid.mass_flow().value);
    }

    #[test]
    fn manual_orifice_is_kept() {
        let mut case = gas_case();
        case.sizing.orifice = Some("H".to_string());
        let run = run_case(&case).unwrap();
        assert_eq!(run.sizing.selection.orifice.designation, "H");
        assert!(run.sizing.selection.manual);
        assert!(run.all_warnings().iter().any(|w| w.contains("smaller than the required")));
    }

    #[test]
    fn hydraulics_requires_a_network() {
        assert!(matches!(
            run_hydraulics(&gas_case()),
            Err(AppError::MissingBlock(_))
        ));
    }

    #[test]
    fn fire_requires_a_fire_block() {
        assert!(matches!(run_fire(&gas_case()), Err(AppError::MissingBlock("fire"))));
    }
}
