//! Phase dispatch for required-area sizing.

use rv_core::units::area_mm2;
use rv_fluids::FluidState;
use tracing::{debug, warn};

use crate::backpressure::{bellows_gas_kb, bellows_liquid_kw};
use crate::config::SizingConfig;
use crate::error::SizingResult;
use crate::inputs::{BackpressureKind, SizingInputs, ValveDesign};
use crate::orifice::{OrificeTable, select};
use crate::outputs::{Corrections, SizingOutputs};
use crate::{gas, liquid, steam, two_phase};

/// Size with the standard factors and the API 526 table.
pub fn size(inputs: &SizingInputs) -> SizingResult<SizingOutputs> {
    size_with(inputs, &OrificeTable::api526(), &SizingConfig::default())
}

/// Required area, correction factors and orifice selection for one case.
///
/// Inputs are assumed validated; missing or non-physical properties give
/// non-finite areas rather than errors. The only error is a zero valve count.
pub fn size_with(
    inputs: &SizingInputs,
    table: &OrificeTable,
    config: &SizingConfig,
) -> SizingResult<SizingOutputs> {
    let p1 = inputs.relieving_pressure();
    let pb = inputs.backpressure;
    let t = inputs.fluid.temperature();
    let w = inputs.fluid.mass_flow();
    let kc = if inputs.rupture_disc {
        config.rupture_disc_factor
    } else {
        1.0
    };
    let fraction = inputs.backpressure_fraction();
    let bellows = inputs.valve_design == ValveDesign::BalancedBellows;
    let valve_kb = if bellows { bellows_gas_kb(fraction) } else { 1.0 };
    let kw = if bellows { bellows_liquid_kw(fraction) } else { 1.0 };
    let kd_gas = inputs
        .discharge_coefficient
        .unwrap_or(config.gas_discharge_coefficient);
    let kd_liquid = inputs
        .discharge_coefficient
        .unwrap_or(config.liquid_discharge_coefficient);

    let mut notes = Vec::new();
    let mut corrections = Corrections {
        kc,
        kw: None,
        kv: None,
        kn: None,
        ksh: None,
    };

    let (required_area, kd, backpressure_correction, critical) = match &inputs.fluid {
        FluidState::Gas { gas: props, .. } => {
            let s = gas::required_area(w, p1, pb, t, props, kd_gas, kc, valve_kb);
            (s.area, kd_gas, s.kb, s.critical)
        }
        FluidState::Steam { steam: props, .. } => {
            let s = steam::required_area(w, p1, pb, t, props, kd_gas, kc, valve_kb);
            corrections.kn = s.kn;
            corrections.ksh = s.ksh;
            (s.gas.area, kd_gas, s.gas.kb, s.gas.critical)
        }
        FluidState::Liquid { liquid: props, .. } => {
            let s = liquid::required_area(w, p1, pb, props, kd_liquid, kc, kw, config);
            corrections.kw = Some(kw);
            corrections.kv = s.kv;
            if !s.converged {
                notes.push("viscosity correction did not converge; last estimate used".to_string());
            }
            (s.area, kd_liquid, kw, false)
        }
        FluidState::TwoPhase {
            vapor_fraction,
            gas: vapor,
            liquid: condensed,
            ..
        } => {
            let s = two_phase::required_area(
                w,
                p1,
                pb,
                t,
                *vapor_fraction,
                vapor,
                condensed,
                kd_gas,
                kc,
                valve_kb,
            );
            debug!(
                omega = s.omega,
                eta_c = s.critical_ratio,
                mass_flux = s.mass_flux,
                "omega method"
            );
            (s.area, kd_gas, s.kb, s.critical)
        }
    };

    if pb >= p1 {
        notes.push("backpressure at or above relieving pressure: no flow is possible".to_string());
    }
    if inputs.backpressure_kind == BackpressureKind::BuiltUp
        && inputs.valve_design == ValveDesign::Conventional
        && fraction > config.built_up_limit_fraction
    {
        notes.push(format!(
            "built-up backpressure is {:.1}% of set pressure, above {:.0}% for a conventional valve; consider a balanced bellows valve",
            fraction * 100.0,
            config.built_up_limit_fraction * 100.0
        ));
    }

    let selection = select(required_area, inputs.number_of_valves, table)?;
    debug!(
        phase = %inputs.fluid.phase(),
        area_mm2 = area_mm2(required_area),
        kd,
        kb = backpressure_correction,
        critical,
        orifice = %selection.orifice.designation,
        "sizing pass"
    );

    let outputs = SizingOutputs {
        phase: inputs.fluid.phase(),
        required_area,
        discharge_coefficient: kd,
        backpressure_correction,
        corrections,
        critical,
        mass_flow: w,
        selection,
        notes,
        high_utilization_percent: config.high_utilization_percent,
    };
    if outputs.exceeds_largest() {
        warn!(
            area_mm2 = area_mm2(outputs.required_area),
            "required area exceeds largest standard orifice"
        );
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::units::{bar, k, kgpm3, kgph, kgps, pas};
    use rv_fluids::{Conditions, GasProperties, LiquidProperties, Phase};

    fn gas_case(flow_kgph: f64, pb_bar: f64) -> SizingInputs {
        let fluid = FluidState::Gas {
            conditions: Conditions::new(k(350.0), bar(11.0), kgph(flow_kgph)),
            gas: GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5)),
        };
        SizingInputs::new(fluid, bar(pb_bar))
    }

    fn liquid_case() -> SizingInputs {
        let fluid = FluidState::Liquid {
            conditions: Conditions::new(k(300.0), bar(11.0), kgps(10.0)),
            liquid: LiquidProperties::new(kgpm3(998.0), pas(1.0e-3)),
        };
        SizingInputs::new(fluid, bar(1.0))
    }

    #[test]
    fn gas_reference_case() {
        let out = size(&gas_case(5000.0, 1.0)).unwrap();
        assert_eq!(out.phase, Phase::Gas);
        assert!(out.critical);
        assert_eq!(out.discharge_coefficient, 0.975);
        assert!((area_mm2(out.required_area) - 780.3).abs() < 0.2);
        assert_eq!(out.selection.orifice.designation, "J");
        let expected = out.required_area.value / out.selection.orifice.area.value * 100.0;
        assert!((out.percent_utilized() - expected).abs() < 1e-9);
        assert!(out.diagnostics().iter().any(|d| d.contains("high orifice utilization")));
    }

    #[test]
    fn liquid_uses_liquid_kd() {
        let out = size(&liquid_case()).unwrap();
        assert_eq!(out.discharge_coefficient, 0.65);
        assert!(!out.critical);
        assert_eq!(out.corrections.kw, Some(1.0));
    }

    #[test]
    fn discharge_override_applies() {
        let out = size(&gas_case(5000.0, 1.0).with_discharge_coefficient(0.9)).unwrap();
        assert_eq!(out.discharge_coefficient, 0.9);
    }

    #[test]
    fn oversize_is_reported() {
        let out = size(&gas_case(200_000.0, 1.0)).unwrap();
        assert!(out.exceeds_largest());
        assert_eq!(out.selection.orifice.designation, "T");
        assert!(
            out.diagnostics()
                .iter()
                .any(|d| d.contains("required area exceeds largest standard orifice"))
        );
    }

    #[test]
    fn changing_valve_count_rederives_utilization() {
        let table = OrificeTable::api526();
        let mut out = size(&gas_case(5000.0, 1.0)).unwrap();
        let single = out.percent_utilized();
        out.set_number_of_valves(2, &table).unwrap();
        assert_eq!(out.number_of_valves(), 2);
        assert_eq!(out.selection.orifice.designation, "H");
        assert!((out.percent_utilized() - 780.3 / 2.0 / 506.0 * 100.0).abs() < 0.1);
        assert!(out.percent_utilized() != single);
    }

    #[test]
    fn rated_capacity_scales_with_installed_area() {
        let out = size(&gas_case(5000.0, 1.0)).unwrap();
        let ratio = out.selection.installed_area().value / out.required_area.value;
        assert!((out.rated_capacity().value - kgph(5000.0).value * ratio).abs() < 1e-12);
    }

    #[test]
    fn built_up_on_conventional_valve_is_flagged() {
        let inputs = gas_case(5000.0, 3.0)
            .with_backpressure_kind(BackpressureKind::BuiltUp)
            .with_set_pressure(bar(9.0));
        let out = size(&inputs).unwrap();
        assert!(out.notes.iter().any(|n| n.contains("balanced bellows")));

        let balanced = size(&inputs.with_valve_design(ValveDesign::BalancedBellows)).unwrap();
        assert!(balanced.notes.is_empty());
    }

    fn two_phase_case(pb_bar: f64) -> SizingInputs {
        let fluid = FluidState::TwoPhase {
            conditions: Conditions::new(k(350.0), bar(11.0), kgps(4.0)),
            vapor_fraction: 0.25,
            gas: GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5)),
            liquid: LiquidProperties::new(kgpm3(998.0), pas(1.0e-3)),
        };
        SizingInputs::new(fluid, bar(pb_bar))
    }

    #[test]
    fn two_phase_uses_homogeneous_omega_flux() {
        // ω = 0.7538, ηc = 0.5696, G = 3553.6 kg/(m²·s) by hand
        let out = size(&two_phase_case(1.0)).unwrap();
        assert_eq!(out.phase, Phase::TwoPhase);
        assert!(out.critical);
        assert_eq!(out.discharge_coefficient, 0.975);
        let area = area_mm2(out.required_area);
        assert!((area - 1154.5).abs() < 0.5, "A = {area}");
        assert_eq!(out.selection.orifice.designation, "K");
        assert_eq!(out.corrections.kw, None);
    }

    #[test]
    fn two_phase_exceeds_separate_phase_sum() {
        let out = size(&two_phase_case(1.0)).unwrap();
        let vapor = GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5));
        let water = LiquidProperties::new(kgpm3(998.0), pas(1.0e-3));
        let g = gas::required_area(kgps(1.0), bar(11.0), bar(1.0), k(350.0), &vapor, 0.975, 1.0, 1.0);
        let l = liquid::required_area(
            kgps(3.0),
            bar(11.0),
            bar(1.0),
            &water,
            0.65,
            1.0,
            1.0,
            &SizingConfig::default(),
        );
        assert!(out.required_area > g.area + l.area);
    }

    #[test]
    fn two_phase_subcritical_backpressure() {
        let out = size(&two_phase_case(8.0)).unwrap();
        assert!(!out.critical);
        assert!(out.required_area > size(&two_phase_case(1.0)).unwrap().required_area);
    }

    #[test]
    fn zero_valves_is_an_error() {
        assert!(size(&gas_case(5000.0, 1.0).with_number_of_valves(0)).is_err());
    }

    #[test]
    fn sizing_is_idempotent() {
        let inputs = gas_case(5000.0, 6.0);
        assert_eq!(size(&inputs).unwrap(), size(&inputs).unwrap());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rv_core::units::{bar, k, kgph, pas};
    use rv_fluids::{Conditions, GasProperties};

    proptest! {
        #[test]
        fn area_grows_with_flow(flow in 100.0_f64..100_000.0, extra in 1.0_f64..1_000.0) {
            let case = |w: f64| {
                let fluid = FluidState::Gas {
                    conditions: Conditions::new(k(350.0), bar(11.0), kgph(w)),
                    gas: GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5)),
                };
                size(&SizingInputs::new(fluid, bar(1.0))).unwrap()
            };
            let a = case(flow);
            let b = case(flow + extra);
            prop_assert!(b.required_area > a.required_area);
            prop_assert!(a.required_area.value >= 0.0);
        }
    }
}
