//! Series network pressure-drop solver.

use rv_core::constants::G0_MPS2;
use rv_core::units::{MassRate, k, mps, pa};
use rv_fluids::{FluidError, FluidState};
use tracing::{debug, warn};

use crate::compressible::GasSegment;
use crate::config::SolverConfig;
use crate::error::{HydraulicsError, HydraulicsResult};
use crate::fittings::FittingLossTable;
use crate::friction::{FrictionFactor, darcy_friction_factor, fully_turbulent_friction_factor};
use crate::network::{Direction, PipeSegment, PipelineNetwork};
use crate::results::{NetworkPressureDropResult, SegmentResult};

/// Solve a network with the default configuration and Crane fitting table.
pub fn solve(
    network: &PipelineNetwork,
    fluid: &FluidState,
    flow_rate: MassRate,
) -> HydraulicsResult<NetworkPressureDropResult> {
    solve_with(
        network,
        fluid,
        flow_rate,
        &SolverConfig::default(),
        &FittingLossTable::crane(),
    )
}

/// Solve a network.
///
/// Segments are reported in network order. A forward network marches from
/// the boundary at its inlet; a backward network marches upstream from the
/// boundary at its outlet.
pub fn solve_with(
    network: &PipelineNetwork,
    fluid: &FluidState,
    flow_rate: MassRate,
    config: &SolverConfig,
    table: &FittingLossTable,
) -> HydraulicsResult<NetworkPressureDropResult> {
    fluid.check()?;
    if !(flow_rate.value.is_finite() && flow_rate.value >= 0.0) {
        return Err(HydraulicsError::InvalidFlowRate {
            what: "mass flow rate must be finite and not negative",
        });
    }
    let boundary = network.boundary;
    if !(boundary.pressure.value.is_finite() && boundary.pressure.value > 0.0) {
        return Err(HydraulicsError::InvalidBoundary {
            what: "boundary pressure must be positive",
        });
    }
    if let Some(t) = boundary.temperature
        && !(t.value.is_finite() && t.value > 0.0)
    {
        return Err(HydraulicsError::InvalidBoundary {
            what: "boundary temperature must be positive",
        });
    }
    for (index, segment) in network.segments.iter().enumerate() {
        segment.check(index)?;
    }

    if network.is_empty() {
        return Ok(NetworkPressureDropResult::empty(boundary.pressure));
    }

    let marcher = Marcher {
        fluid,
        flow: flow_rate.value,
        temperature: boundary.temperature.unwrap_or(fluid.temperature()).value,
        direction: network.direction,
        config,
        table,
    };

    let mut results = Vec::with_capacity(network.segments.len());
    let mut known = boundary.pressure.value;
    match network.direction {
        Direction::Forward => {
            for (index, segment) in network.segments.iter().enumerate() {
                let result = marcher.segment(index, segment, known)?;
                known = result.outlet_pressure.value;
                results.push(result);
            }
        }
        Direction::Backward => {
            for (index, segment) in network.segments.iter().enumerate().rev() {
                let result = marcher.segment(index, segment, known)?;
                known = result.inlet_pressure.value;
                results.push(result);
            }
            results.reverse();
        }
    }

    let warnings: Vec<String> = results
        .iter()
        .filter_map(|r| segment_warning(r, config))
        .collect();
    for message in &warnings {
        warn!("{message}");
    }

    Ok(NetworkPressureDropResult::from_segments(results, warnings))
}

struct Marcher<'a> {
    fluid: &'a FluidState,
    /// Mass flow [kg/s]
    flow: f64,
    /// Anchor temperature [K]
    temperature: f64,
    direction: Direction,
    config: &'a SolverConfig,
    table: &'a FittingLossTable,
}

/// Resistance data that depends only on geometry, flow and viscosity.
struct Resistance {
    area: f64,
    reynolds: f64,
    friction: FrictionFactor,
    fitting: f64,
    /// Safety factor × (f·L/D + ΣK)
    total: f64,
}

impl Marcher<'_> {
    fn resistance(&self, segment: &PipeSegment) -> Resistance {
        let d = segment.diameter.value;
        let area = segment.flow_area().value;
        let mu = self.fluid.viscosity().value;
        // ρVD/μ = 4ṁ/(πDμ), independent of local density
        let reynolds = 4.0 * self.flow / (std::f64::consts::PI * d * mu);
        let rr = segment.relative_roughness();
        let friction = darcy_friction_factor(
            reynolds,
            rr,
            self.config.friction_max_iterations,
            self.config.friction_tolerance,
        );
        let f_t = fully_turbulent_friction_factor(rr);
        let fitting = self
            .table
            .total_resistance(&segment.fittings, segment.elbow_radius, f_t);
        let total = segment.safety_factor_or_unity()
            * (friction.value * segment.length.value / d + fitting);
        Resistance {
            area,
            reynolds,
            friction,
            fitting,
            total,
        }
    }

    fn segment(
        &self,
        index: usize,
        segment: &PipeSegment,
        known: f64,
    ) -> HydraulicsResult<SegmentResult> {
        let resistance = self.resistance(segment);
        let result = if self.fluid.is_compressible() {
            self.compressible(index, segment, &resistance, known)?
        } else {
            self.incompressible(index, segment, &resistance, known)?
        };
        debug!(
            segment = index,
            drop_pa = result.pressure_drop.value,
            static_pa = result.static_head.value,
            velocity = result.velocity.value,
            reynolds = result.reynolds,
            choked = result.choked,
            "segment solved"
        );
        Ok(result)
    }

    fn incompressible(
        &self,
        index: usize,
        segment: &PipeSegment,
        resistance: &Resistance,
        known: f64,
    ) -> HydraulicsResult<SegmentResult> {
        let rho = self.fluid.density_at(pa(known), k(self.temperature)).value;
        if !(rho.is_finite() && rho > 0.0) {
            return Err(FluidError::NonPhysical { what: "density" }.into());
        }
        let velocity = self.flow / (rho * resistance.area);
        let additional = segment.additional_loss.map_or(0.0, |p| p.value);
        let drop = resistance.total * 0.5 * rho * velocity * velocity + additional;
        let static_head = rho * G0_MPS2 * segment.elevation_change.value;

        let (p_in, p_out) = match self.direction {
            Direction::Forward => (known, known - drop - static_head),
            Direction::Backward => (known + drop + static_head, known),
        };
        let lowest = p_in.min(p_out);
        if lowest <= 0.0 {
            return Err(HydraulicsError::PressureExhausted {
                index,
                pressure_pa: lowest,
            });
        }

        let erosional_velocity = self.config.erosional_c / rho.sqrt();
        Ok(SegmentResult {
            index,
            inlet_pressure: pa(p_in),
            outlet_pressure: pa(p_out),
            velocity: mps(velocity),
            reynolds: resistance.reynolds,
            friction_factor: resistance.friction.value,
            friction_converged: resistance.friction.converged,
            fitting_resistance: resistance.fitting,
            pressure_drop: pa(drop),
            static_head: pa(static_head),
            mach: None,
            erosional_velocity: mps(erosional_velocity),
            erosional: velocity > erosional_velocity,
            choked: false,
            inlet_limited: false,
        })
    }

    fn compressible(
        &self,
        index: usize,
        segment: &PipeSegment,
        resistance: &Resistance,
        known: f64,
    ) -> HydraulicsResult<SegmentResult> {
        let gas = self
            .fluid
            .gas_properties()
            .ok_or(FluidError::NonPhysical { what: "gas properties" })?;
        let additional = segment.additional_loss.map_or(0.0, |p| p.value);
        let flow = GasSegment {
            model: segment.compressible_model,
            mass_flux: self.flow / resistance.area,
            resistance: resistance.total,
            gas,
            temperature: self.temperature,
        };

        // The user loss sits at the segment outlet, after the pipe friction.
        let outcome = match self.direction {
            Direction::Forward => flow.forward(known, self.config),
            Direction::Backward => flow.backward(known + additional, self.config),
        };
        let p_in = outcome.inlet_pressure;
        let p_out = outcome.outlet_pressure - additional;
        if p_out <= 0.0 {
            return Err(HydraulicsError::PressureExhausted {
                index,
                pressure_pa: p_out,
            });
        }

        let rho_out = gas
            .density(pa(outcome.outlet_pressure), k(outcome.outlet_temperature))
            .value;
        let velocity = flow.mass_flux / rho_out;
        let erosional_velocity = self.config.erosional_c / rho_out.sqrt();

        Ok(SegmentResult {
            index,
            inlet_pressure: pa(p_in),
            outlet_pressure: pa(p_out),
            velocity: mps(velocity),
            reynolds: resistance.reynolds,
            friction_factor: resistance.friction.value,
            friction_converged: resistance.friction.converged,
            fitting_resistance: resistance.fitting,
            pressure_drop: pa(p_in - p_out),
            static_head: pa(0.0),
            mach: Some(outcome.outlet_mach),
            erosional_velocity: mps(erosional_velocity),
            erosional: velocity > erosional_velocity,
            choked: outcome.choked,
            inlet_limited: outcome.inlet_limited,
        })
    }
}

fn segment_warning(result: &SegmentResult, config: &SolverConfig) -> Option<String> {
    let mut issues = Vec::new();

    if result.inlet_limited {
        issues.push(
            "inlet pressure already at the choked limit; outlet held at the inlet".to_string(),
        );
    }
    if let Some(mach) = result.mach {
        if result.choked {
            issues.push(format!("choked flow (Mach {mach:.2})"));
        } else if mach > config.mach_high {
            issues.push(format!("high Mach number {mach:.2}"));
        } else if mach > config.mach_elevated {
            issues.push(format!("elevated Mach number {mach:.2}"));
        }
    }
    if result.erosional {
        issues.push(format!(
            "velocity {:.1} m/s exceeds erosional limit {:.1} m/s",
            result.velocity.value, result.erosional_velocity.value
        ));
    }
    if !result.friction_converged {
        issues.push("friction factor did not converge; best estimate used".to_string());
    }

    if issues.is_empty() {
        None
    } else {
        Some(format!("Segment {}: {}", result.index + 1, issues.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fittings::{Fitting, FittingKind};
    use crate::network::BoundaryAnchor;
    use rv_core::units::{bar, kgpm3, kgps, m, pas};
    use rv_fluids::{Conditions, GasProperties, LiquidProperties};

    fn water(flow: f64) -> FluidState {
        FluidState::Liquid {
            conditions: Conditions::new(k(293.15), bar(10.0), kgps(flow)),
            liquid: LiquidProperties::new(kgpm3(998.0), pas(1.0e-3)),
        }
    }

    fn air(flow: f64) -> FluidState {
        FluidState::Gas {
            conditions: Conditions::new(k(300.0), bar(10.0), kgps(flow)),
            gas: GasProperties::new(28.96, 1.0, 1.4, pas(1.8e-5)),
        }
    }

    fn forward(segments: Vec<PipeSegment>) -> PipelineNetwork {
        let mut net = PipelineNetwork::new(Direction::Forward, BoundaryAnchor::pressure(bar(10.0)));
        net.segments = segments;
        net
    }

    #[test]
    fn liquid_darcy_weisbach() {
        let seg = PipeSegment::new(m(0.05), m(10.0), m(4.5e-5));
        let result = solve(&forward(vec![seg]), &water(5.0), kgps(5.0)).unwrap();
        let s = &result.segments[0];

        let area = std::f64::consts::PI * 0.05_f64.powi(2) / 4.0;
        let v = 5.0 / (998.0 * area);
        let expected = s.friction_factor * 10.0 / 0.05 * 0.5 * 998.0 * v * v;
        assert!((s.velocity.value - v).abs() < 1e-9);
        assert!((s.pressure_drop.value - expected).abs() < 1e-6);
        assert!((result.total_pressure_drop.value - expected).abs() < 1e-6);
    }

    #[test]
    fn safety_factor_skips_user_loss_and_elevation() {
        let base = PipeSegment::new(m(0.05), m(10.0), m(4.5e-5))
            .with_fitting(Fitting::new(FittingKind::Elbow90, 2))
            .with_elevation_change(m(3.0))
            .with_additional_loss(pa(5_000.0));
        let plain = solve(&forward(vec![base.clone()]), &water(5.0), kgps(5.0)).unwrap();
        let scaled = solve(
            &forward(vec![base.with_safety_factor(1.5)]),
            &water(5.0),
            kgps(5.0),
        )
        .unwrap();

        let piping = plain.segments[0].pressure_drop.value - 5_000.0;
        let scaled_piping = scaled.segments[0].pressure_drop.value - 5_000.0;
        assert!((scaled_piping - 1.5 * piping).abs() < 1e-6);
        assert_eq!(plain.segments[0].static_head, scaled.segments[0].static_head);
        assert!((plain.segments[0].static_head.value - 998.0 * G0_MPS2 * 3.0).abs() < 1e-9);
    }

    #[test]
    fn downhill_segment_keeps_drop_non_negative() {
        let seg = PipeSegment::new(m(0.1), m(5.0), m(4.5e-5)).with_elevation_change(m(-20.0));
        let result = solve(&forward(vec![seg]), &water(2.0), kgps(2.0)).unwrap();
        let s = &result.segments[0];
        assert!(s.pressure_drop.value >= 0.0);
        assert!(s.static_head.value < 0.0);
        assert!(s.outlet_pressure > s.inlet_pressure);
    }

    #[test]
    fn zero_density_is_rejected() {
        let bad = FluidState::Liquid {
            conditions: Conditions::new(k(293.15), bar(10.0), kgps(1.0)),
            liquid: LiquidProperties::new(kgpm3(0.0), pas(1.0e-3)),
        };
        let seg = PipeSegment::new(m(0.05), m(10.0), m(4.5e-5));
        let err = solve(&forward(vec![seg]), &bad, kgps(1.0)).unwrap_err();
        assert!(matches!(err, HydraulicsError::InvalidFluidState(_)));
    }

    #[test]
    fn backward_network_anchors_outlet() {
        let segs = vec![
            PipeSegment::new(m(0.05), m(10.0), m(4.5e-5)),
            PipeSegment::new(m(0.08), m(20.0), m(4.5e-5)),
        ];
        let mut net = forward(segs);
        net.direction = Direction::Backward;
        net.boundary = BoundaryAnchor::pressure(bar(1.0));
        let result = solve(&net, &water(5.0), kgps(5.0)).unwrap();
        assert_eq!(result.outlet_pressure, bar(1.0));
        assert_eq!(result.segments[0].index, 0);
        assert_eq!(result.segments[1].index, 1);
        assert!(
            (result.inlet_pressure.value - 1.0e5 - result.total_pressure_drop.value).abs() < 1e-6
        );
    }

    #[test]
    fn gas_forward_drop_is_positive_and_reports_mach() {
        let seg = PipeSegment::new(m(0.1), m(50.0), m(4.5e-5));
        let result = solve(&forward(vec![seg]), &air(2.0), kgps(2.0)).unwrap();
        let s = &result.segments[0];
        assert!(s.pressure_drop.value > 0.0);
        assert!(s.mach.is_some_and(|m| m > 0.0 && m < 0.5));
        assert!(!s.choked);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn gas_overload_chokes_and_warns() {
        let seg = PipeSegment::new(m(0.05), m(100.0), m(4.5e-5));
        let result = solve(&forward(vec![seg]), &air(2.0), kgps(2.0)).unwrap();
        assert!(result.choked);
        let mach = result.segments[0].mach.unwrap();
        assert!((mach - 1.0 / 1.4_f64.sqrt()).abs() < 1e-6);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("choked"));
    }

    #[test]
    fn starved_gas_inlet_is_warned() {
        // √a ≈ 47 bar at 5 kg/s through 20 mm, well above the 10 bar inlet
        let seg = PipeSegment::new(m(0.02), m(10.0), m(4.5e-5));
        let result = solve(&forward(vec![seg]), &air(5.0), kgps(5.0)).unwrap();
        let s = &result.segments[0];
        assert!(s.choked && s.inlet_limited);
        assert_eq!(s.outlet_pressure, s.inlet_pressure);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("already at the choked limit"));
        assert!(result.warnings[0].contains("choked flow"));
    }

    #[test]
    fn pressure_exhaustion_is_an_error() {
        let seg = PipeSegment::new(m(0.01), m(500.0), m(4.5e-5));
        let err = solve(&forward(vec![seg]), &water(5.0), kgps(5.0)).unwrap_err();
        assert!(matches!(err, HydraulicsError::PressureExhausted { index: 0, .. }));
    }

    #[test]
    fn empty_network_returns_boundary() {
        let result = solve(&forward(vec![]), &water(1.0), kgps(1.0)).unwrap();
        assert_eq!(result.inlet_pressure, bar(10.0));
        assert_eq!(result.total_pressure_drop.value, 0.0);
    }

    #[test]
    fn warning_text_classifies_mach() {
        let cfg = SolverConfig::default();
        let mut r = SegmentResult {
            index: 0,
            inlet_pressure: bar(2.0),
            outlet_pressure: bar(1.5),
            velocity: mps(200.0),
            reynolds: 1.0e6,
            friction_factor: 0.015,
            friction_converged: true,
            fitting_resistance: 0.0,
            pressure_drop: bar(0.5),
            static_head: pa(0.0),
            mach: Some(0.6),
            erosional_velocity: mps(500.0),
            erosional: false,
            choked: false,
            inlet_limited: false,
        };
        assert!(segment_warning(&r, &cfg).unwrap().contains("elevated"));
        r.mach = Some(0.75);
        assert!(segment_warning(&r, &cfg).unwrap().contains("high Mach"));
        r.mach = Some(0.3);
        assert!(segment_warning(&r, &cfg).is_none());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::network::BoundaryAnchor;
    use proptest::prelude::*;
    use rv_core::units::{bar, kgpm3, kgps, m, pas};
    use rv_fluids::{Conditions, GasProperties, LiquidProperties};

    proptest! {
        #[test]
        fn liquid_drop_never_negative(
            d in 0.02_f64..0.5,
            len in 0.0_f64..200.0,
            dz in -30.0_f64..30.0,
            flow in 0.0_f64..20.0,
        ) {
            let fluid = FluidState::Liquid {
                conditions: Conditions::new(k(293.15), bar(50.0), kgps(flow)),
                liquid: LiquidProperties::new(kgpm3(998.0), pas(1.0e-3)),
            };
            let net = PipelineNetwork::new(Direction::Backward, BoundaryAnchor::pressure(bar(1.0)))
                .with_segment(PipeSegment::new(m(d), m(len), m(4.5e-5)).with_elevation_change(m(dz)));
            if let Ok(result) = solve(&net, &fluid, kgps(flow)) {
                prop_assert!(result.total_pressure_drop.value >= 0.0);
                for s in &result.segments {
                    prop_assert!(s.pressure_drop.value >= 0.0);
                }
            }
        }

        #[test]
        fn gas_forward_is_deterministic_and_non_negative(
            d in 0.02_f64..0.3,
            len in 1.0_f64..300.0,
            flow in 0.0_f64..5.0,
        ) {
            let fluid = FluidState::Gas {
                conditions: Conditions::new(k(300.0), bar(10.0), kgps(flow)),
                gas: GasProperties::new(28.96, 1.0, 1.4, pas(1.8e-5)),
            };
            let net = PipelineNetwork::new(Direction::Forward, BoundaryAnchor::pressure(bar(10.0)))
                .with_segment(PipeSegment::new(m(d), m(len), m(4.5e-5)));
            let first = solve(&net, &fluid, kgps(flow)).unwrap();
            let second = solve(&net, &fluid, kgps(flow)).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert!(first.total_pressure_drop.value >= 0.0);
            prop_assert!(first.outlet_pressure.value > 0.0);
        }
    }
}
