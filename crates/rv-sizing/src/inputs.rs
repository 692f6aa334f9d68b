//! Sizing inputs.

use rv_core::constants::P_ATM_PA;
use rv_core::units::Pressure;
use rv_fluids::FluidState;

/// How the backpressure arises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackpressureKind {
    /// Present at the outlet before the valve opens
    #[default]
    Superimposed,
    /// Develops from outlet flow resistance once the valve opens
    BuiltUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValveDesign {
    #[default]
    Conventional,
    BalancedBellows,
}

/// Everything the sizing equations need for one relief case.
///
/// The fluid state carries the relieving conditions: its pressure is the
/// absolute relieving pressure P1 and its mass flow is the required relief
/// rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingInputs {
    pub fluid: FluidState,
    /// Absolute backpressure at the valve outlet
    pub backpressure: Pressure,
    pub backpressure_kind: BackpressureKind,
    /// Overrides the standard Kd for the phase
    pub discharge_coefficient: Option<f64>,
    pub valve_design: ValveDesign,
    /// Rupture disc installed upstream of the valve
    pub rupture_disc: bool,
    pub number_of_valves: u32,
    /// Gauge set pressure, when known
    pub set_pressure: Option<Pressure>,
}

impl SizingInputs {
    pub fn new(fluid: FluidState, backpressure: Pressure) -> Self {
        Self {
            fluid,
            backpressure,
            backpressure_kind: BackpressureKind::default(),
            discharge_coefficient: None,
            valve_design: ValveDesign::default(),
            rupture_disc: false,
            number_of_valves: 1,
            set_pressure: None,
        }
    }

    pub fn with_backpressure_kind(mut self, kind: BackpressureKind) -> Self {
        self.backpressure_kind = kind;
        self
    }

    pub fn with_discharge_coefficient(mut self, kd: f64) -> Self {
        self.discharge_coefficient = Some(kd);
        self
    }

    pub fn with_valve_design(mut self, design: ValveDesign) -> Self {
        self.valve_design = design;
        self
    }

    pub fn with_rupture_disc(mut self, installed: bool) -> Self {
        self.rupture_disc = installed;
        self
    }

    pub fn with_number_of_valves(mut self, n: u32) -> Self {
        self.number_of_valves = n;
        self
    }

    pub fn with_set_pressure(mut self, set_gauge: Pressure) -> Self {
        self.set_pressure = Some(set_gauge);
        self
    }

    /// Absolute relieving pressure P1.
    pub fn relieving_pressure(&self) -> Pressure {
        self.fluid.pressure()
    }

    /// Gauge backpressure as a fraction of gauge set pressure.
    ///
    /// Falls back to the gauge relieving pressure when no set pressure is
    /// given.
    pub fn backpressure_fraction(&self) -> f64 {
        let set_gauge = self
            .set_pressure
            .map_or(self.relieving_pressure().value - P_ATM_PA, |p| p.value);
        let pb_gauge = (self.backpressure.value - P_ATM_PA).max(0.0);
        if set_gauge > 0.0 {
            pb_gauge / set_gauge
        } else {
            0.0
        }
    }
}
