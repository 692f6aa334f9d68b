//! Per-segment and network results.

use rv_core::units::{Pressure, Velocity, pa};

/// Computed state of one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult {
    /// Position in network order
    pub index: usize,
    /// Absolute pressure at the segment inlet (flow direction)
    pub inlet_pressure: Pressure,
    /// Absolute pressure at the segment outlet (flow direction)
    pub outlet_pressure: Pressure,
    /// Highest velocity along the segment
    pub velocity: Velocity,
    pub reynolds: f64,
    /// Darcy friction factor
    pub friction_factor: f64,
    pub friction_converged: bool,
    /// Sum of fitting K values (before the safety factor)
    pub fitting_resistance: f64,
    /// Irreversible loss: friction and fittings (times safety factor) plus
    /// any user-specified loss. Never negative.
    pub pressure_drop: Pressure,
    /// Signed hydrostatic term ρ·g·Δz; negative when the segment runs downhill.
    pub static_head: Pressure,
    /// Outlet Mach number, gas and steam only
    pub mach: Option<f64>,
    pub erosional_velocity: Velocity,
    pub erosional: bool,
    pub choked: bool,
    /// Gas inlet already at or below the choke limit for the flow
    pub inlet_limited: bool,
}

impl SegmentResult {
    /// Net pressure change inlet to outlet (drop plus static head).
    pub fn net_pressure_change(&self) -> Pressure {
        self.inlet_pressure - self.outlet_pressure
    }
}

/// Result of solving a whole network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPressureDropResult {
    /// Segment results in network order
    pub segments: Vec<SegmentResult>,
    /// Sum of irreversible segment losses
    pub total_pressure_drop: Pressure,
    /// Sum of signed static heads
    pub total_static_head: Pressure,
    /// Absolute pressure at the network inlet
    pub inlet_pressure: Pressure,
    /// Absolute pressure at the network outlet
    pub outlet_pressure: Pressure,
    /// True if any segment is choked
    pub choked: bool,
    /// One message per anomalous segment, in network order
    pub warnings: Vec<String>,
}

impl NetworkPressureDropResult {
    pub(crate) fn empty(boundary: Pressure) -> Self {
        Self {
            segments: Vec::new(),
            total_pressure_drop: pa(0.0),
            total_static_head: pa(0.0),
            inlet_pressure: boundary,
            outlet_pressure: boundary,
            choked: false,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn from_segments(segments: Vec<SegmentResult>, warnings: Vec<String>) -> Self {
        let total_pressure_drop = pa(segments.iter().map(|s| s.pressure_drop.value).sum());
        let total_static_head = pa(segments.iter().map(|s| s.static_head.value).sum());
        let choked = segments.iter().any(|s| s.choked);
        let inlet_pressure = segments.first().map(|s| s.inlet_pressure).unwrap_or(pa(0.0));
        let outlet_pressure = segments.last().map(|s| s.outlet_pressure).unwrap_or(pa(0.0));
        Self {
            segments,
            total_pressure_drop,
            total_static_head,
            inlet_pressure,
            outlet_pressure,
            choked,
            warnings,
        }
    }

    /// Inlet minus outlet pressure.
    pub fn net_pressure_change(&self) -> Pressure {
        self.inlet_pressure - self.outlet_pressure
    }

    pub fn max_mach(&self) -> Option<f64> {
        self.segments
            .iter()
            .filter_map(|s| s.mach)
            .fold(None, |acc, m| Some(acc.map_or(m, |a: f64| a.max(m))))
    }
}
