//! Series pipe networks.

use rv_core::units::{Area, Length, Pressure, Temperature, m, m2};

use crate::error::{HydraulicsError, HydraulicsResult};
use crate::fittings::{ElbowRadius, Fitting};

/// Which end of the network carries the known boundary pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Boundary at the inlet; pressure is marched downstream.
    #[default]
    Forward,
    /// Boundary at the outlet; pressure is marched upstream.
    Backward,
}

/// Compressible-flow relation used for gas segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressibleModel {
    #[default]
    Isothermal,
    /// Fanno flow at constant stagnation temperature
    Adiabatic,
}

/// One pipe run between two points of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSegment {
    /// Inner diameter
    pub diameter: Length,
    pub length: Length,
    /// Outlet elevation minus inlet elevation, in flow direction
    pub elevation_change: Length,
    /// Absolute wall roughness
    pub roughness: Length,
    pub fittings: Vec<Fitting>,
    pub elbow_radius: ElbowRadius,
    /// User-specified loss added on top of the computed loss
    pub additional_loss: Option<Pressure>,
    /// Multiplier on the computed piping + fitting resistance
    pub safety_factor: Option<f64>,
    pub compressible_model: CompressibleModel,
}

impl PipeSegment {
    pub fn new(diameter: Length, length: Length, roughness: Length) -> Self {
        Self {
            diameter,
            length,
            elevation_change: m(0.0),
            roughness,
            fittings: Vec::new(),
            elbow_radius: ElbowRadius::default(),
            additional_loss: None,
            safety_factor: None,
            compressible_model: CompressibleModel::default(),
        }
    }

    pub fn with_elevation_change(mut self, dz: Length) -> Self {
        self.elevation_change = dz;
        self
    }

    pub fn with_fitting(mut self, fitting: Fitting) -> Self {
        self.fittings.push(fitting);
        self
    }

    pub fn with_elbow_radius(mut self, radius: ElbowRadius) -> Self {
        self.elbow_radius = radius;
        self
    }

    pub fn with_additional_loss(mut self, loss: Pressure) -> Self {
        self.additional_loss = Some(loss);
        self
    }

    pub fn with_safety_factor(mut self, factor: f64) -> Self {
        self.safety_factor = Some(factor);
        self
    }

    pub fn with_compressible_model(mut self, model: CompressibleModel) -> Self {
        self.compressible_model = model;
        self
    }

    /// Flow cross-section.
    pub fn flow_area(&self) -> Area {
        m2(std::f64::consts::PI * self.diameter.value.powi(2) / 4.0)
    }

    pub fn relative_roughness(&self) -> f64 {
        self.roughness.value / self.diameter.value
    }

    pub fn safety_factor_or_unity(&self) -> f64 {
        self.safety_factor.unwrap_or(1.0)
    }

    /// Geometry checks the solver relies on.
    pub fn check(&self, index: usize) -> HydraulicsResult<()> {
        let invalid = |what| Err(HydraulicsError::InvalidSegment { index, what });

        if !(self.diameter.value.is_finite() && self.diameter.value > 0.0) {
            return invalid("diameter must be positive");
        }
        if !(self.length.value.is_finite() && self.length.value >= 0.0) {
            return invalid("length must not be negative");
        }
        if !(self.roughness.value.is_finite() && self.roughness.value >= 0.0) {
            return invalid("roughness must not be negative");
        }
        if !self.elevation_change.value.is_finite() {
            return invalid("elevation change must be finite");
        }
        if let Some(sf) = self.safety_factor
            && !(sf.is_finite() && sf > 0.0)
        {
            return invalid("safety factor must be positive");
        }
        if let Some(loss) = self.additional_loss
            && !(loss.value.is_finite() && loss.value >= 0.0)
        {
            return invalid("additional loss must not be negative");
        }
        Ok(())
    }
}

/// Known pressure (and optionally temperature) at one end of a network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryAnchor {
    /// Absolute pressure
    pub pressure: Pressure,
    /// Falls back to the fluid temperature when absent. For adiabatic gas
    /// segments this is the stagnation temperature.
    pub temperature: Option<Temperature>,
}

impl BoundaryAnchor {
    pub fn pressure(pressure: Pressure) -> Self {
        Self {
            pressure,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Ordered series of pipe segments. No branching or merging.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineNetwork {
    pub segments: Vec<PipeSegment>,
    pub direction: Direction,
    pub boundary: BoundaryAnchor,
}

impl PipelineNetwork {
    pub fn new(direction: Direction, boundary: BoundaryAnchor) -> Self {
        Self {
            segments: Vec::new(),
            direction,
            boundary,
        }
    }

    pub fn with_segment(mut self, segment: PipeSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
