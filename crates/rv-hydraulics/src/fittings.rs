//! Fitting resistance coefficients.
//!
//! Default values follow the Crane TP-410 two-form convention: most fittings
//! are an equivalent length `L/D` multiplied by the fully turbulent friction
//! factor `f_T` of the pipe they sit in; entrances and exits are fixed K.

use std::collections::HashMap;

/// Kind of pipe fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FittingKind {
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
    /// Sharp-edged entrance from a vessel
    Entrance,
    /// Exit into a vessel or header
    Exit,
}

impl FittingKind {
    /// Whether the elbow radius class changes this fitting's coefficient.
    pub fn is_radius_dependent(self) -> bool {
        matches!(self, FittingKind::Elbow90 | FittingKind::Elbow45)
    }
}

/// Elbow radius class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElbowRadius {
    /// r/d = 1.5, butt-welded
    #[default]
    LongRadius,
    /// r/d = 1, butt-welded
    ShortRadius,
    /// Standard threaded or cast elbow
    ShortRadiusCast,
}

/// A fitting and how many of it sit in the segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitting {
    pub kind: FittingKind,
    pub count: u32,
}

impl Fitting {
    pub fn new(kind: FittingKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// Resistance coefficient formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LossCoefficient {
    /// K independent of pipe size
    Constant(f64),
    /// K = (L/D) · f_T
    EquivalentLength(f64),
}

impl LossCoefficient {
    /// K for a pipe with fully turbulent friction factor `f_t`.
    pub fn resolve(self, f_t: f64) -> f64 {
        match self {
            LossCoefficient::Constant(k) => k,
            LossCoefficient::EquivalentLength(l_over_d) => l_over_d * f_t,
        }
    }
}

/// Maps fitting kind and elbow radius class to a resistance coefficient.
///
/// Starts from the Crane defaults; individual entries can be replaced.
#[derive(Debug, Clone, Default)]
pub struct FittingLossTable {
    overrides: HashMap<(FittingKind, Option<ElbowRadius>), LossCoefficient>,
}

impl FittingLossTable {
    pub fn crane() -> Self {
        Self::default()
    }

    /// Replace the coefficient for one fitting kind. `radius` is ignored for
    /// kinds that do not depend on it.
    pub fn with_coefficient(
        mut self,
        kind: FittingKind,
        radius: Option<ElbowRadius>,
        coefficient: LossCoefficient,
    ) -> Self {
        let radius = radius.filter(|_| kind.is_radius_dependent());
        self.overrides.insert((kind, radius), coefficient);
        self
    }

    pub fn coefficient(&self, kind: FittingKind, radius: ElbowRadius) -> LossCoefficient {
        let key_radius = kind.is_radius_dependent().then_some(radius);
        self.overrides
            .get(&(kind, key_radius))
            .or_else(|| self.overrides.get(&(kind, None)))
            .copied()
            .unwrap_or_else(|| crane_default(kind, radius))
    }

    /// Sum of count × K over a fitting list.
    pub fn total_resistance(&self, fittings: &[Fitting], radius: ElbowRadius, f_t: f64) -> f64 {
        fittings
            .iter()
            .map(|fitting| f64::from(fitting.count) * self.coefficient(fitting.kind, radius).resolve(f_t))
            .sum()
    }
}

fn crane_default(kind: FittingKind, radius: ElbowRadius) -> LossCoefficient {
    use ElbowRadius::*;
    use FittingKind::*;
    use LossCoefficient::*;

    match (kind, radius) {
        (Elbow90, LongRadius) => EquivalentLength(14.0),
        (Elbow90, ShortRadius) => EquivalentLength(20.0),
        (Elbow90, ShortRadiusCast) => EquivalentLength(30.0),
        (Elbow45, LongRadius) => EquivalentLength(8.0),
        (Elbow45, ShortRadius) => EquivalentLength(10.0),
        (Elbow45, ShortRadiusCast) => EquivalentLength(16.0),
        (TeeRun, _) => EquivalentLength(20.0),
        (TeeBranch, _) => EquivalentLength(60.0),
        (GateValve, _) => EquivalentLength(8.0),
        (GlobeValve, _) => EquivalentLength(340.0),
        (BallValve, _) => EquivalentLength(3.0),
        (PlugValve, _) => EquivalentLength(18.0),
        (ButterflyValve, _) => EquivalentLength(45.0),
        (SwingCheckValve, _) => EquivalentLength(100.0),
        (Entrance, _) => Constant(0.5),
        (Exit, _) => Constant(1.0),
    }
}
