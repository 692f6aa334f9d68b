//! Compressible gas flow through a constant-area segment.
//!
//! Two relations are available:
//!
//! - **Isothermal**: `p1² − p2² = a·(K + 2 ln(p1/p2))` with `a = G²·ZRT/M`.
//!   The right side has its maximum at `p2 = √a` (outlet Mach `1/√k`); a
//!   resistance that would need a lower outlet pressure has no physical
//!   solution and the segment is choked with its outlet held at `√a`.
//! - **Adiabatic**: Fanno flow at constant stagnation temperature. The
//!   segment is choked when its resistance reaches `fL*/D` of the inlet Mach
//!   number; the outlet is then held at Mach 1.
//!
//! `K` is the total resistance `f·L/D + ΣK_fittings`, already multiplied by
//! the segment safety factor. All pressures are absolute pascals.

use rv_core::numeric::bisect;
use rv_core::units::k;
use rv_fluids::GasProperties;

use crate::config::SolverConfig;
use crate::network::CompressibleModel;

/// A gas segment reduced to what the flow relations need.
#[derive(Debug, Clone, Copy)]
pub struct GasSegment {
    pub model: CompressibleModel,
    /// Mass flux G = ṁ/A [kg/(m²·s)]
    pub mass_flux: f64,
    /// Total resistance coefficient K
    pub resistance: f64,
    pub gas: GasProperties,
    /// Static temperature (isothermal) or stagnation temperature (adiabatic) [K]
    pub temperature: f64,
}

/// Solved state across a gas segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasOutcome {
    pub inlet_pressure: f64,
    pub outlet_pressure: f64,
    pub inlet_mach: f64,
    pub outlet_mach: f64,
    /// Static temperature at the outlet [K]
    pub outlet_temperature: f64,
    pub choked: bool,
    /// The inlet pressure is already at or below the choke limit for this
    /// mass flux; the outlet is held at the inlet.
    pub inlet_limited: bool,
}

impl GasSegment {
    fn zrm(&self) -> f64 {
        self.gas.zr_over_m()
    }

    fn k(&self) -> f64 {
        self.gas.k
    }

    /// Solve for the outlet given the inlet pressure.
    pub fn forward(&self, inlet_pressure: f64, config: &SolverConfig) -> GasOutcome {
        if self.mass_flux <= 0.0 {
            return self.no_flow(inlet_pressure);
        }
        match self.model {
            CompressibleModel::Isothermal => self.isothermal_forward(inlet_pressure, config),
            CompressibleModel::Adiabatic => self.adiabatic_forward(inlet_pressure, config),
        }
    }

    /// Solve for the inlet given the outlet (downstream boundary) pressure.
    ///
    /// If the boundary lies below the critical outlet pressure for this flow,
    /// the segment is choked: the returned outlet pressure is the critical
    /// value, not the boundary.
    pub fn backward(&self, outlet_pressure: f64, config: &SolverConfig) -> GasOutcome {
        if self.mass_flux <= 0.0 {
            return self.no_flow(outlet_pressure);
        }

        let critical_inlet = self.critical_inlet_pressure(outlet_pressure, config);
        let at_critical = self.forward(critical_inlet, config);
        if outlet_pressure <= at_critical.outlet_pressure {
            return GasOutcome {
                choked: true,
                ..at_critical
            };
        }

        let mut hi = 2.0 * critical_inlet.max(outlet_pressure);
        for _ in 0..config.bisection_max_iterations {
            if self.forward(hi, config).outlet_pressure >= outlet_pressure {
                break;
            }
            hi *= 2.0;
        }

        let residual = |p_in: f64| self.forward(p_in, config).outlet_pressure - outlet_pressure;
        let inlet = bisect(
            residual,
            critical_inlet,
            hi,
            config.bisection_tolerance,
            config.bisection_max_iterations,
        )
        .map(|b| b.root)
        .unwrap_or(hi);

        GasOutcome {
            outlet_pressure,
            choked: false,
            ..self.forward(inlet, config)
        }
    }

    fn no_flow(&self, pressure: f64) -> GasOutcome {
        GasOutcome {
            inlet_pressure: pressure,
            outlet_pressure: pressure,
            inlet_mach: 0.0,
            outlet_mach: 0.0,
            outlet_temperature: self.temperature,
            choked: false,
            inlet_limited: false,
        }
    }

    /// Smallest inlet pressure that passes the flow without choking.
    fn critical_inlet_pressure(&self, seed: f64, config: &SolverConfig) -> f64 {
        let mut hi = seed.max(1.0);
        for _ in 0..config.bisection_max_iterations {
            if !self.forward(hi, config).choked {
                break;
            }
            hi *= 2.0;
        }
        let mut lo = 0.0;
        for _ in 0..config.bisection_max_iterations {
            let mid = 0.5 * (lo + hi);
            if hi - lo <= config.bisection_tolerance * hi {
                break;
            }
            if self.forward(mid, config).choked {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        hi
    }

    // --- isothermal ---

    fn isothermal_mach(&self, p: f64) -> f64 {
        let t = self.temperature;
        let velocity = self.mass_flux * self.zrm() * t / p;
        velocity / self.gas.sonic_velocity(k(t)).value
    }

    fn isothermal_forward(&self, p1: f64, config: &SolverConfig) -> GasOutcome {
        let a = self.mass_flux.powi(2) * self.zrm() * self.temperature;
        let p_limit = a.sqrt();
        let outcome = |p2: f64, choked: bool| GasOutcome {
            inlet_pressure: p1,
            outlet_pressure: p2,
            inlet_mach: self.isothermal_mach(p1),
            outlet_mach: self.isothermal_mach(p2),
            outlet_temperature: self.temperature,
            choked,
            inlet_limited: false,
        };

        if p1 <= p_limit {
            return GasOutcome {
                inlet_limited: true,
                ..outcome(p1.min(p_limit), true)
            };
        }

        let k_total = self.resistance;
        let residual = |p2: f64| p1 * p1 - p2 * p2 - a * (k_total + 2.0 * (p1 / p2).ln());
        if residual(p_limit) <= 0.0 {
            return outcome(p_limit, true);
        }

        let p2 = bisect(
            residual,
            p_limit,
            p1,
            config.bisection_tolerance,
            config.bisection_max_iterations,
        )
        .map(|b| b.root)
        .unwrap_or(p1);
        outcome(p2, false)
    }

    // --- adiabatic (Fanno) ---

    fn fanno_parameter(&self, mach: f64) -> f64 {
        let k = self.k();
        let m2 = mach * mach;
        (1.0 - m2) / (k * m2) + (k + 1.0) / (2.0 * k) * ((k + 1.0) * m2 / (2.0 + (k - 1.0) * m2)).ln()
    }

    fn fanno_static_temperature(&self, mach: f64) -> f64 {
        self.temperature / (1.0 + 0.5 * (self.k() - 1.0) * mach * mach)
    }

    /// Mach number at which a section at pressure `p` carries the mass flux,
    /// or `None` if even Mach 1 cannot.
    fn fanno_mach_at(&self, p: f64, config: &SolverConfig) -> Option<f64> {
        let k = self.k();
        let coeff = p * (k / (self.zrm() * self.temperature)).sqrt();
        let flux = |mach: f64| coeff * mach * (1.0 + 0.5 * (k - 1.0) * mach * mach).sqrt();
        if flux(1.0) < self.mass_flux {
            return None;
        }
        bisect(
            |mach| flux(mach) - self.mass_flux,
            0.0,
            1.0,
            config.bisection_tolerance,
            config.bisection_max_iterations,
        )
        .map(|b| b.root)
    }

    fn adiabatic_forward(&self, p1: f64, config: &SolverConfig) -> GasOutcome {
        let k = self.k();
        let Some(m1) = self.fanno_mach_at(p1, config) else {
            return GasOutcome {
                inlet_pressure: p1,
                outlet_pressure: p1,
                inlet_mach: 1.0,
                outlet_mach: 1.0,
                outlet_temperature: self.fanno_static_temperature(1.0),
                choked: true,
                inlet_limited: true,
            };
        };

        let fl1 = self.fanno_parameter(m1);
        let (m2, choked) = if self.resistance >= fl1 {
            (1.0, true)
        } else {
            let target = fl1 - self.resistance;
            let m2 = bisect(
                |mach| self.fanno_parameter(mach) - target,
                m1,
                1.0,
                config.bisection_tolerance,
                config.bisection_max_iterations,
            )
            .map(|b| b.root)
            .unwrap_or(m1);
            (m2, false)
        };

        let p2 = p1 * (m1 / m2)
            * ((2.0 + (k - 1.0) * m1 * m1) / (2.0 + (k - 1.0) * m2 * m2)).sqrt();

        GasOutcome {
            inlet_pressure: p1,
            outlet_pressure: p2,
            inlet_mach: m1,
            outlet_mach: m2,
            outlet_temperature: self.fanno_static_temperature(m2),
            choked,
            inlet_limited: false,
        }
    }
}
