//! Two-phase sizing by the homogeneous-equilibrium omega method
//! (API 520 Part I, Annex C).
//!
//! The mixture is treated as a single pseudo-fluid with specific volume
//! v0 = x·vg + (1−x)·vl at the valve inlet. The omega parameter for a frozen
//! (non-flashing) mixture is ω = x·vg/(v0·k).

use rv_core::bisect;
use rv_core::units::{Area, MassRate, Pressure, Temperature, m2};
use rv_fluids::{GasProperties, LiquidProperties};

/// Area and flow parameters from one two-phase sizing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoPhaseSizing {
    pub area: Area,
    pub omega: f64,
    /// Critical pressure ratio ηc; zero for an all-liquid mixture
    pub critical_ratio: f64,
    /// Nozzle mass flux [kg/(m²·s)]
    pub mass_flux: f64,
    pub kb: f64,
    pub critical: bool,
}

/// Inlet mixture specific volume [m³/kg].
pub fn mixture_specific_volume(
    p1: Pressure,
    t: Temperature,
    vapor_fraction: f64,
    gas: &GasProperties,
    liquid: &LiquidProperties,
) -> f64 {
    let vg = 1.0 / gas.density(p1, t).value;
    let vl = 1.0 / liquid.density.value;
    vapor_fraction * vg + (1.0 - vapor_fraction) * vl
}

/// Omega parameter for a frozen mixture.
pub fn omega(
    p1: Pressure,
    t: Temperature,
    vapor_fraction: f64,
    gas: &GasProperties,
    liquid: &LiquidProperties,
) -> f64 {
    let vg = 1.0 / gas.density(p1, t).value;
    let v0 = mixture_specific_volume(p1, t, vapor_fraction, gas, liquid);
    vapor_fraction * vg / (v0 * gas.k)
}

/// Critical pressure ratio ηc, the root in (0, 1) of
/// η² + (ω² − 2ω)(1 − η)² + 2ω² ln η + 2ω²(1 − η) = 0.
///
/// An all-liquid mixture (ω = 0) never chokes and gives 0.
pub fn critical_ratio(omega: f64) -> f64 {
    if !(omega > 0.0) {
        return 0.0;
    }
    let w2 = omega * omega;
    let f = |eta: f64| {
        eta * eta + (w2 - 2.0 * omega) * (1.0 - eta).powi(2) + 2.0 * w2 * eta.ln() + 2.0 * w2 * (1.0 - eta)
    };
    bisect(f, 1e-12, 1.0 - 1e-12, 1e-12, 200).map_or(0.0, |b| b.root)
}

/// Critical mass flux G = ηc·√(P1/(v0·ω)).
pub fn critical_mass_flux(p1: Pressure, v0: f64, omega: f64, eta_c: f64) -> f64 {
    eta_c * (p1.value / (v0 * omega)).sqrt()
}

/// Subcritical mass flux at backpressure ratio `eta_a = Pb/P1`.
pub fn subcritical_mass_flux(p1: Pressure, v0: f64, omega: f64, eta_a: f64) -> f64 {
    let eta_a = eta_a.min(1.0);
    let log_term = if omega > 0.0 { omega * eta_a.ln() } else { 0.0 };
    let head = (-2.0 * (log_term + (omega - 1.0) * (1.0 - eta_a))).max(0.0);
    head.sqrt() * (p1.value / v0).sqrt() / (omega * (1.0 / eta_a - 1.0) + 1.0)
}

/// Required area for a homogeneous two-phase mixture.
///
/// `valve_kb` is the balanced-bellows factor (1.0 for a conventional valve).
/// Subcritical backpressure is carried by the mass flux itself.
#[allow(clippy::too_many_arguments)]
pub fn required_area(
    mass_flow: MassRate,
    p1: Pressure,
    backpressure: Pressure,
    t: Temperature,
    vapor_fraction: f64,
    gas: &GasProperties,
    liquid: &LiquidProperties,
    kd: f64,
    kc: f64,
    valve_kb: f64,
) -> TwoPhaseSizing {
    let v0 = mixture_specific_volume(p1, t, vapor_fraction, gas, liquid);
    let omega = omega(p1, t, vapor_fraction, gas, liquid);
    let eta_c = critical_ratio(omega);
    let eta_a = backpressure.value / p1.value;
    let critical = omega > 0.0 && eta_a <= eta_c;
    let mass_flux = if critical {
        critical_mass_flux(p1, v0, omega, eta_c)
    } else {
        subcritical_mass_flux(p1, v0, omega, eta_a)
    };
    TwoPhaseSizing {
        area: m2(mass_flow.value / (kd * valve_kb * kc * mass_flux)),
        omega,
        critical_ratio: eta_c,
        mass_flux,
        kb: valve_kb,
        critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::units::{area_mm2, bar, k, kgpm3, kgps, pas};

    fn vapor() -> GasProperties {
        GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5))
    }

    fn water() -> LiquidProperties {
        LiquidProperties::new(kgpm3(998.0), pas(1.0e-3))
    }

    #[test]
    fn omega_for_quarter_quality_water_vapor() {
        let w = omega(bar(11.0), k(350.0), 0.25, &vapor(), &water());
        assert!((w - 0.7538).abs() < 1e-3, "omega = {w}");
    }

    #[test]
    fn critical_ratio_matches_annex_correlation() {
        // ηc ≈ [1 + (1.0446 − 0.0093431·ω^0.5)·ω^−0.56261]^(−0.70356 + 0.014685·ln ω)
        for w in [0.1_f64, 0.5, 1.0, 4.0, 20.0] {
            let approx = (1.0 + (1.0446 - 0.0093431 * w.sqrt()) * w.powf(-0.56261))
                .powf(-0.70356 + 0.014685 * w.ln());
            let eta = critical_ratio(w);
            assert!((eta - approx).abs() < 2e-3, "omega {w}: {eta} vs {approx}");
        }
    }

    #[test]
    fn all_liquid_never_chokes() {
        assert_eq!(critical_ratio(0.0), 0.0);
        let s = required_area(kgps(3.0), bar(11.0), bar(1.0), k(350.0), 0.0, &vapor(), &water(), 0.65, 1.0, 1.0);
        assert!(!s.critical);
        // Reduces to the Bernoulli flux √(2ρΔP).
        let bernoulli = (2.0 * 998.0 * 10.0e5_f64).sqrt();
        assert!((s.mass_flux - bernoulli).abs() / bernoulli < 1e-9);
    }

    #[test]
    fn choked_flux_for_quarter_quality() {
        let s = required_area(kgps(4.0), bar(11.0), bar(1.0), k(350.0), 0.25, &vapor(), &water(), 0.975, 1.0, 1.0);
        assert!(s.critical);
        assert!((s.critical_ratio - 0.5696).abs() < 1e-3);
        assert!((s.mass_flux - 3553.6).abs() < 1.0, "G = {}", s.mass_flux);
        assert!((area_mm2(s.area) - 1154.5).abs() < 0.5, "A = {}", area_mm2(s.area));
    }

    #[test]
    fn subcritical_flux_meets_critical_at_the_ratio() {
        let (p1, v0) = (bar(11.0), 0.0375);
        let w = 0.75;
        let eta_c = critical_ratio(w);
        let g_c = critical_mass_flux(p1, v0, w, eta_c);
        let g_s = subcritical_mass_flux(p1, v0, w, eta_c);
        assert!((g_c - g_s).abs() / g_c < 1e-6);
        assert!(subcritical_mass_flux(p1, v0, w, 0.9) < g_c);
        assert_eq!(subcritical_mass_flux(p1, v0, w, 1.0), 0.0);
    }

    #[test]
    fn high_backpressure_needs_more_area() {
        let crit = required_area(kgps(4.0), bar(11.0), bar(1.0), k(350.0), 0.25, &vapor(), &water(), 0.975, 1.0, 1.0);
        let sub = required_area(kgps(4.0), bar(11.0), bar(8.0), k(350.0), 0.25, &vapor(), &water(), 0.975, 1.0, 1.0);
        assert!(!sub.critical);
        assert!(sub.area > crit.area);
    }
}
