//! Backpressure correction factors.

use rv_fluids::GasProperties;

/// Subcritical gas correction at absolute pressure ratio `r = Pb/P1`.
///
/// Ratio of the subcritical nozzle mass flux to the critical one; equals 1 at
/// the critical ratio and falls to 0 at `r = 1`.
pub fn subcritical_kb(r: f64, gas: &GasProperties) -> f64 {
    let k = gas.k;
    if r <= gas.critical_pressure_ratio() {
        return 1.0;
    }
    let r = r.min(1.0);
    let numerator = (2.0 * k / (k - 1.0)) * (r.powf(2.0 / k) - r.powf((k + 1.0) / k));
    let denominator = k * (2.0 / (k + 1.0)).powf((k + 1.0) / (k - 1.0));
    (numerator / denominator).max(0.0).sqrt()
}

/// Linearised balanced-bellows curve: 1 up to `knee`, then straight to 0.70
/// at 50 % gauge backpressure, held at 0.70 beyond.
fn bellows_curve(fraction: f64, knee: f64) -> f64 {
    if fraction <= knee {
        1.0
    } else {
        let t = ((fraction - knee) / (0.50 - knee)).min(1.0);
        1.0 - 0.30 * t
    }
}

/// Balanced-bellows gas/vapor Kb at gauge backpressure / set pressure.
pub fn bellows_gas_kb(fraction: f64) -> f64 {
    bellows_curve(fraction, 0.30)
}

/// Balanced-bellows liquid Kw at gauge backpressure / set pressure.
pub fn bellows_liquid_kw(fraction: f64) -> f64 {
    bellows_curve(fraction, 0.16)
}
