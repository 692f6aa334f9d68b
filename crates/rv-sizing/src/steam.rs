//! Steam sizing: gas equations for water vapor plus the Napier and
//! superheat corrections.

use rv_core::units::{MassRate, Pressure, Temperature, m2};
use rv_fluids::SteamProperties;

use crate::gas::{self, GasSizing};

/// Relieving pressure range [kPa(a)] in which the Napier factor applies.
const NAPIER_RANGE_KPA: (f64, f64) = (10_339.0, 22_057.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteamSizing {
    pub gas: GasSizing,
    /// High-pressure Napier correction, when in range
    pub kn: Option<f64>,
    /// Superheat correction, when the steam is superheated
    pub ksh: Option<f64>,
}

/// Napier correction Kn at absolute relieving pressure, or `None` outside
/// the high-pressure range.
pub fn napier_factor(p1: Pressure) -> Option<f64> {
    let p_kpa = p1.value / 1000.0;
    let (lo, hi) = NAPIER_RANGE_KPA;
    (p_kpa > lo && p_kpa <= hi).then(|| (0.02764 * p_kpa - 1000.0) / (0.03324 * p_kpa - 1061.0))
}

/// Superheat correction √(Tsat/T), or `None` for saturated steam.
pub fn superheat_factor(t: Temperature, t_sat: Option<Temperature>) -> Option<f64> {
    let t_sat = t_sat?;
    (t > t_sat).then(|| (t_sat.value / t.value).sqrt())
}

#[allow(clippy::too_many_arguments)]
pub fn required_area(
    mass_flow: MassRate,
    p1: Pressure,
    backpressure: Pressure,
    t: Temperature,
    steam: &SteamProperties,
    kd: f64,
    kc: f64,
    valve_kb: f64,
) -> SteamSizing {
    let base = gas::required_area(mass_flow, p1, backpressure, t, &steam.as_gas(), kd, kc, valve_kb);
    let kn = napier_factor(p1);
    let ksh = superheat_factor(t, steam.saturation_temperature);
    let divisor = kn.unwrap_or(1.0) * ksh.unwrap_or(1.0);
    SteamSizing {
        gas: GasSizing {
            area: m2(base.area.value / divisor),
            ..base
        },
        kn,
        ksh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::units::{bar, k, kgph, kpa, pas};

    #[test]
    fn napier_range() {
        assert!(napier_factor(kpa(5_000.0)).is_none());
        let kn = napier_factor(kpa(15_000.0)).unwrap();
        assert!(kn > 1.0 && kn < 1.1, "{kn}");
        assert!(napier_factor(kpa(23_000.0)).is_none());
    }

    #[test]
    fn superheat_only_above_saturation() {
        assert!(superheat_factor(k(450.0), None).is_none());
        assert!(superheat_factor(k(450.0), Some(k(460.0))).is_none());
        let ksh = superheat_factor(k(500.0), Some(k(450.0))).unwrap();
        assert!((ksh - (0.9_f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn superheated_steam_needs_more_area() {
        let sat = SteamProperties::new(1.0, 1.3, pas(1.5e-5));
        let sup = sat.with_saturation_temperature(k(455.0));
        let a = required_area(kgph(10_000.0), bar(11.0), bar(1.0), k(500.0), &sat, 0.975, 1.0, 1.0);
        let b = required_area(kgph(10_000.0), bar(11.0), bar(1.0), k(500.0), &sup, 0.975, 1.0, 1.0);
        assert!(a.ksh.is_none());
        assert!(b.gas.area > a.gas.area);
    }
}
