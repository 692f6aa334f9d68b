//! Gas and vapor sizing (API 520 Part I, SI form).

use rv_core::units::{Area, MassRate, Pressure, Temperature, m2};
use rv_fluids::GasProperties;

use crate::backpressure::subcritical_kb;

/// Area and factors from one gas sizing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasSizing {
    pub area: Area,
    /// Combined backpressure correction actually applied
    pub kb: f64,
    pub critical: bool,
}

/// Critical (choked) nozzle mass flux at relieving conditions [kg/(m²·s)].
pub fn critical_mass_flux(p1: Pressure, t: Temperature, gas: &GasProperties) -> f64 {
    let k = gas.k;
    let c = (2.0 / (k + 1.0)).powf((k + 1.0) / (2.0 * (k - 1.0)));
    p1.value * (k / (gas.zr_over_m() * t.value)).sqrt() * c
}

/// Required area for a gas or vapor.
///
/// `valve_kb` is the balanced-bellows factor (1.0 for a conventional valve).
/// Subcritical flow takes the lower of that and the nozzle correction.
#[allow(clippy::too_many_arguments)]
pub fn required_area(
    mass_flow: MassRate,
    p1: Pressure,
    backpressure: Pressure,
    t: Temperature,
    gas: &GasProperties,
    kd: f64,
    kc: f64,
    valve_kb: f64,
) -> GasSizing {
    let r = backpressure.value / p1.value;
    let critical = r <= gas.critical_pressure_ratio();
    let kb = if critical {
        valve_kb
    } else {
        subcritical_kb(r, gas).min(valve_kb)
    };
    let flux = critical_mass_flux(p1, t, gas);
    GasSizing {
        area: m2(mass_flow.value / (kd * kb * kc * flux)),
        kb,
        critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::units::{area_mm2, bar, k, kgph, pas};

    fn vapor() -> GasProperties {
        GasProperties::new(18.0, 1.0, 1.3, pas(1.2e-5))
    }

    #[test]
    fn critical_flow_area() {
        let s = required_area(
            kgph(5000.0),
            bar(11.0),
            bar(1.0),
            k(350.0),
            &vapor(),
            0.975,
            1.0,
            1.0,
        );
        assert!(s.critical);
        assert_eq!(s.kb, 1.0);
        assert!((area_mm2(s.area) - 780.3).abs() < 0.2);
    }

    #[test]
    fn subcritical_needs_more_area() {
        let gas = vapor();
        let crit = required_area(kgph(5000.0), bar(11.0), bar(1.0), k(350.0), &gas, 0.975, 1.0, 1.0);
        let sub = required_area(kgph(5000.0), bar(11.0), bar(8.0), k(350.0), &gas, 0.975, 1.0, 1.0);
        assert!(!sub.critical);
        assert!(sub.kb < 1.0);
        assert!(sub.area > crit.area);
    }

    #[test]
    fn rupture_disc_scales_area() {
        let gas = vapor();
        let plain = required_area(kgph(5000.0), bar(11.0), bar(1.0), k(350.0), &gas, 0.975, 1.0, 1.0);
        let disc = required_area(kgph(5000.0), bar(11.0), bar(1.0), k(350.0), &gas, 0.975, 0.9, 1.0);
        assert!((disc.area.value * 0.9 - plain.area.value).abs() < 1e-15);
    }
}
