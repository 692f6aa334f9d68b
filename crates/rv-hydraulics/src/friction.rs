//! Darcy friction factor.

/// Upper Reynolds number of the laminar regime.
pub const LAMINAR_LIMIT: f64 = 2300.0;

/// Relative roughness floor used for `f_T`, so hydraulically smooth pipe
/// still gives fittings a finite resistance.
const MIN_RELATIVE_ROUGHNESS: f64 = 1e-6;

/// Friction factor and how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionFactor {
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Explicit Swamee-Jain approximation of Colebrook-White.
pub fn swamee_jain(reynolds: f64, relative_roughness: f64) -> f64 {
    let a = relative_roughness / 3.7;
    let b = 5.74 / reynolds.powf(0.9);
    0.25 / (a + b).log10().powi(2)
}

/// Darcy friction factor: laminar 64/Re, otherwise Colebrook-White.
///
/// The Colebrook iteration is seeded with Swamee-Jain and stops after
/// `max_iterations`; the last iterate is returned with `converged = false`
/// when the relative change is still above `tolerance`.
pub fn darcy_friction_factor(
    reynolds: f64,
    relative_roughness: f64,
    max_iterations: usize,
    tolerance: f64,
) -> FrictionFactor {
    if reynolds <= 0.0 {
        return FrictionFactor {
            value: 0.0,
            iterations: 0,
            converged: true,
        };
    }
    if reynolds < LAMINAR_LIMIT {
        return FrictionFactor {
            value: 64.0 / reynolds,
            iterations: 0,
            converged: true,
        };
    }

    let rr = relative_roughness.max(0.0);
    let mut f = swamee_jain(reynolds, rr);
    for iter in 1..=max_iterations {
        let inv_sqrt = -2.0 * (rr / 3.7 + 2.51 / (reynolds * f.sqrt())).log10();
        let f_next = 1.0 / (inv_sqrt * inv_sqrt);
        let change = ((f_next - f) / f).abs();
        f = f_next;
        if change < tolerance {
            return FrictionFactor {
                value: f,
                iterations: iter,
                converged: true,
            };
        }
    }

    FrictionFactor {
        value: f,
        iterations: max_iterations,
        converged: false,
    }
}

/// Fully turbulent friction factor f_T = 0.25 / log10(ε/(3.7D))².
pub fn fully_turbulent_friction_factor(relative_roughness: f64) -> f64 {
    let rr = relative_roughness.max(MIN_RELATIVE_ROUGHNESS);
    0.25 / (rr / 3.7).log10().powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laminar_is_64_over_re() {
        let f = darcy_friction_factor(1000.0, 1e-4, 20, 1e-6);
        assert!((f.value - 0.064).abs() < 1e-12);
        assert!(f.converged);
    }

    #[test]
    fn zero_flow_has_zero_friction() {
        let f = darcy_friction_factor(0.0, 1e-4, 20, 1e-6);
        assert_eq!(f.value, 0.0);
    }

    #[test]
    fn colebrook_satisfies_its_own_equation() {
        let (re, rr) = (1.0e5, 1.0e-4);
        let f = darcy_friction_factor(re, rr, 20, 1e-10);
        assert!(f.converged);
        let lhs = 1.0 / f.value.sqrt();
        let rhs = -2.0 * (rr / 3.7 + 2.51 / (re * f.value.sqrt())).log10();
        assert!((lhs - rhs).abs() < 1e-6);
        // Moody chart reading for these conditions
        assert!((f.value - 0.0185).abs() < 5e-4, "f = {}", f.value);
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let f = darcy_friction_factor(1.0e5, 1.0e-4, 1, 1e-300);
        assert!(!f.converged);
        assert_eq!(f.iterations, 1);
        assert!(f.value.is_finite() && f.value > 0.0);
    }

    #[test]
    fn fully_turbulent_for_commercial_steel_two_inch() {
        // ε = 0.045 mm, D = 52.5 mm: Crane lists f_T ≈ 0.019
        let f_t = fully_turbulent_friction_factor(0.045 / 52.5);
        assert!((f_t - 0.019).abs() < 5e-4, "f_T = {f_t}");
    }

    #[test]
    fn smooth_pipe_f_t_is_finite() {
        let f_t = fully_turbulent_friction_factor(0.0);
        assert!(f_t > 0.0 && f_t.is_finite());
    }
}
