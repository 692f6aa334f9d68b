/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Outcome of a bounded bisection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bisection {
    pub root: Real,
    pub iterations: usize,
    pub converged: bool,
}

/// Bisection on a bracket `[lo, hi]` where `f(lo)` and `f(hi)` differ in sign.
///
/// Never loops past `max_iter`; the midpoint of the last bracket is returned
/// with `converged = false` in that case. Returns `None` if the bracket does
/// not straddle a root.
pub fn bisect<F>(f: F, lo: Real, hi: Real, rel_tol: Real, max_iter: usize) -> Option<Bisection>
where
    F: Fn(Real) -> Real,
{
    let (mut lo, mut hi) = (lo, hi);
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Some(Bisection { root: lo, iterations: 0, converged: true });
    }
    if f_hi == 0.0 {
        return Some(Bisection { root: hi, iterations: 0, converged: true });
    }
    if f_lo.signum() == f_hi.signum() || !f_lo.is_finite() || !f_hi.is_finite() {
        return None;
    }

    for iter in 1..=max_iter {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 || (hi - lo).abs() <= rel_tol * mid.abs().max(Real::MIN_POSITIVE) {
            return Some(Bisection { root: mid, iterations: iter, converged: true });
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Some(Bisection {
        root: 0.5 * (lo + hi),
        iterations: max_iter,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn bisect_finds_sqrt_two() {
        let result = bisect(|x| x * x - 2.0, 0.0, 2.0, 1e-12, 200).unwrap();
        assert!(result.converged);
        assert!((result.root - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn bisect_rejects_bad_bracket() {
        assert!(bisect(|x| x * x + 1.0, -1.0, 1.0, 1e-12, 200).is_none());
    }

    #[test]
    fn bisect_reports_iteration_cap() {
        let result = bisect(|x| x - 0.3, 0.0, 1.0, 1e-15, 3).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bisect_brackets_a_monotone_root(root in -1.0e3_f64..1.0e3, slope in 0.01_f64..100.0) {
            let f = |x: Real| slope * (x - root);
            let result = bisect(f, root - 10.0, root + 7.0, 1e-12, 200).unwrap();
            prop_assert!((result.root - root).abs() <= 1e-8 * (1.0 + root.abs()));
        }

        #[test]
        fn nearly_equal_is_symmetric(a in -1.0e6_f64..1.0e6, b in -1.0e6_f64..1.0e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
