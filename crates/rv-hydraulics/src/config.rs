//! Solver configuration.

/// Numeric policy for the network solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum Colebrook iterations per segment
    pub friction_max_iterations: usize,
    /// Relative convergence tolerance on the friction factor
    pub friction_tolerance: f64,
    /// Erosional constant C in Ve = C/√ρ (SI; C = 100 in ft/s·(lb/ft³)^0.5)
    pub erosional_c: f64,
    /// Mach number above which a segment is reported as elevated
    pub mach_elevated: f64,
    /// Mach number above which a segment is reported as high
    pub mach_high: f64,
    /// Iteration cap for every bisection inside the compressible models
    pub bisection_max_iterations: usize,
    /// Relative tolerance for those bisections
    pub bisection_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            friction_max_iterations: 20,
            friction_tolerance: 1e-6,
            erosional_c: 122.0,
            mach_elevated: 0.5,
            mach_high: 0.7,
            bisection_max_iterations: 200,
            bisection_tolerance: 1e-12,
        }
    }
}
