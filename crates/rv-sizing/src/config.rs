//! Sizing configuration.

/// Standard factors and thresholds used by the sizing equations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingConfig {
    /// Default Kd for gas, vapor and steam
    pub gas_discharge_coefficient: f64,
    /// Default Kd for liquid
    pub liquid_discharge_coefficient: f64,
    /// Kc when a rupture disc is installed upstream
    pub rupture_disc_factor: f64,
    /// Percent utilised above which a diagnostic is raised
    pub high_utilization_percent: f64,
    /// Liquid Reynolds number below which the viscosity correction applies
    pub viscosity_reynolds_limit: f64,
    /// Built-up backpressure (fraction of set pressure) a conventional valve tolerates
    pub built_up_limit_fraction: f64,
    /// Iteration cap for the viscosity correction fixed point
    pub viscosity_max_iterations: usize,
    /// Relative tolerance for that fixed point
    pub viscosity_tolerance: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            gas_discharge_coefficient: 0.975,
            liquid_discharge_coefficient: 0.65,
            rupture_disc_factor: 0.9,
            high_utilization_percent: 90.0,
            viscosity_reynolds_limit: 100_000.0,
            built_up_limit_fraction: 0.10,
            viscosity_max_iterations: 50,
            viscosity_tolerance: 1e-9,
        }
    }
}
