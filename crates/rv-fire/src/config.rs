//! Fire-case configuration.

use rv_core::units::{Length, m};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireConfig {
    /// Height above grade up to which wetted area is credited
    pub credited_height: Length,
    /// Q = C·F·A^0.82 coefficient with adequate drainage and firefighting [W/m^1.64]
    pub adequate_drainage_c: f64,
    /// Coefficient without adequate drainage
    pub inadequate_drainage_c: f64,
    /// Simpson panels for head-surface integration (rounded up to even)
    pub integration_panels: usize,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            credited_height: m(7.6),
            adequate_drainage_c: 43_200.0,
            inadequate_drainage_c: 70_900.0,
            integration_panels: 400,
        }
    }
}
