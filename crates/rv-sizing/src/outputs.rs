//! Sizing results.

use rv_core::units::{Area, MassRate, area_mm2};
use rv_fluids::Phase;

use crate::error::SizingResult;
use crate::orifice::{OrificeTable, Selection, select, select_manual};

/// Correction factors other than Kd and the backpressure factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corrections {
    /// Rupture-disc combination factor
    pub kc: f64,
    /// Balanced-bellows liquid backpressure factor
    pub kw: Option<f64>,
    /// Liquid viscosity correction
    pub kv: Option<f64>,
    /// Napier high-pressure steam correction
    pub kn: Option<f64>,
    /// Superheated steam correction
    pub ksh: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizingOutputs {
    pub phase: Phase,
    /// Total required area over all valves
    pub required_area: Area,
    /// Kd used (the gas value for two-phase)
    pub discharge_coefficient: f64,
    /// Kb for gas-bearing phases, Kw for liquid
    pub backpressure_correction: f64,
    pub corrections: Corrections,
    pub critical: bool,
    /// Relief rate the area was sized for
    pub mass_flow: MassRate,
    pub selection: Selection,
    /// Messages raised by the equations themselves
    pub notes: Vec<String>,
    pub(crate) high_utilization_percent: f64,
}

impl SizingOutputs {
    pub fn number_of_valves(&self) -> u32 {
        self.selection.number_of_valves
    }

    /// Per-valve required area over the selected orifice area, in percent.
    pub fn percent_utilized(&self) -> f64 {
        self.selection.percent_utilized()
    }

    /// Flow the installed valves pass at the sizing conditions.
    pub fn rated_capacity(&self) -> MassRate {
        if self.required_area.value > 0.0 {
            self.mass_flow * (self.selection.installed_area() / self.required_area).value
        } else {
            self.mass_flow
        }
    }

    pub fn exceeds_largest(&self) -> bool {
        !self.selection.manual && self.selection.is_undersized()
    }

    /// Split the requirement over `n` valves and re-select. A manual
    /// selection keeps its designation.
    pub fn set_number_of_valves(&mut self, n: u32, table: &OrificeTable) -> SizingResult<()> {
        self.selection = if self.selection.manual {
            select_manual(&self.selection.orifice.designation, self.required_area, n, table)?
        } else {
            select(self.required_area, n, table)?
        };
        Ok(())
    }

    /// Replace the scanned selection with a caller-chosen orifice.
    pub fn override_orifice(&mut self, designation: &str, table: &OrificeTable) -> SizingResult<()> {
        self.selection = select_manual(
            designation,
            self.required_area,
            self.selection.number_of_valves,
            table,
        )?;
        Ok(())
    }

    /// Equation notes followed by selection diagnostics, in that order.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut out = self.notes.clone();
        let sel = &self.selection;
        if self.exceeds_largest() {
            out.push(format!(
                "required area exceeds largest standard orifice: {:.1} mm² per valve > {} ({:.0} mm²)",
                area_mm2(sel.required_per_valve),
                sel.orifice.designation,
                area_mm2(sel.orifice.area)
            ));
        } else if sel.is_undersized() {
            out.push(format!(
                "selected orifice {} is smaller than the required {:.1} mm² per valve",
                sel.orifice.designation,
                area_mm2(sel.required_per_valve)
            ));
        } else if sel.percent_utilized() > self.high_utilization_percent {
            out.push(format!(
                "high orifice utilization: {:.1}% of {}",
                sel.percent_utilized(),
                sel.orifice.designation
            ));
        }
        out
    }
}
