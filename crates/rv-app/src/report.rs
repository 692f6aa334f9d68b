//! Flat, serializable view of a case run.
//!
//! All values are plain SI `f64` except areas, which are in mm² to match
//! orifice tables. Only the percent utilized is rounded (to 0.1 %).

use rv_core::units::area_mm2;
use rv_fire::FireCaseResult;
use rv_hydraulics::{NetworkPressureDropResult, SegmentResult};
use rv_sizing::BackpressureKind;
use serde::Serialize;

use crate::error::AppResult;
use crate::run_service::CaseRun;

#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    pub index: usize,
    pub inlet_pressure_pa: f64,
    pub outlet_pressure_pa: f64,
    pub velocity_m_s: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub pressure_drop_pa: f64,
    pub static_head_pa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mach: Option<f64>,
    pub erosional: bool,
    pub choked: bool,
}

impl From<&SegmentResult> for SegmentReport {
    fn from(s: &SegmentResult) -> Self {
        Self {
            index: s.index,
            inlet_pressure_pa: s.inlet_pressure.value,
            outlet_pressure_pa: s.outlet_pressure.value,
            velocity_m_s: s.velocity.value,
            reynolds: s.reynolds,
            friction_factor: s.friction_factor,
            pressure_drop_pa: s.pressure_drop.value,
            static_head_pa: s.static_head.value,
            mach: s.mach,
            erosional: s.erosional,
            choked: s.choked,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub inlet_pressure_pa: f64,
    pub outlet_pressure_pa: f64,
    pub total_pressure_drop_pa: f64,
    pub total_static_head_pa: f64,
    pub choked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_mach: Option<f64>,
    pub segments: Vec<SegmentReport>,
    pub warnings: Vec<String>,
}

impl From<&NetworkPressureDropResult> for NetworkReport {
    fn from(r: &NetworkPressureDropResult) -> Self {
        Self {
            inlet_pressure_pa: r.inlet_pressure.value,
            outlet_pressure_pa: r.outlet_pressure.value,
            total_pressure_drop_pa: r.total_pressure_drop.value,
            total_static_head_pa: r.total_static_head.value,
            choked: r.choked,
            max_mach: r.max_mach(),
            segments: r.segments.iter().map(SegmentReport::from).collect(),
            warnings: r.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FireReport {
    pub physical_wetted_area_m2: f64,
    pub credited_wetted_area_m2: f64,
    pub heat_absorption_w: f64,
    pub relief_rate_kg_s: f64,
    pub warnings: Vec<String>,
}

impl From<&FireCaseResult> for FireReport {
    fn from(f: &FireCaseResult) -> Self {
        Self {
            physical_wetted_area_m2: f.wetted.physical.value,
            credited_wetted_area_m2: f.load.limited_wetted_area.value,
            heat_absorption_w: f.load.heat_absorption.value,
            relief_rate_kg_s: f.load.relief_rate.value,
            warnings: f.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SizingReport {
    pub phase: String,
    pub mass_flow_kg_s: f64,
    pub required_area_mm2: f64,
    pub discharge_coefficient: f64,
    pub backpressure_pa: f64,
    pub backpressure_kind: String,
    pub backpressure_correction: f64,
    pub critical: bool,
    pub kc: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kn: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ksh: Option<f64>,
    pub orifice: String,
    pub orifice_area_mm2: f64,
    pub number_of_valves: u32,
    pub manual_orifice: bool,
    pub percent_utilized: f64,
    pub rated_capacity_kg_s: f64,
}

/// Report for one case run.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire: Option<FireReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlet: Option<NetworkReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlet: Option<NetworkReport>,
    pub sizing: SizingReport,
    /// Case warnings followed by sizing diagnostics
    pub warnings: Vec<String>,
}

impl CaseReport {
    pub fn from_run(run: &CaseRun) -> Self {
        let s = &run.sizing;
        let sizing = SizingReport {
            phase: s.phase.to_string(),
            mass_flow_kg_s: s.mass_flow.value,
            required_area_mm2: area_mm2(s.required_area),
            discharge_coefficient: s.discharge_coefficient,
            backpressure_pa: run.backpressure.value,
            backpressure_kind: match run.backpressure_kind {
                BackpressureKind::Superimposed => "superimposed",
                BackpressureKind::BuiltUp => "built-up",
            }
            .to_string(),
            backpressure_correction: s.backpressure_correction,
            critical: s.critical,
            kc: s.corrections.kc,
            kw: s.corrections.kw,
            kv: s.corrections.kv,
            kn: s.corrections.kn,
            ksh: s.corrections.ksh,
            orifice: s.selection.orifice.designation.clone(),
            orifice_area_mm2: area_mm2(s.selection.orifice.area),
            number_of_valves: s.number_of_valves(),
            manual_orifice: s.selection.manual,
            percent_utilized: (s.percent_utilized() * 10.0).round() / 10.0,
            rated_capacity_kg_s: s.rated_capacity().value,
        };
        Self {
            name: run.name.clone(),
            fire: run.fire.as_ref().map(FireReport::from),
            inlet: run.inlet.as_ref().map(NetworkReport::from),
            outlet: run.outlet.as_ref().map(NetworkReport::from),
            sizing,
            warnings: run.all_warnings(),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backpressure_kind_is_readable() {
        let mut case = rv_case::CaseFile {
            version: rv_case::LATEST_VERSION,
            name: "liquid".to_string(),
            fluid: rv_case::FluidDef::new(rv_case::PhaseDef::Liquid),
            sizing: rv_case::SizingDef {
                backpressure_pa: Some(101_325.0),
                ..Default::default()
            },
            inlet: None,
            outlet: None,
            fire: None,
            options: Default::default(),
        };
        case.fluid.mass_flow_kg_s = Some(10.0);
        case.fluid.temperature_k = Some(300.0);
        case.fluid.pressure_pa = Some(11.0e5);
        case.fluid.liquid_density_kg_m3 = Some(998.0);
        case.fluid.liquid_viscosity_pa_s = Some(1.0e-3);

        let run = crate::run_case(&case).unwrap();
        let report = CaseReport::from_run(&run);
        assert_eq!(report.sizing.backpressure_kind, "superimposed");
        assert_eq!(report.sizing.phase, "liquid");
        assert!(report.sizing.kw.is_some());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"required_area_mm2\""));
        assert!(!json.contains("\"fire\""));
    }
}
