//! Pre-flight checks on a case.
//!
//! Every problem is collected in one pass. Errors block calculation;
//! warnings are surfaced and calculation proceeds.

use std::fmt;

use crate::schema::{CaseFile, FireDef, FluidDef, NetworkDef, PhaseDef, SizingDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("{field} is required")]
    Missing { field: String },

    #[error("{field} = {value} must be {requirement}")]
    OutOfRange {
        field: String,
        value: f64,
        requirement: &'static str,
    },

    #[error("{field} = {value} is unusual; verify")]
    Unusual { field: String, value: f64 },

    #[error("{field}: {reason}")]
    Inconsistent { field: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

impl ValidationIssue {
    /// Case field the issue refers to.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationIssue::Missing { field }
            | ValidationIssue::OutOfRange { field, .. }
            | ValidationIssue::Unusual { field, .. }
            | ValidationIssue::Inconsistent { field, .. } => Some(field),
            ValidationIssue::UnsupportedVersion { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error_on(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field() == Some(field))
    }

    fn error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    fn warn(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    fn missing(&mut self, field: impl Into<String>) {
        self.error(ValidationIssue::Missing {
            field: field.into(),
        });
    }

    fn out_of_range(&mut self, field: impl Into<String>, value: f64, requirement: &'static str) {
        self.error(ValidationIssue::OutOfRange {
            field: field.into(),
            value,
            requirement,
        });
    }

    /// Required and strictly positive.
    fn positive(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            None => {
                self.missing(field);
                None
            }
            Some(v) if !(v.is_finite() && v > 0.0) => {
                self.out_of_range(field, v, "positive");
                None
            }
            Some(v) => Some(v),
        }
    }

    fn positive_value(&mut self, field: &str, value: f64) {
        if !(value.is_finite() && value > 0.0) {
            self.out_of_range(field, value, "positive");
        }
    }

    fn non_negative_value(&mut self, field: &str, value: f64) {
        if !(value.is_finite() && value >= 0.0) {
            self.out_of_range(field, value, "zero or positive");
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.errors {
            writeln!(f, "error: {e}")?;
        }
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        Ok(())
    }
}

/// Validate a whole case. The fluid phase selects the sizing method and
/// with it the required properties.
pub fn validate(case: &CaseFile) -> ValidationReport {
    let mut report = ValidationReport::default();

    if case.version > crate::migrate::LATEST_VERSION {
        report.error(ValidationIssue::UnsupportedVersion {
            version: case.version,
        });
    }

    let fire_supplies_flow = case.fire.is_some();
    let needs_gas_viscosity = case.inlet.is_some() || case.outlet.is_some();
    validate_fluid(&case.fluid, fire_supplies_flow, needs_gas_viscosity, &mut report);
    validate_sizing(&case.sizing, &case.fluid, &mut report);

    if let Some(inlet) = &case.inlet {
        validate_network("inlet", inlet, &mut report);
    }
    if let Some(outlet) = &case.outlet {
        validate_network("outlet", outlet, &mut report);
    }
    if let Some(fire) = &case.fire {
        validate_fire(fire, &mut report);
    }
    report
}

/// Phase-independent then phase-specific fluid checks.
pub fn validate_fluid(
    fluid: &FluidDef,
    fire_supplies_flow: bool,
    needs_gas_viscosity: bool,
    report: &mut ValidationReport,
) {
    match fluid.mass_flow_kg_s {
        Some(_) if fire_supplies_flow => report.warn(ValidationIssue::Inconsistent {
            field: "mass_flow_kg_s".to_string(),
            reason: "ignored; the fire case supplies the relief rate".to_string(),
        }),
        None if fire_supplies_flow => {}
        value => {
            report.positive("mass_flow_kg_s", value);
        }
    }
    report.positive("temperature_k", fluid.temperature_k);
    report.positive("pressure_pa", fluid.pressure_pa);

    let gas_bearing = matches!(fluid.phase, PhaseDef::Gas | PhaseDef::Steam | PhaseDef::TwoPhase);
    let liquid_bearing = matches!(fluid.phase, PhaseDef::Liquid | PhaseDef::TwoPhase);

    if gas_bearing {
        if fluid.phase != PhaseDef::Steam {
            report.positive("molecular_weight", fluid.molecular_weight);
        }
        if let Some(z) = report.positive("compressibility", fluid.compressibility)
            && !(0.2..=1.5).contains(&z)
        {
            report.warn(ValidationIssue::Unusual {
                field: "compressibility".to_string(),
                value: z,
            });
        }
        match fluid.k {
            None => report.missing("k"),
            Some(k) if !(k.is_finite() && k > 1.0) => report.out_of_range("k", k, "greater than 1"),
            Some(k) if k > 2.0 => report.warn(ValidationIssue::Unusual {
                field: "k".to_string(),
                value: k,
            }),
            Some(_) => {}
        }
        if needs_gas_viscosity || fluid.gas_viscosity().is_some() {
            report.positive("gas_viscosity", fluid.gas_viscosity());
        }
    }

    if liquid_bearing {
        report.positive("liquid_density", fluid.liquid_density());
        report.positive("liquid_viscosity", fluid.liquid_viscosity());
    }

    if fluid.phase == PhaseDef::TwoPhase {
        match fluid.vapor_fraction {
            None => report.missing("vapor_fraction"),
            Some(x) if !(0.0..=1.0).contains(&x) => {
                report.out_of_range("vapor_fraction", x, "between 0 and 1")
            }
            Some(_) => {}
        }
    }

    if let Some(t_sat) = fluid.saturation_temperature_k {
        report.positive_value("saturation_temperature_k", t_sat);
    }
}

fn validate_sizing(sizing: &SizingDef, fluid: &FluidDef, report: &mut ValidationReport) {
    match sizing.backpressure_pa {
        None => report.missing("backpressure_pa"),
        Some(pb) => {
            report.non_negative_value("backpressure_pa", pb);
            if let Some(p1) = fluid.pressure_pa
                && pb >= p1
            {
                let issue = ValidationIssue::Inconsistent {
                    field: "backpressure_pa".to_string(),
                    reason: format!("{pb} Pa is not below the relieving pressure {p1} Pa"),
                };
                match fluid.phase {
                    PhaseDef::Liquid | PhaseDef::TwoPhase => report.error(issue),
                    PhaseDef::Gas | PhaseDef::Steam => report.warn(issue),
                }
            }
        }
    }
    if let Some(set) = sizing.set_pressure_pa_g {
        report.positive_value("set_pressure_pa_g", set);
    }
    if sizing.number_of_valves == 0 {
        report.out_of_range("number_of_valves", 0.0, "at least 1");
    }
    if let Some(kd) = sizing.discharge_coefficient
        && !(kd > 0.0 && kd <= 1.0)
    {
        report.out_of_range("discharge_coefficient", kd, "in (0, 1]");
    }
    if let Some(designation) = &sizing.orifice
        && rv_sizing::OrificeTable::api526().get(designation).is_none()
    {
        report.error(ValidationIssue::Inconsistent {
            field: "orifice".to_string(),
            reason: format!("unknown designation {designation}"),
        });
    }
}

fn validate_network(name: &str, network: &NetworkDef, report: &mut ValidationReport) {
    if let Some(p) = network.boundary_pressure_pa {
        report.positive_value(&format!("{name}.boundary_pressure_pa"), p);
    }
    if let Some(t) = network.boundary_temperature_k {
        report.positive_value(&format!("{name}.boundary_temperature_k"), t);
    }
    for (i, seg) in network.segments.iter().enumerate() {
        let field = |f: &str| format!("{name}.segments[{i}].{f}");
        report.positive_value(&field("diameter_m"), seg.diameter_m);
        report.non_negative_value(&field("length_m"), seg.length_m);
        report.non_negative_value(&field("roughness_m"), seg.roughness_m);
        if !seg.elevation_change_m.is_finite() {
            report.out_of_range(field("elevation_change_m"), seg.elevation_change_m, "finite");
        }
        if let Some(sf) = seg.safety_factor {
            report.positive_value(&field("safety_factor"), sf);
        }
        if let Some(loss) = seg.additional_loss_pa {
            report.non_negative_value(&field("additional_loss_pa"), loss);
        }
        for (j, fitting) in seg.fittings.iter().enumerate() {
            if fitting.count == 0 {
                report.out_of_range(field(&format!("fittings[{j}].count")), 0.0, "at least 1");
            }
        }
        if seg.diameter_m > 0.0 && seg.roughness_m / seg.diameter_m > 0.05 {
            report.warn(ValidationIssue::Unusual {
                field: field("roughness_m"),
                value: seg.roughness_m,
            });
        }
    }
}

fn validate_fire(fire: &FireDef, report: &mut ValidationReport) {
    report.positive_value("fire.diameter_m", fire.diameter_m);
    report.non_negative_value("fire.length_m", fire.length_m);
    report.non_negative_value("fire.liquid_level_m", fire.liquid_level_m);
    report.positive_value("fire.latent_heat_j_kg", fire.latent_heat_j_kg);
    report.non_negative_value("fire.height_above_grade_m", fire.height_above_grade_m);
    if fire.liquid_level_m == 0.0 {
        report.error(ValidationIssue::Inconsistent {
            field: "fire.liquid_level_m".to_string(),
            reason: "no wetted area without liquid".to_string(),
        });
    }
}
