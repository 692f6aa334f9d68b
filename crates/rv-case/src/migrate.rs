//! Case file version migration.

use crate::CaseError;
use crate::schema::{CaseFile, PhaseDef};

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut case: CaseFile) -> Result<CaseFile, CaseError> {
    while case.version < LATEST_VERSION {
        case = migrate_one_version(case)?;
    }
    Ok(case)
}

fn migrate_one_version(case: CaseFile) -> Result<CaseFile, CaseError> {
    match case.version {
        0 => migrate_v0_to_v1(case),
        v => Err(CaseError::Migration {
            what: format!("No migration path from version {v}"),
        }),
    }
}

/// Version 0 files carried only the generic `density_kg_m3`/`viscosity_pa_s`.
/// They move into the phase-specific fields; a phase-specific value already
/// present is kept.
fn migrate_v0_to_v1(mut case: CaseFile) -> Result<CaseFile, CaseError> {
    let fluid = &mut case.fluid;
    let liquid_bearing = matches!(fluid.phase, PhaseDef::Liquid | PhaseDef::TwoPhase);
    if liquid_bearing {
        fluid.liquid_density_kg_m3 = fluid.liquid_density();
        fluid.liquid_viscosity_pa_s = fluid.liquid_viscosity();
    } else {
        fluid.gas_viscosity_pa_s = fluid.gas_viscosity();
    }
    fluid.density_kg_m3 = None;
    fluid.viscosity_pa_s = None;
    case.version = 1;
    Ok(case)
}
