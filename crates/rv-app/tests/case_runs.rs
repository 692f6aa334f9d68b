//! End-to-end runs of the bundled case files.

use std::path::PathBuf;

use rv_app::{AppError, CaseReport, load_case, run_case, run_fire, run_hydraulics, save_case};

fn case_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../cases")
        .join(name)
}

#[test]
fn gas_case_with_piping() {
    let case = load_case(&case_path("gas_psv.yaml")).expect("gas case should load");
    let run = run_case(&case).expect("gas case should run");

    let outlet = run.outlet.as_ref().expect("outlet network solved");
    assert!(run.backpressure.value > 1.0e5);
    assert_eq!(run.backpressure.value, outlet.inlet_pressure.value);
    assert!(run.sizing.critical);
    assert_eq!(run.sizing.selection.orifice.designation, "J");

    let inlet = run.inlet.as_ref().expect("inlet network solved");
    assert!(inlet.total_pressure_drop.value > 0.0);
    assert!(!run.warnings.iter().any(|w| w.contains("inlet pressure loss")));

    let report = CaseReport::from_run(&run);
    assert_eq!(report.sizing.backpressure_kind, "built-up");
    assert_eq!(report.inlet.as_ref().map(|n| n.segments.len()), Some(1));
}

#[test]
fn legacy_liquid_case() {
    let case = load_case(&case_path("liquid_legacy.yaml")).expect("legacy case should load");
    let run = run_case(&case).expect("liquid case should run");

    let area_mm2 = run.sizing.required_area.value * 1.0e6;
    assert!((area_mm2 - 344.6).abs() < 1.0, "area {area_mm2}");
    assert_eq!(run.sizing.selection.orifice.designation, "H");
    assert_eq!(run.sizing.corrections.kw, Some(1.0));
    assert_eq!(run.sizing.corrections.kv, None);
}

#[test]
fn fire_case_sets_relief_rate() {
    let case = load_case(&case_path("fire_drum.yaml")).expect("fire case should load");
    let run = run_case(&case).expect("fire case should run");

    let fire = run.fire.as_ref().expect("fire load computed");
    assert!(fire.load.relief_rate.value > 0.0);
    assert_eq!(run.sizing.mass_flow, fire.load.relief_rate);

    let alone = run_fire(&case).expect("fire service should run");
    assert_eq!(alone.load, fire.load);

    let json = CaseReport::from_run(&run).to_json().unwrap();
    assert!(json.contains("\"heat_absorption_w\""));
}

#[test]
fn hydraulics_service_solves_both_networks() {
    let case = load_case(&case_path("gas_psv.yaml")).unwrap();
    let (inlet, outlet) = run_hydraulics(&case).unwrap();
    assert!(inlet.is_some());
    assert!(outlet.is_some());
}

#[test]
fn missing_case_file_is_a_read_error() {
    let err = load_case(&case_path("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, AppError::CaseFileRead { .. }));
}

#[test]
fn invalid_case_is_not_run() {
    let mut case = load_case(&case_path("gas_psv.yaml")).unwrap();
    case.fluid.k = Some(-1.0);
    match run_case(&case) {
        Err(AppError::Validation(report)) => assert!(report.has_error_on("k")),
        other => panic!("expected validation failure, got {:?}", other.map(|r| r.name)),
    }
}

#[test]
fn saved_case_reloads_unchanged() {
    let case = load_case(&case_path("liquid_legacy.yaml")).unwrap();
    let path = std::env::temp_dir().join("rv_app_saved_case.json");
    save_case(&path, &case).unwrap();
    let reloaded = load_case(&path).unwrap();
    assert_eq!(reloaded, case);
    let _ = std::fs::remove_file(path);
}
