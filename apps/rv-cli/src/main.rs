use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rv_app::{
    AppError, AppResult, CaseReport, FireReport, NetworkReport, load_case, run_case, run_fire,
    run_hydraulics, validate_case,
};

#[derive(Parser)]
#[command(name = "rv-cli")]
#[command(about = "Relief valve sizing: piping hydraulics, fire loads and orifice selection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file
    Validate {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
    /// Run the full case and print the sizing report
    Size {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Solve the inlet and outlet piping only
    Hydraulics {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
    /// Compute the fire-exposure relief load only
    Fire {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Size { case_path, json } => cmd_size(&case_path, json),
        Commands::Hydraulics { case_path } => cmd_hydraulics(&case_path),
        Commands::Fire { case_path } => cmd_fire(&case_path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Validation(report)) => {
            eprintln!("✗ Case is invalid");
            eprint!("{report}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(case_path: &Path) -> AppResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    let report = validate_case(&case)?;
    for w in &report.warnings {
        println!("  warning: {w}");
    }
    println!("✓ Case is valid");
    Ok(())
}

fn cmd_size(case_path: &Path, json: bool) -> AppResult<()> {
    let case = load_case(case_path)?;
    let run = run_case(&case)?;
    let report = CaseReport::from_run(&run);

    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("✓ Case sized: {}", report.name);
    if let Some(fire) = &report.fire {
        print_fire(fire);
    }
    if let Some(inlet) = &report.inlet {
        print_network("Inlet piping", inlet);
    }
    if let Some(outlet) = &report.outlet {
        print_network("Outlet piping", outlet);
    }

    let s = &report.sizing;
    println!("Sizing ({}):", s.phase);
    println!("  Relief rate:        {:.4} kg/s", s.mass_flow_kg_s);
    println!(
        "  Backpressure:       {:.0} Pa(a) ({})",
        s.backpressure_pa, s.backpressure_kind
    );
    println!("  Required area:      {:.1} mm²", s.required_area_mm2);
    println!(
        "  Kd = {:.3}, Kb = {:.3}, Kc = {:.2}{}",
        s.discharge_coefficient,
        s.backpressure_correction,
        s.kc,
        if s.critical { " (critical)" } else { "" }
    );
    if let Some(kv) = s.kv {
        println!("  Kv = {:.3}", kv);
    }
    if let Some(kn) = s.kn {
        println!("  Kn = {:.4}", kn);
    }
    if let Some(ksh) = s.ksh {
        println!("  Ksh = {:.4}", ksh);
    }
    println!(
        "  Orifice:            {} x {} ({:.0} mm²){}",
        s.number_of_valves,
        s.orifice,
        s.orifice_area_mm2,
        if s.manual_orifice { " [manual]" } else { "" }
    );
    println!("  Utilization:        {:.1}%", s.percent_utilized);
    println!("  Rated capacity:     {:.4} kg/s", s.rated_capacity_kg_s);

    print_warnings(&report.warnings);
    Ok(())
}

fn cmd_hydraulics(case_path: &Path) -> AppResult<()> {
    let case = load_case(case_path)?;
    let (inlet, outlet) = run_hydraulics(&case)?;
    println!("✓ Piping solved: {}", case.name);
    if let Some(inlet) = &inlet {
        let report = NetworkReport::from(inlet);
        print_network("Inlet piping", &report);
        print_warnings(&report.warnings);
    }
    if let Some(outlet) = &outlet {
        let report = NetworkReport::from(outlet);
        print_network("Outlet piping", &report);
        print_warnings(&report.warnings);
    }
    Ok(())
}

fn cmd_fire(case_path: &Path) -> AppResult<()> {
    let case = load_case(case_path)?;
    let result = run_fire(&case)?;
    let report = FireReport::from(&result);
    println!("✓ Fire load computed: {}", case.name);
    print_fire(&report);
    print_warnings(&report.warnings);
    Ok(())
}

fn print_fire(fire: &FireReport) {
    println!("Fire exposure:");
    println!("  Wetted area:        {:.2} m²", fire.physical_wetted_area_m2);
    println!("  Credited area:      {:.2} m²", fire.credited_wetted_area_m2);
    println!("  Heat absorption:    {:.1} kW", fire.heat_absorption_w / 1000.0);
    println!("  Relief rate:        {:.4} kg/s", fire.relief_rate_kg_s);
}

fn print_network(title: &str, network: &NetworkReport) {
    println!("{title}:");
    println!(
        "  {:>3} {:>12} {:>12} {:>9} {:>10} {:>8} {:>11} {:>7}",
        "#", "P in [Pa]", "P out [Pa]", "V [m/s]", "Re", "f", "dP [Pa]", "Mach"
    );
    for seg in &network.segments {
        println!(
            "  {:>3} {:>12.0} {:>12.0} {:>9.2} {:>10.0} {:>8.5} {:>11.1} {:>7}{}",
            seg.index,
            seg.inlet_pressure_pa,
            seg.outlet_pressure_pa,
            seg.velocity_m_s,
            seg.reynolds,
            seg.friction_factor,
            seg.pressure_drop_pa,
            seg.mach.map(|m| format!("{m:.3}")).unwrap_or_else(|| "-".to_string()),
            if seg.choked { " choked" } else { "" }
        );
    }
    println!(
        "  Total drop {:.1} Pa, static head {:.1} Pa{}",
        network.total_pressure_drop_pa,
        network.total_static_head_pa,
        if network.choked { " (choked)" } else { "" }
    );
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("Warnings:");
    for w in warnings {
        println!("  ! {w}");
    }
}
