use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use interstellar_trip_calculator::core::units::fraction_c_to_ms;
use interstellar_trip_calculator::export::table::{self, TraceFormatter};
use interstellar_trip_calculator::export::{sweep as export_sweep, trace};
use interstellar_trip_calculator::integrator::{Trajectory, TripParameters};
use interstellar_trip_calculator::sweep::{SweepRow, run_sweep, run_sweep_parallel};

#[path = "interstellar/settings.rs"]
mod settings;

use settings::RunSettings;

/// Size the reaction mass for a constant-acceleration trip across a sweep of exhaust velocities.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Constant-acceleration interstellar trip calculator"
)]
struct Cli {
    /// Trip manifest: a TOML file, a YAML list, or a directory of TOML files
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trip name within the manifest (case-insensitive, defaults to the first)
    #[arg(long, requires = "config")]
    trip: Option<String>,

    /// Distance to the destination in light-years
    #[arg(long)]
    distance_ly: Option<f64>,

    /// Trip duration in years
    #[arg(long)]
    duration_years: Option<f64>,

    /// Ship dry mass in kg (excluding reaction mass)
    #[arg(long)]
    ship_mass_kg: Option<f64>,

    /// First exhaust velocity of the sweep, as a fraction of c
    #[arg(long)]
    start_c: Option<f64>,

    /// Sweep increment, as a fraction of c
    #[arg(long)]
    step_c: Option<f64>,

    /// Sweep end (exclusive), as a fraction of c
    #[arg(long)]
    end_c: Option<f64>,

    /// Integration time step in seconds
    #[arg(long)]
    time_step_s: Option<f64>,

    /// Abort a run that has not emptied its tank after this many steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Spacing of trace rows in years
    #[arg(long)]
    trace_interval_years: Option<f64>,

    /// Print the per-run header and trajectory table
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Write the sweep as CSV (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write one JSON trace sidecar per exhaust velocity, named after this path
    #[arg(long)]
    trace_json: Option<PathBuf>,

    /// Run the sweep points on separate threads
    #[arg(long, default_value_t = false, conflicts_with_all = ["verbose", "trace_json"])]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = settings::resolve(&cli)?;
    let base = settings.base_parameters();
    log::info!(
        "trip '{}' to {} with vehicle '{}'",
        settings.trip_name,
        settings.destination,
        settings.vehicle.name
    );

    println!("{}", table::trip_header(&base));

    let rows = if cli.verbose || cli.trace_json.is_some() {
        run_traced(&cli, &settings, &base)?
    } else {
        let rows = if cli.parallel {
            run_sweep_parallel(&base, &settings.sweep, &settings.options)?
        } else {
            run_sweep(&base, &settings.sweep, &settings.options)?
        };
        for row in &rows {
            println!("{}", table::summary_row(&row.outcome));
        }
        rows
    };

    if let Some(path) = &cli.csv {
        export_sweep::write_csv(path, &rows)
            .with_context(|| format!("writing sweep CSV to {}", path.display()))?;
    }

    Ok(())
}

/// Sequential sweep that walks each trajectory for the verbose table and JSON sidecars.
fn run_traced(
    cli: &Cli,
    settings: &RunSettings,
    base: &TripParameters,
) -> anyhow::Result<Vec<SweepRow>> {
    let meta = trace::Metadata {
        trip: &settings.trip_name,
        destination: &settings.destination,
        vehicle: &settings.vehicle.name,
    };
    let mut sidecars = cli.trace_json.as_deref().map(trace::SidecarWriter::new);
    let mut rows = Vec::new();

    for (index, fraction) in settings.sweep.fractions()?.into_iter().enumerate() {
        let params = base.with_exhaust_velocity(fraction_c_to_ms(fraction));
        let mut trajectory = Trajectory::new(&params, &settings.options)
            .with_context(|| format!("exhaust velocity {fraction:.2} c"))?;

        if cli.verbose {
            let plan = trajectory.plan();
            println!(
                "{}",
                table::run_header(&params, plan.reaction_mass_kg, plan.acceleration_m_s2)
            );
        }

        let mut formatter = TraceFormatter::new(settings.options.tolerances.relativistic_fraction_c);
        let mut samples = Vec::new();
        for snapshot in trajectory.by_ref() {
            if cli.verbose {
                println!("{}", formatter.row(&snapshot));
            }
            if sidecars.is_some() {
                samples.push(snapshot);
            }
        }

        let outcome = trajectory
            .finish()
            .with_context(|| format!("exhaust velocity {fraction:.2} c"))?;
        println!("{}", table::summary_row(&outcome));
        if cli.verbose {
            println!();
        }

        if let Some(writer) = sidecars.as_mut() {
            let written = writer
                .write(index, &meta, &outcome, &samples)
                .with_context(|| format!("writing trace sidecar for {fraction:.2} c"))?;
            log::info!("wrote {}", written.display());
        }

        rows.push(SweepRow {
            exhaust_fraction_c: fraction,
            outcome,
        });
    }

    Ok(rows)
}
