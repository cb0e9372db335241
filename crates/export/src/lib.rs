//! Export helpers: console tables, CSV sweeps and JSON trace sidecars.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Fixed-width console tables in PaloVerde-year energy units.
pub mod table {
    use interstellar_core::time::seconds_to_years;
    use interstellar_core::units::{joules_to_palo_verde_years, m_to_light_years, ms_to_fraction_c};
    use interstellar_integrator::{ThrustPhase, TripOutcome, TripParameters, TripSnapshot};

    /// Banner printed once before a sweep.
    pub fn trip_header(params: &TripParameters) -> String {
        format!(
            "Constant Acceleration Spaceship Simulation:\n\
             - Distance To Destination         = {:.2} LY\n\
             - Time To Destination             = {:.2} Years\n\
             - Mass of Ship (not incl Mthrust) = {:.2} Million Kg\n",
            m_to_light_years(params.distance_m),
            seconds_to_years(params.duration_s),
            params.ship_mass_kg / 1.0e6,
        )
    }

    /// One summary line per exhaust velocity.
    pub fn summary_row(outcome: &TripOutcome) -> String {
        format!(
            "Vthrust = {:4.2} C  Mthrust/Mship = {:5.2}  Energy = {:6.0} PaloVerdes  Vmax = {:4.2} C  KEmax = {:6.0} + {:6.0} PaloVerdes",
            ms_to_fraction_c(outcome.parameters.exhaust_velocity_m_s),
            outcome.mass_ratio(),
            joules_to_palo_verde_years(outcome.total_energy_j),
            ms_to_fraction_c(outcome.peak_velocity_m_s),
            joules_to_palo_verde_years(outcome.peak_ship_kinetic_energy_j),
            joules_to_palo_verde_years(outcome.peak_reaction_mass_kinetic_energy_j),
        )
    }

    /// Per-run block shown above a verbose trace.
    pub fn run_header(params: &TripParameters, reaction_mass_kg: f64, acceleration_m_s2: f64) -> String {
        format!(
            "Mass of Ship     = {:.3} million kg\n\
             Mass of Thrust   = {:.3} million kg\n\
             Mass Thrust/Ship = {:.2}\n\
             Thrust Velocity  = {:.2} C\n\
             Acceleration     = {:.2} m/s^2\n\
             {:>12} {:>12} {:>12} {:>12} {:>12}\n\
             {:>12} {:>12} {:>12} {:>12} {:>12}\n\
             {:>12} {:>12} {:>12} {:>12} {:>12}",
            params.ship_mass_kg / 1.0e6,
            reaction_mass_kg / 1.0e6,
            reaction_mass_kg / params.ship_mass_kg,
            ms_to_fraction_c(params.exhaust_velocity_m_s),
            acceleration_m_s2,
            "Time", "Distance", "ThrustTank", "Velocity", "Energy",
            "(Years)", "(LightYear)", "(Percent)", "(C)", "(PalVerdYr)",
            "-------", "-----------", "---------", "-------", "-----------",
        )
    }

    /// Formats trace rows, marking the first decelerating row and high-speed rows.
    #[derive(Debug, Clone)]
    pub struct TraceFormatter {
        velocity_warning_c: f64,
        flip_marked: bool,
    }

    impl TraceFormatter {
        pub fn new(velocity_warning_c: f64) -> Self {
            Self {
                velocity_warning_c,
                flip_marked: false,
            }
        }

        pub fn row(&mut self, snapshot: &TripSnapshot) -> String {
            let fraction_c = ms_to_fraction_c(snapshot.velocity_m_s);
            let mut line = format!(
                "{:12.2} {:12.2} {:12.2} {:12.4} {:12.2}",
                seconds_to_years(snapshot.time_s),
                m_to_light_years(snapshot.position_m),
                100.0 * snapshot.tank_fraction,
                fraction_c,
                joules_to_palo_verde_years(snapshot.energy_j),
            );
            if snapshot.phase == ThrustPhase::Decelerating && !self.flip_marked {
                line.push_str("    FLIP");
                self.flip_marked = true;
            }
            if fraction_c > self.velocity_warning_c {
                line.push_str(&format!(
                    "    WARNING V/C = {:.2} IS > {:.2}",
                    fraction_c, self.velocity_warning_c
                ));
            }
            line
        }
    }
}

/// CSV export of exhaust-velocity sweeps.
pub mod sweep {
    use std::io;
    use std::path::Path;

    use interstellar_core::units::{joules_to_palo_verde_years, ms_to_fraction_c};
    use interstellar_sweep::SweepRow;
    use serde::{Deserialize, Serialize};

    /// CSV row emitted per sweep point; column order follows field order.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SweepRecord {
        pub exhaust_fraction_c: f64,
        pub mass_ratio: f64,
        pub reaction_mass_kg: f64,
        pub total_energy_j: f64,
        pub total_energy_palo_verde_years: f64,
        pub peak_velocity_fraction_c: f64,
        pub peak_ship_ke_j: f64,
        pub peak_reaction_mass_ke_j: f64,
        pub steps: u64,
        pub consistent: bool,
    }

    impl From<&SweepRow> for SweepRecord {
        fn from(row: &SweepRow) -> Self {
            let outcome = &row.outcome;
            Self {
                exhaust_fraction_c: row.exhaust_fraction_c,
                mass_ratio: outcome.mass_ratio(),
                reaction_mass_kg: outcome.reaction_mass_kg,
                total_energy_j: outcome.total_energy_j,
                total_energy_palo_verde_years: joules_to_palo_verde_years(outcome.total_energy_j),
                peak_velocity_fraction_c: ms_to_fraction_c(outcome.peak_velocity_m_s),
                peak_ship_ke_j: outcome.peak_ship_kinetic_energy_j,
                peak_reaction_mass_ke_j: outcome.peak_reaction_mass_kinetic_energy_j,
                steps: outcome.steps,
                consistent: outcome.is_consistent(),
            }
        }
    }

    /// Write the sweep as CSV with a header row (use `-` for stdout).
    pub fn write_csv(path: &Path, rows: &[SweepRow]) -> io::Result<()> {
        let mut writer = csv::Writer::from_writer(super::writer_for_path(path)?);
        for row in rows {
            writer.serialize(SweepRecord::from(row))?;
        }
        writer.flush()
    }

    /// Read a sweep CSV back, e.g. for plotting.
    pub fn read_csv(path: &Path) -> io::Result<Vec<SweepRecord>> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
        let mut records = Vec::new();
        for record in reader.deserialize() {
            records.push(record?);
        }
        Ok(records)
    }
}

/// JSON sidecars holding a run's summary and trajectory snapshots.
pub mod trace {
    use std::collections::HashSet;
    use std::fs::{self, File};
    use std::io;
    use std::path::{Path, PathBuf};

    use interstellar_integrator::{Diagnostic, TripOutcome, TripParameters, TripPlan, TripSnapshot};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    /// Descriptive fields that are not part of the physics.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub trip: &'a str,
        pub destination: &'a str,
        pub vehicle: &'a str,
    }

    #[derive(Serialize)]
    struct TraceSidecar<'a> {
        trip: &'a str,
        destination: &'a str,
        vehicle: &'a str,
        generated_utc: String,
        parameters: &'a TripParameters,
        plan: &'a TripPlan,
        reaction_mass_kg: f64,
        total_energy_j: f64,
        peak_velocity_m_s: f64,
        peak_ship_kinetic_energy_j: f64,
        peak_reaction_mass_kinetic_energy_j: f64,
        steps: u64,
        diagnostics: &'a [Diagnostic],
        samples: &'a [TripSnapshot],
    }

    /// Sidecar path for one sweep point, next to `output`. The sweep index keeps names
    /// unique when neighbouring exhaust velocities round to the same label.
    pub fn sidecar_path(output: &Path, index: usize, exhaust_fraction_c: f64) -> PathBuf {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("trace");
        parent.join(format!("{}_{:03}_{:.3}c.json", stem, index, exhaust_fraction_c))
    }

    /// Writes one sidecar per sweep point and refuses to write the same path twice.
    #[derive(Debug)]
    pub struct SidecarWriter {
        output: PathBuf,
        written: HashSet<PathBuf>,
    }

    impl SidecarWriter {
        pub fn new(output: impl Into<PathBuf>) -> Self {
            Self {
                output: output.into(),
                written: HashSet::new(),
            }
        }

        /// Number of sidecars written so far.
        pub fn len(&self) -> usize {
            self.written.len()
        }

        pub fn is_empty(&self) -> bool {
            self.written.is_empty()
        }

        /// Write the sidecar for sweep point `index` and return where it went.
        pub fn write(
            &mut self,
            index: usize,
            meta: &Metadata<'_>,
            outcome: &TripOutcome,
            samples: &[TripSnapshot],
        ) -> io::Result<PathBuf> {
            let path = sidecar_path(&self.output, index, outcome.parameters.drive().fraction_c());
            if self.written.contains(&path) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("trace sidecar {} was already written", path.display()),
                ));
            }
            write_sidecar(&path, meta, outcome, samples)?;
            self.written.insert(path.clone());
            Ok(path)
        }
    }

    fn write_sidecar(
        path: &Path,
        meta: &Metadata<'_>,
        outcome: &TripOutcome,
        samples: &[TripSnapshot],
    ) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let sidecar = TraceSidecar {
            trip: meta.trip,
            destination: meta.destination,
            vehicle: meta.vehicle,
            generated_utc: chrono::Utc::now().to_rfc3339(),
            parameters: &outcome.parameters,
            plan: &outcome.plan,
            reaction_mass_kg: outcome.reaction_mass_kg,
            total_energy_j: outcome.total_energy_j,
            peak_velocity_m_s: outcome.peak_velocity_m_s,
            peak_ship_kinetic_energy_j: outcome.peak_ship_kinetic_energy_j,
            peak_reaction_mass_kinetic_energy_j: outcome.peak_reaction_mass_kinetic_energy_j,
            steps: outcome.steps,
            diagnostics: &outcome.diagnostics,
            samples,
        };
        to_writer_pretty(File::create(path)?, &sidecar)?;
        Ok(())
    }
}
