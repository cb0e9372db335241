use anyhow::Context;
use interstellar_trip_calculator::config::{self, TripConfig};
use interstellar_trip_calculator::core::time::years_to_seconds;
use interstellar_trip_calculator::integrator::{IntegratorOptions, TripParameters};
use interstellar_trip_calculator::propulsion::{ReactionDrive, Vehicle};
use interstellar_trip_calculator::sweep::ExhaustSweep;

use super::Cli;

/// Trip, sweep and integrator settings after merging manifest and command line.
pub(super) struct RunSettings {
    pub trip_name: String,
    pub destination: String,
    pub vehicle: Vehicle,
    pub distance_ly: f64,
    pub duration_years: f64,
    pub sweep: ExhaustSweep,
    pub options: IntegratorOptions,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            trip_name: "Reference".to_string(),
            destination: "Ten light-years out".to_string(),
            vehicle: Vehicle::new("Million-tonne hull", 1.0e6),
            distance_ly: 10.0,
            duration_years: 100.0,
            sweep: ExhaustSweep::default(),
            options: IntegratorOptions::default(),
        }
    }
}

impl RunSettings {
    fn from_config(trip: &TripConfig) -> Self {
        let mut options = IntegratorOptions::default();
        if let Some(integrator) = trip.integrator {
            if let Some(dt) = integrator.time_step_s {
                options.time_step_s = dt;
            }
            options.max_steps = integrator.max_steps;
            if let Some(years) = integrator.trace_interval_years {
                options.trace_interval_s = years_to_seconds(years);
            }
        }

        Self {
            trip_name: trip.name.clone(),
            destination: trip.destination.clone().unwrap_or_else(|| trip.name.clone()),
            vehicle: Vehicle::new(trip.vehicle.name.clone(), trip.vehicle.dry_mass_kg),
            distance_ly: trip.distance_ly,
            duration_years: trip.duration_years,
            sweep: trip
                .sweep
                .map(|s| ExhaustSweep::new(s.start_c, s.step_c, s.end_c))
                .unwrap_or_default(),
            options,
        }
    }

    /// Trip parameters with the sweep's first exhaust velocity; sweeps replace it per point.
    pub fn base_parameters(&self) -> TripParameters {
        TripParameters::from_light_years(
            self.distance_ly,
            self.duration_years,
            &self.vehicle,
            ReactionDrive::from_fraction_c(self.sweep.start_fraction_c),
        )
    }
}

pub(super) fn resolve(cli: &Cli) -> anyhow::Result<RunSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            let trips = config::load_trips(path)
                .with_context(|| format!("loading trips from {}", path.display()))?;
            RunSettings::from_config(config::select_trip(&trips, cli.trip.as_deref())?)
        }
        None => RunSettings::default(),
    };

    if let Some(distance) = cli.distance_ly {
        settings.distance_ly = distance;
    }
    if let Some(duration) = cli.duration_years {
        settings.duration_years = duration;
    }
    if let Some(mass) = cli.ship_mass_kg {
        settings.vehicle.dry_mass_kg = mass;
    }
    if let Some(start) = cli.start_c {
        settings.sweep.start_fraction_c = start;
    }
    if let Some(step) = cli.step_c {
        settings.sweep.step_fraction_c = step;
    }
    if let Some(end) = cli.end_c {
        settings.sweep.end_fraction_c = end;
    }
    if let Some(dt) = cli.time_step_s {
        settings.options.time_step_s = dt;
    }
    if cli.max_steps.is_some() {
        settings.options.max_steps = cli.max_steps;
    }
    if let Some(years) = cli.trace_interval_years {
        settings.options.trace_interval_s = years_to_seconds(years);
    }

    Ok(settings)
}
