use approx::assert_relative_eq;
use interstellar_trip_calculator::config::{load_trips, select_trip};
use interstellar_trip_calculator::core::time::years_to_seconds;
use interstellar_trip_calculator::integrator::{IntegratorOptions, TripParameters, simulate_with};
use interstellar_trip_calculator::propulsion::{ReactionDrive, Vehicle};

#[test]
fn version_is_reported() {
    assert!(!interstellar_trip_calculator::version().is_empty());
}

#[test]
fn bundled_manifest_trip_runs_to_empty_tank() {
    let trips = load_trips("configs/trips").expect("bundled trips");
    let trip = select_trip(&trips, Some("tau ceti")).expect("tau ceti");
    let integrator = trip.integrator.expect("integrator settings");

    let params = TripParameters::from_light_years(
        trip.distance_ly,
        trip.duration_years,
        &Vehicle::new(trip.vehicle.name.clone(), trip.vehicle.dry_mass_kg),
        ReactionDrive::from_fraction_c(0.5),
    );
    let options = IntegratorOptions::default()
        .with_time_step(integrator.time_step_s.expect("time step"))
        .with_trace_interval(years_to_seconds(5.0));

    let plan = params.plan().expect("plan");
    let outcome = simulate_with(&params, &options).expect("trip");

    assert_relative_eq!(
        outcome.expelled_mass_kg(),
        plan.reaction_mass_kg,
        max_relative = 1e-3
    );
    assert!(outcome.final_state.mass_kg <= params.ship_mass_kg);
    assert!(outcome.is_consistent(), "{:?}", outcome.diagnostics);
}
