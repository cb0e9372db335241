//! Constant-acceleration interstellar trip integrator.
//!
//! A ship accelerates uniformly toward its destination, flips at the midpoint and
//! decelerates to arrive at rest. [`TripParameters::plan`] sizes the reaction-mass load
//! in closed form from momentum conservation (with the exhaust's relativistic momentum),
//! and [`Trajectory`] integrates mass, velocity, position and exhaust energy in fixed
//! steps until the tank is empty.

mod diagnostics;
mod error;
mod options;
mod params;
mod trajectory;

pub use diagnostics::{Diagnostic, check as check_consistency};
pub use error::TripError;
pub use options::{DEFAULT_TIME_STEP_S, IntegratorOptions, Tolerances};
pub use params::{TripParameters, TripPlan, reaction_mass_load, required_acceleration};
pub use trajectory::{
    Peaks, ThrustPhase, Trajectory, TripOutcome, TripSnapshot, TripState, simulate, simulate_with,
};
