//! Fixed-step integration of ship mass, velocity, position and exhaust energy.

use serde::Serialize;

use crate::diagnostics::{self, Diagnostic};
use crate::{IntegratorOptions, TripError, TripParameters, TripPlan};

/// Direction of thrust relative to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrustPhase {
    Accelerating,
    Decelerating,
}

/// Mutable integration state, owned by a single run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripState {
    pub time_s: f64,
    pub position_m: f64,
    pub velocity_m_s: f64,
    /// Ship plus remaining reaction mass.
    pub mass_kg: f64,
    /// Kinetic energy delivered to the expelled reaction mass so far.
    pub energy_j: f64,
}

/// Running maxima observed after each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Peaks {
    pub velocity_m_s: f64,
    pub ship_kinetic_energy_j: f64,
    pub reaction_mass_kinetic_energy_j: f64,
}

impl Peaks {
    fn observe(&mut self, state: &TripState, ship_mass_kg: f64) {
        let v2 = state.velocity_m_s * state.velocity_m_s;
        self.velocity_m_s = self.velocity_m_s.max(state.velocity_m_s);
        self.ship_kinetic_energy_j = self.ship_kinetic_energy_j.max(0.5 * ship_mass_kg * v2);
        self.reaction_mass_kinetic_energy_j = self
            .reaction_mass_kinetic_energy_j
            .max(0.5 * (state.mass_kg - ship_mass_kg) * v2);
    }
}

/// Point-in-time view of a run, emitted at the trace cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripSnapshot {
    pub time_s: f64,
    pub position_m: f64,
    /// Remaining reaction mass over the initial load (1.0 at departure).
    pub tank_fraction: f64,
    pub velocity_m_s: f64,
    pub energy_j: f64,
    /// Thrust that produced this state; the snapshot taken at the flip instant is still
    /// `Accelerating`.
    pub phase: ThrustPhase,
    pub tank_empty: bool,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripOutcome {
    pub parameters: TripParameters,
    pub plan: TripPlan,
    pub reaction_mass_kg: f64,
    pub total_energy_j: f64,
    pub peak_velocity_m_s: f64,
    pub peak_ship_kinetic_energy_j: f64,
    pub peak_reaction_mass_kinetic_energy_j: f64,
    pub final_state: TripState,
    pub steps: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl TripOutcome {
    /// Reaction-mass load over ship dry mass.
    pub fn mass_ratio(&self) -> f64 {
        self.reaction_mass_kg / self.parameters.ship_mass_kg
    }

    /// Mass actually thrown overboard by the integrator.
    pub fn expelled_mass_kg(&self) -> f64 {
        self.parameters.ship_mass_kg + self.reaction_mass_kg - self.final_state.mass_kg
    }

    pub fn is_consistent(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Lazily integrated trip.
///
/// Iterating yields a snapshot at departure, one each time the elapsed time crosses a
/// multiple of the trace interval, and a final one when the tank runs dry. The sequence
/// cannot be restarted; build a new `Trajectory` instead. [`Trajectory::finish`] runs any
/// remaining steps and returns the outcome.
#[derive(Debug, Clone)]
pub struct Trajectory {
    params: TripParameters,
    plan: TripPlan,
    options: IntegratorOptions,
    step_limit: u64,
    state: TripState,
    peaks: Peaks,
    steps: u64,
    departed: bool,
    arrived: bool,
    error: Option<TripError>,
}

impl Trajectory {
    pub fn new(params: &TripParameters, options: &IntegratorOptions) -> Result<Self, TripError> {
        options.validate()?;
        let plan = params.plan()?;
        let step_limit = options.step_limit(params.duration_s);

        log::debug!(
            "trip plan: a = {:.4} m/s^2, K = {:.4}, reaction mass = {:.3e} kg, step limit = {}",
            plan.acceleration_m_s2,
            plan.relativistic_factor,
            plan.reaction_mass_kg,
            step_limit
        );

        Ok(Self {
            params: *params,
            plan,
            options: *options,
            step_limit,
            state: TripState {
                time_s: 0.0,
                position_m: 0.0,
                velocity_m_s: 0.0,
                mass_kg: params.ship_mass_kg + plan.reaction_mass_kg,
                energy_j: 0.0,
            },
            peaks: Peaks::default(),
            steps: 0,
            departed: false,
            arrived: false,
            error: None,
        })
    }

    pub fn parameters(&self) -> &TripParameters {
        &self.params
    }

    pub fn plan(&self) -> &TripPlan {
        &self.plan
    }

    pub fn state(&self) -> &TripState {
        &self.state
    }

    pub fn peaks(&self) -> &Peaks {
        &self.peaks
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn tank_empty(&self) -> bool {
        self.state.mass_kg <= self.params.ship_mass_kg
    }

    /// Thrust direction for the next step.
    pub fn phase(&self) -> ThrustPhase {
        if self.state.time_s < self.plan.flip_time_s {
            ThrustPhase::Accelerating
        } else {
            ThrustPhase::Decelerating
        }
    }

    /// Advance the state by one time step.
    fn step(&mut self) -> Result<(), TripError> {
        if self.steps >= self.step_limit {
            return Err(TripError::NonConvergence { steps: self.steps });
        }

        let dt = self.options.time_step_s;
        let dv = self.plan.acceleration_m_s2 * dt;
        // momentum balance against the current, depleting mass
        let dm = self.state.mass_kg * dv / self.plan.effective_exhaust_velocity_m_s;
        let de = dm * self.plan.specific_energy_j_per_kg;

        self.state.velocity_m_s += match self.phase() {
            ThrustPhase::Accelerating => dv,
            ThrustPhase::Decelerating => -dv,
        };
        self.state.mass_kg -= dm;
        self.state.time_s += dt;
        self.state.position_m += self.state.velocity_m_s * dt;
        self.state.energy_j += de;
        self.steps += 1;

        self.peaks.observe(&self.state, self.params.ship_mass_kg);
        Ok(())
    }

    fn snapshot(&self) -> TripSnapshot {
        let tank_fraction = if self.plan.reaction_mass_kg > 0.0 {
            (self.state.mass_kg - self.params.ship_mass_kg) / self.plan.reaction_mass_kg
        } else {
            0.0
        };
        TripSnapshot {
            time_s: self.state.time_s,
            position_m: self.state.position_m,
            tank_fraction,
            velocity_m_s: self.state.velocity_m_s,
            energy_j: self.state.energy_j,
            phase: if self.state.time_s > self.plan.flip_time_s {
                ThrustPhase::Decelerating
            } else {
                ThrustPhase::Accelerating
            },
            tank_empty: self.tank_empty(),
        }
    }

    /// Run to tank-empty and evaluate the consistency checks.
    pub fn finish(mut self) -> Result<TripOutcome, TripError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        while !self.tank_empty() {
            self.step()?;
        }

        let diagnostics = diagnostics::check(
            &self.params,
            &self.state,
            &self.peaks,
            &self.options.tolerances,
        );
        for diagnostic in &diagnostics {
            log::warn!(
                "exhaust {:.2} C: {}",
                self.params.drive().fraction_c(),
                diagnostic
            );
        }
        log::debug!(
            "trip finished after {} steps at t = {:.3e} s",
            self.steps,
            self.state.time_s
        );

        Ok(TripOutcome {
            parameters: self.params,
            plan: self.plan,
            reaction_mass_kg: self.plan.reaction_mass_kg,
            total_energy_j: self.state.energy_j,
            peak_velocity_m_s: self.peaks.velocity_m_s,
            peak_ship_kinetic_energy_j: self.peaks.ship_kinetic_energy_j,
            peak_reaction_mass_kinetic_energy_j: self.peaks.reaction_mass_kinetic_energy_j,
            final_state: self.state,
            steps: self.steps,
            diagnostics,
        })
    }
}

impl Iterator for Trajectory {
    type Item = TripSnapshot;

    fn next(&mut self) -> Option<TripSnapshot> {
        if !self.departed {
            self.departed = true;
            self.arrived = self.tank_empty();
            return Some(self.snapshot());
        }
        if self.arrived || self.error.is_some() {
            return None;
        }

        let interval = self.options.trace_interval_s;
        loop {
            let before = self.state.time_s;
            if let Err(err) = self.step() {
                self.error = Some(err);
                return None;
            }
            if self.tank_empty() {
                self.arrived = true;
                return Some(self.snapshot());
            }
            if (self.state.time_s / interval).floor() > (before / interval).floor() {
                return Some(self.snapshot());
            }
        }
    }
}

/// Run a trip with the default options.
pub fn simulate(params: &TripParameters) -> Result<TripOutcome, TripError> {
    simulate_with(params, &IntegratorOptions::default())
}

/// Run a trip to completion without collecting snapshots.
pub fn simulate_with(
    params: &TripParameters,
    options: &IntegratorOptions,
) -> Result<TripOutcome, TripError> {
    Trajectory::new(params, options)?.finish()
}
