use interstellar_core::constants::{RELATIVISTIC_VELOCITY_WARNING, SECONDS_PER_YEAR};
use interstellar_core::units::light_years_to_m;

use crate::TripError;

/// One simulated hour.
pub const DEFAULT_TIME_STEP_S: f64 = 3_600.0;

/// Knobs for the fixed-step integrator. None of these are physical constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorOptions {
    /// Integration step Δt. Smaller steps shrink the end-of-trip residuals.
    pub time_step_s: f64,
    /// Upper bound on integration steps. `None` allows twice the nominal `duration / Δt`.
    pub max_steps: Option<u64>,
    /// Spacing of trajectory snapshots.
    pub trace_interval_s: f64,
    pub tolerances: Tolerances,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            time_step_s: DEFAULT_TIME_STEP_S,
            max_steps: None,
            trace_interval_s: SECONDS_PER_YEAR,
            tolerances: Tolerances::default(),
        }
    }
}

impl IntegratorOptions {
    pub fn with_time_step(mut self, time_step_s: f64) -> Self {
        self.time_step_s = time_step_s;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_trace_interval(mut self, trace_interval_s: f64) -> Self {
        self.trace_interval_s = trace_interval_s;
        self
    }

    pub fn validate(&self) -> Result<(), TripError> {
        if !self.time_step_s.is_finite() || self.time_step_s <= 0.0 {
            return Err(TripError::InvalidTimeStep(self.time_step_s));
        }
        if !self.trace_interval_s.is_finite() || self.trace_interval_s <= 0.0 {
            return Err(TripError::InvalidTraceInterval(self.trace_interval_s));
        }
        Ok(())
    }

    /// Step budget for a trip of `duration_s`.
    pub fn step_limit(&self, duration_s: f64) -> u64 {
        self.max_steps.unwrap_or_else(|| {
            let nominal = (duration_s / self.time_step_s).ceil() as u64;
            nominal.saturating_mul(2).saturating_add(1)
        })
    }
}

/// Thresholds for the post-run consistency checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Allowed residual |v|/c on arrival.
    pub velocity_fraction_c: f64,
    /// Allowed |position - distance|.
    pub distance_m: f64,
    /// Allowed |time - duration|.
    pub time_s: f64,
    /// Peak v/c above which the Newtonian ship model is flagged.
    pub relativistic_fraction_c: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            velocity_fraction_c: 0.01,
            distance_m: light_years_to_m(0.01),
            time_s: 0.01 * SECONDS_PER_YEAR,
            relativistic_fraction_c: RELATIVISTIC_VELOCITY_WARNING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automatic_step_limit_doubles_nominal_count() {
        let opts = IntegratorOptions::default();
        assert_eq!(opts.step_limit(100.0 * SECONDS_PER_YEAR), 2 * 876_000 + 1);
        assert_eq!(opts.with_max_steps(42).step_limit(1.0e12), 42);
    }

    #[test]
    fn step_limit_saturates_for_absurd_durations() {
        let opts = IntegratorOptions::default().with_time_step(1.0e-300);
        assert_eq!(opts.step_limit(1.0e300), u64::MAX);
    }

    #[test]
    fn rejects_bad_time_step_and_interval() {
        let opts = IntegratorOptions::default().with_time_step(0.0);
        assert_eq!(opts.validate(), Err(TripError::InvalidTimeStep(0.0)));
        let opts = IntegratorOptions::default().with_trace_interval(f64::NAN);
        assert!(matches!(opts.validate(), Err(TripError::InvalidTraceInterval(_))));
    }
}
