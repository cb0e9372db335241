//! Runs the trip integrator across a range of exhaust velocities.
//!
//! Every run owns its own integration state, so the parallel sweep splits the points
//! into contiguous chunks, one per available core, and runs each chunk on a scoped thread.

use std::num::NonZeroUsize;
use std::thread;

use interstellar_core::units::fraction_c_to_ms;
use interstellar_integrator::{IntegratorOptions, TripError, TripOutcome, TripParameters, simulate_with};
use thiserror::Error;

/// Upper bound on the number of points in one sweep.
pub const MAX_SWEEP_POINTS: usize = 10_000;

/// Exhaust velocities from `start` (inclusive) to `end` (exclusive) in steps, as fractions of c.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExhaustSweep {
    pub start_fraction_c: f64,
    pub step_fraction_c: f64,
    pub end_fraction_c: f64,
}

impl Default for ExhaustSweep {
    fn default() -> Self {
        Self {
            start_fraction_c: 0.1,
            step_fraction_c: 0.1,
            end_fraction_c: 1.0,
        }
    }
}

impl ExhaustSweep {
    pub fn new(start_fraction_c: f64, step_fraction_c: f64, end_fraction_c: f64) -> Self {
        Self {
            start_fraction_c,
            step_fraction_c,
            end_fraction_c,
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        let finite = self.start_fraction_c.is_finite()
            && self.step_fraction_c.is_finite()
            && self.end_fraction_c.is_finite();
        if !finite
            || self.start_fraction_c <= 0.0
            || self.step_fraction_c <= 0.0
            || self.end_fraction_c <= self.start_fraction_c
        {
            return Err(SweepError::InvalidRange {
                start: self.start_fraction_c,
                step: self.step_fraction_c,
                end: self.end_fraction_c,
            });
        }
        Ok(())
    }

    /// Sweep points as fractions of c. Points are computed by index, not by accumulation.
    pub fn fractions(&self) -> Result<Vec<f64>, SweepError> {
        self.validate()?;
        let span = (self.end_fraction_c - self.start_fraction_c) / self.step_fraction_c;
        let count = (span - 1e-9).ceil().max(0.0);
        if count > MAX_SWEEP_POINTS as f64 {
            return Err(SweepError::TooManyPoints {
                requested: count,
                limit: MAX_SWEEP_POINTS,
            });
        }
        let count = count as usize;
        Ok((0..count)
            .map(|i| self.start_fraction_c + i as f64 * self.step_fraction_c)
            .filter(|fraction| *fraction < self.end_fraction_c)
            .collect())
    }
}

/// One exhaust velocity and the trip it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub exhaust_fraction_c: f64,
    pub outcome: TripOutcome,
}

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid exhaust sweep: start {start} c, step {step} c, end {end} c")]
    InvalidRange { start: f64, step: f64, end: f64 },
    #[error("exhaust sweep asks for {requested:.0} points, more than the limit of {limit}")]
    TooManyPoints { requested: f64, limit: usize },
    #[error("trip failed at exhaust velocity {fraction_c:.3} c: {source}")]
    Trip {
        fraction_c: f64,
        #[source]
        source: TripError,
    },
}

fn run_point(
    base: &TripParameters,
    fraction_c: f64,
    options: &IntegratorOptions,
) -> Result<SweepRow, SweepError> {
    let params = base.with_exhaust_velocity(fraction_c_to_ms(fraction_c));
    let outcome = simulate_with(&params, options).map_err(|source| SweepError::Trip {
        fraction_c,
        source,
    })?;
    log::debug!(
        "exhaust {:.3} C: ratio {:.4}, {} steps",
        fraction_c,
        outcome.mass_ratio(),
        outcome.steps
    );
    Ok(SweepRow {
        exhaust_fraction_c: fraction_c,
        outcome,
    })
}

/// Run every sweep point in order on the calling thread.
///
/// `base` supplies distance, duration and ship mass; its exhaust velocity is replaced.
pub fn run_sweep(
    base: &TripParameters,
    sweep: &ExhaustSweep,
    options: &IntegratorOptions,
) -> Result<Vec<SweepRow>, SweepError> {
    sweep
        .fractions()?
        .into_iter()
        .map(|fraction| run_point(base, fraction, options))
        .collect()
}

/// Run the sweep on scoped worker threads, one contiguous chunk of points per
/// available core; rows keep sweep order.
pub fn run_sweep_parallel(
    base: &TripParameters,
    sweep: &ExhaustSweep,
    options: &IntegratorOptions,
) -> Result<Vec<SweepRow>, SweepError> {
    let fractions = sweep.fractions()?;
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(fractions.len())
        .max(1);
    let chunk_size = fractions.len().div_ceil(workers).max(1);
    log::debug!(
        "parallel sweep: {} points over {} workers",
        fractions.len(),
        workers
    );

    let chunks: Vec<Vec<Result<SweepRow, SweepError>>> = thread::scope(|scope| {
        let handles: Vec<_> = fractions
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|&fraction| run_point(base, fraction, options))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });
    chunks.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use interstellar_core::time::years_to_seconds;
    use interstellar_core::units::light_years_to_m;

    use super::*;

    fn base() -> TripParameters {
        TripParameters::new(light_years_to_m(10.0), years_to_seconds(100.0), 1.0e6, 0.0)
    }

    #[test]
    fn default_sweep_matches_reference_table() {
        let fractions = ExhaustSweep::default().fractions().expect("fractions");
        assert_eq!(fractions.len(), 9);
        assert_relative_eq!(fractions[0], 0.1);
        assert_relative_eq!(fractions[8], 0.9, epsilon = 1e-12);
    }

    #[test]
    fn end_is_exclusive() {
        let fractions = ExhaustSweep::new(0.2, 0.25, 0.7).fractions().expect("fractions");
        assert_eq!(fractions.len(), 2);
        assert_relative_eq!(fractions[1], 0.45);
    }

    #[test]
    fn rejects_empty_or_backwards_ranges() {
        assert!(ExhaustSweep::new(0.5, 0.1, 0.5).fractions().is_err());
        assert!(ExhaustSweep::new(0.1, 0.0, 0.9).fractions().is_err());
        assert!(ExhaustSweep::new(f64::NAN, 0.1, 0.9).fractions().is_err());
    }

    #[test]
    fn oversized_sweep_is_refused() {
        match ExhaustSweep::new(0.1, 1.0e-7, 0.9).fractions() {
            Err(SweepError::TooManyPoints { requested, limit }) => {
                assert_eq!(limit, MAX_SWEEP_POINTS);
                assert!(requested > 7.9e6);
            }
            other => panic!("expected too many points, got {other:?}"),
        }
        assert!(matches!(
            ExhaustSweep::new(0.1, 1.0e-30, 0.9).fractions(),
            Err(SweepError::TooManyPoints { .. })
        ));
        assert!(matches!(
            run_sweep_parallel(
                &base(),
                &ExhaustSweep::new(0.1, 1.0e-7, 0.9),
                &IntegratorOptions::default()
            ),
            Err(SweepError::TooManyPoints { .. })
        ));
    }

    #[test]
    fn sweep_at_the_point_limit_is_accepted() {
        let fractions = ExhaustSweep::new(0.1, 0.5e-4, 0.6).fractions().expect("fractions");
        assert_eq!(fractions.len(), MAX_SWEEP_POINTS);
    }

    #[test]
    fn mass_ratio_falls_across_the_sweep() {
        let sweep = ExhaustSweep::new(0.3, 0.2, 1.0);
        let rows = run_sweep(&base(), &sweep, &IntegratorOptions::default()).expect("sweep");
        assert_eq!(rows.len(), 4);
        assert!(
            rows.windows(2)
                .all(|w| w[1].outcome.mass_ratio() < w[0].outcome.mass_ratio())
        );
    }

    #[test]
    fn parallel_sweep_matches_sequential() {
        let sweep = ExhaustSweep::new(0.1, 0.05, 1.0);
        let options = IntegratorOptions::default().with_time_step(86_400.0);
        let sequential = run_sweep(&base(), &sweep, &options).expect("sequential");
        let parallel = run_sweep_parallel(&base(), &sweep, &options).expect("parallel");
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn sweep_past_light_speed_reports_failing_point() {
        let sweep = ExhaustSweep::new(0.6, 0.5, 1.2);
        match run_sweep(&base(), &sweep, &IntegratorOptions::default()) {
            Err(SweepError::Trip { fraction_c, source }) => {
                assert_relative_eq!(fraction_c, 1.1);
                assert!(matches!(source, TripError::SuperluminalExhaust { .. }));
            }
            other => panic!("expected trip failure, got {other:?}"),
        }
    }
}
