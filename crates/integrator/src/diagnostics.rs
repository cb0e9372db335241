//! Post-run consistency checks on the Newtonian-ship / relativistic-exhaust model.

use std::fmt;

use interstellar_core::time::seconds_to_years;
use interstellar_core::units::{m_to_light_years, ms_to_fraction_c};
use serde::Serialize;

use crate::{Peaks, Tolerances, TripParameters, TripState};

/// Advisory finding attached to an otherwise successful run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The ship is still moving when the tank runs dry.
    ResidualVelocity { fraction_c: f64 },
    /// Arrival position differs from the destination.
    DistanceMismatch { final_m: f64, expected_m: f64 },
    /// Tank ran dry noticeably before or after the planned duration.
    DurationMismatch { final_s: f64, expected_s: f64 },
    /// Peak speed is high enough that Newtonian ship kinematics are suspect.
    RelativisticPeak { fraction_c: f64, threshold: f64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ResidualVelocity { fraction_c } => {
                write!(f, "final velocity = {fraction_c:.2} C")
            }
            Diagnostic::DistanceMismatch { final_m, expected_m } => write!(
                f,
                "final distance = {:.2} light-years (expected {:.2})",
                m_to_light_years(*final_m),
                m_to_light_years(*expected_m)
            ),
            Diagnostic::DurationMismatch { final_s, expected_s } => write!(
                f,
                "final time = {:.2} years (expected {:.2})",
                seconds_to_years(*final_s),
                seconds_to_years(*expected_s)
            ),
            Diagnostic::RelativisticPeak {
                fraction_c,
                threshold,
            } => write!(f, "Vmax = {fraction_c:.2} C exceeds {threshold:.2} C"),
        }
    }
}

/// Compare the final state against the trip's targets.
pub fn check(
    params: &TripParameters,
    final_state: &TripState,
    peaks: &Peaks,
    tolerances: &Tolerances,
) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    let residual = ms_to_fraction_c(final_state.velocity_m_s);
    if residual.abs() > tolerances.velocity_fraction_c {
        found.push(Diagnostic::ResidualVelocity {
            fraction_c: residual,
        });
    }
    if (final_state.position_m - params.distance_m).abs() > tolerances.distance_m {
        found.push(Diagnostic::DistanceMismatch {
            final_m: final_state.position_m,
            expected_m: params.distance_m,
        });
    }
    if (final_state.time_s - params.duration_s).abs() > tolerances.time_s {
        found.push(Diagnostic::DurationMismatch {
            final_s: final_state.time_s,
            expected_s: params.duration_s,
        });
    }
    let peak = ms_to_fraction_c(peaks.velocity_m_s);
    if peak > tolerances.relativistic_fraction_c {
        found.push(Diagnostic::RelativisticPeak {
            fraction_c: peak,
            threshold: tolerances.relativistic_fraction_c,
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use interstellar_core::constants::SPEED_OF_LIGHT_M_S;
    use interstellar_core::time::years_to_seconds;
    use interstellar_core::units::light_years_to_m;

    use super::*;

    fn params() -> TripParameters {
        TripParameters::new(light_years_to_m(10.0), years_to_seconds(100.0), 1.0e6, 1.5e8)
    }

    fn arrived() -> TripState {
        TripState {
            time_s: years_to_seconds(100.0),
            position_m: light_years_to_m(10.0),
            velocity_m_s: 0.0,
            mass_kg: 1.0e6,
            energy_j: 0.0,
        }
    }

    #[test]
    fn clean_arrival_has_no_findings() {
        let peaks = Peaks {
            velocity_m_s: 0.2 * SPEED_OF_LIGHT_M_S,
            ..Peaks::default()
        };
        assert!(check(&params(), &arrived(), &peaks, &Tolerances::default()).is_empty());
    }

    #[test]
    fn flags_each_deviation() {
        let state = TripState {
            time_s: years_to_seconds(90.0),
            position_m: light_years_to_m(9.0),
            velocity_m_s: 0.05 * SPEED_OF_LIGHT_M_S,
            ..arrived()
        };
        let peaks = Peaks {
            velocity_m_s: 0.45 * SPEED_OF_LIGHT_M_S,
            ..Peaks::default()
        };
        let found = check(&params(), &state, &peaks, &Tolerances::default());
        assert_eq!(found.len(), 4);
        assert!(matches!(found[0], Diagnostic::ResidualVelocity { .. }));
        assert!(matches!(found[1], Diagnostic::DistanceMismatch { .. }));
        assert!(matches!(found[2], Diagnostic::DurationMismatch { .. }));
        assert_eq!(found[3].to_string(), "Vmax = 0.45 C exceeds 0.40 C");
    }
}
