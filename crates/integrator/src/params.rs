//! Trip inputs and the closed-form quantities derived from them before integration.

use interstellar_core::units::{light_years_to_m, ms_to_fraction_c};
use interstellar_core::time::years_to_seconds;
use interstellar_propulsion::{ReactionDrive, Vehicle};
use serde::Serialize;

use crate::TripError;

/// Inputs for one symmetric accelerate/flip/decelerate trip, in SI units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripParameters {
    pub distance_m: f64,
    pub duration_s: f64,
    pub ship_mass_kg: f64,
    pub exhaust_velocity_m_s: f64,
}

impl TripParameters {
    pub fn new(distance_m: f64, duration_s: f64, ship_mass_kg: f64, exhaust_velocity_m_s: f64) -> Self {
        Self {
            distance_m,
            duration_s,
            ship_mass_kg,
            exhaust_velocity_m_s,
        }
    }

    /// Build parameters from astronomer-friendly units.
    pub fn from_light_years(
        distance_ly: f64,
        duration_years: f64,
        vehicle: &Vehicle,
        drive: ReactionDrive,
    ) -> Self {
        Self::new(
            light_years_to_m(distance_ly),
            years_to_seconds(duration_years),
            vehicle.dry_mass_kg,
            drive.exhaust_velocity_m_s,
        )
    }

    pub fn drive(&self) -> ReactionDrive {
        ReactionDrive::new(self.exhaust_velocity_m_s)
    }

    /// Copy of these parameters with a different exhaust velocity.
    pub fn with_exhaust_velocity(self, exhaust_velocity_m_s: f64) -> Self {
        Self {
            exhaust_velocity_m_s,
            ..self
        }
    }

    /// Reject inputs that would make the model produce NaN or infinity.
    pub fn validate(&self) -> Result<(), TripError> {
        let checks = [
            ("distance", self.distance_m),
            ("duration", self.duration_s),
            ("ship mass", self.ship_mass_kg),
            ("exhaust velocity", self.exhaust_velocity_m_s),
        ];
        for (quantity, value) in checks {
            if !value.is_finite() {
                return Err(TripError::NonFinite { quantity });
            }
            if value <= 0.0 {
                return Err(TripError::NonPositive { quantity, value });
            }
        }
        if !self.drive().is_subluminal() {
            return Err(TripError::SuperluminalExhaust {
                fraction_c: ms_to_fraction_c(self.exhaust_velocity_m_s),
            });
        }
        Ok(())
    }

    /// Validate and derive the pre-flight quantities.
    pub fn plan(&self) -> Result<TripPlan, TripError> {
        self.validate()?;

        let drive = self.drive();
        let acceleration = required_acceleration(self.distance_m, self.duration_s);
        let effective_exhaust = drive.effective_exhaust_velocity();
        let exponent = acceleration * self.duration_s / effective_exhaust;
        // exp_m1 keeps precision when the load is a small fraction of the ship
        let reaction_mass = exponent.exp_m1() * self.ship_mass_kg;
        if !reaction_mass.is_finite() || !(self.ship_mass_kg + reaction_mass).is_finite() {
            return Err(TripError::ReactionMassOverflow { exponent });
        }

        Ok(TripPlan {
            acceleration_m_s2: acceleration,
            flip_time_s: self.duration_s * 0.5,
            relativistic_factor: drive.relativistic_factor(),
            effective_exhaust_velocity_m_s: effective_exhaust,
            specific_energy_j_per_kg: drive.specific_kinetic_energy(),
            rocket_exponent: exponent,
            reaction_mass_kg: reaction_mass,
        })
    }
}

/// Quantities fixed for the whole run once the inputs are known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripPlan {
    pub acceleration_m_s2: f64,
    pub flip_time_s: f64,
    pub relativistic_factor: f64,
    pub effective_exhaust_velocity_m_s: f64,
    pub specific_energy_j_per_kg: f64,
    /// `acceleration * duration / effective_exhaust_velocity`, i.e. ln(initial mass / ship mass).
    pub rocket_exponent: f64,
    pub reaction_mass_kg: f64,
}

impl TripPlan {
    /// Peak velocity of the ideal continuous profile, reached at the flip.
    pub fn ideal_peak_velocity_m_s(&self) -> f64 {
        self.acceleration_m_s2 * self.flip_time_s
    }
}

/// Uniform acceleration covering `distance` in `duration` with a flip at the midpoint.
///
/// Each half covers `distance / 2` in `duration / 2`, so `d/2 = a (t/2)^2 / 2`.
#[inline]
pub fn required_acceleration(distance_m: f64, duration_s: f64) -> f64 {
    4.0 * distance_m / (duration_s * duration_s)
}

/// Reaction mass needed at departure so the tank runs dry exactly on arrival.
pub fn reaction_mass_load(params: &TripParameters) -> Result<f64, TripError> {
    params.plan().map(|plan| plan.reaction_mass_kg)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use interstellar_core::constants::SPEED_OF_LIGHT_M_S;

    use super::*;

    fn reference(fraction_c: f64) -> TripParameters {
        TripParameters::from_light_years(
            10.0,
            100.0,
            &Vehicle::new("Reference", 1.0e6),
            ReactionDrive::from_fraction_c(fraction_c),
        )
    }

    #[test]
    fn acceleration_for_reference_trip() {
        let params = reference(0.5);
        let plan = params.plan().expect("plan");
        // a * T = 4 D / T = 0.4 c
        assert_relative_eq!(
            plan.acceleration_m_s2 * params.duration_s,
            0.4 * SPEED_OF_LIGHT_M_S,
            max_relative = 1e-12
        );
        assert_relative_eq!(plan.flip_time_s, params.duration_s / 2.0);
        assert_relative_eq!(plan.ideal_peak_velocity_m_s(), 0.2 * SPEED_OF_LIGHT_M_S, max_relative = 1e-12);
    }

    #[test]
    fn load_includes_relativistic_correction() {
        let plan = reference(0.5).plan().expect("plan");
        let k = 0.75_f64.sqrt();
        assert_relative_eq!(plan.relativistic_factor, k, max_relative = 1e-12);
        assert_relative_eq!(plan.rocket_exponent, 0.8 * k, max_relative = 1e-12);
        assert_relative_eq!(plan.reaction_mass_kg, (0.8 * k).exp_m1() * 1.0e6, max_relative = 1e-12);
    }

    #[test]
    fn rejects_each_non_positive_input() {
        let base = reference(0.5);
        let cases = [
            (TripParameters { distance_m: 0.0, ..base }, "distance"),
            (TripParameters { duration_s: -1.0, ..base }, "duration"),
            (TripParameters { ship_mass_kg: 0.0, ..base }, "ship mass"),
            (TripParameters { exhaust_velocity_m_s: 0.0, ..base }, "exhaust velocity"),
        ];
        for (params, expected) in cases {
            match params.validate() {
                Err(TripError::NonPositive { quantity, .. }) => assert_eq!(quantity, expected),
                other => panic!("expected NonPositive for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_nan_and_infinite_inputs() {
        let params = TripParameters {
            duration_s: f64::NAN,
            ..reference(0.5)
        };
        assert_eq!(
            params.validate(),
            Err(TripError::NonFinite { quantity: "duration" })
        );
        let params = TripParameters {
            distance_m: f64::INFINITY,
            ..reference(0.5)
        };
        assert!(matches!(params.plan(), Err(TripError::NonFinite { .. })));
    }

    #[test]
    fn rejects_light_speed_exhaust() {
        let err = reference(1.0).plan().unwrap_err();
        assert!(matches!(err, TripError::SuperluminalExhaust { fraction_c } if fraction_c >= 1.0));
    }

    #[test]
    fn crawling_exhaust_overflows_instead_of_diverging() {
        let params = reference(0.5).with_exhaust_velocity(1.0);
        assert!(matches!(
            reaction_mass_load(&params),
            Err(TripError::ReactionMassOverflow { .. })
        ));
    }
}
