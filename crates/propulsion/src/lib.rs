//! Reaction drive descriptors and vehicle mass properties.

use interstellar_core::constants::SPEED_OF_LIGHT_M_S;

/// A drive that expels reaction mass at a constant velocity relative to the ship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionDrive {
    pub exhaust_velocity_m_s: f64,
}

impl ReactionDrive {
    pub fn new(exhaust_velocity_m_s: f64) -> Self {
        Self {
            exhaust_velocity_m_s,
        }
    }

    /// Build a drive from an exhaust velocity given as a fraction of c.
    pub fn from_fraction_c(fraction: f64) -> Self {
        Self::new(fraction * SPEED_OF_LIGHT_M_S)
    }

    /// Exhaust velocity as a fraction of c.
    pub fn fraction_c(&self) -> f64 {
        self.exhaust_velocity_m_s / SPEED_OF_LIGHT_M_S
    }

    /// True when the exhaust is strictly slower than light, i.e. K is real and non-zero.
    pub fn is_subluminal(&self) -> bool {
        self.exhaust_velocity_m_s.abs() < SPEED_OF_LIGHT_M_S
    }

    /// Relativistic factor `K = sqrt(1 - (v/c)^2)`, the reciprocal of the exhaust's Lorentz factor.
    ///
    /// NaN for superluminal exhaust; callers validate first.
    pub fn relativistic_factor(&self) -> f64 {
        let beta = self.fraction_c();
        (1.0 - beta * beta).sqrt()
    }

    /// Exhaust velocity scaled by the Lorentz factor (`v / K`).
    ///
    /// Momentum carried per kilogram of expelled mass is `m * v / K`, so this is the
    /// velocity that enters the rocket equation.
    pub fn effective_exhaust_velocity(&self) -> f64 {
        self.exhaust_velocity_m_s / self.relativistic_factor()
    }

    /// Kinetic energy given to each kilogram of expelled mass, `c^2 (1/K - 1)`.
    pub fn specific_kinetic_energy(&self) -> f64 {
        SPEED_OF_LIGHT_M_S * SPEED_OF_LIGHT_M_S * (1.0 / self.relativistic_factor() - 1.0)
    }
}

/// Ship definition: everything except the reaction mass.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub name: String,
    pub dry_mass_kg: f64,
}

impl Vehicle {
    pub fn new(name: impl Into<String>, dry_mass_kg: f64) -> Self {
        Self {
            name: name.into(),
            dry_mass_kg,
        }
    }

    /// Total mass at departure once the tank holds `reaction_mass_kg`.
    pub fn initial_mass_kg(&self, reaction_mass_kg: f64) -> f64 {
        self.dry_mass_kg + reaction_mass_kg
    }
}
