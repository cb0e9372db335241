//! Core constants and unit conversions shared across the Interstellar Trip Calculator workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Speed of light used throughout the model (m/s).
    ///
    /// The rounded value keeps the light-year and the exhaust sweep on the
    /// same grid as the reference tables.
    pub const SPEED_OF_LIGHT_M_S: f64 = 3.0e8;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Days per (calendar, non-leap) year.
    pub const DAYS_PER_YEAR: f64 = 365.0;
    /// Seconds per 365-day year.
    pub const SECONDS_PER_YEAR: f64 = DAYS_PER_YEAR * SECONDS_PER_DAY;
    /// Metres per light-year, consistent with [`SPEED_OF_LIGHT_M_S`] and [`SECONDS_PER_YEAR`].
    pub const METERS_PER_LIGHT_YEAR: f64 = SPEED_OF_LIGHT_M_S * SECONDS_PER_YEAR;
    /// Joules per megawatt-hour.
    pub const JOULES_PER_MWH: f64 = 3.6e9;
    /// Combined generating capacity of the Palo Verde plant (MW).
    pub const PALO_VERDE_CAPACITY_MW: f64 = 3_937.0;
    /// One year of Palo Verde output (≈1.24e17 J).
    pub const PALO_VERDE_JOULES_PER_YEAR: f64 =
        PALO_VERDE_CAPACITY_MW * 24.0 * DAYS_PER_YEAR * JOULES_PER_MWH;
    /// Peak v/c above which Newtonian ship kinematics stop being trustworthy.
    pub const RELATIVISTIC_VELOCITY_WARNING: f64 = 0.4;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{METERS_PER_LIGHT_YEAR, PALO_VERDE_JOULES_PER_YEAR, SPEED_OF_LIGHT_M_S};

    /// Convert light-years to metres.
    #[inline]
    pub fn light_years_to_m(v: f64) -> f64 {
        v * METERS_PER_LIGHT_YEAR
    }

    /// Convert metres to light-years.
    #[inline]
    pub fn m_to_light_years(v: f64) -> f64 {
        v / METERS_PER_LIGHT_YEAR
    }

    /// Express a speed in m/s as a fraction of c.
    #[inline]
    pub fn ms_to_fraction_c(v: f64) -> f64 {
        v / SPEED_OF_LIGHT_M_S
    }

    /// Convert a fraction of c to m/s.
    #[inline]
    pub fn fraction_c_to_ms(v: f64) -> f64 {
        v * SPEED_OF_LIGHT_M_S
    }

    /// Convert joules to PaloVerde-years.
    #[inline]
    pub fn joules_to_palo_verde_years(e: f64) -> f64 {
        e / PALO_VERDE_JOULES_PER_YEAR
    }

    /// Convert PaloVerde-years to joules.
    #[inline]
    pub fn palo_verde_years_to_joules(e: f64) -> f64 {
        e * PALO_VERDE_JOULES_PER_YEAR
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_YEAR};

    /// Convert years to seconds.
    #[inline]
    pub fn years_to_seconds(years: f64) -> f64 {
        years * SECONDS_PER_YEAR
    }

    /// Convert seconds to years.
    #[inline]
    pub fn seconds_to_years(seconds: f64) -> f64 {
        seconds / SECONDS_PER_YEAR
    }

    /// Convert hours to seconds.
    #[inline]
    pub fn hours_to_seconds(hours: f64) -> f64 {
        hours * 3_600.0
    }

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }
}
