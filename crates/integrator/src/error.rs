use thiserror::Error;

/// Failures that stop a trip computation. Physical-model warnings are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("{quantity} must be finite")]
    NonFinite { quantity: &'static str },
    #[error("{quantity} must be positive (got {value})")]
    NonPositive { quantity: &'static str, value: f64 },
    #[error("exhaust velocity must be below the speed of light (got {fraction_c:.3} c)")]
    SuperluminalExhaust { fraction_c: f64 },
    #[error("integration time step must be positive and finite (got {0} s)")]
    InvalidTimeStep(f64),
    #[error("trace interval must be positive and finite (got {0} s)")]
    InvalidTraceInterval(f64),
    #[error("reaction mass is not representable: rocket-equation exponent {exponent:.3e}")]
    ReactionMassOverflow { exponent: f64 },
    #[error("reaction-mass tank still not empty after {steps} integration steps")]
    NonConvergence { steps: u64 },
}
