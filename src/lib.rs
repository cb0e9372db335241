//! Constant-acceleration interstellar trip calculator.
//!
//! The physics lives in the member crates; this facade re-exports them so
//! front-ends (the CLI, plotting tools, tests) depend on a single crate.

pub use interstellar_config as config;
pub use interstellar_core as core;
pub use interstellar_export as export;
pub use interstellar_integrator as integrator;
pub use interstellar_propulsion as propulsion;
pub use interstellar_sweep as sweep;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
