//! Structured logging setup (SPEC_FULL §4.9).
//!
//! The only place in the workspace that depends on `tracing-subscriber`;
//! every other crate logs through the `tracing` facade alone.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Environment;

/// Install the global `tracing` subscriber for the given environment.
/// Development gets human-readable, ANSI-colored output; production gets
/// JSON lines to stdout. Reads the standard `RUST_LOG` filter, defaulting
/// to `info`.
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match environment {
        Environment::Development => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(true)
                .init();
        }
        Environment::Production => {
            fmt()
                .with_env_filter(filter)
                .json()
                .with_target(true)
                .with_current_span(true)
                .init();
        }
    }
}
