//! Infrastructure layer: ambient concerns that the domain and application
//! layers never depend on directly — layered configuration and the
//! process's one `tracing-subscriber` wiring (SPEC_FULL §4.8, §4.9).

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, Environment};
pub use error::{Error, Result};
