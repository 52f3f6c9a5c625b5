//! Error handling types for the infrastructure layer.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the infrastructure layer
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be assembled from its layered sources.
    /// Fatal at startup: a process that cannot read its own
    /// configuration cannot safely run (§7).
    #[error("failed to load configuration: {0}")]
    Config(#[from] figment::Error),
}
