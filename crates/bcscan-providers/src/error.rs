//! Error handling types for the providers layer.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the providers layer. Converts into
/// [`bcscan_domain::Error`] at the port boundary (§7).
#[derive(Error, Debug)]
pub enum Error {
    /// A Redis command failed (connection, protocol, or server error)
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A cached or published payload was not valid JSON for its expected type
    #[error("failed to (de)serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A Postgres query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<Error> for bcscan_domain::Error {
    fn from(err: Error) -> Self {
        bcscan_domain::Error::infrastructure("provider adapter failed", err)
    }
}
