//! Error handling types for the application layer.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application layer
#[derive(Error, Debug)]
pub enum Error {
    /// A domain-layer failure (evaluation, rule shape, unknown hook, ...)
    #[error(transparent)]
    Domain(#[from] bcscan_domain::Error),

    /// A rule file could not be read from disk
    #[error("failed to read rule file {path}")]
    RuleFileRead {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A rule file's YAML could not be parsed into the rule model
    #[error("failed to parse rule file {path}")]
    RuleFileParse {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying YAML failure
        #[source]
        source: serde_yaml::Error,
    },

    /// The rule directory itself could not be read (fatal per §4.1)
    #[error("failed to read rules directory {path}")]
    RulesDirectoryRead {
        /// Path of the directory
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}
