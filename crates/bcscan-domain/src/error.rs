//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the rule engine's domain layer
#[derive(Error, Debug)]
pub enum Error {
    /// A rule file failed validation at load time
    #[error("invalid rule '{name}': {reason}")]
    InvalidRule {
        /// Name of the rule that failed validation (empty if unparseable)
        name: String,
        /// Human-readable reason
        reason: String,
    },

    /// An identifier in an expression could not be resolved against the context
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// An operator is not valid for the operand types it was given
    #[error("unsupported operator '{operator}' for {operand_kind} comparison")]
    UnsupportedOperator {
        /// The operator token
        operator: String,
        /// Description of the operand type (e.g. "string")
        operand_kind: String,
    },

    /// A literal in an expression could not be parsed
    #[error("failed to parse value '{value}': {reason}")]
    InvalidLiteral {
        /// The raw token that failed to parse
        value: String,
        /// Why it failed
        reason: String,
    },

    /// An expression is malformed (e.g. no recognizable operator)
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// A hook name referenced by a rule does not resolve to a registered hook
    #[error("unknown hook: {0}")]
    UnknownHook(String),

    /// Generic infrastructure failure, wrapped at the port boundary
    #[error("{message}")]
    Infrastructure {
        /// Description of the failure
        message: String,
        /// Optional underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Wrap an infrastructure-layer failure with a message
    pub fn infrastructure<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap an infrastructure-layer failure with a message and no source
    pub fn infrastructure_msg<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }
}
