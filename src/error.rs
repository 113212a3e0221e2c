//! Error types for the gridlearn crate

use thiserror::Error;

/// Main error type for the gridlearn crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("layout() must be called before {operation}")]
    NotLaidOut { operation: String },

    #[error("action '{action}' is not part of the action space")]
    UnknownAction { action: String },

    #[error("catch_up() requires delayed learning to be enabled")]
    DelayedLearningInactive,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn not_laid_out(operation: &str) -> Self {
        Error::NotLaidOut {
            operation: operation.to_string(),
        }
    }
}
