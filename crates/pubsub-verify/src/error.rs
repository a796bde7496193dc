//! Error types for corpus verification.

use pubsub_core::{ConfigError, FormatError};
use thiserror::Error;

/// Errors that can occur during verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A subscription line could not be parsed (1-based line number).
    #[error("Malformed subscription on line {line}: {source}")]
    Format {
        line: usize,
        #[source]
        source: FormatError,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON rendering error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
