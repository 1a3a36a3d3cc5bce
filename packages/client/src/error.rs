//! Error types for the Courtyard client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not connect, or the connection was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Could not encode an outgoing message
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from parsing a typed command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a number")]
    NotANumber(String),
}
