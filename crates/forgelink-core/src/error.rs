//! Error types for forgelink.

use thiserror::Error;

/// Main error type for remote-tracker operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication rejected by the remote API
    #[error("Authentication error: {status} - {message}")]
    Auth { status: u16, message: String },

    /// API returned a non-2xx status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be interpreted, or a domain lookup failed
    #[error("{0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map an HTTP status and response body to the right variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Error::Auth { status, message },
            _ => Error::Api { status, message },
        }
    }
}

/// Result type alias for forgelink operations.
pub type Result<T> = std::result::Result<T, Error>;
