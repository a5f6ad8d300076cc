//! Error types for the exchange hub.

use thiserror::Error;

/// Common error type for the exchange hub.
#[derive(Error, Debug)]
pub enum HubError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for user input or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP error while talking to the pricing service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The pricing service answered with a body we could not understand.
    #[error("malformed payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for HubError {
    fn from(e: reqwest::Error) -> Self {
        HubError::Http(e.to_string())
    }
}

/// Result type alias for exchange hub operations.
pub type Result<T> = std::result::Result<T, HubError>;
