//! Error types for the dashboard client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the credential
    #[error("Authentication rejected: {0}")]
    AuthRejected(String),

    /// The server URL cannot be parsed
    #[error("Invalid server URL '{0}': {1}")]
    InvalidUrl(String, String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
