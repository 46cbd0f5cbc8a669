//! Error types for the Appwrite client.

use thiserror::Error;

/// Result type for Appwrite client operations.
pub type Result<T> = std::result::Result<T, AppwriteError>;

/// Appwrite client errors.
#[derive(Debug, Error)]
pub enum AppwriteError {
    /// API error (non-2xx response from Appwrite)
    #[error("Appwrite API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}
