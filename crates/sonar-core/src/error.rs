//! Error types for the Sonar core library.

use thiserror::Error;

/// Result type alias using Sonar Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Sonar operations.
///
/// Suggestion sources never let these escape to the address bar: the remote
/// client and the reference-data loader log them and fall back to empty data.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Phrase or site list could not be loaded
    #[error("Reference data error: {0}")]
    ReferenceData(String),

    /// Remote completion service returned something unusable
    #[error("Suggestion transport error: {0}")]
    Transport(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
