//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] dailyrecap_oauth::Error),

    /// Mail provider request failed.
    #[error("Mail error: {0}")]
    Mail(#[from] crate::mail::MailError),

    /// Language model request failed.
    #[error("Language model error: {0}")]
    Llm(#[from] crate::llm::LlmError),

    /// Building the outgoing message failed.
    #[error("MIME error: {0}")]
    Mime(#[from] dailyrecap_mime::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
