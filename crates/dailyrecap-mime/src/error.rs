//! Errors raised while building or encoding an outgoing message.

/// Result alias for message construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Message construction errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A header that would corrupt the message if written (bad name, embedded CR/LF).
    #[error("Invalid MIME header: {0}")]
    InvalidHeader(String),

    /// A header the message cannot go out without.
    #[error("Missing required header: {0}")]
    MissingHeader(String),
}
