//! Mail provider access.
//!
//! The pipeline talks to the provider only through [`Mailbox`], so tests can
//! swap in an in-memory implementation. [`GmailClient`] is the real one.

mod gmail;
mod wire;

pub use gmail::{GMAIL_API_BASE, GmailClient};

use async_trait::async_trait;
use dailyrecap_mime::OutgoingMessage;

/// Subject used when a message has no `Subject` header.
pub const NO_SUBJECT: &str = "(No Subject)";

/// Errors from the mail provider.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The access token was rejected.
    #[error("Access token rejected by the mail provider")]
    Unauthorized,

    /// The API answered with an error status.
    #[error("Mail API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// The API answered successfully with something we can't use.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// A fetched message. Only the parts the classifier sees are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Provider message id.
    pub id: String,
    /// Decoded subject, or [`NO_SUBJECT`].
    pub subject: String,
    /// Short plain-text preview supplied by the provider.
    pub snippet: String,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            snippet: snippet.into(),
        }
    }
}

/// One page of a message search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePage {
    /// Ids on this page.
    pub ids: Vec<String>,
    /// Token for the next page, absent on the last one.
    pub next_page_token: Option<String>,
}

/// The mail operations a recap run needs.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Lists one page of message ids matching `query`.
    async fn list_messages(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, MailError>;

    /// Fetches subject and snippet of one message.
    async fn get_message(&self, id: &str) -> Result<Message, MailError>;

    /// Clears the unread flag.
    async fn mark_read(&self, id: &str) -> Result<(), MailError>;

    /// Sends a message and returns the provider's id for it.
    async fn send(&self, message: &OutgoingMessage) -> Result<String, MailError>;

    /// Address of the authenticated account.
    async fn own_address(&self) -> Result<String, MailError>;
}
