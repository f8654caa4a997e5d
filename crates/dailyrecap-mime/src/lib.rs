//! # dailyrecap-mime
//!
//! Generation of the single-part HTML message the daily digest is sent as.
//!
//! ## Features
//!
//! - **Message generation**: RFC 5322 headers, CRLF line endings
//! - **Encoding**: Base64 bodies wrapped at 76 columns, RFC 2047 encoded-word headers
//! - **Gmail raw form**: URL-safe Base64 of the whole message for `users.messages.send`
//!
//! ## Quick Start
//!
//! ```ignore
//! use dailyrecap_mime::MessageBuilder;
//!
//! let message = MessageBuilder::new()
//!     .to("me@example.com")
//!     .subject("Daily Recap: March 03, 2025")
//!     .html_body("<h3>Important Emails</h3>")
//!     .build()?;
//!
//! let raw = message.to_gmail_raw();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{MessageBuilder, OutgoingMessage};
