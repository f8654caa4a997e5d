//! # dailyrecap-core
//!
//! The daily recap run: pull the last day's unread mail, have a language model
//! sort and summarize it, mark what doesn't need attention as read, and mail
//! back a digest.
//!
//! This crate provides:
//! - **Settings** - file locations, models, and endpoints
//! - **Mailbox** - the Gmail REST client behind the [`Mailbox`] trait
//! - **Language model** - the `OpenAI` client behind the [`LanguageModel`] trait
//! - **Fetcher** - best-effort listing of unread messages
//! - **Classifier** - per-message category and summary, failing safe to "important"
//! - **Mutator** - clears the unread flag on everything not important
//! - **Reporter** - markdown digest, HTML conversion, delivery
//! - **Pipeline** - the stages above in order

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod digest;
mod error;
pub mod fetch;
pub mod llm;
pub mod mail;
pub mod mutate;
pub mod pipeline;
pub mod triage;

pub use config::Settings;
pub use digest::{Digest, convert_to_html, send_digest, strip_code_fences};
pub use error::{Error, Result};
pub use fetch::fetch_unread;
pub use llm::{FunctionSpec, LanguageModel, LlmError, OpenAiClient};
pub use mail::{GmailClient, MailError, Mailbox, Message, MessagePage};
pub use mutate::{MarkReport, mark_non_important_read};
pub use pipeline::{RunSummary, run};
pub use triage::{Category, Classification, ClassifiedMessage, Classifier};
