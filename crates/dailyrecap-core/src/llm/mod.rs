//! Language model access.

mod openai;
mod wire;

pub use openai::{OPENAI_API_BASE, OpenAiClient};

use async_trait::async_trait;
use serde_json::Value;

/// Errors from the language model service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The response had no content.
    #[error("Empty response from model")]
    EmptyResponse,
}

/// A function the model is forced to call, described by a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    /// Function name.
    pub name: String,
    /// What the function is for.
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

/// A single structured request.
#[derive(Debug, Clone, Copy)]
pub struct FunctionRequest<'a> {
    /// Model name.
    pub model: &'a str,
    /// System instruction.
    pub system: &'a str,
    /// User content.
    pub user: &'a str,
    /// The function the model must call.
    pub function: &'a FunctionSpec,
}

/// The two request shapes a recap run makes.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Forces a call of `request.function` and returns its raw JSON arguments,
    /// or `None` when the model answered without calling it.
    async fn call_function(&self, request: FunctionRequest<'_>) -> Result<Option<String>, LlmError>;

    /// Sends a single user prompt and returns the reply text.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}
