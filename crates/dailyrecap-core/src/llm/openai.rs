//! `OpenAI` chat completions client.

use super::wire::{
    AssistantMessage, ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope, Tool, ToolChoice,
    ToolChoiceFunction, ToolFunction,
};
use super::{FunctionRequest, LanguageModel, LlmError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Default `OpenAI` API root.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Minimal `OpenAI` client: one chat completion per call, no streaming.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Creates a client against [`OPENAI_API_BASE`].
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: OPENAI_API_BASE.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Points the client at another API root (tests, compatible gateways).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn chat(&self, request: &ChatRequest<'_>) -> Result<AssistantMessage, LlmError> {
        debug!(model = request.model, "chat completion request");
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn call_function(&self, request: FunctionRequest<'_>) -> Result<Option<String>, LlmError> {
        let function = request.function;
        let chat = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            tools: vec![Tool {
                kind: "function",
                function: ToolFunction {
                    name: &function.name,
                    description: &function.description,
                    parameters: &function.parameters,
                    strict: true,
                },
            }],
            tool_choice: Some(ToolChoice {
                kind: "function",
                function: ToolChoiceFunction {
                    name: &function.name,
                },
            }),
        };

        let message = self.chat(&chat).await?;
        let call = message
            .tool_calls
            .into_iter()
            .map(|call| call.function)
            .chain(message.function_call)
            .find(|call| call.name == function.name);
        Ok(call.map(|call| call.arguments))
    }

    async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let chat = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            tools: Vec::new(),
            tool_choice: None,
        };

        self.chat(&chat)
            .await?
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}
