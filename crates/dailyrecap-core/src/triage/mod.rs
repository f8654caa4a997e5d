//! Per-message classification and summarization.
//!
//! Each message gets exactly one structured request. Anything short of a
//! well-formed answer is classified [`Category::Important`], so a failure can
//! never cause a message to be marked read unseen.

mod model;
mod prompt;

pub use model::{Category, Classification, ClassifiedMessage, UnknownCategory};

use crate::llm::{FunctionRequest, FunctionSpec, LanguageModel, LlmError};
use crate::mail::Message;
use serde::Deserialize;
use tracing::{debug, error, warn};

const NO_FUNCTION_CALL: &str =
    "Unable to parse email with function calling. Defaulting to 'important'.";
const NO_SUMMARY: &str = "_No summary returned._";

#[derive(Debug, Deserialize)]
struct RawClassification {
    category: Option<String>,
    summary: Option<String>,
}

/// Classifies messages with a language model.
pub struct Classifier<'a> {
    model: &'a dyn LanguageModel,
    model_name: String,
    function: FunctionSpec,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier that sends requests to `model_name` through `model`.
    #[must_use]
    pub fn new(model: &'a dyn LanguageModel, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            function: prompt::function_spec(),
        }
    }

    /// Classifies one message. Never fails; see the module docs.
    pub async fn classify(&self, message: &Message) -> Classification {
        let user = prompt::user_prompt(message);
        let request = FunctionRequest {
            model: &self.model_name,
            system: prompt::SYSTEM_PROMPT,
            user: &user,
            function: &self.function,
        };

        match self.model.call_function(request).await {
            Ok(arguments) => interpret(arguments.as_deref()),
            Err(e) => {
                error!("Error classifying/summarizing email {}: {e}", message.id);
                request_failed(&e)
            }
        }
    }

    /// Classifies messages one after another, preserving order.
    pub async fn classify_all(&self, messages: Vec<Message>) -> Vec<ClassifiedMessage> {
        let mut classified = Vec::with_capacity(messages.len());
        for message in messages {
            let classification = self.classify(&message).await;
            debug!(id = %message.id, category = %classification.category, "classified");
            classified.push(ClassifiedMessage {
                message,
                classification,
            });
        }
        classified
    }
}

fn request_failed(e: &LlmError) -> Classification {
    Classification::fallback(format!(
        "Error occurred. Defaulting to category 'important'.\n\n**Details:** {e}"
    ))
}

/// Turns raw function arguments into a classification.
///
/// `None` means the model answered without calling the function.
#[must_use]
pub fn interpret(arguments: Option<&str>) -> Classification {
    let Some(arguments) = arguments else {
        warn!("No function call in classification response");
        return Classification::fallback(NO_FUNCTION_CALL);
    };

    let raw: RawClassification = match serde_json::from_str(arguments) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Malformed classification arguments: {e}");
            return Classification::fallback(format!(
                "Unable to parse the classification response. Defaulting to 'important'.\n\n**Details:** {e}"
            ));
        }
    };

    let summary = raw
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match raw.category.as_deref().map(str::parse::<Category>) {
        Some(Ok(category)) => {
            Classification::new(category, summary.unwrap_or_else(|| NO_SUMMARY.to_string()))
        }
        other => {
            let reason = match other {
                Some(Err(UnknownCategory(name))) => format!("unknown category {name:?}"),
                _ => "no category".to_string(),
            };
            warn!("Classification response had {reason}, defaulting to important");
            Classification::fallback(summary.unwrap_or_else(|| {
                format!("Classification response had {reason}. Defaulting to 'important'.")
            }))
        }
    }
}
