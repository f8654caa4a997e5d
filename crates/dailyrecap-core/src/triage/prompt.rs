//! Classification prompt and function schema.

use super::model::Category;
use crate::llm::FunctionSpec;
use crate::mail::Message;
use serde_json::json;

pub(super) const FUNCTION_NAME: &str = "classify_and_summarize";

pub(super) const SYSTEM_PROMPT: &str = "You are an email classification and summarization service. \
Categorize each email into exactly one of: 'newsletter', 'notification', or 'important'. \
Then produce a concise summary in Markdown, carefully extracting key points without omitting vital information. \
If the email references new invitations, messages, or calls to action, include them. \
Only use details from the subject/snippet. Do not invent or guess details.";

const FUNCTION_DESCRIPTION: &str = "Classify an email into exactly one category: \
newsletter, notification, or important. Also provide a short, neatly formatted Markdown summary.";

const CATEGORY_DESCRIPTION: &str = "Which category the email belongs to. Must be exactly one of:\n\n\
1) newsletter\n\
2) notification\n\
3) important";

const SUMMARY_DESCRIPTION: &str = "A concise Markdown summary of the key points from the email. \
Include relevant next steps or instructions if the email references new invitations, messages, \
or any call to action. Label these steps appropriately. Keep it neatly formatted in MD.";

pub(super) fn function_spec() -> FunctionSpec {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    FunctionSpec {
        name: FUNCTION_NAME.to_string(),
        description: FUNCTION_DESCRIPTION.to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": categories,
                    "description": CATEGORY_DESCRIPTION
                },
                "summary": {
                    "type": "string",
                    "description": SUMMARY_DESCRIPTION
                }
            },
            "required": ["category", "summary"],
            "additionalProperties": false
        }),
    }
}

pub(super) fn user_prompt(message: &Message) -> String {
    format!(
        "Subject: {}\n\nEmail snippet:\n{}",
        message.subject, message.snippet
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_enumerates_every_category() {
        let function = function_spec();
        assert_eq!(function.name, "classify_and_summarize");
        assert_eq!(
            function.parameters["properties"]["category"]["enum"],
            json!(["important", "notification", "newsletter"])
        );
        assert_eq!(function.parameters["required"], json!(["category", "summary"]));
        assert_eq!(function.parameters["additionalProperties"], json!(false));
    }

    #[test]
    fn test_schema_carries_summary_guidance() {
        let function = function_spec();
        assert!(function.description.starts_with("Classify an email into exactly one category"));

        let category = function.parameters["properties"]["category"]["description"]
            .as_str()
            .unwrap();
        assert!(category.ends_with("1) newsletter\n2) notification\n3) important"));

        let summary = function.parameters["properties"]["summary"]["description"]
            .as_str()
            .unwrap();
        assert!(summary.contains("Include relevant next steps or instructions"));
        assert!(summary.ends_with("Label these steps appropriately. Keep it neatly formatted in MD."));
    }

    #[test]
    fn test_user_prompt_layout() {
        let message = Message::new("1", "Invoice", "Amount due: $10");
        assert_eq!(
            user_prompt(&message),
            "Subject: Invoice\n\nEmail snippet:\nAmount due: $10"
        );
    }
}
