//! Markdown to HTML through the language model.

use crate::llm::LanguageModel;
use tracing::{error, info};

/// Asks the model to convert `markdown` to HTML.
///
/// Never fails: on any error the result is a one-paragraph HTML error notice,
/// so the digest still goes out.
pub async fn convert_to_html(model: &dyn LanguageModel, model_name: &str, markdown: &str) -> String {
    let prompt = format!("Convert the following Markdown to HTML.\n\n{markdown}");

    match model.complete(model_name, &prompt).await {
        Ok(reply) => {
            let html = strip_code_fences(&reply);
            if html.is_empty() {
                error!("Markdown conversion returned only code fences");
                return error_placeholder("empty response");
            }
            info!("Converted digest to HTML ({} bytes)", html.len());
            html
        }
        Err(e) => {
            error!("Error converting Markdown to HTML: {e}");
            error_placeholder(&e.to_string())
        }
    }
}

fn error_placeholder(reason: &str) -> String {
    format!(
        "<p>Error converting Markdown to HTML: {}</p>",
        escape_html(reason)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// A line opening or closing a fenced block: three or more backticks and an
/// optional language tag.
fn is_fence(line: &str) -> bool {
    let line = line.trim();
    let tag = line.trim_start_matches('`');
    line.len() - tag.len() >= 3
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

/// Unwraps a fenced reply and trims surrounding whitespace.
///
/// With two or more fence lines, everything outside the outermost pair is
/// commentary and is dropped, as are the two fences. A lone fence is dropped
/// only when it is the first or the last line. Text without fences is only
/// trimmed.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    let lines: Vec<&str> = text.trim().lines().collect();
    let fences: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_fence(line))
        .map(|(i, _)| i)
        .collect();

    let body = match (fences.first(), fences.last()) {
        (Some(&open), Some(&close)) if open < close => &lines[open + 1..close],
        (Some(&0), _) => &lines[1..],
        (Some(&only), _) if only + 1 == lines.len() => &lines[..only],
        _ => &lines[..],
    };
    body.join("\n").trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::{FunctionRequest, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Converter {
        reply: Mutex<Option<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Converter {
        fn new(reply: Result<String, LlmError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for Converter {
        async fn call_function(
            &self,
            _request: FunctionRequest<'_>,
        ) -> Result<Option<String>, LlmError> {
            unreachable!("conversion is free text")
        }

        async fn complete(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
            assert_eq!(model, "o1-preview");
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.lock().unwrap().take().unwrap()
        }
    }

    #[test]
    fn test_strip_html_fence() {
        let reply = "```html\n<h3>Important Emails</h3>\n<p>x</p>\n```";
        assert_eq!(strip_code_fences(reply), "<h3>Important Emails</h3>\n<p>x</p>");
    }

    #[test]
    fn test_strip_bare_fence_with_padding() {
        let reply = "\n\n```\n<p>x</p>\n```\n\n";
        assert_eq!(strip_code_fences(reply), "<p>x</p>");
    }

    #[test]
    fn test_unfenced_reply_untouched() {
        let reply = "<h3>A</h3>\n<p>first</p>\n<p>last</p>";
        assert_eq!(strip_code_fences(reply), reply);
    }

    #[test]
    fn test_inner_fences_kept() {
        let reply = "```html\n<pre>\n```rust\nfn main() {}\n```\n</pre>\n```";
        assert_eq!(
            strip_code_fences(reply),
            "<pre>\n```rust\nfn main() {}\n```\n</pre>"
        );
    }

    #[test]
    fn test_preamble_and_postamble_dropped() {
        let reply = "Here is the HTML:\n```html\n<p>x</p>\n```\nLet me know if you need changes.";
        assert_eq!(strip_code_fences(reply), "<p>x</p>");
    }

    #[test]
    fn test_unclosed_fence_dropped() {
        assert_eq!(strip_code_fences("```html\n<p>x</p>"), "<p>x</p>");
        assert_eq!(strip_code_fences("<p>x</p>\n```"), "<p>x</p>");
    }

    #[test]
    fn test_backticks_in_text_are_not_fences() {
        assert!(!is_fence("``"));
        assert!(!is_fence("```html <p>"));
        assert!(is_fence("  ```HTML  "));
    }

    #[tokio::test]
    async fn test_convert_prompt_and_stripping() {
        let model = Converter::new(Ok("```html\n<p>ok</p>\n```".to_string()));
        let html = convert_to_html(&model, "o1-preview", "**bold**").await;

        assert_eq!(html, "<p>ok</p>");
        assert_eq!(
            model.prompts.lock().unwrap().as_slice(),
            ["Convert the following Markdown to HTML.\n\n**bold**"]
        );
    }

    #[tokio::test]
    async fn test_convert_error_placeholder() {
        let model = Converter::new(Err(LlmError::Api {
            status: 500,
            message: "<oops>".to_string(),
        }));
        let html = convert_to_html(&model, "o1-preview", "x").await;
        assert_eq!(
            html,
            "<p>Error converting Markdown to HTML: API error 500: &lt;oops&gt;</p>"
        );
    }

    #[tokio::test]
    async fn test_convert_only_fences() {
        let model = Converter::new(Ok("```\n```".to_string()));
        let html = convert_to_html(&model, "o1-preview", "x").await;
        assert!(html.starts_with("<p>Error converting Markdown to HTML"));
    }
}
