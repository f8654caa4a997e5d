//! MIME content type.

use std::collections::BTreeMap;
use std::fmt;

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text").
    pub main_type: String,
    /// Subtype (e.g., "html").
    pub sub_type: String,
    /// Parameters (e.g., charset), kept sorted so output is stable.
    pub parameters: BTreeMap<String, String>,
}

impl ContentType {
    /// Creates a content type without parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into().to_lowercase(),
            sub_type: sub_type.into().to_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    /// `text/plain; charset=utf-8`.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// `text/html; charset=utf-8`.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// Adds a parameter. Names are case-insensitive and stored lowercase.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .insert(key.into().to_lowercase(), value.into());
        self
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        for (key, value) in &self.parameters {
            if value.contains(|c: char| c.is_whitespace() || "()<>@,;:\\\"/[]?=".contains(c)) {
                write!(f, "; {key}=\"{value}\"")?;
            } else {
                write!(f, "; {key}={value}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_html() {
        let ct = ContentType::text_html();
        assert_eq!((ct.main_type.as_str(), ct.sub_type.as_str()), ("text", "html"));
        assert_eq!(ct.parameters.get("charset").map(String::as_str), Some("utf-8"));
        assert_eq!(ct.to_string(), "text/html; charset=utf-8");
    }

    #[test]
    fn test_display_is_sorted_and_quoted() {
        let ct = ContentType::new("Text", "Plain")
            .with_parameter("format", "flowed")
            .with_parameter("Charset", "utf-8")
            .with_parameter("name", "a b.txt");
        assert_eq!(
            ct.to_string(),
            "text/plain; charset=utf-8; format=flowed; name=\"a b.txt\""
        );
    }
}
