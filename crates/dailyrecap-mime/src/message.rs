//! Outgoing message construction.

use crate::content_type::ContentType;
use crate::encoding::{encode_base64_url, encode_base64_wrapped};
use crate::error::{Error, Result};
use crate::header::Headers;
use chrono::{DateTime, Utc};

/// A finished single-part message, ready to serialize.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    headers: Headers,
    body: String,
}

impl OutgoingMessage {
    /// The header block.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The unencoded body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Serializes to RFC 5322 text with CRLF line endings and a Base64 body.
    #[must_use]
    pub fn to_rfc5322(&self) -> String {
        format!(
            "{}\r\n{}",
            self.headers,
            encode_base64_wrapped(self.body.as_bytes())
        )
    }

    /// The whole message as URL-safe Base64, the `raw` field of a Gmail send.
    #[must_use]
    pub fn to_gmail_raw(&self) -> String {
        encode_base64_url(self.to_rfc5322().as_bytes())
    }
}

/// Builder for [`OutgoingMessage`].
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    to: Vec<String>,
    subject: Option<String>,
    date: Option<DateTime<Utc>>,
    content_type: Option<ContentType>,
    body: String,
}

impl MessageBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the `Date` header. Defaults to the build time.
    #[must_use]
    pub const fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets an HTML body.
    #[must_use]
    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.content_type = Some(ContentType::text_html());
        self.body = html.into();
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHeader`] without a recipient, and
    /// [`Error::InvalidHeader`] if any header value contains a line break.
    pub fn build(self) -> Result<OutgoingMessage> {
        if self.to.is_empty() {
            return Err(Error::MissingHeader("To".to_string()));
        }

        let mut headers = Headers::new();
        headers.set("To", self.to.join(", "))?;
        headers.set_text("Subject", self.subject.as_deref().unwrap_or_default())?;
        headers.set(
            "Date",
            self.date.unwrap_or_else(Utc::now).to_rfc2822(),
        )?;
        headers.set("MIME-Version", "1.0")?;
        headers.set(
            "Content-Type",
            self.content_type
                .unwrap_or_else(ContentType::text_plain)
                .to_string(),
        )?;
        headers.set("Content-Transfer-Encoding", "base64")?;

        Ok(OutgoingMessage {
            headers,
            body: self.body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE};
    use chrono::TimeZone;

    fn sample() -> OutgoingMessage {
        MessageBuilder::new()
            .to("me@example.com")
            .subject("Daily Recap: March 03, 2025")
            .date(Utc.with_ymd_and_hms(2025, 3, 3, 7, 0, 0).unwrap())
            .html_body("<h3>Important Emails</h3>\n<p>Caf\u{e9}</p>")
            .build()
            .unwrap()
    }

    #[test]
    fn test_html_message_headers() {
        let message = sample();
        let headers = message.headers();
        assert_eq!(headers.get("To"), Some("me@example.com"));
        assert_eq!(headers.get("Subject"), Some("Daily Recap: March 03, 2025"));
        assert_eq!(headers.get("Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(headers.get("Content-Transfer-Encoding"), Some("base64"));
        let date = headers.get("Date").unwrap();
        assert!(date.starts_with("Mon, "));
        assert!(date.ends_with("3 Mar 2025 07:00:00 +0000"));
        assert!(headers.get("From").is_none());
    }

    #[test]
    fn test_rfc5322_layout() {
        let text = sample().to_rfc5322();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("To: me@example.com\r\n"));

        let encoded: String = body.split("\r\n").collect();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "<h3>Important Emails</h3>\n<p>Caf\u{e9}</p>");
    }

    #[test]
    fn test_gmail_raw_decodes_to_message() {
        let message = sample();
        let raw = message.to_gmail_raw();
        let decoded = URL_SAFE.decode(&raw).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), message.to_rfc5322());
    }

    #[test]
    fn test_missing_recipient() {
        let err = MessageBuilder::new().subject("x").build().unwrap_err();
        assert!(matches!(err, Error::MissingHeader(ref h) if h == "To"));
    }

    #[test]
    fn test_recipient_with_line_break_rejected() {
        let err = MessageBuilder::new()
            .to("me@example.com\r\nBcc: other@example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }
}
