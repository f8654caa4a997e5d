//! MIME encoding utilities.
//!
//! Supports Base64 bodies, RFC 2047 header encoding, and the URL-safe Base64
//! form the Gmail API uses for raw messages.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

/// Maximum encoded line length for message bodies (RFC 2045).
pub const MAX_LINE_LENGTH: usize = 76;

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64 split into CRLF-terminated lines of at most
/// [`MAX_LINE_LENGTH`] characters.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / MAX_LINE_LENGTH * 2 + 2);
    // Base64 output is ASCII, so byte chunks are valid UTF-8.
    for chunk in encoded.as_bytes().chunks(MAX_LINE_LENGTH) {
        result.push_str(&String::from_utf8_lossy(chunk));
        result.push_str("\r\n");
    }
    result
}

/// Encodes data as padded URL-safe Base64, the form of the Gmail `raw` field.
#[must_use]
pub fn encode_base64_url(data: &[u8]) -> String {
    URL_SAFE.encode(data)
}

/// Encodes a header value using RFC 2047 encoding when it is not plain ASCII.
///
/// Format: `=?charset?B?encoded-text?=`
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return text.to_string();
    }

    let encoded = encode_base64(text.as_bytes());
    format!("=?{charset}?B?{encoded}?=")
}
