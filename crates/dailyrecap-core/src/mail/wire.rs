//! Gmail REST v1 request and response bodies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MessageListResponse {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageDetail {
    pub id: String,
    #[serde(default)]
    pub snippet: String,
    pub payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Header {
    pub name: String,
    pub value: String,
}

impl MessageDetail {
    /// First header named `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload
            .as_ref()?
            .headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ModifyRequest<'a> {
    pub remove_label_ids: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub(super) struct SendRequest {
    pub raw: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SentMessage {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Profile {
    pub email_address: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}
