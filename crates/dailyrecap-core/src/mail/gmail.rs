//! Gmail REST v1 client.

use super::wire::{
    ErrorEnvelope, MessageDetail, MessageListResponse, ModifyRequest, Profile, SendRequest,
    SentMessage,
};
use super::{MailError, Mailbox, Message, MessagePage, NO_SUBJECT};
use async_trait::async_trait;
use dailyrecap_mime::OutgoingMessage;
use dailyrecap_oauth::Token;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default Gmail API root.
pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";

/// Gmail client acting as the authenticated user (`users/me`).
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl GmailClient {
    /// Creates a client against [`GMAIL_API_BASE`].
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: GMAIL_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates a client from an OAuth token.
    #[must_use]
    pub fn from_token(token: &Token) -> Self {
        Self::new(token.access_token.clone())
    }

    /// Points the client at another API root (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/gmail/v1/users/me/{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.access_token)
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, MailError> {
        let response = check(request.send().await?).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MailError::InvalidResponse(e.to_string()))
    }
}

async fn check(response: Response) -> Result<Response, MailError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(MailError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(MailError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Mailbox for GmailClient {
    async fn list_messages(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, MailError> {
        let mut params = vec![("q", query)];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let request = self
            .authorized(self.http.get(self.url("messages")))
            .query(&params);
        let list: MessageListResponse = Self::json(request).await?;
        debug!(count = list.messages.len(), "listed message page");

        Ok(MessagePage {
            ids: list.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: list.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn get_message(&self, id: &str) -> Result<Message, MailError> {
        let request = self
            .authorized(self.http.get(self.url(&format!("messages/{id}"))))
            .query(&[("format", "metadata"), ("metadataHeaders", "Subject")]);
        let detail: MessageDetail = Self::json(request).await?;

        let subject = detail
            .header("Subject")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| NO_SUBJECT.to_string(), str::to_string);
        Ok(Message {
            id: detail.id,
            subject,
            snippet: detail.snippet,
        })
    }

    async fn mark_read(&self, id: &str) -> Result<(), MailError> {
        let body = ModifyRequest {
            remove_label_ids: &["UNREAD"],
        };
        let request = self
            .authorized(self.http.post(self.url(&format!("messages/{id}/modify"))))
            .json(&body);
        check(request.send().await?).await?;
        Ok(())
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<String, MailError> {
        let body = SendRequest {
            raw: message.to_gmail_raw(),
        };
        let request = self
            .authorized(self.http.post(self.url("messages/send")))
            .json(&body);
        let sent: SentMessage = Self::json(request).await?;
        Ok(sent.id)
    }

    async fn own_address(&self) -> Result<String, MailError> {
        let request = self.authorized(self.http.get(self.url("profile")));
        let profile: Profile = Self::json(request).await?;
        Ok(profile.email_address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dailyrecap_mime::MessageBuilder;
    use mockito::Matcher;

    async fn server() -> (mockito::ServerGuard, GmailClient) {
        let server = mockito::Server::new_async().await;
        let client = GmailClient::new("ya29.token").with_base_url(server.url());
        (server, client)
    }

    #[tokio::test]
    async fn test_list_messages_page() {
        let (mut server, client) = server().await;
        let mock = server
            .mock("GET", "/gmail/v1/users/me/messages")
            .match_header("authorization", "Bearer ya29.token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "is:unread newer_than:1d".into()),
                Matcher::UrlEncoded("pageToken".into(), "p2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messages":[{"id":"a","threadId":"t"},{"id":"b","threadId":"t"}],"nextPageToken":"p3","resultSizeEstimate":2}"#)
            .create_async()
            .await;

        let page = client
            .list_messages("is:unread newer_than:1d", Some("p2"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.ids, vec!["a", "b"]);
        assert_eq!(page.next_page_token.as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn test_list_empty_result_has_no_messages_field() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/messages")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"resultSizeEstimate":0}"#)
            .create_async()
            .await;

        let page = client.list_messages("is:unread", None).await.unwrap();
        assert!(page.ids.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_get_message_subject_case_insensitive() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/messages/m1")
            .match_query(Matcher::UrlEncoded("format".into(), "metadata".into()))
            .with_status(200)
            .with_body(r#"{"id":"m1","snippet":"Your order shipped","payload":{"headers":[{"name":"subject","value":"Order #42"}]}}"#)
            .create_async()
            .await;

        let message = client.get_message("m1").await.unwrap();
        assert_eq!(message, Message::new("m1", "Order #42", "Your order shipped"));
    }

    #[tokio::test]
    async fn test_get_message_without_subject() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/messages/m2")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id":"m2","payload":{"headers":[{"name":"From","value":"x@y"}]}}"#)
            .create_async()
            .await;

        let message = client.get_message("m2").await.unwrap();
        assert_eq!(message.subject, NO_SUBJECT);
        assert_eq!(message.snippet, "");
    }

    #[tokio::test]
    async fn test_get_message_blank_subject_uses_placeholder() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/messages/m3")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"id":"m3","snippet":"hi","payload":{"headers":[{"name":"Subject","value":""}]}}"#,
            )
            .create_async()
            .await;

        let message = client.get_message("m3").await.unwrap();
        assert_eq!(message.subject, NO_SUBJECT);
        assert_eq!(message.snippet, "hi");
    }

    #[tokio::test]
    async fn test_mark_read_removes_unread_label() {
        let (mut server, client) = server().await;
        let mock = server
            .mock("POST", "/gmail/v1/users/me/messages/m1/modify")
            .match_body(Matcher::Json(
                serde_json::json!({"removeLabelIds": ["UNREAD"]}),
            ))
            .with_status(200)
            .with_body(r#"{"id":"m1","labelIds":["INBOX"]}"#)
            .create_async()
            .await;

        client.mark_read("m1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_posts_raw_message() {
        let (mut server, client) = server().await;
        let message = MessageBuilder::new()
            .to("me@example.com")
            .subject("Daily Recap")
            .html_body("<p>hi</p>")
            .build()
            .unwrap();
        let mock = server
            .mock("POST", "/gmail/v1/users/me/messages/send")
            .match_body(Matcher::Json(
                serde_json::json!({"raw": message.to_gmail_raw()}),
            ))
            .with_status(200)
            .with_body(r#"{"id":"sent-1","threadId":"t","labelIds":["SENT"]}"#)
            .create_async()
            .await;

        assert_eq!(client.send(&message).await.unwrap(), "sent-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_own_address() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/profile")
            .with_status(200)
            .with_body(r#"{"emailAddress":"me@example.com","messagesTotal":10}"#)
            .create_async()
            .await;

        assert_eq!(client.own_address().await.unwrap(), "me@example.com");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let (mut server, client) = server().await;
        server
            .mock("POST", "/gmail/v1/users/me/messages/m1/modify")
            .with_status(401)
            .create_async()
            .await;

        assert!(matches!(
            client.mark_read("m1").await,
            Err(MailError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_api_error_message_extracted() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/messages/gone")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#)
            .create_async()
            .await;

        match client.get_message("gone").await {
            Err(MailError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Requested entity was not found.");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (mut server, client) = server().await;
        server
            .mock("GET", "/gmail/v1/users/me/profile")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        assert!(matches!(
            client.own_address().await,
            Err(MailError::InvalidResponse(_))
        ));
    }
}
