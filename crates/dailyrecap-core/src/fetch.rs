//! Best-effort retrieval of unread messages.

use crate::mail::{MailError, Mailbox, Message};
use tracing::{info, warn};

/// Lists every message matching `query` across all pages and fetches each one.
///
/// Any failure abandons the whole fetch and yields an empty list: the run then
/// behaves as if there were no unread mail.
pub async fn fetch_unread(mailbox: &dyn Mailbox, query: &str) -> Vec<Message> {
    match try_fetch(mailbox, query).await {
        Ok(messages) => {
            info!("Total unread messages fetched: {}", messages.len());
            messages
        }
        Err(e) => {
            warn!("Error fetching unread messages: {e}");
            Vec::new()
        }
    }
}

async fn try_fetch(mailbox: &dyn Mailbox, query: &str) -> Result<Vec<Message>, MailError> {
    let mut ids = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = mailbox.list_messages(query, page_token.as_deref()).await?;
        info!("Fetched {} messages in this page", page.ids.len());
        ids.extend(page.ids);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    let mut messages = Vec::with_capacity(ids.len());
    for id in ids {
        messages.push(mailbox.get_message(&id).await?);
    }
    Ok(messages)
}
