//! Delivery of the digest email.

use crate::mail::Mailbox;
use dailyrecap_mime::MessageBuilder;
use tracing::{error, info};

/// Sends `html` as an HTML email and returns the sent message id.
///
/// `recipient` falls back to the mailbox owner's address. Every failure is
/// logged and yields `None`.
pub async fn send_digest(
    mailbox: &dyn Mailbox,
    recipient: Option<&str>,
    subject: &str,
    html: &str,
) -> Option<String> {
    let recipient = match recipient {
        Some(address) => address.to_string(),
        None => match mailbox.own_address().await {
            Ok(address) => address,
            Err(e) => {
                error!("No recipient configured and the account address is unavailable: {e}");
                return None;
            }
        },
    };

    let message = match MessageBuilder::new()
        .to(recipient.as_str())
        .subject(subject)
        .html_body(html)
        .build()
    {
        Ok(message) => message,
        Err(e) => {
            error!("Error building summary email: {e}");
            return None;
        }
    };

    match mailbox.send(&message).await {
        Ok(id) => {
            info!("Summary email sent successfully to {recipient}");
            Some(id)
        }
        Err(e) => {
            error!("Error sending summary email: {e}");
            None
        }
    }
}
