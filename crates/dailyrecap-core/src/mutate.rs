//! Clearing the unread flag on messages that don't need attention.

use crate::mail::Mailbox;
use crate::triage::ClassifiedMessage;
use tracing::{error, info};

/// Outcome of a mark-as-read pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkReport {
    /// Ids now marked read.
    pub marked: Vec<String>,
    /// Ids whose request failed. They stay unread.
    pub failed: Vec<String>,
    /// Messages left unread on purpose because they are important.
    pub kept_unread: usize,
}

/// Marks every message not classified important as read.
///
/// Failures are logged and skipped; the remaining messages are still processed.
pub async fn mark_non_important_read(
    mailbox: &dyn Mailbox,
    messages: &[ClassifiedMessage],
) -> MarkReport {
    let mut report = MarkReport::default();

    for item in messages {
        let category = item.category();
        if category.keeps_unread() {
            report.kept_unread += 1;
            continue;
        }

        let id = &item.message.id;
        match mailbox.mark_read(id).await {
            Ok(()) => {
                info!("Marked message {id} as read (category: {category})");
                report.marked.push(id.clone());
            }
            Err(e) => {
                error!("Error marking message {id} as read: {e}");
                report.failed.push(id.clone());
            }
        }
    }

    report
}
