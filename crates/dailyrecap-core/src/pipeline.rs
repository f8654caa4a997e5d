//! One recap run, start to finish.

use crate::config::Settings;
use crate::digest::{Digest, convert_to_html, send_digest};
use crate::fetch::fetch_unread;
use crate::llm::LanguageModel;
use crate::mail::Mailbox;
use crate::mutate::{MarkReport, mark_non_important_read};
use crate::triage::{Category, Classifier};
use chrono::NaiveDate;
use tracing::info;

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages fetched.
    pub fetched: usize,
    /// Messages per category, in [`Category::ALL`] order.
    pub per_category: [usize; 3],
    /// Mark-as-read outcome.
    pub marks: MarkReport,
    /// Id of the sent digest, if it went out.
    pub sent: Option<String>,
}

impl RunSummary {
    /// Messages classified as `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        Category::ALL
            .iter()
            .position(|c| *c == category)
            .map_or(0, |i| self.per_category[i])
    }
}

/// Fetch, classify, mark, report. Strictly in that order, one request at a time.
///
/// With nothing unread the run stops after the fetch: no model calls, no
/// mutations, no email.
pub async fn run(
    mailbox: &dyn Mailbox,
    model: &dyn LanguageModel,
    settings: &Settings,
    date: NaiveDate,
) -> RunSummary {
    let messages = fetch_unread(mailbox, &settings.query).await;
    if messages.is_empty() {
        info!("No unread messages in the last 24 hours.");
        return RunSummary::default();
    }
    let fetched = messages.len();

    let classifier = Classifier::new(model, settings.classify_model.as_str());
    let classified = classifier.classify_all(messages).await;

    let marks = mark_non_important_read(mailbox, &classified).await;

    let digest = Digest::new(date, classified);
    let per_category = Category::ALL.map(|c| digest.count(c));
    let markdown = digest.render_markdown();
    let html = convert_to_html(model, &settings.convert_model, &markdown).await;
    let sent = send_digest(mailbox, settings.recipient.as_deref(), &digest.subject(), &html).await;

    info!(
        fetched,
        marked = marks.marked.len(),
        failed = marks.failed.len(),
        sent = sent.is_some(),
        "Recap run finished"
    );

    RunSummary {
        fetched,
        per_category,
        marks,
        sent,
    }
}
