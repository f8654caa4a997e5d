//! The daily digest: markdown rendering, HTML conversion, delivery.

mod convert;
mod dispatch;

pub use convert::{convert_to_html, strip_code_fences};
pub use dispatch::send_digest;

use crate::triage::{Category, ClassifiedMessage};
use chrono::NaiveDate;
use std::fmt::Write as _;

/// Classified messages of one day, grouped for reporting.
#[derive(Debug, Clone)]
pub struct Digest {
    date: NaiveDate,
    messages: Vec<ClassifiedMessage>,
}

impl Digest {
    /// Creates a digest. Input order is kept within each category.
    #[must_use]
    pub const fn new(date: NaiveDate, messages: Vec<ClassifiedMessage>) -> Self {
        Self { date, messages }
    }

    /// Date as written in the title and subject, e.g. `March 03, 2025`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%B %d, %Y").to_string()
    }

    /// Subject line of the digest email.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Daily Recap: {}", self.display_date())
    }

    /// Messages of one category, in input order.
    pub fn group(&self, category: Category) -> impl Iterator<Item = &ClassifiedMessage> {
        self.messages
            .iter()
            .filter(move |m| m.category() == category)
    }

    /// Number of messages in `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.group(category).count()
    }

    /// Renders the markdown document.
    ///
    /// Sections appear in [`Category::ALL`] order and empty ones are omitted.
    /// Entries are numbered from 1 within each section.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "**Executive Summary for {}**\n\n", self.display_date());

        for category in Category::ALL {
            let mut entries = self.group(category).peekable();
            if entries.peek().is_none() {
                continue;
            }

            let _ = write!(out, "### {}\n\n", category.heading());
            for (i, item) in entries.enumerate() {
                let _ = write!(
                    out,
                    "**{}.** **Subject:** {}\n{}\n\n",
                    i + 1,
                    item.message.subject,
                    item.classification.summary.trim_end()
                );
            }
        }

        out.push_str("**End of Summary**\n");
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mail::Message;
    use crate::triage::Classification;
    use proptest::prelude::*;

    fn item(id: &str, subject: &str, category: Category, summary: &str) -> ClassifiedMessage {
        ClassifiedMessage {
            message: Message::new(id, subject, "snippet"),
            classification: Classification::new(category, summary),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let digest = Digest::new(
            date(),
            vec![
                item("1", "Weekly news", Category::Newsletter, "- Rust 1.85 released"),
                item("2", "Meeting moved", Category::Important, "Standup is now at 10:00."),
                item("3", "Build passed", Category::Notification, "CI green on main."),
                item("4", "Contract", Category::Important, "Please sign by Friday."),
            ],
        );

        let expected = "\
**Executive Summary for March 03, 2025**

### Important Emails

**1.** **Subject:** Meeting moved
Standup is now at 10:00.

**2.** **Subject:** Contract
Please sign by Friday.

### Notifications

**1.** **Subject:** Build passed
CI green on main.

### Newsletters

**1.** **Subject:** Weekly news
- Rust 1.85 released

**End of Summary**
";
        assert_eq!(digest.render_markdown(), expected);
    }

    #[test]
    fn test_empty_sections_omitted() {
        let digest = Digest::new(
            date(),
            vec![item("1", "Sale", Category::Newsletter, "20% off")],
        );
        let md = digest.render_markdown();
        assert!(!md.contains("### Important Emails"));
        assert!(!md.contains("### Notifications"));
        assert!(md.contains("### Newsletters"));
    }

    #[test]
    fn test_subject() {
        let digest = Digest::new(date(), Vec::new());
        assert_eq!(digest.subject(), "Daily Recap: March 03, 2025");
    }

    fn category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::ALL.to_vec())
    }

    /// Maps each `**N.** **Subject:** ` line to the heading it sits under.
    fn sections_of(markdown: &str) -> Vec<(String, String)> {
        let mut current = String::new();
        let mut found = Vec::new();
        for line in markdown.lines() {
            if let Some(heading) = line.strip_prefix("### ") {
                current = heading.to_string();
            } else if let Some((_, subject)) = line.split_once("** **Subject:** ") {
                found.push((current.clone(), subject.to_string()));
            }
        }
        found
    }

    proptest! {
        #[test]
        fn prop_every_message_once_under_its_heading(
            categories in prop::collection::vec(category(), 0..30)
        ) {
            let messages: Vec<_> = categories
                .iter()
                .enumerate()
                .map(|(i, c)| item(&i.to_string(), &format!("msg-{i}"), *c, "summary"))
                .collect();
            let digest = Digest::new(date(), messages);
            let found = sections_of(&digest.render_markdown());

            prop_assert_eq!(found.len(), categories.len());
            for (i, c) in categories.iter().enumerate() {
                let subject = format!("msg-{i}");
                let hits: Vec<_> = found.iter().filter(|(_, s)| *s == subject).collect();
                prop_assert_eq!(hits.len(), 1);
                prop_assert_eq!(hits[0].0.as_str(), c.heading());
            }
        }
    }
}
