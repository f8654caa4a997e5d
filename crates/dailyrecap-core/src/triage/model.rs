//! Classification data models.

use crate::mail::Message;
use std::fmt;
use std::str::FromStr;

/// What kind of attention a message needs.
///
/// Declaration order is digest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    /// Needs the user. Stays unread.
    #[default]
    Important,
    /// Automated notice: receipts, alerts, confirmations.
    Notification,
    /// Bulk content and subscriptions.
    Newsletter,
}

impl Category {
    /// All categories in digest order.
    pub const ALL: [Self; 3] = [Self::Important, Self::Notification, Self::Newsletter];

    /// Wire name used with the language model.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Important => "important",
            Self::Notification => "notification",
            Self::Newsletter => "newsletter",
        }
    }

    /// Section heading in the digest.
    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Important => "Important Emails",
            Self::Notification => "Notifications",
            Self::Newsletter => "Newsletters",
        }
    }

    /// Whether messages in this category are left unread.
    #[must_use]
    pub const fn keeps_unread(&self) -> bool {
        matches!(self, Self::Important)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a category name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "important" => Ok(Self::Important),
            "notification" => Ok(Self::Notification),
            "newsletter" => Ok(Self::Newsletter),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Category plus markdown summary for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Assigned category.
    pub category: Category,
    /// Markdown summary. Never empty.
    pub summary: String,
}

impl Classification {
    /// Creates a classification.
    #[must_use]
    pub fn new(category: Category, summary: impl Into<String>) -> Self {
        Self {
            category,
            summary: summary.into(),
        }
    }

    /// The fail-safe result: important, with an explanation of what went wrong.
    #[must_use]
    pub fn fallback(explanation: impl Into<String>) -> Self {
        Self::new(Category::Important, explanation)
    }
}

/// A message together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedMessage {
    /// The message.
    pub message: Message,
    /// Its classification.
    pub classification: Classification,
}

impl ClassifiedMessage {
    /// Shorthand for the assigned category.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.classification.category
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("important".parse::<Category>().unwrap(), Category::Important);
        assert_eq!(" Newsletter ".parse::<Category>().unwrap(), Category::Newsletter);
        assert_eq!(
            "NOTIFICATION".parse::<Category>().unwrap(),
            Category::Notification
        );
        assert!("spam".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_roundtrip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_digest_order() {
        let mut shuffled = vec![Category::Newsletter, Category::Important, Category::Notification];
        shuffled.sort();
        assert_eq!(shuffled, Category::ALL);
    }

    #[test]
    fn test_only_important_stays_unread() {
        assert!(Category::Important.keeps_unread());
        assert!(!Category::Notification.keeps_unread());
        assert!(!Category::Newsletter.keeps_unread());
    }

    #[test]
    fn test_fallback_is_important() {
        let c = Classification::fallback("broken");
        assert_eq!(c.category, Category::Important);
        assert_eq!(c.summary, "broken");
    }
}
