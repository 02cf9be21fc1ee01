//! A learnable topic owned by one user, together with its spacing state.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Easiness factor given to every new item.
pub const DEFAULT_EASE: f64 = 2.5;

/// Lowest easiness factor an item can reach.
pub const MIN_EASE: f64 = 1.3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub owner: String,
    pub item_key: String,
    pub title: String,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interval_days: u32,
    #[serde(default = "default_ease")]
    pub ease: f64,
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub failure_count: u32,
    /// Bumped by the store on every persisted review.
    #[serde(default)]
    pub version: i64,
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

impl ReviewItem {
    /// Creates a never-reviewed item, due immediately.
    pub fn new(owner: &str, item_key: &str, title: &str) -> Self {
        Self {
            owner: owner.to_string(),
            item_key: item_key.to_string(),
            title: title.to_string(),
            last_reviewed_at: None,
            next_review_at: None,
            interval_days: 0,
            ease: DEFAULT_EASE,
            repetitions: 0,
            success_count: 0,
            failure_count: 0,
            version: 0,
        }
    }

    /// An item with no scheduled date is always due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_at {
            Some(next) => next <= now,
            None => true,
        }
    }

    pub fn total_reviews(&self) -> u32 {
        self.success_count + self.failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_item_defaults() {
        let item = ReviewItem::new("user-1", "fractions-basics", "Fractions");

        assert_eq!(item.owner, "user-1");
        assert_eq!(item.item_key, "fractions-basics");
        assert_eq!(item.interval_days, 0);
        assert_eq!(item.repetitions, 0);
        assert_eq!(item.ease, DEFAULT_EASE);
        assert!(item.last_reviewed_at.is_none());
        assert!(item.next_review_at.is_none());
        assert_eq!(item.version, 0);
    }

    #[test]
    fn test_is_due() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut item = ReviewItem::new("u", "k", "t");
        assert!(item.is_due(now));

        item.next_review_at = Some(now);
        assert!(item.is_due(now));

        item.next_review_at = Some(now + Duration::seconds(1));
        assert!(!item.is_due(now));
    }

    #[test]
    fn test_deserialize_fills_scheduling_defaults() {
        let json = r#"{"owner":"u","itemKey":"k","title":"Topic"}"#;
        let item: ReviewItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.ease, DEFAULT_EASE);
        assert_eq!(item.interval_days, 0);
        assert!(item.next_review_at.is_none());
    }
}
