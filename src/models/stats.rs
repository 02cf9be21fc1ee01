//! Summary of one owner's review pool
use super::ReviewItem;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    /// Never reviewed
    pub new_items: usize,
    /// One or two consecutive successes
    pub learning_items: usize,
    /// Three or more consecutive successes
    pub mature_items: usize,
    pub due_items: usize,
    pub total_successes: u64,
    pub total_failures: u64,
}

impl ReviewStats {
    pub fn from_items(items: &[ReviewItem], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_items: items.len(),
            ..Self::default()
        };

        for item in items {
            if item.last_reviewed_at.is_none() {
                stats.new_items += 1;
            } else if item.repetitions >= 3 {
                stats.mature_items += 1;
            } else if item.repetitions > 0 {
                stats.learning_items += 1;
            }
            if item.is_due(now) {
                stats.due_items += 1;
            }
            stats.total_successes += u64::from(item.success_count);
            stats.total_failures += u64::from(item.failure_count);
        }

        stats
    }

    /// Share of successful reviews, or None before the first review.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.total_successes + self.total_failures;
        (total > 0).then(|| self.total_successes as f64 / total as f64)
    }
}
