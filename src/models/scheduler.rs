//! Simplified SM-2 spaced repetition scheduling.
//!
//! Each review is a pass/fail outcome rather than a graded response:
//! - Success: repetitions grow through three phases (1 day → 6 days → interval × ease)
//!   and the easiness factor rises by 0.1 with no upper limit
//! - Failure: the item goes back to a one-day interval, repetitions reset and
//!   the easiness factor drops by 0.2, never below 1.3
//!
//! The scheduler never touches storage; persisting the returned item is up to the caller.

use super::review_item::MIN_EASE;
use super::{ReviewItem, ReviewOutcome};
use chrono::{DateTime, Duration, Utc};

const EASE_BONUS: f64 = 0.1;
const EASE_PENALTY: f64 = 0.2;

/// Calculates the item's next scheduling state after one review.
pub fn calculate_next_review(
    item: &ReviewItem,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> ReviewItem {
    let mut next = item.clone();

    match outcome {
        ReviewOutcome::Success => {
            next.success_count = item.success_count.saturating_add(1);
            next.repetitions = item.repetitions.saturating_add(1);
            next.interval_days = match next.repetitions {
                1 => 1,
                2 => 6,
                // Uses the ease from before this review's bonus.
                _ => ((item.interval_days as f64 * item.ease).round() as u32).max(1),
            };
            next.ease = item.ease + EASE_BONUS;
        }
        ReviewOutcome::Failure => {
            next.failure_count = item.failure_count.saturating_add(1);
            next.repetitions = 0;
            next.interval_days = 1;
            next.ease = (item.ease - EASE_PENALTY).max(MIN_EASE);
        }
    }

    next.last_reviewed_at = Some(now);
    next.next_review_at = Some(add_days(now, next.interval_days));
    next
}

fn add_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Intervals (in days) the item would get for each outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalPreview {
    pub on_success: u32,
    pub on_failure: u32,
}

pub fn preview_intervals(item: &ReviewItem, now: DateTime<Utc>) -> IntervalPreview {
    IntervalPreview {
        on_success: calculate_next_review(item, ReviewOutcome::Success, now).interval_days,
        on_failure: calculate_next_review(item, ReviewOutcome::Failure, now).interval_days,
    }
}

/// Format an interval in days to a short human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{days}d"),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
