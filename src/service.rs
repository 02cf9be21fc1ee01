//! Review operations exposed to the rest of the application.
//!
//! `ReviewService` wires the pure scheduler to an injected store and clock:
//! it reads the current state, computes the next one and hands it back to the
//! store, which rejects the write if the item changed in the meantime.

use crate::clock::Clock;
use crate::database::ReviewStore;
use crate::error::{Result, ReviewError};
use crate::models::scheduler::calculate_next_review;
use crate::models::{ReviewItem, ReviewOutcome, ReviewSession, ReviewStats};
use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

pub struct ReviewService<S, C> {
    store: S,
    clock: C,
}

impl<S: ReviewStore, C: Clock> ReviewService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whole seconds, so every backend stores the same instant.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(0)
    }

    /// Registers a topic for `owner`. Re-adding an existing topic is a no-op.
    pub fn upsert(&self, owner: &str, item_key: &str, title: &str) -> Result<ReviewItem> {
        let (item, created) = self.store.upsert(owner, item_key, title)?;
        if created {
            info!(owner, item_key, "created review item");
        } else {
            debug!(owner, item_key, "review item already exists");
        }
        Ok(item)
    }

    pub fn get(&self, owner: &str, item_key: &str) -> Result<ReviewItem> {
        self.store
            .get(owner, item_key)?
            .ok_or_else(|| ReviewError::NotFound {
                owner: owner.to_string(),
                item_key: item_key.to_string(),
            })
    }

    pub fn list(&self, owner: &str) -> Result<Vec<ReviewItem>> {
        self.store.list(owner)
    }

    /// Loads the stored item and applies one review to it.
    pub fn review(&self, owner: &str, item_key: &str, outcome: ReviewOutcome) -> Result<ReviewItem> {
        let item = self.get(owner, item_key)?;
        self.review_item(&item, outcome)
    }

    /// Applies one review to `item` as the caller last saw it.
    ///
    /// Fails with `Conflict` if the stored item has moved past `item.version`.
    pub fn review_item(&self, item: &ReviewItem, outcome: ReviewOutcome) -> Result<ReviewItem> {
        if !item.ease.is_finite() {
            return Err(ReviewError::InvalidState(format!(
                "ease of {}/{} is {}",
                item.owner, item.item_key, item.ease
            )));
        }

        let next = calculate_next_review(item, outcome, self.now());
        let saved = self.store.save_review(&next).inspect_err(|e| {
            if matches!(e, ReviewError::Conflict { .. }) {
                warn!(
                    owner = %item.owner,
                    item_key = %item.item_key,
                    version = item.version,
                    "review lost to a concurrent update"
                );
            }
        })?;

        info!(
            owner = %saved.owner,
            item_key = %saved.item_key,
            %outcome,
            interval_days = saved.interval_days,
            ease = saved.ease,
            "recorded review"
        );
        Ok(saved)
    }

    pub fn load_due(&self, owner: &str, limit: usize) -> Result<Vec<ReviewItem>> {
        self.store.load_due(owner, self.now(), limit)
    }

    pub fn stats(&self, owner: &str) -> Result<ReviewStats> {
        let items = self.store.list(owner)?;
        Ok(ReviewStats::from_items(&items, self.now()))
    }

    pub fn start_session(&self, owner: &str, limit: usize) -> Result<ReviewSession> {
        let due = self.load_due(owner, limit)?;
        Ok(ReviewSession::new(owner, due))
    }

    /// Reviews the session's current item and advances the session.
    ///
    /// Returns the rescheduled item, or None when the session is already complete.
    pub fn answer(
        &self,
        session: &mut ReviewSession,
        outcome: ReviewOutcome,
    ) -> Result<Option<ReviewItem>> {
        let Some(current) = session.current_item().cloned() else {
            return Ok(None);
        };
        let saved = self.review_item(&current, outcome)?;
        session.record(saved.clone(), outcome);
        Ok(Some(saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::database::InMemoryReviewStore;
    use crate::models::review_item::MIN_EASE;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 7, 7, 45, 0).unwrap()
    }

    fn service() -> ReviewService<InMemoryReviewStore, ManualClock> {
        ReviewService::new(InMemoryReviewStore::new(), ManualClock::new(start()))
    }

    #[test]
    fn test_upsert_does_not_reset_schedule() {
        let service = service();
        service.upsert("maya", "multiplication", "Multiplication").unwrap();
        service
            .review("maya", "multiplication", ReviewOutcome::Success)
            .unwrap();
        service
            .review("maya", "multiplication", ReviewOutcome::Success)
            .unwrap();

        let again = service
            .upsert("maya", "multiplication", "Multiplication")
            .unwrap();
        assert_eq!(again.repetitions, 2);
        assert_eq!(again.interval_days, 6);
        assert!((again.ease - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_review_sets_dates_from_clock() {
        let service = service();
        service.upsert("maya", "division", "Division").unwrap();

        let item = service
            .review("maya", "division", ReviewOutcome::Success)
            .unwrap();
        assert_eq!(item.last_reviewed_at, Some(start()));
        assert_eq!(item.next_review_at, Some(start() + Duration::days(1)));
        assert_eq!(item.version, 1);
    }

    #[test]
    fn test_review_unknown_item() {
        let service = service();
        let err = service
            .review("maya", "missing", ReviewOutcome::Failure)
            .unwrap_err();
        assert!(matches!(err, ReviewError::NotFound { .. }));
    }

    #[test]
    fn test_stale_item_conflicts() {
        let service = service();
        let item = service.upsert("maya", "division", "Division").unwrap();

        service.review_item(&item, ReviewOutcome::Success).unwrap();
        let err = service
            .review_item(&item, ReviewOutcome::Failure)
            .unwrap_err();
        assert!(matches!(err, ReviewError::Conflict { .. }));

        let stored = service.get("maya", "division").unwrap();
        assert_eq!(stored.success_count, 1);
        assert_eq!(stored.failure_count, 0);
    }

    #[test]
    fn test_non_finite_ease_rejected() {
        let service = service();
        let mut item = service.upsert("maya", "division", "Division").unwrap();
        item.ease = f64::NAN;

        let err = service
            .review_item(&item, ReviewOutcome::Success)
            .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidState(_)));
    }

    #[test]
    fn test_due_items_follow_the_clock() {
        let service = service();
        service.upsert("maya", "a", "A").unwrap();
        service.upsert("maya", "b", "B").unwrap();
        service.review("maya", "a", ReviewOutcome::Success).unwrap();

        let due: Vec<_> = service
            .load_due("maya", 5)
            .unwrap()
            .into_iter()
            .map(|i| i.item_key)
            .collect();
        assert_eq!(due, vec!["b"]);

        service.clock().advance_day();
        let due: Vec<_> = service
            .load_due("maya", 5)
            .unwrap()
            .into_iter()
            .map(|i| i.item_key)
            .collect();
        assert_eq!(due, vec!["b", "a"]);
    }

    #[test]
    fn test_session_persists_every_answer() {
        let service = service();
        service.upsert("maya", "a", "A").unwrap();
        service.upsert("maya", "b", "B").unwrap();

        let mut session = service.start_session("maya", 5).unwrap();
        service.answer(&mut session, ReviewOutcome::Failure).unwrap();
        service.answer(&mut session, ReviewOutcome::Success).unwrap();
        assert_eq!(session.round_number, 2);

        // Retrying "a" in round two is a second review of the stored item.
        let retried = service
            .answer(&mut session, ReviewOutcome::Success)
            .unwrap()
            .unwrap();
        assert_eq!(retried.item_key, "a");
        assert_eq!(retried.failure_count, 1);
        assert_eq!(retried.success_count, 1);
        assert_eq!(retried.version, 2);

        assert!(session.is_completed());
        assert!(service.answer(&mut session, ReviewOutcome::Success).unwrap().is_none());
    }

    #[test]
    fn test_repeated_failures_hold_ease_floor() {
        let service = service();
        service.upsert("maya", "fractions", "Fractions").unwrap();
        for _ in 0..10 {
            service
                .review("maya", "fractions", ReviewOutcome::Failure)
                .unwrap();
        }
        let item = service.get("maya", "fractions").unwrap();
        assert!((item.ease - MIN_EASE).abs() < 1e-9);
        assert_eq!(item.repetitions, 0);
        assert_eq!(item.interval_days, 1);
    }
}
