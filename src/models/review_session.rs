//! Study session over a batch of due items.
//! Items answered wrong are repeated in later rounds until every item has been
//! answered correctly once in the session.

use super::{ReviewItem, ReviewOutcome};

struct SessionCard {
    item: ReviewItem,
    passed: bool,
}

/// Tracks rounds and progress through a batch of review items.
/// The session only holds state; scheduling and persistence happen in the service.
pub struct ReviewSession {
    pub owner: String,
    cards: Vec<SessionCard>,
    current_round: Vec<usize>,
    current_index: usize,
    pub round_number: usize,
    attempts: usize,
}

impl ReviewSession {
    pub fn new(owner: &str, items: Vec<ReviewItem>) -> Self {
        let cards: Vec<_> = items
            .into_iter()
            .map(|item| SessionCard {
                item,
                passed: false,
            })
            .collect();
        let current_round = (0..cards.len()).collect();

        Self {
            owner: owner.to_string(),
            cards,
            current_round,
            current_index: 0,
            round_number: 1,
            attempts: 0,
        }
    }

    pub fn current_item(&self) -> Option<&ReviewItem> {
        self.current_round
            .get(self.current_index)
            .and_then(|&idx| self.cards.get(idx))
            .map(|card| &card.item)
    }

    /// Stores the rescheduled current item and moves on to the next one.
    pub fn record(&mut self, updated: ReviewItem, outcome: ReviewOutcome) {
        let Some(&idx) = self.current_round.get(self.current_index) else {
            return;
        };
        if let Some(card) = self.cards.get_mut(idx) {
            card.item = updated;
            card.passed = outcome.is_success();
        }
        self.attempts += 1;
        self.advance();
    }

    fn advance(&mut self) {
        if self.current_index + 1 < self.current_round.len() {
            self.current_index += 1;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with the items that were failed in this one.
    /// If none remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed: Vec<usize> = self
            .current_round
            .iter()
            .copied()
            .filter(|&idx| self.cards.get(idx).is_some_and(|card| !card.passed))
            .collect();

        if !failed.is_empty() {
            self.round_number += 1;
        }
        self.current_round = failed;
        self.current_index = 0;
    }

    pub fn is_completed(&self) -> bool {
        self.current_round.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.cards.len()
    }

    pub fn passed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.passed).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    /// Number of answers recorded, retries included.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Latest state of every item in the session.
    pub fn items(&self) -> impl Iterator<Item = &ReviewItem> {
        self.cards.iter().map(|card| &card.item)
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} items", self.round_number, self.current_round.len())
        } else {
            format!(
                "Round {} (Retry): {} items to retry",
                self.round_number,
                self.current_round.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_of(keys: &[&str]) -> ReviewSession {
        let items = keys
            .iter()
            .map(|k| ReviewItem::new("kid", k, k))
            .collect();
        ReviewSession::new("kid", items)
    }

    fn answer(session: &mut ReviewSession, outcome: ReviewOutcome) -> String {
        let item = session.current_item().unwrap().clone();
        let key = item.item_key.clone();
        session.record(item, outcome);
        key
    }

    #[test]
    fn test_all_pass_in_first_round() {
        let mut session = session_of(&["a", "b"]);
        assert_eq!(session.phase_message(), "Round 1: 2 items");

        answer(&mut session, ReviewOutcome::Success);
        answer(&mut session, ReviewOutcome::Success);

        assert!(session.is_completed());
        assert!(session.current_item().is_none());
        assert_eq!(session.passed_count(), 2);
        assert_eq!(session.round_number, 1);
    }

    #[test]
    fn test_failed_items_are_retried() {
        let mut session = session_of(&["a", "b", "c"]);

        answer(&mut session, ReviewOutcome::Success);
        answer(&mut session, ReviewOutcome::Failure);
        answer(&mut session, ReviewOutcome::Failure);

        assert!(!session.is_completed());
        assert_eq!(session.round_number, 2);
        assert_eq!(session.remaining_count(), 2);
        assert_eq!(session.phase_message(), "Round 2 (Retry): 2 items to retry");

        assert_eq!(answer(&mut session, ReviewOutcome::Success), "b");
        assert_eq!(answer(&mut session, ReviewOutcome::Failure), "c");
        assert_eq!(session.round_number, 3);

        assert_eq!(answer(&mut session, ReviewOutcome::Success), "c");
        assert!(session.is_completed());
        assert_eq!(session.attempts(), 6);
    }

    #[test]
    fn test_empty_session_is_completed() {
        let session = session_of(&[]);
        assert!(session.is_completed());
        assert!(session.current_item().is_none());
        assert_eq!(session.total_count(), 0);
    }

    #[test]
    fn test_record_keeps_updated_state() {
        let mut session = session_of(&["a"]);
        let mut updated = session.current_item().unwrap().clone();
        updated.repetitions = 1;
        updated.version = 1;

        session.record(updated, ReviewOutcome::Success);
        let item = session.items().next().unwrap();
        assert_eq!(item.repetitions, 1);
        assert_eq!(item.version, 1);
    }
}
