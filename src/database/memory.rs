//! In-process review store for callers that don't need a database.
use super::ReviewStore;
use crate::error::{Result, ReviewError};
use crate::models::ReviewItem;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

type ItemMap = BTreeMap<(String, String), ReviewItem>;

#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    items: Mutex<ItemMap>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, ItemMap>> {
        self.items.lock().map_err(|_| ReviewError::LockPoisoned)
    }
}

fn key(owner: &str, item_key: &str) -> (String, String) {
    (owner.to_string(), item_key.to_string())
}

impl ReviewStore for InMemoryReviewStore {
    fn upsert(&self, owner: &str, item_key: &str, title: &str) -> Result<(ReviewItem, bool)> {
        let mut items = self.items()?;
        let mut created = false;
        let item = items.entry(key(owner, item_key)).or_insert_with(|| {
            created = true;
            ReviewItem::new(owner, item_key, title)
        });
        Ok((item.clone(), created))
    }

    fn get(&self, owner: &str, item_key: &str) -> Result<Option<ReviewItem>> {
        Ok(self.items()?.get(&key(owner, item_key)).cloned())
    }

    fn list(&self, owner: &str) -> Result<Vec<ReviewItem>> {
        // BTreeMap order already sorts by item_key within an owner.
        Ok(self
            .items()?
            .values()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect())
    }

    fn save_review(&self, item: &ReviewItem) -> Result<ReviewItem> {
        let mut items = self.items()?;
        let stored = items
            .get_mut(&key(&item.owner, &item.item_key))
            .ok_or_else(|| ReviewError::NotFound {
                owner: item.owner.clone(),
                item_key: item.item_key.clone(),
            })?;

        if stored.version != item.version {
            return Err(ReviewError::Conflict {
                owner: item.owner.clone(),
                item_key: item.item_key.clone(),
                expected: item.version,
            });
        }

        stored.last_reviewed_at = item.last_reviewed_at;
        stored.next_review_at = item.next_review_at;
        stored.interval_days = item.interval_days;
        stored.ease = item.ease;
        stored.repetitions = item.repetitions;
        stored.success_count = item.success_count;
        stored.failure_count = item.failure_count;
        stored.version += 1;
        Ok(stored.clone())
    }

    fn load_due(&self, owner: &str, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewItem>> {
        let mut due: Vec<ReviewItem> = self
            .items()?
            .values()
            .filter(|item| item.owner == owner && item.is_due(now))
            .cloned()
            .collect();

        // None sorts before Some, so never-scheduled items come first.
        due.sort_by(|a, b| {
            a.next_review_at
                .cmp(&b.next_review_at)
                .then_with(|| a.item_key.cmp(&b.item_key))
        });
        due.truncate(limit);

        debug!(owner, due = due.len(), "loaded due items");
        Ok(due)
    }

    fn import(&self, item: &ReviewItem) -> Result<()> {
        self.items()?
            .insert(key(&item.owner, &item.item_key), item.clone());
        Ok(())
    }
}
