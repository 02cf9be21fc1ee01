//! Persistence seam for review items.
//!
//! Every backend keys items by `(owner, item_key)` and guards review writes with
//! the item's `version`: a write only lands if nobody else saved in between.

pub mod db;
pub mod memory;

use crate::error::Result;
use crate::models::ReviewItem;
use chrono::{DateTime, Utc};

pub use db::SqliteReviewStore;
pub use memory::InMemoryReviewStore;

pub trait ReviewStore: Send + Sync {
    /// Inserts a fresh item unless `(owner, item_key)` already exists.
    ///
    /// Returns the stored item and whether it was created by this call.
    /// An existing item is returned untouched, title included.
    fn upsert(&self, owner: &str, item_key: &str, title: &str) -> Result<(ReviewItem, bool)>;

    fn get(&self, owner: &str, item_key: &str) -> Result<Option<ReviewItem>>;

    /// All items of one owner ordered by `item_key`.
    fn list(&self, owner: &str) -> Result<Vec<ReviewItem>>;

    /// Persists the scheduling fields of `item` if the stored version still
    /// equals `item.version`. Returns the item carrying its new version.
    fn save_review(&self, item: &ReviewItem) -> Result<ReviewItem>;

    /// Up to `limit` due items, never-scheduled first, then oldest due date.
    fn load_due(&self, owner: &str, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewItem>>;

    /// Writes `item` as-is, replacing any stored row. Used by JSON restore.
    fn import(&self, item: &ReviewItem) -> Result<()>;
}

impl<T: ReviewStore + ?Sized> ReviewStore for Box<T> {
    fn upsert(&self, owner: &str, item_key: &str, title: &str) -> Result<(ReviewItem, bool)> {
        (**self).upsert(owner, item_key, title)
    }

    fn get(&self, owner: &str, item_key: &str) -> Result<Option<ReviewItem>> {
        (**self).get(owner, item_key)
    }

    fn list(&self, owner: &str) -> Result<Vec<ReviewItem>> {
        (**self).list(owner)
    }

    fn save_review(&self, item: &ReviewItem) -> Result<ReviewItem> {
        (**self).save_review(item)
    }

    fn load_due(&self, owner: &str, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewItem>> {
        (**self).load_due(owner, now, limit)
    }

    fn import(&self, item: &ReviewItem) -> Result<()> {
        (**self).import(item)
    }
}
