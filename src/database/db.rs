//! SQLite-backed review store
//!
//! Handles database initialization, idempotent item creation, version-checked
//! review updates and due-item queries. Timestamps are stored as unix seconds.

use super::ReviewStore;
use crate::error::{Result, ReviewError};
use crate::models::ReviewItem;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const ITEM_COLUMNS: &str = "owner, item_key, title, last_reviewed_at, next_review_at, \
     interval_days, ease, repetitions, success_count, failure_count, version";

/// Creates the review_items table and its due-date index
fn init_database(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS review_items (
            owner TEXT NOT NULL,
            item_key TEXT NOT NULL,
            title TEXT NOT NULL,
            last_reviewed_at INTEGER,
            next_review_at INTEGER,
            interval_days INTEGER NOT NULL DEFAULT 0,
            ease REAL NOT NULL DEFAULT 2.5,
            repetitions INTEGER NOT NULL DEFAULT 0,
            success_count INTEGER NOT NULL DEFAULT 0,
            failure_count INTEGER NOT NULL DEFAULT 0,
            version INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (owner, item_key)
        );
        CREATE INDEX IF NOT EXISTS idx_review_items_due ON review_items(owner, next_review_at);
        "#,
    )?;
    Ok(())
}

fn to_timestamp(time: Option<DateTime<Utc>>) -> Option<i64> {
    time.map(|t| t.timestamp())
}

fn from_timestamp(idx: usize, secs: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    match secs {
        None => Ok(None),
        Some(secs) => DateTime::from_timestamp(secs, 0).map(Some).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Integer,
                format!("timestamp out of range: {secs}").into(),
            )
        }),
    }
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<ReviewItem> {
    Ok(ReviewItem {
        owner: row.get(0)?,
        item_key: row.get(1)?,
        title: row.get(2)?,
        last_reviewed_at: from_timestamp(3, row.get(3)?)?,
        next_review_at: from_timestamp(4, row.get(4)?)?,
        interval_days: row.get(5)?,
        ease: row.get(6)?,
        repetitions: row.get(7)?,
        success_count: row.get(8)?,
        failure_count: row.get(9)?,
        version: row.get(10)?,
    })
}

#[derive(Debug)]
pub struct SqliteReviewStore {
    conn: Mutex<Connection>,
}

impl SqliteReviewStore {
    /// Opens (or creates) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ReviewError::LockPoisoned)
    }

    fn query_item(conn: &Connection, owner: &str, item_key: &str) -> Result<Option<ReviewItem>> {
        let item = conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM review_items WHERE owner = ?1 AND item_key = ?2"),
                params![owner, item_key],
                row_to_item,
            )
            .optional()?;
        Ok(item)
    }
}

impl ReviewStore for SqliteReviewStore {
    fn upsert(&self, owner: &str, item_key: &str, title: &str) -> Result<(ReviewItem, bool)> {
        let conn = self.conn()?;
        let fresh = ReviewItem::new(owner, item_key, title);

        // Insert or ignore if the (owner, item_key) pair already exists
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO review_items
                (owner, item_key, title, interval_days, ease, repetitions, success_count, failure_count, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                fresh.owner,
                fresh.item_key,
                fresh.title,
                fresh.interval_days,
                fresh.ease,
                fresh.repetitions,
                fresh.success_count,
                fresh.failure_count,
                fresh.version
            ],
        )?;

        let stored = Self::query_item(&conn, owner, item_key)?.ok_or_else(|| {
            ReviewError::NotFound {
                owner: owner.to_string(),
                item_key: item_key.to_string(),
            }
        })?;
        Ok((stored, inserted == 1))
    }

    fn get(&self, owner: &str, item_key: &str) -> Result<Option<ReviewItem>> {
        let conn = self.conn()?;
        Self::query_item(&conn, owner, item_key)
    }

    fn list(&self, owner: &str) -> Result<Vec<ReviewItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM review_items WHERE owner = ?1 ORDER BY item_key ASC"
        ))?;
        let items = stmt
            .query_map(params![owner], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn save_review(&self, item: &ReviewItem) -> Result<ReviewItem> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE review_items
             SET last_reviewed_at = ?1, next_review_at = ?2, interval_days = ?3, ease = ?4,
                 repetitions = ?5, success_count = ?6, failure_count = ?7, version = version + 1
             WHERE owner = ?8 AND item_key = ?9 AND version = ?10",
            params![
                to_timestamp(item.last_reviewed_at),
                to_timestamp(item.next_review_at),
                item.interval_days,
                item.ease,
                item.repetitions,
                item.success_count,
                item.failure_count,
                item.owner,
                item.item_key,
                item.version
            ],
        )?;

        if changed == 0 {
            return Err(match Self::query_item(&conn, &item.owner, &item.item_key)? {
                Some(_) => ReviewError::Conflict {
                    owner: item.owner.clone(),
                    item_key: item.item_key.clone(),
                    expected: item.version,
                },
                None => ReviewError::NotFound {
                    owner: item.owner.clone(),
                    item_key: item.item_key.clone(),
                },
            });
        }

        let mut saved = item.clone();
        saved.version = item.version + 1;
        Ok(saved)
    }

    fn load_due(&self, owner: &str, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewItem>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM review_items
             WHERE owner = ?1 AND (next_review_at IS NULL OR next_review_at <= ?2)
             ORDER BY next_review_at IS NOT NULL, next_review_at ASC, item_key ASC
             LIMIT ?3"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let items = stmt
            .query_map(params![owner, now.timestamp(), limit], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(owner, due = items.len(), "loaded due items");
        Ok(items)
    }

    fn import(&self, item: &ReviewItem) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO review_items ({ITEM_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                item.owner,
                item.item_key,
                item.title,
                to_timestamp(item.last_reviewed_at),
                to_timestamp(item.next_review_at),
                item.interval_days,
                item.ease,
                item.repetitions,
                item.success_count,
                item.failure_count,
                item.version
            ],
        )?;
        Ok(())
    }
}
