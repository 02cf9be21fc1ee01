//! JSON backup and restore of review items.
//! An export holds every item of one owner together with its scheduling state.

use crate::database::ReviewStore;
use crate::error::{Result, ReviewError};
use crate::models::ReviewItem;
use crate::models::review_item::MIN_EASE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewExport {
    pub owner: String,
    pub exported_at: DateTime<Utc>,
    pub items: Vec<ReviewItem>,
}

/// Writes all of `owner`'s items to a JSON file at the specified path.
/// Returns the number of items written.
pub fn export_json_to_path<S: ReviewStore + ?Sized>(
    store: &S,
    owner: &str,
    path: &Path,
    now: DateTime<Utc>,
) -> Result<usize> {
    let export = ReviewExport {
        owner: owner.to_string(),
        exported_at: now,
        items: store.list(owner)?,
    };
    let json_string = serde_json::to_string_pretty(&export)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    info!(owner, items = export.items.len(), path = %path.display(), "exported review items");
    Ok(export.items.len())
}

/// Reads an export file without touching any store.
pub fn read_export(path: &Path) -> Result<ReviewExport> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    let export: ReviewExport = serde_json::from_str(&contents)?;

    for item in &export.items {
        validate(&export.owner, item)?;
    }
    Ok(export)
}

/// Restores an export into `store`, replacing items with the same key.
/// Nothing is written if any item in the file is invalid.
pub fn import_json<S: ReviewStore + ?Sized>(store: &S, path: &Path) -> Result<ReviewExport> {
    let export = read_export(path)?;
    for item in &export.items {
        store.import(item)?;
    }

    info!(owner = %export.owner, items = export.items.len(), path = %path.display(), "imported review items");
    Ok(export)
}

fn validate(owner: &str, item: &ReviewItem) -> Result<()> {
    if item.owner != owner {
        return Err(ReviewError::InvalidState(format!(
            "item {} belongs to {}, export is for {owner}",
            item.item_key, item.owner
        )));
    }
    if !item.ease.is_finite() || item.ease < MIN_EASE {
        return Err(ReviewError::InvalidState(format!(
            "item {} has ease {}",
            item.item_key, item.ease
        )));
    }
    Ok(())
}
