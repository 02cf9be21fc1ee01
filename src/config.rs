//! Runtime configuration.
//!
//! Values come from defaults, then an optional JSON file, then the environment:
//! - `MANTHA_REVIEW_DB` database file path
//! - `MANTHA_REVIEW_DUE_LIMIT` default batch size for due items
//! - `MANTHA_REVIEW_LOG` tracing filter directive

use crate::error::{Result, ReviewError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_DB: &str = "MANTHA_REVIEW_DB";
pub const ENV_DUE_LIMIT: &str = "MANTHA_REVIEW_DUE_LIMIT";
pub const ENV_LOG: &str = "MANTHA_REVIEW_LOG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewConfig {
    pub database_path: PathBuf,
    pub due_limit: usize,
    pub log_filter: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("mantha-review.sqlite3"),
            due_limit: 5,
            log_filter: "info".to_string(),
        }
    }
}

impl ReviewConfig {
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON config file; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Applies environment-style overrides looked up through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(path) = lookup(ENV_DB).filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(limit) = lookup(ENV_DUE_LIMIT) {
            self.due_limit = limit.trim().parse().map_err(|_| {
                ReviewError::Config(format!("{ENV_DUE_LIMIT} must be a non-negative integer, got {limit:?}"))
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            self.log_filter = filter;
        }
        Ok(self)
    }
}
