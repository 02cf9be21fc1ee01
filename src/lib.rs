pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ReviewConfig;
pub use database::{InMemoryReviewStore, ReviewStore, SqliteReviewStore};
pub use error::{Result, ReviewError};
pub use models::{ReviewItem, ReviewOutcome, ReviewSession, ReviewStats};
pub use service::ReviewService;
