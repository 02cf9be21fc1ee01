pub mod outcome;
pub mod review_item;
pub mod review_session;
pub mod scheduler;
pub mod stats;

pub use outcome::ReviewOutcome;
pub use review_item::ReviewItem;
pub use review_session::ReviewSession;
pub use stats::ReviewStats;
