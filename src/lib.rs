pub mod busyness;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod hotness;
pub mod models;
pub mod patterns;
pub mod report;
pub mod trending;

pub use busyness::{classify, current_busyness, BusynessLevel};
pub use clock::{resolve, Clock, FixedClock, SystemClock};
pub use error::CrowdError;
pub use models::{CurrentBusyness, DayOfWeek, Place, TimeContext, TrendingEntry, WeeklyBusynessTable};
pub use trending::{trending, DEFAULT_TRENDING_LIMIT};
