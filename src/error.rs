use std::path::PathBuf;

use thiserror::Error;

use crate::models::DayOfWeek;

#[derive(Debug, Error)]
pub enum CrowdError {
    #[error("busyness value {value} for {day} hour {hour} is outside 0..=100")]
    ValueOutOfRange {
        day: DayOfWeek,
        hour: usize,
        value: i64,
    },

    #[error("{day} has {len} hourly entries, at most 24 are allowed")]
    TooManyHours { day: DayOfWeek, len: usize },

    #[error("hour {0} is outside 0..=23")]
    InvalidHour(u32),

    #[error("unknown day identifier `{0}`")]
    UnknownDay(String),

    #[error("failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog json: {0}")]
    CatalogJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CrowdError>;
