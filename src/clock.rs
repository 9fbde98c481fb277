use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

use crate::models::{DayOfWeek, TimeContext};

/// Fixed regional offset (Riyadh, UTC+3). There is no daylight saving in the
/// region and no timezone database is consulted.
pub const REGION_UTC_OFFSET_HOURS: i64 = 3;

/// Resolves the regional day and hour for `instant`.
///
/// The instant is shifted by [`REGION_UTC_OFFSET_HOURS`] and its UTC
/// calendar fields are read, so local days roll over at local midnight.
pub fn resolve(instant: DateTime<Utc>) -> TimeContext {
    let local = instant
        .checked_add_signed(Duration::hours(REGION_UTC_OFFSET_HOURS))
        .unwrap_or(instant);
    let day = DayOfWeek::from_sunday_index(local.weekday().num_days_from_sunday());
    // `hour()` is always 0..=23.
    TimeContext::from_parts(day, local.hour() as u8)
}

pub fn resolve_now() -> TimeContext {
    resolve(Utc::now())
}

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn time_context(&self) -> TimeContext {
        resolve(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
