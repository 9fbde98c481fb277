use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::busyness::BusynessLevel;
use crate::error::{CrowdError, Result};

pub const HOURS_PER_DAY: usize = 24;
pub const MAX_BUSYNESS: u8 = 100;

/// Day identifiers used as keys of a [`WeeklyBusynessTable`].
///
/// Variants are declared Saturday-first, the regional display order, so the
/// derived `Ord` and every `BTreeMap` keyed by day iterate in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl DayOfWeek {
    pub const DISPLAY_ORDER: [DayOfWeek; 7] = [
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
    ];

    /// Indexed by chrono's `num_days_from_sunday` (Sunday = 0 .. Saturday = 6).
    pub const SUNDAY_FIRST: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn from_sunday_index(index: u32) -> Self {
        Self::SUNDAY_FIRST[(index % 7) as usize]
    }

    pub fn id(self) -> &'static str {
        match self {
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
        }
    }

    pub fn arabic_name(self) -> &'static str {
        match self {
            DayOfWeek::Saturday => "السبت",
            DayOfWeek::Sunday => "الأحد",
            DayOfWeek::Monday => "الاثنين",
            DayOfWeek::Tuesday => "الثلاثاء",
            DayOfWeek::Wednesday => "الأربعاء",
            DayOfWeek::Thursday => "الخميس",
            DayOfWeek::Friday => "الجمعة",
        }
    }

    pub fn is_regional_weekend(self) -> bool {
        matches!(self, DayOfWeek::Thursday | DayOfWeek::Friday)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DayOfWeek {
    type Err = CrowdError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::DISPLAY_ORDER
            .into_iter()
            .find(|day| day.id() == wanted)
            .ok_or_else(|| CrowdError::UnknownDay(s.to_string()))
    }
}

type RawWeeklyTable = BTreeMap<DayOfWeek, Vec<Option<i64>>>;

/// Per-day, per-hour occupancy for one place.
///
/// Storage is sparse: a day may hold fewer than 24 hours and individual hours
/// may be `None`. Both read as 0 through [`WeeklyBusynessTable::value_at`]
/// while a missing day reads as no data at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeeklyTable", into = "RawWeeklyTable")]
pub struct WeeklyBusynessTable {
    days: BTreeMap<DayOfWeek, Vec<Option<u8>>>,
}

impl WeeklyBusynessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, day: DayOfWeek, hours: &[u8]) -> Result<Self> {
        self.insert_day(day, hours.iter().copied().map(Some).collect())?;
        Ok(self)
    }

    pub fn insert_day(&mut self, day: DayOfWeek, hours: Vec<Option<u8>>) -> Result<()> {
        if hours.len() > HOURS_PER_DAY {
            return Err(CrowdError::TooManyHours {
                day,
                len: hours.len(),
            });
        }
        if let Some((hour, value)) = hours
            .iter()
            .enumerate()
            .find_map(|(hour, value)| value.filter(|v| *v > MAX_BUSYNESS).map(|v| (hour, v)))
        {
            return Err(CrowdError::ValueOutOfRange {
                day,
                hour,
                value: i64::from(value),
            });
        }
        self.days.insert(day, hours);
        Ok(())
    }

    pub fn day(&self, day: DayOfWeek) -> Option<&[Option<u8>]> {
        self.days.get(&day).map(Vec::as_slice)
    }

    pub fn has_day(&self, day: DayOfWeek) -> bool {
        self.days.contains_key(&day)
    }

    /// `None` when the day is absent; a present day with a missing or null
    /// hour yields `Some(0)`.
    pub fn value_at(&self, day: DayOfWeek, hour: u8) -> Option<u8> {
        let hours = self.days.get(&day)?;
        Some(hours.get(usize::from(hour)).copied().flatten().unwrap_or(0))
    }

    pub fn days(&self) -> impl Iterator<Item = DayOfWeek> + '_ {
        self.days.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl TryFrom<RawWeeklyTable> for WeeklyBusynessTable {
    type Error = CrowdError;

    fn try_from(raw: RawWeeklyTable) -> Result<Self> {
        let mut table = WeeklyBusynessTable::new();
        for (day, hours) in raw {
            let mut checked = Vec::with_capacity(hours.len());
            for (hour, value) in hours.into_iter().enumerate() {
                let value = match value {
                    Some(v) => Some(u8::try_from(v).ok().filter(|v| *v <= MAX_BUSYNESS).ok_or(
                        CrowdError::ValueOutOfRange {
                            day,
                            hour,
                            value: v,
                        },
                    )?),
                    None => None,
                };
                checked.push(value);
            }
            table.insert_day(day, checked)?;
        }
        Ok(table)
    }
}

impl From<WeeklyBusynessTable> for RawWeeklyTable {
    fn from(table: WeeklyBusynessTable) -> Self {
        table
            .days
            .into_iter()
            .map(|(day, hours)| (day, hours.into_iter().map(|v| v.map(i64::from)).collect()))
            .collect()
    }
}

/// Catalog record. Field names follow the catalog json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_en: Option<String>,
    #[serde(default)]
    pub google_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<i64>,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub popular_times: Option<WeeklyBusynessTable>,
    #[serde(default)]
    pub best_visit_time: Option<String>,
    #[serde(default)]
    pub peak_hours: Option<String>,
}

impl Place {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_popular_times(mut self, table: WeeklyBusynessTable) -> Self {
        self.popular_times = Some(table);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name_ar
            .as_deref()
            .or(self.name_en.as_deref())
            .unwrap_or(&self.id)
    }

    /// English category when present, otherwise the raw category.
    pub fn category_key(&self) -> Option<&str> {
        self.category_en.as_deref().or(self.category.as_deref())
    }
}

/// Resolved (day, hour) pair used to index a [`WeeklyBusynessTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeContext {
    day: DayOfWeek,
    hour: u8,
}

impl TimeContext {
    pub fn new(day: DayOfWeek, hour: u32) -> Result<Self> {
        match u8::try_from(hour) {
            Ok(h) if usize::from(h) < HOURS_PER_DAY => Ok(Self { day, hour: h }),
            _ => Err(CrowdError::InvalidHour(hour)),
        }
    }

    /// Callers guarantee `hour < 24`.
    pub(crate) fn from_parts(day: DayOfWeek, hour: u8) -> Self {
        debug_assert!(usize::from(hour) < HOURS_PER_DAY);
        Self { day, hour }
    }

    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }
}

impl fmt::Display for TimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:00", self.day, self.hour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentBusyness {
    pub value: u8,
    pub level: BusynessLevel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendingEntry<'a> {
    pub place: &'a Place,
    /// Index of `place` in the ranked input slice.
    pub position: usize,
    pub value: u8,
    pub level: BusynessLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourSlot {
    pub hour: u8,
    pub value: u8,
    pub level: BusynessLevel,
    pub is_now: bool,
}
