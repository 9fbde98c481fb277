use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::models::{CurrentBusyness, DayOfWeek, HourSlot, Place, TimeContext, WeeklyBusynessTable};

/// Hours shown in a day profile; overnight hours are left out.
pub const PROFILE_HOURS: Range<u8> = 6..24;

/// Crowd level, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BusynessLevel {
    Closed,
    Quiet,
    Moderate,
    Busy,
    VeryBusy,
}

impl BusynessLevel {
    pub const ALL: [BusynessLevel; 5] = [
        BusynessLevel::Closed,
        BusynessLevel::Quiet,
        BusynessLevel::Moderate,
        BusynessLevel::Busy,
        BusynessLevel::VeryBusy,
    ];

    pub fn id(self) -> &'static str {
        match self {
            BusynessLevel::Closed => "closed",
            BusynessLevel::Quiet => "quiet",
            BusynessLevel::Moderate => "moderate",
            BusynessLevel::Busy => "busy",
            BusynessLevel::VeryBusy => "very_busy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BusynessLevel::Closed => "مغلق",
            BusynessLevel::Quiet => "هادي",
            BusynessLevel::Moderate => "معتدل",
            BusynessLevel::Busy => "مزدحم",
            BusynessLevel::VeryBusy => "مزدحم جداً",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            BusynessLevel::Closed => "⚫",
            BusynessLevel::Quiet => "🟢",
            BusynessLevel::Moderate => "🟡",
            BusynessLevel::Busy | BusynessLevel::VeryBusy => "🔴",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            BusynessLevel::Closed => "#666",
            BusynessLevel::Quiet => "#2ecc71",
            BusynessLevel::Moderate => "#f39c12",
            BusynessLevel::Busy => "#e74c3c",
            BusynessLevel::VeryBusy => "#c0392b",
        }
    }
}

impl fmt::Display for BusynessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Maps a raw occupancy value to its level. Upper bounds are inclusive and
/// input is not clamped: anything at or below 0 is closed, anything above 70
/// is very busy.
pub fn classify(value: i32) -> BusynessLevel {
    match value {
        i32::MIN..=0 => BusynessLevel::Closed,
        1..=20 => BusynessLevel::Quiet,
        21..=45 => BusynessLevel::Moderate,
        46..=70 => BusynessLevel::Busy,
        _ => BusynessLevel::VeryBusy,
    }
}

/// Busyness of `place` at `ctx`.
///
/// `None` when the place has no table or the table has no entry for the
/// day. A present day with no value for the hour reads as 0 (closed).
pub fn current_busyness(place: &Place, ctx: TimeContext) -> Option<CurrentBusyness> {
    let table = place.popular_times.as_ref()?;
    let value = table.value_at(ctx.day(), ctx.hour())?;
    Some(CurrentBusyness {
        value,
        level: classify(i32::from(value)),
    })
}

/// Classified hourly series for one day over [`PROFILE_HOURS`].
pub fn day_profile(
    table: &WeeklyBusynessTable,
    day: DayOfWeek,
    now: Option<TimeContext>,
) -> Option<Vec<HourSlot>> {
    if !table.has_day(day) {
        return None;
    }

    let slots = PROFILE_HOURS
        .map(|hour| {
            let value = table.value_at(day, hour).unwrap_or(0);
            HourSlot {
                hour,
                value,
                level: classify(i32::from(value)),
                is_now: now.is_some_and(|ctx| ctx.day() == day && ctx.hour() == hour),
            }
        })
        .collect();
    Some(slots)
}

/// First hour holding the day's highest value, if that value is above 0.
pub fn peak_hour(table: &WeeklyBusynessTable, day: DayOfWeek) -> Option<u8> {
    let hours = table.day(day)?;
    let mut best: Option<(u8, u8)> = None;
    for (hour, value) in hours.iter().enumerate() {
        let value = value.unwrap_or(0);
        if value > best.map_or(0, |(_, v)| v) {
            best = Some((hour as u8, value));
        }
    }
    best.map(|(hour, _)| hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday_place() -> Place {
        let mut hours = vec![0u8; 24];
        hours[6] = 30;
        hours[7] = 45;
        hours[20] = 88;
        Place::new("monday-only").with_popular_times(
            WeeklyBusynessTable::new()
                .with_day(DayOfWeek::Monday, &hours)
                .unwrap(),
        )
    }

    fn ctx(day: DayOfWeek, hour: u32) -> TimeContext {
        TimeContext::new(day, hour).unwrap()
    }

    #[test]
    fn thresholds_are_inclusive_on_the_upper_bound() {
        assert_eq!(classify(0), BusynessLevel::Closed);
        assert_eq!(classify(1), BusynessLevel::Quiet);
        assert_eq!(classify(20), BusynessLevel::Quiet);
        assert_eq!(classify(21), BusynessLevel::Moderate);
        assert_eq!(classify(45), BusynessLevel::Moderate);
        assert_eq!(classify(46), BusynessLevel::Busy);
        assert_eq!(classify(70), BusynessLevel::Busy);
        assert_eq!(classify(71), BusynessLevel::VeryBusy);
        assert_eq!(classify(100), BusynessLevel::VeryBusy);
    }

    #[test]
    fn out_of_range_values_are_not_clamped_but_degrade() {
        assert_eq!(classify(-5), BusynessLevel::Closed);
        assert_eq!(classify(i32::MIN), BusynessLevel::Closed);
        assert_eq!(classify(250), BusynessLevel::VeryBusy);
        assert_eq!(classify(i32::MAX), BusynessLevel::VeryBusy);
    }

    #[test]
    fn levels_carry_stable_descriptors() {
        let ids: Vec<_> = BusynessLevel::ALL.iter().map(|l| l.id()).collect();
        assert_eq!(ids, ["closed", "quiet", "moderate", "busy", "very_busy"]);
        assert_eq!(BusynessLevel::Quiet.label(), "هادي");
        assert_eq!(BusynessLevel::VeryBusy.color(), "#c0392b");
        assert_eq!(BusynessLevel::Closed.glyph(), "⚫");
        assert_eq!(
            serde_json::to_string(&BusynessLevel::VeryBusy).unwrap(),
            "\"very_busy\""
        );
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        let mut sorted = BusynessLevel::ALL;
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, BusynessLevel::ALL);
    }

    #[test]
    fn monday_seven_am_is_moderate() {
        let current = current_busyness(&monday_place(), ctx(DayOfWeek::Monday, 7)).unwrap();
        assert_eq!(current.value, 45);
        assert_eq!(current.level, BusynessLevel::Moderate);
    }

    #[test]
    fn missing_day_has_no_result() {
        assert_eq!(
            current_busyness(&monday_place(), ctx(DayOfWeek::Tuesday, 7)),
            None
        );
    }

    #[test]
    fn missing_table_has_no_result() {
        assert_eq!(
            current_busyness(&Place::new("bare"), ctx(DayOfWeek::Monday, 7)),
            None
        );
    }

    #[test]
    fn missing_hour_in_present_day_reads_as_closed() {
        let place = Place::new("short").with_popular_times(
            WeeklyBusynessTable::new()
                .with_day(DayOfWeek::Friday, &[10, 20])
                .unwrap(),
        );
        let current = current_busyness(&place, ctx(DayOfWeek::Friday, 22)).unwrap();
        assert_eq!(current.value, 0);
        assert_eq!(current.level, BusynessLevel::Closed);
    }

    #[test]
    fn day_profile_covers_display_window_and_marks_now() {
        let place = monday_place();
        let table = place.popular_times.as_ref().unwrap();
        let profile = day_profile(table, DayOfWeek::Monday, Some(ctx(DayOfWeek::Monday, 7))).unwrap();

        assert_eq!(profile.len(), 18);
        assert_eq!(profile[0].hour, 6);
        assert_eq!(profile[17].hour, 23);
        let now: Vec<_> = profile.iter().filter(|s| s.is_now).collect();
        assert_eq!(now.len(), 1);
        assert_eq!(now[0].hour, 7);
        assert_eq!(now[0].level, BusynessLevel::Moderate);
    }

    #[test]
    fn day_profile_ignores_now_on_other_days() {
        let place = monday_place();
        let table = place.popular_times.as_ref().unwrap();
        let profile = day_profile(table, DayOfWeek::Monday, Some(ctx(DayOfWeek::Sunday, 7))).unwrap();
        assert!(profile.iter().all(|s| !s.is_now));
        assert!(day_profile(table, DayOfWeek::Sunday, None).is_none());
    }

    #[test]
    fn peak_hour_picks_first_maximum() {
        let table = WeeklyBusynessTable::new()
            .with_day(DayOfWeek::Sunday, &[0, 40, 90, 90, 10])
            .unwrap()
            .with_day(DayOfWeek::Monday, &[0, 0])
            .unwrap();
        assert_eq!(peak_hour(&table, DayOfWeek::Sunday), Some(2));
        assert_eq!(peak_hour(&table, DayOfWeek::Monday), None);
        assert_eq!(peak_hour(&table, DayOfWeek::Tuesday), None);
    }
}
