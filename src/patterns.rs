use crate::models::{DayOfWeek, WeeklyBusynessTable, HOURS_PER_DAY};

/// Typical hourly curves for a place category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPattern {
    pub category: &'static str,
    pub weekday: [u8; HOURS_PER_DAY],
    pub weekend: [u8; HOURS_PER_DAY],
    pub peak_hours: &'static str,
    pub best_visit: &'static str,
}

pub const FALLBACK_CATEGORY: &str = "activity";

pub static PATTERNS: [CategoryPattern; 8] = [
    CategoryPattern {
        category: "cafe",
        weekday: [0, 0, 0, 0, 0, 0, 5, 15, 40, 60, 65, 55, 40, 30, 25, 35, 50, 55, 60, 55, 45, 30, 15, 5],
        weekend: [0, 0, 0, 0, 0, 0, 5, 10, 30, 50, 65, 70, 60, 45, 35, 45, 60, 65, 70, 65, 55, 40, 20, 8],
        peak_hours: "8:00-11:00, 16:00-18:00",
        best_visit: "صباحاً من 8-10 أو بعد العصر 4-6",
    },
    CategoryPattern {
        category: "restaurant",
        weekday: [0, 0, 0, 0, 0, 0, 0, 5, 10, 15, 20, 40, 70, 85, 70, 40, 25, 30, 50, 70, 85, 90, 75, 40],
        weekend: [0, 0, 0, 0, 0, 0, 0, 5, 10, 20, 30, 50, 75, 90, 75, 45, 30, 40, 60, 80, 95, 100, 85, 50],
        peak_hours: "12:00-14:00, 20:00-23:00",
        best_visit: "قبل وقت الذروة: 11:30 ص أو 7:30 م",
    },
    CategoryPattern {
        category: "activity",
        weekday: [0, 0, 0, 0, 0, 0, 0, 5, 10, 20, 30, 35, 30, 25, 20, 30, 45, 55, 65, 70, 65, 55, 35, 15],
        weekend: [0, 0, 0, 0, 0, 0, 0, 5, 15, 30, 45, 55, 60, 55, 50, 55, 65, 75, 85, 90, 85, 70, 50, 25],
        peak_hours: "17:00-22:00",
        best_visit: "الصباح أو بداية العصر للهدوء",
    },
    CategoryPattern {
        category: "shopping",
        weekday: [0, 0, 0, 0, 0, 0, 0, 0, 5, 15, 30, 40, 45, 40, 30, 35, 50, 60, 65, 70, 65, 55, 40, 15],
        weekend: [0, 0, 0, 0, 0, 0, 0, 0, 10, 20, 40, 55, 65, 60, 55, 60, 70, 80, 90, 95, 90, 80, 60, 25],
        peak_hours: "17:00-22:00",
        best_visit: "أيام الأسبوع الصباح 10-12",
    },
    CategoryPattern {
        category: "entertainment",
        weekday: [0, 0, 0, 0, 0, 0, 0, 0, 5, 10, 15, 20, 25, 20, 15, 25, 40, 55, 70, 80, 75, 60, 40, 15],
        weekend: [0, 0, 0, 0, 0, 0, 0, 0, 10, 20, 30, 40, 50, 45, 40, 50, 65, 80, 90, 95, 90, 80, 60, 30],
        peak_hours: "18:00-22:00",
        best_visit: "بداية الأسبوع أو الصباح",
    },
    CategoryPattern {
        category: "nature",
        weekday: [0, 0, 0, 0, 0, 5, 15, 30, 45, 50, 45, 35, 20, 10, 5, 15, 35, 50, 55, 45, 30, 15, 5, 0],
        weekend: [0, 0, 0, 0, 0, 5, 20, 40, 55, 65, 60, 50, 35, 20, 10, 25, 45, 60, 65, 55, 40, 25, 10, 0],
        peak_hours: "7:00-10:00, 16:00-19:00",
        best_visit: "الصباح الباكر 6-9 أو قبل المغرب",
    },
    CategoryPattern {
        category: "desserts",
        weekday: [0, 0, 0, 0, 0, 0, 0, 5, 10, 15, 20, 25, 30, 25, 20, 30, 45, 55, 65, 75, 80, 70, 50, 25],
        weekend: [0, 0, 0, 0, 0, 0, 0, 5, 10, 20, 30, 35, 40, 35, 30, 40, 55, 65, 80, 90, 95, 85, 65, 35],
        peak_hours: "19:00-23:00",
        best_visit: "بعد الظهر 2-5 أو الصباح",
    },
    CategoryPattern {
        category: "events",
        weekday: [0, 0, 0, 0, 0, 0, 0, 0, 5, 10, 15, 20, 25, 20, 15, 25, 45, 65, 80, 90, 85, 70, 50, 20],
        weekend: [0, 0, 0, 0, 0, 0, 0, 0, 10, 20, 30, 40, 50, 45, 40, 50, 65, 80, 95, 100, 95, 85, 65, 30],
        peak_hours: "18:00-22:00",
        best_visit: "بداية الفعالية أو أيام الأسبوع",
    },
];

/// Pattern for `category`, falling back to the activity curve.
pub fn pattern_for(category: &str) -> &'static CategoryPattern {
    let wanted = category.trim().to_ascii_lowercase();
    PATTERNS
        .iter()
        .find(|p| p.category == wanted)
        .or_else(|| PATTERNS.iter().find(|p| p.category == FALLBACK_CATEGORY))
        .unwrap_or(&PATTERNS[0])
}

/// Builds a full week: Thursday and Friday get the weekend curve.
pub fn weekly_table(pattern: &CategoryPattern) -> WeeklyBusynessTable {
    let mut table = WeeklyBusynessTable::new();
    for day in DayOfWeek::DISPLAY_ORDER {
        let curve = if day.is_regional_weekend() {
            &pattern.weekend
        } else {
            &pattern.weekday
        };
        // Curves are 24 values in 0..=100.
        let _ = table.insert_day(day, curve.iter().copied().map(Some).collect());
    }
    table
}
