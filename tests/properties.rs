use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use crowd_pulse::trending::trending_partitioned;
use crowd_pulse::{
    classify, current_busyness, resolve, trending, BusynessLevel, DayOfWeek, Place, TimeContext,
    WeeklyBusynessTable,
};

fn monday_seven() -> TimeContext {
    TimeContext::new(DayOfWeek::Monday, 7).unwrap()
}

fn places_from(values: &[Option<u8>]) -> Vec<Place> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let place = Place::new(format!("p{i}"));
            match value {
                Some(v) => {
                    let mut hours = [0u8; 24];
                    hours[7] = *v;
                    place.with_popular_times(
                        WeeklyBusynessTable::new()
                            .with_day(DayOfWeek::Monday, &hours)
                            .unwrap(),
                    )
                }
                None => place,
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_non_positive_is_closed(v in i32::MIN..=0) {
        prop_assert_eq!(classify(v), BusynessLevel::Closed);
    }

    #[test]
    fn prop_above_seventy_is_very_busy(v in 71i32..=i32::MAX) {
        prop_assert_eq!(classify(v), BusynessLevel::VeryBusy);
    }

    #[test]
    fn prop_classify_is_monotonic(a in -50i32..200, b in -50i32..200) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(lo) <= classify(hi));
        prop_assert_eq!(classify(a), classify(a));
    }

    #[test]
    fn prop_resolve_always_yields_valid_hour(secs in 0i64..4_102_444_800) {
        let instant = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
        let ctx = resolve(instant);
        prop_assert!(ctx.hour() < 24);
        let next_day = resolve(instant + Duration::days(1));
        prop_assert_eq!(next_day.hour(), ctx.hour());
        prop_assert_ne!(next_day.day(), ctx.day());
    }

    #[test]
    fn prop_present_day_never_yields_none(
        hours in prop::collection::vec(prop::option::of(0u8..=100), 0..=24),
        hour in 0u32..24,
    ) {
        let mut table = WeeklyBusynessTable::new();
        table.insert_day(DayOfWeek::Sunday, hours.clone()).unwrap();
        let place = Place::new("p").with_popular_times(table);
        let ctx = TimeContext::new(DayOfWeek::Sunday, hour).unwrap();

        let current = current_busyness(&place, ctx);
        prop_assert!(current.is_some());
        let expected = hours.get(hour as usize).copied().flatten().unwrap_or(0);
        prop_assert_eq!(current.unwrap().value, expected);

        let other = TimeContext::new(DayOfWeek::Monday, hour).unwrap();
        prop_assert!(current_busyness(&place, other).is_none());
    }

    #[test]
    fn prop_trending_is_filtered_sorted_and_bounded(
        values in prop::collection::vec(prop::option::of(0u8..=100), 0..40),
        limit in 0usize..30,
    ) {
        let places = places_from(&values);
        let ranked = trending(&places, monday_seven(), limit);

        prop_assert!(ranked.len() <= limit);
        prop_assert!(ranked.iter().all(|e| e.value > 0));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].value >= pair[1].value);
            if pair[0].value == pair[1].value {
                prop_assert!(pair[0].position < pair[1].position);
            }
        }

        let qualifying = values.iter().filter(|v| matches!(v, Some(x) if *x > 0)).count();
        prop_assert_eq!(ranked.len(), qualifying.min(limit));
    }

    #[test]
    fn prop_partitioned_matches_sequential(
        values in prop::collection::vec(prop::option::of(0u8..=100), 0..40),
        limit in 0usize..30,
        partitions in 1usize..8,
    ) {
        let places = places_from(&values);
        let sequential: Vec<_> = trending(&places, monday_seven(), limit)
            .iter()
            .map(|e| e.position)
            .collect();
        let partitioned: Vec<_> = trending_partitioned(&places, monday_seven(), limit, partitions)
            .iter()
            .map(|e| e.position)
            .collect();
        prop_assert_eq!(sequential, partitioned);
    }
}

#[test]
fn monday_table_scenario_resolves_to_moderate() {
    let table: WeeklyBusynessTable =
        serde_json::from_str(r#"{"monday": [0, 0, 0, 0, 0, 0, 30, 45, 60]}"#).unwrap();
    let place = Place::new("scenario").with_popular_times(table);
    // 2026-10-12 04:00 UTC is Monday 07:00 at UTC+3.
    let instant = DateTime::parse_from_rfc3339("2026-10-12T04:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let ctx = resolve(instant);
    assert_eq!(ctx, monday_seven());

    let current = current_busyness(&place, ctx).unwrap();
    assert_eq!(current.value, 45);
    assert_eq!(current.level, BusynessLevel::Moderate);

    let tuesday = TimeContext::new(DayOfWeek::Tuesday, 7).unwrap();
    assert_eq!(current_busyness(&place, tuesday), None);
}

#[test]
fn equal_values_rank_in_input_order() {
    let places = places_from(&[Some(50), Some(50)]);
    let ranked = trending(&places, monday_seven(), 20);
    let positions: Vec<_> = ranked.iter().map(|e| e.position).collect();
    assert_eq!(positions, [0, 1]);
}

#[test]
fn no_data_catalog_has_no_trending() {
    let places = places_from(&[None, None, None]);
    assert!(trending(&places, monday_seven(), 20).is_empty());
    assert!(trending(&[], monday_seven(), 20).is_empty());
}
