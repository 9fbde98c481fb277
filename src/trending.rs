use std::thread;

use tracing::debug;

use crate::busyness::current_busyness;
use crate::models::{Place, TimeContext, TrendingEntry};

pub const DEFAULT_TRENDING_LIMIT: usize = 20;

/// Places that are busy right now, busiest first.
///
/// Places without data for the context's day and places reading 0 are
/// dropped. Ordering is by value only; the sort is stable, so places with the
/// same value keep their input order. At most `limit` entries are returned.
pub fn trending<'a>(places: &'a [Place], ctx: TimeContext, limit: usize) -> Vec<TrendingEntry<'a>> {
    let mut entries = qualifying(places, 0, ctx);
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries.truncate(limit);
    debug!(
        candidates = places.len(),
        returned = entries.len(),
        %ctx,
        "ranked trending places"
    );
    entries
}

/// Same result as [`trending`], with candidate evaluation split across
/// `partitions` scoped threads.
pub fn trending_partitioned<'a>(
    places: &'a [Place],
    ctx: TimeContext,
    limit: usize,
    partitions: usize,
) -> Vec<TrendingEntry<'a>> {
    if places.is_empty() || limit == 0 {
        return Vec::new();
    }
    let chunk_size = places.len().div_ceil(partitions.max(1));

    let partials: Vec<Vec<TrendingEntry<'a>>> = thread::scope(|scope| {
        let handles: Vec<_> = places
            .chunks(chunk_size)
            .enumerate()
            .map(|(index, chunk)| {
                let offset = index * chunk_size;
                scope.spawn(move || {
                    let mut local = qualifying(chunk, offset, ctx);
                    local.sort_by(|a, b| b.value.cmp(&a.value));
                    local.truncate(limit);
                    local
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    });

    merge_ranked(partials, limit)
}

/// Merges partial rankings by value, then by input position.
pub fn merge_ranked<'a>(partials: Vec<Vec<TrendingEntry<'a>>>, limit: usize) -> Vec<TrendingEntry<'a>> {
    let mut merged: Vec<TrendingEntry<'a>> = partials.into_iter().flatten().collect();
    merged.sort_by(|a, b| b.value.cmp(&a.value).then(a.position.cmp(&b.position)));
    merged.truncate(limit);
    merged
}

fn qualifying(places: &[Place], offset: usize, ctx: TimeContext) -> Vec<TrendingEntry<'_>> {
    places
        .iter()
        .enumerate()
        .filter_map(|(index, place)| {
            let current = current_busyness(place, ctx)?;
            (current.value > 0).then_some(TrendingEntry {
                place,
                position: offset + index,
                value: current.value,
                level: current.level,
            })
        })
        .collect()
}
