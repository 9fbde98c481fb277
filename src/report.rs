use std::collections::BTreeMap;
use std::fmt::Write;

use crate::busyness::{current_busyness, BusynessLevel};
use crate::models::{Place, TimeContext};
use crate::trending;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMix {
    pub counts: BTreeMap<BusynessLevel, usize>,
    pub without_data: usize,
}

pub fn summarize_levels(places: &[Place], ctx: TimeContext) -> LevelMix {
    let mut counts = BTreeMap::new();
    let mut without_data = 0usize;

    for place in places {
        match current_busyness(place, ctx) {
            Some(current) => *counts.entry(current.level).or_insert(0) += 1,
            None => without_data += 1,
        }
    }

    LevelMix {
        counts,
        without_data,
    }
}

pub fn build_report(scope: Option<&str>, ctx: TimeContext, places: &[Place], limit: usize) -> String {
    let ranked = trending::trending(places, ctx, limit);
    let mix = summarize_levels(places, ctx);

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all categories");

    let _ = writeln!(output, "# Trending Now Report");
    let _ = writeln!(
        output,
        "Generated for {} at {} ({} {:02}:00, UTC+3)",
        scope_label,
        ctx,
        ctx.day().arabic_name(),
        ctx.hour()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Trending Now");

    if ranked.is_empty() {
        let _ = writeln!(output, "No busy places right now.");
    } else {
        for (rank, entry) in ranked.iter().enumerate() {
            let _ = write!(
                output,
                "{}. {} {} {} ({}%)",
                rank + 1,
                entry.place.display_name(),
                entry.level.glyph(),
                entry.level.label(),
                entry.value
            );
            if let Some(best) = entry.place.best_visit_time.as_deref() {
                let _ = write!(output, " - best time to visit: {}", best);
            }
            let _ = writeln!(output);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Level Mix");

    if mix.counts.is_empty() {
        let _ = writeln!(output, "No places with data for this hour.");
    } else {
        for (level, count) in mix.counts.iter().rev() {
            let _ = writeln!(
                output,
                "- {} {} ({}): {} places",
                level.glyph(),
                level.label(),
                level.id(),
                count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## No Data");
    let _ = writeln!(
        output,
        "{} places have no busyness data for {}.",
        mix.without_data,
        ctx.day()
    );

    output
}
