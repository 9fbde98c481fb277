use serde::Serialize;

use crate::busyness::current_busyness;
use crate::models::{Place, TimeContext};

const TRENDING_BONUS: f64 = 30.0;
const NEW_OPENING_BONUS: f64 = 20.0;
const RATING_WEIGHT: f64 = 10.0;
const REVIEWS_WEIGHT: f64 = 5.0;

const HIGH_RATING: f64 = 4.5;
const MANY_REVIEWS: i64 = 5000;
const GROWING_REVIEWS: i64 = 2000;
const BUSY_NOW_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HotnessTier {
    Normal,
    Warm,
    Hot,
}

impl HotnessTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            HotnessTier::Hot
        } else if score >= 70.0 {
            HotnessTier::Warm
        } else {
            HotnessTier::Normal
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            HotnessTier::Hot => "hot",
            HotnessTier::Warm => "warm",
            HotnessTier::Normal => "normal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HotnessTier::Hot => "حار جداً",
            HotnessTier::Warm => "رائج",
            HotnessTier::Normal => "عادي",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            HotnessTier::Hot => "#e74c3c",
            HotnessTier::Warm => "#f39c12",
            HotnessTier::Normal => "#2ecc71",
        }
    }

    pub fn marker_color(self) -> &'static str {
        match self {
            HotnessTier::Hot => "red",
            HotnessTier::Warm => "orange",
            HotnessTier::Normal => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendingReason {
    NewOpening,
    Trending,
    HighRating { rating: f64 },
    ManyReviews { reviews: i64 },
    GrowingPopularity,
    BusyNow { value: u8 },
}

impl TrendingReason {
    pub fn glyph(&self) -> &'static str {
        match self {
            TrendingReason::NewOpening => "🆕",
            TrendingReason::Trending => "🔥",
            TrendingReason::HighRating { .. } => "⭐",
            TrendingReason::ManyReviews { .. } => "💬",
            TrendingReason::GrowingPopularity => "📈",
            TrendingReason::BusyNow { .. } => "🏃",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotPlace<'a> {
    pub place: &'a Place,
    pub score: f64,
    pub tier: HotnessTier,
    pub reasons: Vec<TrendingReason>,
}

/// `trending * 30 + is_new * 20 + rating * 10 + ln(reviews) * 5`.
pub fn hotness_score(place: &Place) -> f64 {
    let trending = if place.trending { TRENDING_BONUS } else { 0.0 };
    let is_new = if place.is_new { NEW_OPENING_BONUS } else { 0.0 };
    let rating = place.google_rating.unwrap_or(0.0) * RATING_WEIGHT;
    let reviews = (place.review_count.unwrap_or(1).max(1) as f64).ln() * REVIEWS_WEIGHT;
    trending + is_new + rating + reviews
}

pub fn trending_reasons(place: &Place, ctx: TimeContext) -> Vec<TrendingReason> {
    let mut reasons = Vec::new();
    if place.is_new {
        reasons.push(TrendingReason::NewOpening);
    }
    if place.trending {
        reasons.push(TrendingReason::Trending);
    }
    if let Some(rating) = place.google_rating.filter(|r| *r >= HIGH_RATING) {
        reasons.push(TrendingReason::HighRating { rating });
    }
    match place.review_count {
        Some(reviews) if reviews >= MANY_REVIEWS => {
            reasons.push(TrendingReason::ManyReviews { reviews })
        }
        Some(reviews) if reviews >= GROWING_REVIEWS => {
            reasons.push(TrendingReason::GrowingPopularity)
        }
        _ => {}
    }
    if let Some(current) = current_busyness(place, ctx).filter(|c| c.value >= BUSY_NOW_THRESHOLD) {
        reasons.push(TrendingReason::BusyNow {
            value: current.value,
        });
    }
    reasons
}

/// Top `limit` places by hotness, optionally restricted to one category.
/// Equal scores keep input order.
pub fn hottest_places<'a>(
    places: &'a [Place],
    ctx: TimeContext,
    limit: usize,
    category: Option<&str>,
) -> Vec<HotPlace<'a>> {
    let mut hot: Vec<HotPlace<'a>> = places
        .iter()
        .filter(|place| category.map_or(true, |wanted| place.category_key() == Some(wanted)))
        .map(|place| {
            let score = hotness_score(place);
            HotPlace {
                place,
                score,
                tier: HotnessTier::from_score(score),
                reasons: trending_reasons(place, ctx),
            }
        })
        .collect();
    hot.sort_by(|a, b| b.score.total_cmp(&a.score));
    hot.truncate(limit);
    hot
}
