use anyhow::Context;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Place, WeeklyBusynessTable};
use crate::patterns;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("schema crowd_pulse is up to date");
    Ok(())
}

pub async fn upsert_place(pool: &PgPool, place: &Place) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO crowd_pulse.places
        (id, name_ar, name_en, category, category_en, google_rating, review_count,
         trending, is_new, popular_times, best_visit_time, peak_hours)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (id) DO UPDATE
        SET name_ar = EXCLUDED.name_ar,
            name_en = EXCLUDED.name_en,
            category = EXCLUDED.category,
            category_en = EXCLUDED.category_en,
            google_rating = EXCLUDED.google_rating,
            review_count = EXCLUDED.review_count,
            trending = EXCLUDED.trending,
            is_new = EXCLUDED.is_new,
            popular_times = EXCLUDED.popular_times,
            best_visit_time = EXCLUDED.best_visit_time,
            peak_hours = EXCLUDED.peak_hours,
            updated_at = NOW()
        "#,
    )
    .bind(&place.id)
    .bind(&place.name_ar)
    .bind(&place.name_en)
    .bind(&place.category)
    .bind(&place.category_en)
    .bind(place.google_rating)
    .bind(place.review_count)
    .bind(place.trending)
    .bind(place.is_new)
    .bind(place.popular_times.as_ref().map(Json))
    .bind(&place.best_visit_time)
    .bind(&place.peak_hours)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert place {}", place.id))?;

    Ok(result.rows_affected() > 0)
}

pub fn seed_places() -> Vec<Place> {
    let seeds = [
        ("seed-cafe-001", "محمصة الحي", "Neighborhood Roastery", "cafe", 4.7, 5400, true, false),
        ("seed-rest-001", "مطبخ نجد", "Najd Kitchen", "restaurant", 4.4, 3200, false, false),
        ("seed-shop-001", "بوليفارد مول", "Boulevard Mall", "shopping", 4.5, 12000, true, false),
        ("seed-natr-001", "منتزه وادي حنيفة", "Wadi Hanifa Park", "nature", 4.6, 8700, false, false),
        ("seed-dsrt-001", "حلا الرياض", "Riyadh Sweets", "desserts", 4.2, 900, false, true),
    ];

    seeds
        .into_iter()
        .map(|(id, name_ar, name_en, category, rating, reviews, trending, is_new)| {
            let pattern = patterns::pattern_for(category);
            Place {
                id: id.to_string(),
                name_ar: Some(name_ar.to_string()),
                name_en: Some(name_en.to_string()),
                category: None,
                category_en: Some(category.to_string()),
                google_rating: Some(rating),
                review_count: Some(reviews),
                trending,
                is_new,
                popular_times: Some(patterns::weekly_table(pattern)),
                best_visit_time: Some(pattern.best_visit.to_string()),
                peak_hours: Some(pattern.peak_hours.to_string()),
            }
        })
        .collect()
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let mut written = 0usize;
    for place in seed_places() {
        if upsert_place(pool, &place).await? {
            written += 1;
        }
    }
    info!(written, "seeded demo places");
    Ok(written)
}

pub async fn fetch_places(pool: &PgPool, category: Option<&str>) -> anyhow::Result<Vec<Place>> {
    let mut query = String::from(
        "SELECT id, name_ar, name_en, category, category_en, google_rating, review_count, \
         trending, is_new, popular_times, best_visit_time, peak_hours \
         FROM crowd_pulse.places",
    );

    if category.is_some() {
        query.push_str(" WHERE COALESCE(category_en, category) = $1");
    }
    query.push_str(" ORDER BY id");

    let mut rows = sqlx::query(&query);
    if let Some(value) = category {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut places = Vec::with_capacity(records.len());

    for row in records {
        let id: String = row.get("id");
        let popular_times: Option<Json<WeeklyBusynessTable>> = row
            .try_get("popular_times")
            .with_context(|| format!("invalid popular_times for place {id}"))?;

        places.push(Place {
            name_ar: row.get("name_ar"),
            name_en: row.get("name_en"),
            category: row.get("category"),
            category_en: row.get("category_en"),
            google_rating: row.get("google_rating"),
            review_count: row.get("review_count"),
            trending: row.get("trending"),
            is_new: row.get("is_new"),
            popular_times: popular_times.map(|Json(table)| table),
            best_visit_time: row.get("best_visit_time"),
            peak_hours: row.get("peak_hours"),
            id,
        });
    }

    debug!(count = places.len(), ?category, "fetched places");
    Ok(places)
}

pub async fn import_json(pool: &PgPool, json_path: &std::path::Path) -> anyhow::Result<usize> {
    let places = crate::catalog::load_places(json_path)?;
    let mut written = 0usize;

    for place in places.iter() {
        if upsert_place(pool, place).await? {
            written += 1;
        }
    }

    Ok(written)
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: Option<String>,
    name_ar: Option<String>,
    name_en: Option<String>,
    category: Option<String>,
    category_en: Option<String>,
    google_rating: Option<f64>,
    review_count: Option<i64>,
    #[serde(default)]
    trending: bool,
    #[serde(default)]
    is_new: bool,
    popular_times: Option<String>,
    best_visit_time: Option<String>,
    peak_hours: Option<String>,
}

impl CsvRow {
    fn into_place(self, line: usize) -> anyhow::Result<Place> {
        let popular_times = match self.popular_times.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => Some(
                serde_json::from_str::<WeeklyBusynessTable>(json)
                    .with_context(|| format!("invalid popular_times on csv line {line}"))?,
            ),
            _ => None,
        };

        Ok(Place {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("import-{}", Uuid::new_v4())),
            name_ar: self.name_ar,
            name_en: self.name_en,
            category: self.category,
            category_en: self.category_en,
            google_rating: self.google_rating,
            review_count: self.review_count,
            trending: self.trending,
            is_new: self.is_new,
            popular_times,
            best_visit_time: self.best_visit_time,
            peak_hours: self.peak_hours,
        })
    }
}

pub fn read_csv_places<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<Place>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut places = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let row = result.with_context(|| format!("malformed csv line {line}"))?;
        places.push(row.into_place(line)?);
    }

    Ok(places)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let places = read_csv_places(file)?;
    let mut written = 0usize;

    for place in places.iter() {
        if place.popular_times.is_none() {
            warn!(id = %place.id, "importing place without popular_times");
        }
        if upsert_place(pool, place).await? {
            written += 1;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayOfWeek;

    #[test]
    fn seed_places_have_full_weeks() {
        let places = seed_places();
        assert_eq!(places.len(), 5);
        for place in &places {
            let table = place.popular_times.as_ref().unwrap();
            assert_eq!(table.days().count(), 7, "{}", place.id);
            assert!(place.best_visit_time.is_some());
        }
    }

    #[test]
    fn reads_csv_with_embedded_json_tables() {
        let csv = "id,name_ar,name_en,category,category_en,google_rating,review_count,trending,is_new,popular_times,best_visit_time,peak_hours\n\
                   p1,,Roastery,,cafe,4.5,100,true,false,\"{\"\"monday\"\": [0, 10, 20]}\",,\n\
                   ,,Nameless,,nature,,,false,false,,,\n";
        let places = read_csv_places(csv.as_bytes()).unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].id, "p1");
        assert!(places[0].trending);
        let table = places[0].popular_times.as_ref().unwrap();
        assert_eq!(table.value_at(DayOfWeek::Monday, 2), Some(20));
        assert!(places[1].id.starts_with("import-"));
        assert!(places[1].popular_times.is_none());
    }

    #[test]
    fn csv_rejects_out_of_range_tables() {
        let csv = "id,name_ar,name_en,category,category_en,google_rating,review_count,trending,is_new,popular_times,best_visit_time,peak_hours\n\
                   p1,,,,,,,false,false,\"{\"\"monday\"\": [150]}\",,\n";
        let err = read_csv_places(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("csv line 2"));
    }
}
