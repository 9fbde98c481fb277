use std::path::Path;

use tracing::debug;

use crate::error::{CrowdError, Result};
use crate::models::Place;

/// Parses a json array of places. Busyness tables are validated while parsing.
pub fn parse_places(json: &str) -> Result<Vec<Place>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_places(path: &Path) -> Result<Vec<Place>> {
    let json = std::fs::read_to_string(path).map_err(|source| CrowdError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    let places = parse_places(&json)?;
    debug!(path = %path.display(), count = places.len(), "loaded catalog file");
    Ok(places)
}

pub fn filter_category(places: Vec<Place>, category: Option<&str>) -> Vec<Place> {
    match category {
        Some(wanted) => places
            .into_iter()
            .filter(|place| place.category_key() == Some(wanted))
            .collect(),
        None => places,
    }
}
