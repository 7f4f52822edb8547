use serde::Deserialize;

use crate::models::AnimeRecord;

/// Genre value meaning "every genre"
const ALL_GENRES: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest release first
    Year,
    /// Highest rating first
    Rating,
}

/// Filters for the catalog listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrowseQuery {
    pub genre: Option<String>,
    pub search: Option<String>,
    pub sort: Option<SortBy>,
}

/// Narrows and orders the catalog for listing.
///
/// Missing years and ratings sort as zero; ties keep catalog order. A
/// whitespace-only search is ignored, any other search is matched as typed,
/// surrounding spaces included.
pub fn browse(catalog: &[AnimeRecord], query: &BrowseQuery) -> Vec<AnimeRecord> {
    let genre = query
        .genre
        .as_deref()
        .filter(|genre| !genre.is_empty() && *genre != ALL_GENRES);
    let search = query
        .search
        .as_deref()
        .filter(|search| !search.trim().is_empty())
        .map(str::to_lowercase);

    let mut listed: Vec<AnimeRecord> = catalog
        .iter()
        .filter(|anime| genre.map_or(true, |genre| anime.has_genre(genre)))
        .filter(|anime| {
            search
                .as_deref()
                .map_or(true, |needle| anime.name.to_lowercase().contains(needle))
        })
        .cloned()
        .collect();

    match query.sort {
        Some(SortBy::Year) => {
            listed.sort_by_key(|anime| std::cmp::Reverse(anime.release_year.unwrap_or(0)))
        }
        Some(SortBy::Rating) => listed.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0))
        }),
        None => {}
    }

    tracing::debug!(
        catalog = catalog.len(),
        listed = listed.len(),
        "Catalog browsed"
    );

    listed
}
