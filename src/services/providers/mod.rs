//! Catalog data provider abstraction
//!
//! The recommendation engine works on a fully materialized catalog; providers
//! are responsible for getting it there (network I/O, file reads, caching).

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{AnimeId, AnimeRecord},
};

pub mod caching;
pub mod http;
pub mod static_catalog;

pub use caching::CachingCatalogProvider;
pub use http::HttpCatalogProvider;
pub use static_catalog::StaticCatalogProvider;

/// Trait for anime catalog providers
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the full catalog, without duplicate ids
    async fn fetch_catalog(&self) -> AppResult<Vec<AnimeRecord>>;

    /// Fetch a single anime by id
    ///
    /// Default implementation scans the full catalog. Providers with a
    /// per-item endpoint should override it.
    async fn fetch_anime(&self, id: &AnimeId) -> AppResult<Option<AnimeRecord>> {
        let catalog = self.fetch_catalog().await?;
        Ok(catalog.into_iter().find(|anime| &anime.id == id))
    }

    /// Provider name for logging and cache keys
    fn name(&self) -> &'static str;
}

/// Drops records whose id was already seen; the first occurrence wins
pub fn dedupe_catalog(catalog: Vec<AnimeRecord>) -> Vec<AnimeRecord> {
    let mut seen = HashSet::new();
    let total = catalog.len();

    let unique: Vec<AnimeRecord> = catalog
        .into_iter()
        .filter(|anime| seen.insert(anime.id.clone()))
        .collect();

    if unique.len() != total {
        tracing::warn!(
            dropped = total - unique.len(),
            "Catalog contained duplicate anime ids"
        );
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let catalog = vec![
            AnimeRecord::new("1", "Original"),
            AnimeRecord::new("2", "Other"),
            AnimeRecord::new("1", "Duplicate"),
        ];

        let unique = dedupe_catalog(catalog);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "Original");
        assert_eq!(unique[1].name, "Other");
    }
}
