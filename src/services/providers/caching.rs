use std::sync::Arc;

use crate::{
    db::{Cache, CacheKey},
    error::AppResult,
    models::{AnimeId, AnimeRecord},
    services::providers::CatalogProvider,
};

/// Read-through Redis cache in front of another catalog provider
///
/// Cache failures never fail a request: a broken Redis only costs a trip to
/// the inner provider.
pub struct CachingCatalogProvider {
    inner: Arc<dyn CatalogProvider>,
    cache: Cache,
    ttl: u64,
}

impl CachingCatalogProvider {
    pub fn new(inner: Arc<dyn CatalogProvider>, cache: Cache, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }

    async fn lookup<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.cache.get_from_cache(key).await {
            Ok(Some(value)) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, bypassing cache");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for CachingCatalogProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<AnimeRecord>> {
        let key = CacheKey::Catalog(self.inner.name());

        if let Some(catalog) = self.lookup(&key).await {
            return Ok(catalog);
        }

        let catalog = self.inner.fetch_catalog().await?;
        self.cache.set_in_background(&key, &catalog, self.ttl);
        Ok(catalog)
    }

    async fn fetch_anime(&self, id: &AnimeId) -> AppResult<Option<AnimeRecord>> {
        let key = CacheKey::Anime(self.inner.name(), id.clone());

        if let Some(anime) = self.lookup(&key).await {
            return Ok(Some(anime));
        }

        let anime = self.inner.fetch_anime(id).await?;
        if let Some(anime) = &anime {
            self.cache.set_in_background(&key, anime, self.ttl);
        }
        Ok(anime)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
