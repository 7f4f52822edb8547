use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::AnimeRecord,
    services::providers::{dedupe_catalog, CatalogProvider},
};

/// Serves a catalog that is already in memory
///
/// Used for offline deployments (catalog exported to a JSON file) and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogProvider {
    catalog: Vec<AnimeRecord>,
}

impl StaticCatalogProvider {
    pub fn new(catalog: Vec<AnimeRecord>) -> Self {
        Self {
            catalog: dedupe_catalog(catalog),
        }
    }

    /// Loads a JSON array of anime documents
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Internal(format!("Failed to read catalog file {}: {}", path.display(), e))
        })?;

        let catalog: Vec<AnimeRecord> = serde_json::from_str(&contents).map_err(|e| {
            AppError::InvalidInput(format!("Invalid catalog file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            anime_count = catalog.len(),
            "Loaded catalog from file"
        );

        Ok(Self::new(catalog))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for StaticCatalogProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<AnimeRecord>> {
        Ok(self.catalog.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
