//! HTTP catalog provider
//!
//! Reads the anime listing from the catalog backend:
//! 1. Catalog: GET {catalog_url} → JSON array of anime documents
//! 2. Single anime: GET {catalog_url}/{id} → one document, 404 when unknown
//!
//! The id always lands in a single percent-encoded path segment.

use crate::{
    error::{AppError, AppResult},
    models::{AnimeId, AnimeRecord},
    services::providers::{dedupe_catalog, CatalogProvider},
};
use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpCatalogProvider {
    http_client: HttpClient,
    catalog_url: Url,
}

impl HttpCatalogProvider {
    pub fn new(catalog_url: impl Into<String>) -> AppResult<Self> {
        let raw = catalog_url.into();
        let catalog_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| AppError::InvalidInput(format!("Invalid catalog URL {}: {}", raw, e)))?;
        if catalog_url.cannot_be_a_base() {
            return Err(AppError::InvalidInput(format!(
                "Catalog URL {} cannot take a path",
                raw
            )));
        }

        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            catalog_url,
        })
    }

    /// URL of one anime document, `None` for ids that cannot name one
    fn anime_url(&self, id: &AnimeId) -> Option<Url> {
        // Dot segments would be dropped and address the listing itself.
        if matches!(id.as_str(), "" | "." | "..") {
            return None;
        }

        let mut url = self.catalog_url.clone();
        url.path_segments_mut().ok()?.push(id.as_str());
        Some(url)
    }

    /// Turns a non-success response into an `ExternalApi` error
    async fn ensure_success(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "Catalog backend request failed");

        Err(AppError::ExternalApi(format!(
            "Catalog backend returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for HttpCatalogProvider {
    async fn fetch_catalog(&self) -> AppResult<Vec<AnimeRecord>> {
        tracing::debug!(url = %self.catalog_url, "Fetching catalog from backend");

        let response = self.http_client.get(self.catalog_url.clone()).send().await?;
        let response = Self::ensure_success(response).await?;
        let catalog: Vec<AnimeRecord> = response.json().await?;

        tracing::info!(anime_count = catalog.len(), "Fetched catalog from backend");

        Ok(dedupe_catalog(catalog))
    }

    async fn fetch_anime(&self, id: &AnimeId) -> AppResult<Option<AnimeRecord>> {
        let Some(url) = self.anime_url(id) else {
            tracing::debug!(anime_id = %id, "Anime id cannot address a document");
            return Ok(None);
        };

        let response = self.http_client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(anime_id = %id, "Anime not found in backend");
            return Ok(None);
        }

        let response = Self::ensure_success(response).await?;
        Ok(Some(response.json().await?))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
