use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{AnimeId, AnimeRecord},
    routes::AppState,
    services::browse::{self, BrowseQuery},
};

/// Handler for the catalog listing endpoint
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<Vec<AnimeRecord>>> {
    let catalog = state.catalog.fetch_catalog().await?;
    Ok(Json(browse::browse(&catalog, &query)))
}

/// Handler for the anime detail endpoint
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<AnimeRecord>> {
    let id = AnimeId::new(id);

    state
        .catalog
        .fetch_anime(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Anime {} not found", id)))
}
