use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{AnimeRecord, FilterSelection, RecommendationResult},
    routes::AppState,
    services::recommendations,
};

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub result: RecommendationResult,
    /// Size of the surviving set the pick was drawn from
    pub candidates: usize,
}

/// Handler for the one-shot recommendation endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(selection): Json<FilterSelection>,
) -> AppResult<Json<RecommendationResponse>> {
    let catalog = state.catalog.fetch_catalog().await?;
    let current_year = state.clock.current_year();

    let response = recommend_from(&state, &catalog, &selection, current_year);

    tracing::info!(
        request_id = %request_id,
        provider = state.catalog.name(),
        catalog = catalog.len(),
        candidates = response.candidates,
        found = response.result.is_found(),
        "Recommendation computed"
    );

    Ok(Json(response))
}

/// Runs the engine and reports the surviving-set size alongside the pick
fn recommend_from(
    state: &AppState,
    catalog: &[AnimeRecord],
    selection: &FilterSelection,
    current_year: i32,
) -> RecommendationResponse {
    let survivors = recommendations::surviving_set(catalog, selection, current_year);
    let result = recommendations::pick_one(&survivors, state.random.as_ref());

    RecommendationResponse {
        result,
        candidates: survivors.len(),
    }
}
