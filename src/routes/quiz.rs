use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        EpisodeBucket, FilterSelection, RatingBucket, RecommendationResult, StatusPreference,
        YearBucket, GENRES,
    },
    routes::AppState,
    services::quiz::{QuizAnswer, QuizError, QuizSession, QuizStep},
};

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub id: Uuid,
    pub step: QuizStep,
    pub selection: FilterSelection,
}

impl QuizResponse {
    fn new(id: Uuid, session: &QuizSession) -> Self {
        Self {
            id,
            step: session.step(),
            selection: session.selection().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizRecommendationResponse {
    pub quiz: QuizResponse,
    pub result: RecommendationResult,
}

#[derive(Debug, Deserialize)]
pub struct ToggleGenreRequest {
    pub genre: String,
}

#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QuizOptions {
    pub genres: Vec<&'static str>,
    pub years: Vec<OptionEntry>,
    pub ratings: Vec<OptionEntry>,
    pub episodes: Vec<OptionEntry>,
    pub statuses: Vec<OptionEntry>,
}

/// Choices offered at each quiz step
pub async fn options() -> Json<QuizOptions> {
    Json(QuizOptions {
        genres: GENRES.to_vec(),
        years: YearBucket::ALL
            .iter()
            .map(|b| OptionEntry { value: b.value(), label: b.label() })
            .collect(),
        ratings: RatingBucket::ALL
            .iter()
            .map(|b| OptionEntry { value: b.value(), label: b.label() })
            .collect(),
        episodes: EpisodeBucket::ALL
            .iter()
            .map(|b| OptionEntry { value: b.value(), label: b.label() })
            .collect(),
        statuses: StatusPreference::ALL
            .iter()
            .map(|b| OptionEntry { value: b.value(), label: b.label() })
            .collect(),
    })
}

/// Starts a new quiz on the genre step
pub async fn start(State(state): State<Arc<AppState>>) -> (StatusCode, Json<QuizResponse>) {
    let session = QuizSession::new();
    let id = state.quizzes.insert(session.clone()).await;
    let response = QuizResponse::new(id, &session);

    tracing::info!(quiz_id = %id, "Quiz started");

    (StatusCode::CREATED, Json(response))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizResponse>> {
    let session = state.quizzes.get(id).await.ok_or_else(|| quiz_not_found(id))?;
    Ok(Json(QuizResponse::new(id, &session)))
}

pub async fn discard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.quizzes.remove(id).await {
        return Err(quiz_not_found(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_genre(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ToggleGenreRequest>,
) -> AppResult<Json<QuizResponse>> {
    update(&state, id, |session| session.toggle_genre(&request.genre)).await
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(answer): Json<QuizAnswer>,
) -> AppResult<Json<QuizResponse>> {
    update(&state, id, |session| session.answer(answer)).await
}

pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizResponse>> {
    update(&state, id, |session| session.advance().map(|_| ())).await
}

pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizResponse>> {
    update(&state, id, |session| {
        session.reset();
        Ok(())
    })
    .await
}

/// Draws a recommendation for a finished quiz; call again to re-roll
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuizRecommendationResponse>> {
    // Snapshot the session so the lock is not held across the catalog fetch.
    let session = state.quizzes.get(id).await.ok_or_else(|| quiz_not_found(id))?;

    if session.step() != QuizStep::Ready {
        return Err(QuizError::NotReady.into());
    }

    let catalog = state.catalog.fetch_catalog().await?;
    let result = session.recommend(&catalog, state.clock.current_year(), state.random.as_ref())?;

    tracing::info!(quiz_id = %id, found = result.is_found(), "Quiz recommendation computed");

    Ok(Json(QuizRecommendationResponse {
        quiz: QuizResponse::new(id, &session),
        result,
    }))
}

async fn update<F>(state: &AppState, id: Uuid, apply: F) -> AppResult<Json<QuizResponse>>
where
    F: FnOnce(&mut QuizSession) -> Result<(), QuizError>,
{
    let response = state
        .quizzes
        .with_session(id, |session| {
            apply(session).map(|()| QuizResponse::new(id, session))
        })
        .await
        .ok_or_else(|| quiz_not_found(id))??;

    tracing::debug!(quiz_id = %id, step = %response.step, "Quiz updated");

    Ok(Json(response))
}

fn quiz_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Quiz {} not found", id))
}
