use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod animes;
pub mod quiz;
pub mod recommendations;
mod state;

pub use state::{AppState, QuizStore};

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/animes", get(animes::list))
        .route("/animes/:id", get(animes::get))
        .route("/recommendations", post(recommendations::recommend))
        .route("/quiz", post(quiz::start))
        .route("/quiz/options", get(quiz::options))
        .route("/quiz/:id", get(quiz::show).delete(quiz::discard))
        .route("/quiz/:id/genres", post(quiz::toggle_genre))
        .route("/quiz/:id/answer", post(quiz::answer))
        .route("/quiz/:id/next", post(quiz::advance))
        .route("/quiz/:id/reset", post(quiz::reset))
        .route("/quiz/:id/recommend", post(quiz::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
