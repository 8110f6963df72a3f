use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Classification + recommendation
        .route("/analyze-emotion", post(handlers::analyze_emotion))
        .route(
            "/manual-recommendations/:emotion",
            get(handlers::manual_recommendations),
        )
        // Tracks
        .route("/play-track/:track_id", get(handlers::play_track))
        .route(
            "/redirect-to-deezer/:track_id",
            get(handlers::redirect_to_catalog),
        )
        .route("/search-music", get(handlers::search_music))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
