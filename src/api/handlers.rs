use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Emotion, RecommendationResult, SearchResult, TrackDetails},
};

use super::AppState;

const SERVICE_NAME: &str = "Emotion Music Recommender";
const TRACK_PAGE_URL: &str = "https://www.deezer.com/track";

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct AnalyzeEmotionRequest {
    /// Data URL, e.g. `data:image/jpeg;base64,...`
    pub image_data: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchMusicQuery {
    pub query: String,
    pub emotion: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    #[serde(rename = "deezer_api")]
    pub catalog_api: &'static str,
}

/// Strips the data-URL header and decodes the base64 payload
fn decode_data_url(image_data: &str) -> AppResult<Vec<u8>> {
    let (_, payload) = image_data
        .split_once(',')
        .ok_or_else(|| AppError::InvalidInput("image_data must be a base64 data URL".to_string()))?;

    STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 image data: {}", e)))
}

// Handlers

/// Health check endpoint, probing the catalog
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.catalog().ping().await;
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        catalog_api: if connected { "connected" } else { "disconnected" },
    })
}

/// Classify an uploaded photo and recommend tracks for the detected emotion
pub async fn analyze_emotion(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AnalyzeEmotionRequest>,
) -> AppResult<Json<RecommendationResult>> {
    let bytes = decode_data_url(&request.image_data)?;

    tracing::info!(
        request_id = %request_id,
        image_bytes = bytes.len(),
        "Processing emotion analysis request"
    );

    let analyzer = state.analyzer.clone();
    let emotion = tokio::task::spawn_blocking(move || analyzer.classify(&bytes))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let result = state
        .engine
        .recommend(emotion, state.recommendation_limit)
        .await;

    tracing::info!(
        request_id = %request_id,
        emotion = %emotion,
        tracks = result.tracks.len(),
        "Emotion analysis completed"
    );

    Ok(Json(result))
}

/// Recommendations for an explicitly chosen emotion
pub async fn manual_recommendations(
    State(state): State<AppState>,
    Path(emotion): Path<String>,
) -> AppResult<Json<RecommendationResult>> {
    let result = state
        .engine
        .recommend_label(&emotion, state.recommendation_limit)
        .await?;
    Ok(Json(result))
}

/// Preview and link for a single track
pub async fn play_track(
    State(state): State<AppState>,
    Path(track_id): Path<u64>,
) -> AppResult<Json<TrackDetails>> {
    let details = state.catalog().lookup_track(track_id).await?;
    Ok(Json(details))
}

/// Redirect to the catalog's own track page
pub async fn redirect_to_catalog(Path(track_id): Path<u64>) -> Redirect {
    Redirect::temporary(&format!("{}/{}", TRACK_PAGE_URL, track_id))
}

/// Free-text search; a recognized emotion steers the genre
pub async fn search_music(
    State(state): State<AppState>,
    Query(params): Query<SearchMusicQuery>,
) -> AppResult<Json<SearchResult>> {
    if params.query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let limit = params.limit.unwrap_or(state.search_limit);
    if limit == 0 {
        return Err(AppError::InvalidInput("limit must be positive".to_string()));
    }

    let emotion = params
        .emotion
        .as_deref()
        .and_then(|label| label.parse::<Emotion>().ok());
    let results = state.engine.search(&params.query, emotion, limit).await;

    Ok(Json(SearchResult {
        query: params.query,
        emotion: params.emotion,
        results,
    }))
}
