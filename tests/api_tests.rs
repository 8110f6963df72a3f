use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};

use mood_tunes_api::{
    api::{create_router, AppState},
    error::AppResult,
    models::{SourceLabel, Track, TrackDetails, TrackInfo},
    services::{
        catalog::{CatalogClient, LookupError},
        FaceDetector,
    },
};

#[derive(Default)]
struct StubCatalog {
    search: Vec<Track>,
    chart: Vec<Track>,
    fallback: Vec<Track>,
    reachable: bool,
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn search_tracks(&self, query: &str, genre_hint: &str, limit: usize) -> Vec<Track> {
        let source = if query == "popular" && genre_hint.is_empty() {
            &self.fallback
        } else {
            &self.search
        };
        source.iter().take(limit).cloned().collect()
    }

    async fn chart_tracks(&self, _genre_name: &str, limit: usize) -> Vec<Track> {
        self.chart.iter().take(limit).cloned().collect()
    }

    async fn lookup_track(&self, track_id: u64) -> Result<TrackDetails, LookupError> {
        if track_id != 42 {
            return Err(LookupError::NotFound { track_id });
        }
        Ok(TrackDetails {
            preview_url: Some("https://cdn.example/preview.mp3".to_string()),
            external_url: "https://www.deezer.com/track/42".to_string(),
            track_info: TrackInfo {
                title: "Answer".to_string(),
                artist: "Deep Thought".to_string(),
                album: "Hitchhiker".to_string(),
                duration_seconds: 42,
            },
        })
    }

    async fn ping(&self) -> bool {
        self.reachable
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct FixedFaces(usize);

impl FaceDetector for FixedFaces {
    fn count_faces(&self, _luma: &GrayImage) -> AppResult<usize> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn track(id: u64) -> Track {
    Track {
        id,
        title: format!("Track {}", id),
        artist: "Artist".to_string(),
        album: "Album".to_string(),
        preview_url: None,
        external_url: format!("https://www.deezer.com/track/{}", id),
        cover_image_url: None,
        duration_seconds: 200,
        source: SourceLabel::Search,
    }
}

fn create_test_server(catalog: StubCatalog, faces: usize) -> TestServer {
    let state = AppState::new(Arc::new(catalog), Arc::new(FixedFaces(faces)));
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn searching_catalog() -> StubCatalog {
    StubCatalog {
        search: vec![track(1), track(2), track(3)],
        reachable: true,
        ..Default::default()
    }
}

fn black_png_data_url() -> String {
    let image = RgbImage::from_pixel(16, 16, Rgb([0, 0, 0]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["deezer_api"], "connected");
}

#[tokio::test]
async fn test_health_check_reports_unreachable_catalog() {
    let server = create_test_server(StubCatalog::default(), 1);
    let body: Value = server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["deezer_api"], "disconnected");
}

#[tokio::test]
async fn test_manual_recommendations() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/manual-recommendations/happy").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["emotion"], "happy");
    assert_eq!(body["source"], "search");
    let ids: Vec<u64> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let first = &body["recommendations"][0];
    assert_eq!(first["name"], "Track 1");
    assert_eq!(first["artist"], "Artist");
    assert_eq!(first["album"], "Album");
    assert_eq!(first["duration"], 200);
    assert_eq!(first["external_url"], "https://www.deezer.com/track/1");
    assert!(first.get("image_url").is_some());
    assert!(first.get("preview_url").is_some());
    assert!(first.get("title").is_none());
}

#[tokio::test]
async fn test_manual_recommendations_invalid_emotion() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/manual-recommendations/not_a_real_emotion").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid emotion");
}

#[tokio::test]
async fn test_fallback_when_search_and_chart_are_empty() {
    let catalog = StubCatalog {
        fallback: vec![track(9), track(8), track(7)],
        ..Default::default()
    };
    let server = create_test_server(catalog, 1);
    let body: Value = server.get("/manual-recommendations/calm").await.json();
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    assert_eq!(body["recommendations"][0]["id"], 9);
    assert_eq!(body["recommendations"][0]["source"], "fallback");
}

#[tokio::test]
async fn test_empty_catalog_is_still_success() {
    let server = create_test_server(StubCatalog::default(), 1);
    let response = server.get("/manual-recommendations/sad").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["source"], "fallback");
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analyze_emotion_without_face_is_neutral() {
    let server = create_test_server(searching_catalog(), 0);
    let response = server
        .post("/analyze-emotion")
        .json(&json!({ "image_data": black_png_data_url() }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["emotion"], "neutral");
    assert_eq!(body["source"], "search");
}

#[tokio::test]
async fn test_analyze_emotion_dark_flat_face_is_sad() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server
        .post("/analyze-emotion")
        .json(&json!({ "image_data": black_png_data_url() }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["emotion"], "sad");
}

#[tokio::test]
async fn test_analyze_emotion_rejects_non_image_payload() {
    let server = create_test_server(searching_catalog(), 1);
    let payload = format!("data:image/png;base64,{}", STANDARD.encode(b"not an image"));
    let response = server
        .post("/analyze-emotion")
        .json(&json!({ "image_data": payload }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_emotion_rejects_missing_data_url_header() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server
        .post("/analyze-emotion")
        .json(&json!({ "image_data": "plainbase64" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_play_track() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/play-track/42").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["external_url"], "https://www.deezer.com/track/42");
    assert_eq!(body["track_info"]["artist"], "Deep Thought");
    assert_eq!(body["track_info"]["name"], "Answer");
    assert_eq!(body["track_info"]["duration"], 42);
    assert_eq!(body["preview_url"], "https://cdn.example/preview.mp3");
}

#[tokio::test]
async fn test_play_track_unknown_id() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/play-track/7").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_redirect_to_catalog() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/redirect-to-deezer/3135556").await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://www.deezer.com/track/3135556"
    );
}

#[tokio::test]
async fn test_search_music() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server
        .get("/search-music")
        .add_query_param("query", "daft punk")
        .add_query_param("emotion", "energetic")
        .add_query_param("limit", 2)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["query"], "daft punk");
    assert_eq!(body["emotion"], "energetic");
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_music_rejects_empty_query() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server
        .get("/search-music")
        .add_query_param("query", " ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(searching_catalog(), 1);
    let response = server.get("/manual-recommendations/happy").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
