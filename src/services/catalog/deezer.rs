/// Deezer public API client
///
/// API Flow:
/// 1. Search: /search?q=...&limit=... → ranked tracks
/// 2. Charts: /genre → genre directory, then /chart/{genre_id}/tracks
/// 3. Lookup: /track/{id}
///
/// Deezer reports most errors as HTTP 200 with an `error` object in the body,
/// so every response is checked for that payload before the data is read.
use crate::{
    models::{
        deezer::{DeezerError, DeezerGenre, DeezerTrack},
        SourceLabel, Track, TrackDetails,
    },
    services::catalog::{search_term, CatalogClient, CatalogError, LookupError},
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DeezerClient {
    http_client: HttpClient,
    api_url: String,
}

impl DeezerClient {
    /// Creates a client whose every call is bounded by `timeout`
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a catalog path and return the JSON body, with Deezer error payloads
    /// turned into `CatalogError::Api`
    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, CatalogError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        if let Some(error) = body.get("error") {
            let error: DeezerError = serde_json::from_value(error.clone())
                .map_err(|e| CatalogError::Malformed(e.to_string()))?;
            return Err(CatalogError::Api {
                error_type: error.error_type,
                message: error.message,
                code: error.code,
            });
        }

        Ok(body)
    }

    async fn fetch_search(&self, term: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        let body = self
            .get_json("/search", &[("q", term.to_string()), ("limit", limit.to_string())])
            .await?;
        parse_track_list(&body, limit, SourceLabel::Search)
    }

    async fn fetch_chart(&self, genre_name: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        let directory = self.get_json("/genre", &[]).await?;
        let genres = parse_genres(&directory)?;

        let Some(genre_id) = resolve_genre(&genres, genre_name) else {
            tracing::debug!(genre = %genre_name, "No catalog genre matches");
            return Ok(vec![]);
        };

        let body = self
            .get_json(&format!("/chart/{}/tracks", genre_id), &[])
            .await?;
        parse_track_list(&body, limit, SourceLabel::Chart)
    }
}

/// Reads the `data` array of a list response, skipping entries that don't
/// look like tracks
fn parse_track_list(body: &Value, limit: usize, source: SourceLabel) -> Result<Vec<Track>, CatalogError> {
    let entries = body["data"]
        .as_array()
        .ok_or_else(|| CatalogError::Malformed("missing data array".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<DeezerTrack>(entry.clone()).ok())
        .take(limit)
        .map(|track| track.into_track(source))
        .collect())
}

fn parse_genres(body: &Value) -> Result<Vec<DeezerGenre>, CatalogError> {
    let entries = body["data"]
        .as_array()
        .ok_or_else(|| CatalogError::Malformed("missing genre list".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<DeezerGenre>(entry.clone()).ok())
        .collect())
}

/// First genre whose name contains `genre_name`, case-insensitively
fn resolve_genre(genres: &[DeezerGenre], genre_name: &str) -> Option<u64> {
    let needle = genre_name.to_lowercase();
    genres
        .iter()
        .find(|genre| genre.name.to_lowercase().contains(&needle))
        .map(|genre| genre.id)
}

#[async_trait::async_trait]
impl CatalogClient for DeezerClient {
    async fn search_tracks(&self, query: &str, genre_hint: &str, limit: usize) -> Vec<Track> {
        let term = search_term(query, genre_hint);

        match self.fetch_search(&term, limit).await {
            Ok(tracks) => {
                tracing::info!(
                    term = %term,
                    results = tracks.len(),
                    provider = "deezer",
                    "Track search completed"
                );
                tracks
            }
            Err(e) => {
                tracing::warn!(error = %e, term = %term, "Track search failed");
                vec![]
            }
        }
    }

    async fn chart_tracks(&self, genre_name: &str, limit: usize) -> Vec<Track> {
        match self.fetch_chart(genre_name, limit).await {
            Ok(tracks) => {
                tracing::info!(
                    genre = %genre_name,
                    results = tracks.len(),
                    provider = "deezer",
                    "Chart fetch completed"
                );
                tracks
            }
            Err(e) => {
                tracing::warn!(error = %e, genre = %genre_name, "Chart fetch failed");
                vec![]
            }
        }
    }

    async fn lookup_track(&self, track_id: u64) -> Result<TrackDetails, LookupError> {
        let body = match self.get_json(&format!("/track/{}", track_id), &[]).await {
            Ok(body) => body,
            Err(CatalogError::Api { code: Some(code), .. }) if code == DeezerError::NO_DATA => {
                tracing::warn!(track_id, "Track not found in catalog");
                return Err(LookupError::NotFound { track_id });
            }
            Err(e) => return Err(e.into()),
        };

        let track: DeezerTrack = serde_json::from_value(body)
            .map_err(|e| CatalogError::Malformed(format!("Failed to parse track {}: {}", track_id, e)))?;

        Ok(TrackDetails::from(track))
    }

    async fn ping(&self) -> bool {
        let url = format!("{}/genre/0", self.api_url);
        match self.http_client.get(&url).timeout(PING_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Catalog ping failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "deezer"
    }
}
