/// Music catalog abstraction
///
/// The catalog is an unreliable upstream. `search_tracks` and `chart_tracks`
/// recover every failure locally and report it as an empty list, so the
/// recommendation engine's strategy escalation is the only recovery path.
/// `lookup_track` is called interactively and surfaces its failures.
use crate::models::{Track, TrackDetails};

pub mod deezer;

pub use deezer::DeezerClient;

/// Failures talking to the catalog
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("catalog error {error_type}: {message}")]
    Api {
        error_type: String,
        message: String,
        code: Option<u32>,
    },

    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

/// Failure of a by-id track lookup
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("track {track_id} not found")]
    NotFound { track_id: u64 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search on `"{query} {genre_hint}"`, catalog relevance order,
    /// at most `limit` tracks. Empty on any failure.
    async fn search_tracks(&self, query: &str, genre_hint: &str, limit: usize) -> Vec<Track>;

    /// Chart of the first genre whose name contains `genre_name`
    /// (case-insensitive), in chart-rank order. Empty on no match or failure.
    async fn chart_tracks(&self, genre_name: &str, limit: usize) -> Vec<Track>;

    /// Direct by-id fetch
    async fn lookup_track(&self, track_id: u64) -> Result<TrackDetails, LookupError>;

    /// Cheap reachability probe for health reporting
    async fn ping(&self) -> bool;

    /// Catalog name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the single free-text term sent to the search endpoint
pub fn search_term(query: &str, genre_hint: &str) -> String {
    format!("{} {}", query, genre_hint).trim().to_string()
}
