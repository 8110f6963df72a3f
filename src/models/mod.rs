use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod deezer;

/// Closed set of affect labels that drive genre selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Calm,
    Energetic,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Calm,
        Emotion::Energetic,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Calm => "calm",
            Emotion::Energetic => "energetic",
            Emotion::Neutral => "neutral",
        }
    }
}

impl Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used by explicit-mode callers
impl FromStr for Emotion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == s)
            .ok_or_else(|| AppError::InvalidEmotion(s.to_string()))
    }
}

/// Per-image statistics consumed by the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub face_count: usize,
    /// Mean luma, 0-255
    pub brightness: f64,
    /// Population standard deviation of luma
    pub contrast: f64,
}

/// Which retrieval strategy produced a track list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLabel {
    Search,
    Chart,
    Fallback,
}

/// Normalized catalog track returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: u64,
    #[serde(rename = "name")]
    pub title: String,
    pub artist: String,
    pub album: String,
    pub preview_url: Option<String>,
    pub external_url: String,
    #[serde(rename = "image_url")]
    pub cover_image_url: Option<String>,
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
    pub source: SourceLabel,
}

impl Track {
    pub fn with_source(mut self, source: SourceLabel) -> Self {
        self.source = source;
        self
    }
}

/// Output of the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub emotion: Emotion,
    /// Catalog ranking order, never re-sorted
    #[serde(rename = "recommendations")]
    pub tracks: Vec<Track>,
    pub source: SourceLabel,
}

/// Metadata returned by the by-id track lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackDetails {
    pub preview_url: Option<String>,
    pub external_url: String,
    pub track_info: TrackInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackInfo {
    #[serde(rename = "name")]
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u32,
}

/// Free-text search response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub query: String,
    pub emotion: Option<String>,
    pub results: Vec<Track>,
}
