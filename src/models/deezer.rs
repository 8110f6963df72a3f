use serde::Deserialize;

use super::{SourceLabel, Track, TrackDetails, TrackInfo};

// ============================================================================
// Deezer API Types
// ============================================================================

/// Track object as returned by /search, /chart/{id}/tracks and /track/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct DeezerTrack {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub artist: Option<DeezerArtist>,
    #[serde(default)]
    pub album: Option<DeezerAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeezerArtist {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeezerAlbum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover_medium: Option<String>,
}

/// Entry of the /genre directory
#[derive(Debug, Clone, Deserialize)]
pub struct DeezerGenre {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Error payload Deezer returns (with HTTP 200) instead of data
#[derive(Debug, Clone, Deserialize)]
pub struct DeezerError {
    #[serde(rename = "type", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<u32>,
}

impl DeezerError {
    /// Deezer's "no data" code for unknown ids
    pub const NO_DATA: u32 = 800;

    pub fn is_not_found(&self) -> bool {
        self.code == Some(Self::NO_DATA)
    }
}

/// Deezer marks missing previews with an empty string
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl DeezerTrack {
    pub fn into_track(self, source: SourceLabel) -> Track {
        let (album, cover_image_url) = match self.album {
            Some(album) => (album.title.unwrap_or_default(), non_empty(album.cover_medium)),
            None => (String::new(), None),
        };

        Track {
            id: self.id,
            title: self.title.unwrap_or_default(),
            artist: self.artist.and_then(|a| a.name).unwrap_or_default(),
            album,
            preview_url: non_empty(self.preview),
            external_url: self.link.unwrap_or_default(),
            cover_image_url,
            duration_seconds: self.duration.unwrap_or_default(),
            source,
        }
    }
}

impl From<DeezerTrack> for TrackDetails {
    fn from(track: DeezerTrack) -> Self {
        let track = track.into_track(SourceLabel::Search);
        TrackDetails {
            preview_url: track.preview_url,
            external_url: track.external_url,
            track_info: TrackInfo {
                title: track.title,
                artist: track.artist,
                album: track.album,
                duration_seconds: track.duration_seconds,
            },
        }
    }
}
