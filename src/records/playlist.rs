//! Typed view of the playlist-tracks payload returned by the Spotify Web API.
//!
//! Only the fields the transformer reads are declared; everything else in the
//! payload is ignored. Fields that are required here fail the parse when they
//! are missing or `null`.

use serde::Deserialize;

use super::ParseError;

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub added_at: String,
    pub track: Track,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: i32,
    pub popularity: i32,
    pub external_urls: ExternalUrls,
    pub album: Album,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub release_date_precision: Option<String>,
    pub total_tracks: i32,
    pub external_urls: ExternalUrls,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

impl PlaylistTracksPage {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(bytes).map_err(|e| ParseError::Malformed {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
        })
    }
}
