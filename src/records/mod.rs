//! Flat record sets derived from a playlist payload.
//!
//! A payload is parsed into [`PlaylistTracksPage`] and normalized into three
//! record sets: albums and artists deduplicated by their Spotify id, and one
//! song per playlist entry.

pub mod codec;
pub mod playlist;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub use playlist::PlaylistTracksPage;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed playlist payload at line {line}, column {column}: {message}")]
    Malformed {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("playlist item {index}: {message}")]
    InvalidItem { index: usize, message: String },
}

/// The three datasets produced by the transformer, each with its own
/// storage directory and warehouse table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Album,
    Artist,
    Song,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Song, RecordKind::Album, RecordKind::Artist];

    /// Directory under `transformed_data/`
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Album => "album_data",
            Self::Artist => "artist_data",
            Self::Song => "songs_data",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Album => "album_transformed",
            Self::Artist => "artist_transformed",
            Self::Song => "songs_transformed",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Song => "songs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub album_id: String,
    #[serde(rename = "album_name")]
    pub name: String,
    #[serde(rename = "album_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "album_total_tracks")]
    pub total_tracks: i32,
    #[serde(rename = "album_url")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub artist_id: String,
    #[serde(rename = "artist_name")]
    pub name: String,
    pub external_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    #[serde(rename = "song_name")]
    pub name: String,
    #[serde(rename = "song_duration")]
    pub duration_ms: i32,
    #[serde(rename = "song_url")]
    pub url: String,
    #[serde(rename = "song_popularity")]
    pub popularity: i32,
    #[serde(rename = "song_added")]
    pub added_at: DateTime<Utc>,
    pub album_id: String,
    pub artist_id: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub albums: Vec<AlbumRecord>,
    pub artists: Vec<ArtistRecord>,
    pub songs: Vec<SongRecord>,
}

impl RecordSet {
    /// Normalize a playlist page.
    ///
    /// Each entry contributes its album, the album's primary (first) artist
    /// and one song. Albums and artists keep their first occurrence only.
    pub fn from_page(page: &PlaylistTracksPage) -> Result<Self, ParseError> {
        let mut set = RecordSet::default();
        let mut seen_albums = HashSet::new();
        let mut seen_artists = HashSet::new();

        for (index, item) in page.items.iter().enumerate() {
            let track = &item.track;
            let album = &track.album;

            let primary_artist = album.artists.first().ok_or_else(|| ParseError::InvalidItem {
                index,
                message: format!("album {} has no artists", album.id),
            })?;

            let added_at = DateTime::parse_from_rfc3339(&item.added_at)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| ParseError::InvalidItem {
                    index,
                    message: format!("added_at '{}' is not a timestamp: {}", item.added_at, e),
                })?;

            if seen_albums.insert(album.id.clone()) {
                let release_date = coerce_release_date(&album.release_date);
                if release_date.is_none() {
                    tracing::warn!(
                        "Album {} has unparseable release date '{}' ({:?})",
                        album.id,
                        album.release_date,
                        album.release_date_precision
                    );
                }

                set.albums.push(AlbumRecord {
                    album_id: album.id.clone(),
                    name: album.name.clone(),
                    release_date,
                    total_tracks: album.total_tracks,
                    url: album.external_urls.spotify.clone(),
                });
            }

            if seen_artists.insert(primary_artist.id.clone()) {
                set.artists.push(ArtistRecord {
                    artist_id: primary_artist.id.clone(),
                    name: primary_artist.name.clone(),
                    external_url: primary_artist.external_urls.spotify.clone(),
                });
            }

            set.songs.push(SongRecord {
                song_id: track.id.clone(),
                name: track.name.clone(),
                duration_ms: track.duration_ms,
                url: track.external_urls.spotify.clone(),
                popularity: track.popularity,
                added_at,
                album_id: album.id.clone(),
                artist_id: primary_artist.id.clone(),
            });
        }

        Ok(set)
    }

    pub fn len(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Album => self.albums.len(),
            RecordKind::Artist => self.artists.len(),
            RecordKind::Song => self.songs.len(),
        }
    }

    /// Serialize one dataset as CSV with its header row.
    pub fn encode(&self, kind: RecordKind) -> Result<Vec<u8>, csv::Error> {
        match kind {
            RecordKind::Album => codec::encode(&self.albums),
            RecordKind::Artist => codec::encode(&self.artists),
            RecordKind::Song => codec::encode(&self.songs),
        }
    }
}

/// Coerce a Spotify release date of day, month or year precision to the
/// first calendar day it covers. Year zero (`0000`) is treated as unknown.
pub fn coerce_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let full = match raw.split('-').count() {
        1 => format!("{raw}-01-01"),
        2 => format!("{raw}-01"),
        _ => raw.to_string(),
    };

    NaiveDate::parse_from_str(&full, "%Y-%m-%d")
        .ok()
        .filter(|date| date.year() > 0)
}
