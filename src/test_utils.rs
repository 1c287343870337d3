//! Test utilities for Spotify ETL
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - In-memory object storage
//! - AppState factories
//! - Playlist payload builders shaped like Spotify API responses

use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    config::Config,
    jobs::{JobMessage, JobQueue},
    records::PlaylistTracksPage,
    state::AppState,
    storage::{InMemoryStorage, ObjectStore},
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // Run all migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        spotify_client_id: Some("test_client_id".to_string()),
        spotify_client_secret: Some("test_client_secret".to_string()),
        playlist_link: "https://open.spotify.com/playlist/test_playlist?si=abc".to_string(),
        storage_root: std::env::temp_dir().join("spotify-etl-test"),
        extract_schedule: "0 0 0 * * *".to_string(),
        auto_ingest: false,
    }
}

/// Create a test AppState over a fresh database and in-memory storage
///
/// Returns the receiver as well; keep it in scope to prevent the queue from closing
pub async fn setup_test_app_state() -> (AppState, UnboundedReceiver<JobMessage>) {
    let db = setup_test_db().await;
    let store: Arc<dyn ObjectStore> = Arc::new(InMemoryStorage::new());
    let (job_queue, receiver) = JobQueue::new(db.clone());

    (AppState::new(db, store, test_config(), job_queue), receiver)
}

// ============================================================================
// Payload Builders
// ============================================================================

fn artist_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "artist",
        "uri": format!("spotify:artist:{id}"),
        "external_urls": { "spotify": format!("https://open.spotify.com/artist/{id}") }
    })
}

/// One playlist entry: track `track_id` on album `album_id`, whose album
/// artists are `album_artists` as `(id, name)` pairs.
pub fn playlist_item_json(track_id: &str, album_id: &str, album_artists: &[(&str, &str)]) -> Value {
    let artists: Vec<Value> = album_artists
        .iter()
        .map(|(id, name)| artist_json(id, name))
        .collect();

    json!({
        "added_at": "2024-01-15T10:00:00Z",
        "is_local": false,
        "track": {
            "id": track_id,
            "name": format!("Track {track_id}"),
            "duration_ms": 180000,
            "popularity": 75,
            "explicit": false,
            "external_urls": { "spotify": format!("https://open.spotify.com/track/{track_id}") },
            "album": {
                "id": album_id,
                "name": format!("Album {album_id}"),
                "album_type": "album",
                "release_date": "2023-06-30",
                "release_date_precision": "day",
                "total_tracks": 10,
                "external_urls": { "spotify": format!("https://open.spotify.com/album/{album_id}") },
                "artists": artists.clone()
            },
            "artists": artists
        }
    })
}

/// A playlist-tracks response wrapping `items`
pub fn playlist_payload(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({
        "href": "https://api.spotify.com/v1/playlists/test_playlist/tracks?offset=0&limit=100",
        "limit": 100,
        "offset": 0,
        "next": null,
        "previous": null,
        "total": total,
        "items": items
    })
}

pub fn playlist_page(items: Vec<Value>) -> PlaylistTracksPage {
    let payload = playlist_payload(items);
    PlaylistTracksPage::from_slice(payload.to_string().as_bytes())
        .expect("Failed to parse test playlist payload")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        // Verify we can query the database (it has tables from migrations)
        use crate::db::entities::Album;
        use sea_orm::EntityTrait;
        let albums = Album::find().all(&db).await.unwrap();
        assert_eq!(albums.len(), 0);
    }

    #[test]
    fn test_payload_total_matches_items() {
        let payload = playlist_payload(vec![
            playlist_item_json("t1", "a1", &[("ar1", "One")]),
            playlist_item_json("t2", "a1", &[("ar1", "One")]),
        ]);
        assert_eq!(payload["total"], 2);
        assert_eq!(payload["items"].as_array().unwrap().len(), 2);
    }
}
