use chrono::Utc;

use crate::{
    error::Result,
    services::{playlist_id_from_link, SpotifyService},
    storage::{layout, ObjectStore},
};

/// Fetch the playlist and park the raw response under `to_processed/`.
/// Returns the key of the new raw object.
pub async fn run_extract(
    spotify: &SpotifyService,
    store: &dyn ObjectStore,
    playlist_link: &str,
) -> Result<String> {
    let playlist_id = playlist_id_from_link(playlist_link);
    tracing::info!("Starting extract for playlist {}", playlist_id);

    let payload = spotify.fetch_playlist_tracks(playlist_id).await?;
    let entries = payload["items"].as_array().map(Vec::len).unwrap_or(0);

    let key = layout::raw_object_key(Utc::now());
    store.put(&key, &serde_json::to_vec(&payload)?).await?;

    tracing::info!("Extracted {} playlist entries to {}", entries, key);
    Ok(key)
}
