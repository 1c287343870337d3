//! Transformer integration tests
//!
//! Runs the transformer against in-memory storage and checks:
//! - pending raw objects move to processed
//! - one CSV per record kind is written with the expected rows
//! - parse failures abort the run and leave the object pending

use pretty_assertions::assert_eq;

use spotify_etl::error::AppError;
use spotify_etl::records::{codec, AlbumRecord, ArtistRecord, SongRecord};
use spotify_etl::storage::{layout, InMemoryStorage, ObjectStore};
use spotify_etl::tasks::run_transform;
use spotify_etl::test_utils::*;

const RAW_KEY: &str = "raw_data/to_processed/raw_2024-01-15T10-00-00.000000Z.json";

async fn store_with_payload(key: &str, payload: serde_json::Value) -> InMemoryStorage {
    let store = InMemoryStorage::new();
    store.put(key, payload.to_string().as_bytes()).await.unwrap();
    store
}

#[tokio::test]
async fn test_pending_object_moves_to_processed() {
    let store = store_with_payload(
        RAW_KEY,
        playlist_payload(vec![playlist_item_json("t1", "a1", &[("ar1", "One")])]),
    )
    .await;

    let report = run_transform(&store).await.unwrap();

    assert_eq!(report.processed, vec![RAW_KEY.to_string()]);
    assert!(store.list(layout::RAW_PENDING_PREFIX).await.unwrap().is_empty());
    assert_eq!(
        store.list(layout::RAW_PROCESSED_PREFIX).await.unwrap(),
        vec!["raw_data/processed/raw_2024-01-15T10-00-00.000000Z.json".to_string()]
    );
}

#[tokio::test]
async fn test_writes_three_datasets() {
    let store = store_with_payload(
        RAW_KEY,
        playlist_payload(vec![
            playlist_item_json("t1", "a1", &[("ar1", "One"), ("ar9", "Guest")]),
            playlist_item_json("t2", "a1", &[("ar1", "One")]),
            playlist_item_json("t3", "a2", &[("ar2", "Two")]),
        ]),
    )
    .await;

    let report = run_transform(&store).await.unwrap();
    assert_eq!((report.albums, report.artists, report.songs), (2, 2, 3));

    let songs_key = "transformed_data/songs_data/songs_transformed_2024-01-15T10-00-00.000000Z.csv";
    let album_key = "transformed_data/album_data/album_transformed_2024-01-15T10-00-00.000000Z.csv";
    let artist_key = "transformed_data/artist_data/artist_transformed_2024-01-15T10-00-00.000000Z.csv";

    let songs: Vec<SongRecord> =
        codec::decode(songs_key, &store.get(songs_key).await.unwrap()).unwrap();
    let albums: Vec<AlbumRecord> =
        codec::decode(album_key, &store.get(album_key).await.unwrap()).unwrap();
    let artists: Vec<ArtistRecord> =
        codec::decode(artist_key, &store.get(artist_key).await.unwrap()).unwrap();

    assert_eq!(songs.len(), 3);
    assert_eq!(
        albums.iter().map(|a| a.album_id.as_str()).collect::<Vec<_>>(),
        vec!["a1", "a2"]
    );
    assert_eq!(
        artists.iter().map(|a| a.artist_id.as_str()).collect::<Vec<_>>(),
        vec!["ar1", "ar2"]
    );
    assert_eq!(songs[0].artist_id, "ar1");
    assert_eq!(songs[0].url, "https://open.spotify.com/track/t1");
}

#[tokio::test]
async fn test_nothing_pending_is_noop() {
    let store = InMemoryStorage::new();

    let report = run_transform(&store).await.unwrap();

    assert!(report.processed.is_empty());
    assert!(store.list(layout::TRANSFORMED_PREFIX).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_processes_every_pending_object() {
    let store = InMemoryStorage::new();
    for (i, key) in [
        "raw_data/to_processed/raw_a.json",
        "raw_data/to_processed/raw_b.json",
    ]
    .iter()
    .enumerate()
    {
        let payload = playlist_payload(vec![playlist_item_json(
            &format!("t{i}"),
            "a1",
            &[("ar1", "One")],
        )]);
        store.put(key, payload.to_string().as_bytes()).await.unwrap();
    }

    let report = run_transform(&store).await.unwrap();

    assert_eq!(report.processed.len(), 2);
    assert_eq!(report.songs, 2);
    assert_eq!(
        store
            .list(&layout::transformed_prefix(spotify_etl::records::RecordKind::Song))
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_parse_failure_leaves_object_pending() {
    let mut item = playlist_item_json("t1", "a1", &[("ar1", "One")]);
    item["track"].as_object_mut().unwrap().remove("name");
    let store = store_with_payload(RAW_KEY, playlist_payload(vec![item])).await;

    let err = run_transform(&store).await.unwrap_err();

    match err {
        AppError::Parse { key, source } => {
            assert_eq!(key, RAW_KEY);
            assert!(source.to_string().contains("missing field `name`"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
    assert_eq!(
        store.list(layout::RAW_PENDING_PREFIX).await.unwrap(),
        vec![RAW_KEY.to_string()]
    );
    assert!(store.list(layout::RAW_PROCESSED_PREFIX).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_json_objects_are_ignored() {
    let store = InMemoryStorage::new();
    store
        .put("raw_data/to_processed/notes.txt", b"not a payload")
        .await
        .unwrap();

    let report = run_transform(&store).await.unwrap();

    assert!(report.processed.is_empty());
    assert_eq!(store.list(layout::RAW_PENDING_PREFIX).await.unwrap().len(), 1);
}
