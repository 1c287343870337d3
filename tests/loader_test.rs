//! Warehouse loader integration tests
//!
//! Drives the copy pipes against an in-memory SQLite warehouse:
//! - initial load truncates and reloads
//! - incremental ingest never loads a file twice
//! - bad files roll back their pipe

use std::sync::Arc;

use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use spotify_etl::db::entities::{album, artist, load_history, song};
use spotify_etl::error::AppError;
use spotify_etl::storage::{InMemoryStorage, ObjectStore};
use spotify_etl::tasks::run_transform;
use spotify_etl::test_utils::*;
use spotify_etl::warehouse::{LoadReport, Loader};

async fn stage_playlist(store: &InMemoryStorage, token: &str, items: Vec<serde_json::Value>) {
    let key = format!("raw_data/to_processed/raw_{token}.json");
    store
        .put(&key, playlist_payload(items).to_string().as_bytes())
        .await
        .unwrap();
    run_transform(store).await.unwrap();
}

async fn setup() -> (Arc<InMemoryStorage>, Loader, sea_orm::DatabaseConnection) {
    let db = setup_test_db().await;
    let store = Arc::new(InMemoryStorage::new());
    let loader = Loader::new(db.clone(), store.clone()).unwrap();
    (store, loader, db)
}

#[tokio::test]
async fn test_initial_load_populates_tables() {
    let (store, loader, db) = setup().await;
    stage_playlist(
        &store,
        "one",
        vec![
            playlist_item_json("t1", "a1", &[("ar1", "One"), ("ar2", "Guest")]),
            playlist_item_json("t2", "a1", &[("ar1", "One")]),
        ],
    )
    .await;

    let report = loader.initial_load().await.unwrap();

    assert_eq!(
        report,
        LoadReport {
            files_loaded: 3,
            files_skipped: 0,
            rows_loaded: 4,
        }
    );
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(song::Entity::find().count(&db).await.unwrap(), 2);

    let first = song::Entity::find()
        .filter(song::Column::SongId.eq("t1"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.song_duration, 180000);
    assert_eq!(first.song_added.to_string(), "2024-01-15");
    assert_eq!(first.artist_id, "ar1");

    let stored_album = album::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(
        stored_album.album_release_date.map(|d| d.to_string()),
        Some("2023-06-30".to_string())
    );
    assert_eq!(stored_album.album_total_tracks, 10);
}

#[tokio::test]
async fn test_initial_load_twice_keeps_only_second_load() {
    let (store, loader, db) = setup().await;
    stage_playlist(&store, "one", vec![playlist_item_json("t1", "a1", &[("ar1", "One")])]).await;

    loader.initial_load().await.unwrap();
    loader.initial_load().await.unwrap();

    assert_eq!(song::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(load_history::Entity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn test_ingest_new_skips_loaded_files() {
    let (store, loader, db) = setup().await;
    stage_playlist(&store, "one", vec![playlist_item_json("t1", "a1", &[("ar1", "One")])]).await;

    let first = loader.ingest_new().await.unwrap();
    assert_eq!(first.files_loaded, 3);

    let again = loader.ingest_new().await.unwrap();
    assert_eq!(again.files_loaded, 0);
    assert_eq!(again.files_skipped, 3);
    assert_eq!(song::Entity::find().count(&db).await.unwrap(), 1);

    stage_playlist(&store, "two", vec![playlist_item_json("t1", "a1", &[("ar1", "One")])]).await;
    let next = loader.ingest_new().await.unwrap();

    assert_eq!(next.files_loaded, 3);
    assert_eq!(next.files_skipped, 3);
    // appends, no merge
    assert_eq!(song::Entity::find().count(&db).await.unwrap(), 2);
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_history_records_checksum_and_rows() {
    let (store, loader, db) = setup().await;
    stage_playlist(
        &store,
        "one",
        vec![
            playlist_item_json("t1", "a1", &[("ar1", "One")]),
            playlist_item_json("t2", "a2", &[("ar1", "One")]),
        ],
    )
    .await;

    loader.ingest_new().await.unwrap();

    let songs_entry = load_history::Entity::find()
        .filter(load_history::Column::PipeName.eq("songs_pipe"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        songs_entry.file_path,
        "transformed_data/songs_data/songs_transformed_one.csv"
    );
    assert_eq!(songs_entry.row_count, 2);
    assert_eq!(songs_entry.checksum.len(), 64);
}

#[tokio::test]
async fn test_large_file_is_batched() {
    let (store, loader, db) = setup().await;
    let items = (0..250)
        .map(|i| playlist_item_json(&format!("t{i}"), &format!("a{}", i % 7), &[("ar1", "One")]))
        .collect();
    stage_playlist(&store, "big", items).await;

    loader.initial_load().await.unwrap();

    assert_eq!(song::Entity::find().count(&db).await.unwrap(), 250);
    assert_eq!(album::Entity::find().count(&db).await.unwrap(), 7);
}

#[tokio::test]
async fn test_bad_file_rolls_back_pipe() {
    let (store, loader, db) = setup().await;
    stage_playlist(&store, "one", vec![playlist_item_json("t1", "a1", &[("ar1", "One")])]).await;
    loader.initial_load().await.unwrap();

    store
        .put(
            "transformed_data/songs_data/songs_transformed_zz.csv",
            b"song_id,song_name\nt9,Broken\n",
        )
        .await
        .unwrap();

    let err = loader.initial_load().await.unwrap_err();
    assert!(matches!(err, AppError::Coercion { .. }), "{err:?}");

    // truncate was rolled back with the failed file
    assert_eq!(song::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_files_outside_pattern_are_ignored() {
    let (store, loader, db) = setup().await;
    store
        .put("transformed_data/songs_data/readme.txt", b"ignore me")
        .await
        .unwrap();

    let report = loader.ingest_new().await.unwrap();

    assert_eq!(report, LoadReport::default());
    assert_eq!(load_history::Entity::find().count(&db).await.unwrap(), 0);
}
