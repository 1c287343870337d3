//! Extractor integration tests against a mocked Spotify Web API

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spotify_etl::error::AppError;
use spotify_etl::records::PlaylistTracksPage;
use spotify_etl::services::SpotifyService;
use spotify_etl::storage::{layout, InMemoryStorage, ObjectStore};
use spotify_etl::tasks::run_extract;
use spotify_etl::test_utils::*;

const PLAYLIST_LINK: &str = "https://open.spotify.com/playlist/p1?si=share";

fn service_for(server: &MockServer) -> SpotifyService {
    SpotifyService::with_endpoints(
        "client".to_string(),
        "secret".to_string(),
        format!("{}/v1", server.uri()),
        format!("{}/api/token", server.uri()),
    )
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_extract_merges_pages_into_one_raw_object() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let mut first = playlist_payload(vec![
        playlist_item_json("t1", "a1", &[("ar1", "One")]),
        playlist_item_json("t2", "a1", &[("ar1", "One")]),
    ]);
    first["next"] = json!(format!("{}/v1/playlists/p1/tracks/page2", server.uri()));
    let second = playlist_payload(vec![playlist_item_json("t3", "a2", &[("ar2", "Two")])]);

    Mock::given(method("GET"))
        .and(path("/v1/playlists/p1/tracks"))
        .and(query_param("limit", "100"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/p1/tracks/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(second))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryStorage::new();
    let key = run_extract(&service_for(&server), &store, PLAYLIST_LINK)
        .await
        .unwrap();

    assert!(key.starts_with("raw_data/to_processed/raw_"));
    assert!(key.ends_with(".json"));
    assert_eq!(store.list(layout::RAW_PENDING_PREFIX).await.unwrap(), vec![key.clone()]);

    let bytes = store.get(&key).await.unwrap();
    let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["next"], serde_json::Value::Null);
    assert_eq!(raw["items"].as_array().unwrap().len(), 3);

    let page = PlaylistTracksPage::from_slice(&bytes).unwrap();
    let ids: Vec<&str> = page.items.iter().map(|i| i.track.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn test_token_is_reused_across_fetches() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(playlist_payload(vec![])))
        .expect(2)
        .mount(&server)
        .await;

    let service = service_for(&server);
    service.fetch_playlist_tracks("p1").await.unwrap();
    service.fetch_playlist_tracks("p1").await.unwrap();
}

#[tokio::test]
async fn test_rejected_credentials_are_authentication_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_client" })),
        )
        .mount(&server)
        .await;

    let store = InMemoryStorage::new();
    let err = run_extract(&service_for(&server), &store, PLAYLIST_LINK)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Authentication(_)), "{err:?}");
    assert!(store.list(layout::RAW_PENDING_PREFIX).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_api_failure_is_external_api_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(404).set_body_string("playlist not found"))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryStorage::new();
    let err = run_extract(&service_for(&server), &store, PLAYLIST_LINK)
        .await
        .unwrap_err();

    match err {
        AppError::ExternalApi(message) => assert!(message.contains("playlist not found")),
        other => panic!("expected external api error, got {other:?}"),
    }
    assert!(store.list(layout::RAW_PENDING_PREFIX).await.unwrap().is_empty());
}
