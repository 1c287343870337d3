use chrono::{DateTime, Duration, Utc};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};

const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

#[derive(Clone)]
pub struct SpotifyService {
    client: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    token_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    token: Arc<Mutex<Option<CachedToken>>>,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl SpotifyService {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_endpoints(
            client_id,
            client_secret,
            SPOTIFY_API_BASE.to_string(),
            SPOTIFY_TOKEN_URL.to_string(),
        )
    }

    /// Point the client at other endpoints (a mock server in tests).
    pub fn with_endpoints(
        client_id: String,
        client_secret: String,
        api_base: String,
        token_url: String,
    ) -> Self {
        // Rate limiter: 2 requests per second to stay under Spotify's ~3 req/sec limit
        let quota = Quota::per_second(nonzero!(2u32));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            client_id,
            client_secret,
            api_base: api_base.trim_end_matches('/').to_string(),
            token_url,
            rate_limiter,
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Client-credentials access token, reused until it is about to expire
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if !self.is_token_expired(token.expires_at) {
                return Ok(token.access_token.clone());
            }
        }

        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AppError::Authentication(format!(
                "Failed to obtain client credentials token ({}): {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            "Obtained {} token valid for {}s",
            token.token_type,
            token.expires_in
        );

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });

        Ok(access_token)
    }

    /// Fetch every track entry of a playlist as one JSON object.
    ///
    /// The first page is returned with the `items` of all following pages
    /// appended and `next` cleared, so the object reads as a single response.
    pub async fn fetch_playlist_tracks(&self, playlist_id: &str) -> Result<Value> {
        let access_token = self.access_token().await?;
        let mut next_url = Some(format!(
            "{}/playlists/{}/tracks?limit=100",
            self.api_base, playlist_id
        ));
        let mut payload: Option<Value> = None;

        while let Some(url) = next_url {
            let mut page = self.get_json(&url, &access_token).await?;
            next_url = page
                .get("next")
                .and_then(Value::as_str)
                .map(str::to_string);

            let items = match page.get_mut("items").map(Value::take) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(AppError::ExternalApi(format!(
                        "Spotify playlist page for {} has no items array",
                        playlist_id
                    )))
                }
            };

            match payload.as_mut() {
                None => {
                    page["items"] = Value::Array(items);
                    payload = Some(page);
                }
                Some(first) => {
                    if let Some(Value::Array(all)) = first.get_mut("items") {
                        all.extend(items);
                    }
                }
            }

            tracing::debug!(
                "Fetched {} tracks so far for playlist {}",
                payload
                    .as_ref()
                    .and_then(|p| p["items"].as_array())
                    .map(Vec::len)
                    .unwrap_or(0),
                playlist_id
            );
        }

        let mut payload = payload.ok_or_else(|| {
            AppError::ExternalApi(format!("No pages returned for playlist {}", playlist_id))
        })?;
        payload["next"] = Value::Null;

        Ok(payload)
    }

    async fn get_json(&self, url: &str, access_token: &str) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AppError::ExternalApi(format!(
                "Spotify API error ({}): {}",
                status, error_text
            )));
        }

        // Get raw text first to enable better error messages
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                "Failed to parse Spotify response from {} at column {}: {}",
                url,
                e.column(),
                e
            );
            AppError::ExternalApi(format!(
                "Failed to parse Spotify response: {} at column {}",
                e,
                e.column()
            ))
        })
    }

    /// Check if token is expired or about to expire (within 60 seconds)
    pub fn is_token_expired(&self, expires_at: DateTime<Utc>) -> bool {
        Utc::now() + Duration::seconds(60) >= expires_at
    }
}

/// Playlist id from a share link such as
/// `https://open.spotify.com/playlist/<id>?si=...`; bare ids pass through.
pub fn playlist_id_from_link(link: &str) -> &str {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SpotifyService {
        SpotifyService::new("test_client_id".to_string(), "test_secret".to_string())
    }

    #[test]
    fn test_playlist_id_from_link() {
        assert_eq!(
            playlist_id_from_link("https://open.spotify.com/playlist/37i9dQZEVXbNG2KDcFcKOF?si=1333723a6eff4b7f"),
            "37i9dQZEVXbNG2KDcFcKOF"
        );
        assert_eq!(
            playlist_id_from_link("https://open.spotify.com/playlist/abc/"),
            "abc"
        );
        assert_eq!(playlist_id_from_link("spotify:playlist:xyz"), "xyz");
        assert_eq!(playlist_id_from_link("plainid"), "plainid");
    }

    #[test]
    fn test_token_expiry_window() {
        let service = service();
        assert!(service.is_token_expired(Utc::now() + Duration::seconds(30)));
        assert!(!service.is_token_expired(Utc::now() + Duration::minutes(30)));
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let service = SpotifyService::with_endpoints(
            "id".to_string(),
            "secret".to_string(),
            "http://localhost:1234/v1/".to_string(),
            "http://localhost:1234/api/token".to_string(),
        );
        assert_eq!(service.api_base, "http://localhost:1234/v1");
    }
}
