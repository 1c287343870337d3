use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, path::PathBuf};

use crate::error::AppError;

/// Playlist extracted when `PLAYLIST_LINK` is not set.
pub const DEFAULT_PLAYLIST_LINK: &str = "https://open.spotify.com/playlist/37i9dQZEVXbNG2KDcFcKOF";

/// Daily at midnight UTC (seconds-resolution cron).
pub const DEFAULT_EXTRACT_SCHEDULE: &str = "0 0 0 * * *";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub playlist_link: String,
    pub storage_root: PathBuf,
    pub extract_schedule: String,
    pub auto_ingest: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            spotify_client_id: env::var("SPOTIFY_CLIENT_ID").ok(),
            spotify_client_secret: env::var("SPOTIFY_CLIENT_SECRET").ok(),
            playlist_link: env::var("PLAYLIST_LINK")
                .unwrap_or_else(|_| DEFAULT_PLAYLIST_LINK.to_string()),
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            extract_schedule: env::var("EXTRACT_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_EXTRACT_SCHEDULE.to_string()),
            auto_ingest: env::var("AUTO_INGEST")
                .map(|v| parse_flag(&v))
                .unwrap_or(Ok(true))
                .context("AUTO_INGEST must be true or false")?,
        })
    }

    /// Client credentials for the Spotify API; only extraction needs them.
    pub fn spotify_credentials(&self) -> crate::error::Result<(&str, &str)> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) => Ok((id.as_str(), secret.as_str())),
            _ => Err(AppError::Configuration(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set to extract".to_string(),
            )),
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("unrecognized flag value '{}'", other)),
    }
}
