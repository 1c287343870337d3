use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::jobs::JobQueue;
use crate::services::SpotifyService;
use crate::storage::ObjectStore;
use crate::warehouse::Loader;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub store: Arc<dyn ObjectStore>,
    pub config: Arc<Config>,
    pub job_queue: JobQueue,
    spotify: Option<SpotifyService>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        store: Arc<dyn ObjectStore>,
        config: Config,
        job_queue: JobQueue,
    ) -> Self {
        let spotify = config
            .spotify_credentials()
            .ok()
            .map(|(id, secret)| SpotifyService::new(id.to_string(), secret.to_string()));

        Self {
            db,
            store,
            config: Arc::new(config),
            job_queue,
            spotify,
        }
    }

    /// Replace the Spotify client (e.g. one pointed at a mock server)
    pub fn with_spotify(mut self, spotify: SpotifyService) -> Self {
        self.spotify = Some(spotify);
        self
    }

    pub fn spotify(&self) -> Result<&SpotifyService> {
        match self.spotify.as_ref() {
            Some(spotify) => Ok(spotify),
            None => Err(self
                .config
                .spotify_credentials()
                .err()
                .unwrap_or_else(|| AppError::Configuration("Spotify client unavailable".to_string()))),
        }
    }

    pub fn loader(&self) -> Result<Loader> {
        Loader::new(self.db.clone(), self.store.clone())
    }
}
