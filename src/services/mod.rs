pub mod spotify;

pub use spotify::{playlist_id_from_link, SpotifyService, TokenResponse};
