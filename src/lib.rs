//! Spotify ETL Library
//!
//! Extracts a playlist from the Spotify Web API, normalizes it into album,
//! artist and song datasets, and loads those into warehouse tables.
//! This library exposes modules for the binary and integration testing.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod records;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod test_utils;
pub mod warehouse;
