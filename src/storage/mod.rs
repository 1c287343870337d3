//! Object storage shared by the pipeline stages.
//!
//! Stages never talk to each other directly; they read and write objects
//! under the prefixes declared in [`layout`].

pub mod layout;
mod local_storage;
mod memory_storage;

use async_trait::async_trait;

use crate::error::Result;

pub use local_storage::LocalStorage;
pub use memory_storage::InMemoryStorage;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Keys of the objects directly under `prefix`, sorted. Unknown prefixes
    /// list as empty.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Readers never observe a partially written object.
    async fn put(&self, key: &str, content: &[u8]) -> Result<()>;

    /// Atomically move an object. Fails with `NotFound` when `from` is gone,
    /// so at most one of two competing movers succeeds.
    async fn rename(&self, from: &str, to: &str) -> Result<()>;
}

pub(crate) fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_matches('/')
}
