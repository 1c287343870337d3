use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{normalize_prefix, ObjectStore};
use crate::error::{AppError, Result};

/// Filesystem-backed store rooted at a directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let key = key.trim_start_matches('/');
        if key.is_empty() || key.split('/').any(|part| part == ".." || part.is_empty()) {
            return Err(AppError::Storage(format!("invalid object key '{}'", key)));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        tracing::debug!("STORAGE LIST: prefix='{}'", prefix);
        let prefix = normalize_prefix(prefix);
        let dir = self.root.join(prefix);

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("STORAGE LIST RESULT: 0 items (path does not exist)");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            // temp files from in-flight puts
            if file_name.starts_with('.') || !entry.file_type().await?.is_file() {
                continue;
            }
            if prefix.is_empty() {
                keys.push(file_name);
            } else {
                keys.push(format!("{}/{}", prefix, file_name));
            }
        }
        keys.sort();

        tracing::debug!("STORAGE LIST RESULT: {} items", keys.len());
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        tracing::debug!("STORAGE GET: key='{}'", key);
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(content) => {
                tracing::debug!("STORAGE GET RESULT: {} bytes", content.len());
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("object '{}'", key)))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, content: &[u8]) -> Result<()> {
        tracing::debug!("STORAGE PUT: key='{}', size={} bytes", key, content.len());
        let path = self.path_for(key)?;
        let parent = path
            .parent()
            .ok_or_else(|| AppError::Storage(format!("object '{}' has no parent", key)))?;
        fs::create_dir_all(parent).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        fs::write(&temp_path, content).await?;
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        tracing::debug!("STORAGE RENAME: '{}' -> '{}'", from, to);
        let from_path = self.path_for(from)?;
        let to_path = self.path_for(to)?;
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        match fs::rename(&from_path, &to_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("object '{}'", from)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
