use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{normalize_prefix, ObjectStore};
use crate::error::{AppError, Result};

/// Map-backed store. Every operation holds the lock for its whole duration,
/// so `rename` is atomic with respect to `list`.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.objects
            .lock()
            .map_err(|_| AppError::Storage("in-memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl ObjectStore for InMemoryStorage {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = normalize_prefix(prefix);
        let objects = self.lock()?;

        let keys = objects
            .keys()
            .filter(|key| {
                let rest = if prefix.is_empty() {
                    Some(key.as_str())
                } else {
                    key.strip_prefix(prefix).and_then(|r| r.strip_prefix('/'))
                };
                rest.is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .cloned()
            .collect();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("object '{}'", key)))
    }

    async fn put(&self, key: &str, content: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), content.to_vec());
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let mut objects = self.lock()?;
        let content = objects
            .remove(from)
            .ok_or_else(|| AppError::NotFound(format!("object '{}'", from)))?;
        objects.insert(to.to_string(), content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_only_immediate_children() {
        let storage = InMemoryStorage::new();
        storage.put("a/1.json", b"1").await.unwrap();
        storage.put("a/b/2.json", b"2").await.unwrap();
        storage.put("ab/3.json", b"3").await.unwrap();

        assert_eq!(storage.list("a").await.unwrap(), vec!["a/1.json".to_string()]);
        assert_eq!(storage.list("a/b/").await.unwrap(), vec!["a/b/2.json".to_string()]);
    }

    #[tokio::test]
    async fn test_rename_missing_source() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.rename("nope", "there").await,
            Err(AppError::NotFound(_))
        ));
    }
}
