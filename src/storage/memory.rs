//! Memory storage implementation using cached::TimedSizedCache.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cached::{Cached, TimedSizedCache};

use crate::config::settings::MemoryStorageConfig;
use crate::storage::{StorageAdapter, StorageError};

/// In-process store with a size limit and a shared lifespan.
///
/// Per-entry TTL overrides are ignored; every entry lives for
/// `ttl_seconds` from the configuration.
pub struct MemoryStorage {
    store: Mutex<TimedSizedCache<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new(config: &MemoryStorageConfig) -> Self {
        let store = TimedSizedCache::with_size_and_lifespan(
            config.max_size,
            Duration::from_secs(config.ttl_seconds),
        );
        Self {
            store: Mutex::new(store),
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, TimedSizedCache<String, Vec<u8>>>, StorageError> {
        self.store
            .lock()
            .map_err(|e| StorageError::Operation(e.to_string()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(&MemoryStorageConfig::default())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut store = self.lock()?;
        Ok(store.cache_get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        _ttl_seconds: Option<u64>,
    ) -> Result<(), StorageError> {
        let mut store = self.lock()?;
        store.cache_set(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut store = self.lock()?;
        store.cache_remove(key);
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut store = self.lock()?;
        for key in keys {
            store.cache_remove(key.as_str());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut store = self.lock()?;
        store.cache_clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let storage = MemoryStorage::default();
        storage.set("k", b"v".to_vec(), None).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_many_only_drops_listed_keys() {
        let storage = MemoryStorage::default();
        for key in ["a", "b", "c"] {
            storage.set(key, key.as_bytes().to_vec(), None).await.unwrap();
        }

        storage
            .remove_many(&["a".to_string(), "c".to_string()])
            .await
            .unwrap();

        assert_eq!(storage.get("a").await.unwrap(), None);
        assert_eq!(storage.get("b").await.unwrap(), Some(b"b".to_vec()));
        assert_eq!(storage.get("c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear() {
        let storage = MemoryStorage::default();
        storage.set("k", b"v".to_vec(), None).await.unwrap();
        storage.clear().await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_size_limit_evicts() {
        let storage = MemoryStorage::new(&MemoryStorageConfig {
            max_size: 1,
            ttl_seconds: 60,
        });
        storage.set("first", vec![1], None).await.unwrap();
        storage.set("second", vec![2], None).await.unwrap();

        assert_eq!(storage.get("first").await.unwrap(), None);
        assert_eq!(storage.get("second").await.unwrap(), Some(vec![2]));
    }
}
