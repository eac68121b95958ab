//! Builds the configured storage adapter.

use std::sync::Arc;

use crate::config::settings::{StorageBackend, StorageConfig};
use crate::storage::memory::MemoryStorage;
use crate::storage::noop::NoOpStorage;
use crate::storage::redis::RedisStorage;
use crate::storage::{StorageAdapter, StorageError};

/// Create the adapter selected by `config`.
///
/// If storage is disabled, a [`NoOpStorage`] is returned.
pub async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn StorageAdapter>, StorageError> {
    let backend: Arc<dyn StorageAdapter> = if !config.enabled {
        Arc::new(NoOpStorage::new())
    } else {
        match config.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new(&config.memory)),
            StorageBackend::Redis => Arc::new(RedisStorage::new(&config.redis).await?),
        }
    };

    tracing::debug!(
        enabled = config.enabled,
        backend = config.backend.as_str(),
        "storage adapter ready"
    );

    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_storage_never_hits() {
        let config = StorageConfig {
            enabled: false,
            ..StorageConfig::default()
        };
        let storage = build_storage(&config).await.unwrap();
        storage.set("k", vec![1], None).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_backend_stores() {
        let config = StorageConfig::default();
        let storage = build_storage(&config).await.unwrap();
        storage.set("k", vec![1], None).await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some(vec![1]));
    }
}
