//! NoOp storage implementation.
//!
//! Used when storage is disabled. Every read is a miss.

use async_trait::async_trait;

use crate::storage::{StorageAdapter, StorageError};

/// A storage adapter that doesn't store anything.
///
/// Used when `storage.enabled = false` in configuration. Every cacheable
/// call then re-invokes the entity.
pub struct NoOpStorage;

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageAdapter for NoOpStorage {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: Vec<u8>,
        _ttl_seconds: Option<u64>,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn remove_many(&self, _keys: &[String]) -> Result<(), StorageError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
