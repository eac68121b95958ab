//! StorageAdapter trait definition.

use async_trait::async_trait;

use crate::storage::StorageError;

/// Key-value store that backs an [`EntityCache`](crate::EntityCache).
///
/// Values are opaque byte payloads. Implementations must be safe to share
/// between tasks; any atomicity guarantees are the adapter's own.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Get a value, `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store a value with an optional TTL override.
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), StorageError>;

    /// Remove a single key.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove several keys in one request.
    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }

    /// Drop every stored value.
    async fn clear(&self) -> Result<(), StorageError>;
}
