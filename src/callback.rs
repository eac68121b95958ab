//! Compute-and-cache primitive.
//!
//! Given a key and a producer, [`CallbackCache::call`] returns the stored
//! value on a hit, or runs the producer, stores its result and returns it on
//! a miss. Values travel through storage as JSON bytes.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{EntityCacheError, EntityCacheResult};
use crate::storage::StorageAdapter;

/// Read-through cache over a [`StorageAdapter`].
///
/// The lookup and the store are two separate adapter calls; concurrent
/// misses on the same key each run their producer and the last store wins.
#[derive(Clone)]
pub struct CallbackCache {
    storage: Arc<dyn StorageAdapter>,
    ttl_seconds: Option<u64>,
}

impl CallbackCache {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            ttl_seconds: None,
        }
    }

    /// TTL handed to the adapter on every store.
    pub fn with_ttl(mut self, ttl_seconds: Option<u64>) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    /// Return the value cached under `key`, producing and storing it on a miss.
    ///
    /// Producer errors are returned as [`EntityCacheError::Entity`] and
    /// nothing is stored. Storage errors propagate as-is.
    pub async fn call<F, Fut>(&self, key: &str, producer: F) -> EntityCacheResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Value>>,
    {
        if let Some(bytes) = self.storage.get(key).await? {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "discarding undecodable cache entry");
                }
            }
        }

        tracing::debug!(key, "cache miss");
        let value = producer().await.map_err(EntityCacheError::Entity)?;

        let bytes = serde_json::to_vec(&value).map_err(|source| EntityCacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.storage.set(key, bytes, self.ttl_seconds).await?;

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStorage;

    fn cache() -> CallbackCache {
        CallbackCache::new(Arc::new(MemoryStorage::default()))
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_storage() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .call("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"answer": 42}))
                })
                .await
                .unwrap();
            assert_eq!(value, json!({"answer": 42}));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_null_results_are_cached() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .call("null", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Value::Null)
                })
                .await
                .unwrap();
            assert!(value.is_null());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_producer_error_is_not_stored() {
        let cache = cache();

        let result = cache
            .call("k", || async { Err(anyhow::anyhow!("boom")) })
            .await;
        match result {
            Err(EntityCacheError::Entity(e)) => assert_eq!(e.to_string(), "boom"),
            other => panic!("Expected entity error, got {other:?}"),
        }

        assert_eq!(cache.storage().get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_recomputed() {
        let cache = cache();
        cache
            .storage()
            .set("k", b"\xff not json".to_vec(), None)
            .await
            .unwrap();

        let value = cache.call("k", || async { Ok(json!("fresh")) }).await.unwrap();
        assert_eq!(value, json!("fresh"));

        let stored = cache.storage().get("k").await.unwrap().unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&stored).unwrap(), json!("fresh"));
    }
}
