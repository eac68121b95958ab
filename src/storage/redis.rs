//! Redis storage implementation using bb8 connection pool.

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};

use crate::config::settings::RedisStorageConfig;
use crate::storage::{StorageAdapter, StorageError};

type RedisPool = Pool<Client>;

/// Redis-backed storage with bb8 connection pool.
pub struct RedisStorage {
    pool: RedisPool,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisStorage {
    pub async fn new(config: &RedisStorageConfig) -> Result<Self, StorageError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(std::time::Duration::from_secs(config.connection_timeout))
            .build(client)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            key_prefix: config.key_prefix.clone(),
            default_ttl: config.ttl_seconds,
        })
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, StorageError> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl StorageAdapter for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .get(&prefixed)
            .await
            .map_err(|e: RedisError| StorageError::Operation(e.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), StorageError> {
        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .set_ex::<_, _, ()>(&prefixed, value, ttl)
            .await
            .map_err(|e| StorageError::Operation(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_many(&[key.to_string()]).await
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let prefixed: Vec<String> = keys.iter().map(|k| self.prefixed_key(k)).collect();

        // Single DEL with every key
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .del::<_, ()>(prefixed)
            .await
            .map_err(|e| StorageError::Operation(e.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut conn: PooledConnection<'_, Client> = self.get_conn().await?;
        let pattern = format!("{}:*", self.key_prefix);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| StorageError::Operation(e.to_string()))?;

        if !keys.is_empty() {
            let conn_ref: &mut MultiplexedConnection = &mut conn;
            conn_ref
                .del::<_, ()>(keys)
                .await
                .map_err(|e| StorageError::Operation(e.to_string()))?;
        }

        Ok(())
    }
}
