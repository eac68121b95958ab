use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Crate-wide error type.
///
/// Upstream failures (entity and storage) are carried transparently so the
/// caller sees the original error.
#[derive(Error, Debug)]
pub enum EntityCacheError {
    /// Invalid construction or setter input
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failure raised by the storage adapter
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Failure raised by the wrapped entity
    #[error(transparent)]
    Entity(anyhow::Error),

    /// A produced value could not be encoded for storage
    #[error("Failed to encode value for key '{key}'")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EntityCacheError {
    /// Returns true for errors raised by the entity itself
    pub fn is_entity(&self) -> bool {
        matches!(self, EntityCacheError::Entity(_))
    }
}

/// Type alias for Result with EntityCacheError to simplify function signatures
pub type EntityCacheResult<T> = Result<T, EntityCacheError>;
