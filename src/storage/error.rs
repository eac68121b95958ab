//! Storage error types.

use thiserror::Error;

/// Errors raised by a storage adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    Operation(String),

    #[error("Storage connection failed: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
