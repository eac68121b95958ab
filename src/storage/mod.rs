//! Storage adapters backing the entity cache.
//!
//! Supported backends:
//! - Memory (in-process, fastest)
//! - Redis (distributed, network-based)
//! - NoOp (storage disabled)
//!
//! # Configuration
//!
//! ```toml
//! [storage]
//! enabled = true
//! backend = "memory"  # or "redis"
//!
//! [storage.memory]
//! max_size = 1000
//! ttl_seconds = 300
//!
//! [storage.redis]
//! url = "redis://127.0.0.1:6379"
//! ttl_seconds = 300
//! pool_size = 4
//! connection_timeout = 5
//! key_prefix = "entity-cache"
//! ```

mod error;
mod factory;
mod memory;
mod noop;
mod redis;
mod traits;

pub use error::StorageError;
pub use factory::build_storage;
pub use self::memory::MemoryStorage;
pub use self::noop::NoOpStorage;
pub use self::redis::RedisStorage;
pub use traits::StorageAdapter;

pub use crate::config::settings::{
    MemoryStorageConfig, RedisStorageConfig, StorageBackend, StorageConfig,
};
