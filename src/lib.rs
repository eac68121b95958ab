//! Entity-Cache Library
//!
//! A caching decorator that sits in front of an entity, serving method
//! results and dynamic property reads from a key-value store and
//! invalidating them when the entity is mutated.

pub mod callback;
pub mod config;
pub mod error;
pub mod logger;
pub mod proxy;
pub mod storage;

pub use callback::CallbackCache;
pub use error::{EntityCacheError, EntityCacheResult};
pub use proxy::{CallOptions, Entity, EntityCache, EntityCacheBuilder, Invocation, OpKind};
pub use storage::StorageAdapter;
