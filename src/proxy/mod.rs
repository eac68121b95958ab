//! Caching decorator for entity method calls and dynamic properties.
//!
//! # Usage
//!
//! ```ignore
//! let cache = EntityCache::builder()
//!     .entity(Arc::new(greeter))
//!     .storage(Arc::new(MemoryStorage::default()))
//!     .entity_key("greeter")
//!     .build()?;
//!
//! // Computed once, then served from storage
//! let hello = cache.call("greet", vec![json!("Bob")]).await?;
//! ```

mod dispatcher;
mod dynamic;
mod entity;
mod key;
mod options;
mod policy;


pub use dispatcher::{EntityCache, EntityCacheBuilder};
pub use dynamic::{DynamicAccess, DynamicMode};
pub use entity::{Accessor, Entity, Invocation, OpKind};
pub use key::{KeyResolver, KeySource};
pub use options::{CallOptions, EntityCacheOptions};
pub use policy::{CachePolicy, DEFAULT_NON_CACHE_METHODS};
