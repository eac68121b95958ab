//! Pass-through vs. cached handling of dynamic properties.

use serde_json::Value;

use crate::proxy::entity::{Accessor, Entity};

/// How a property access is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicMode {
    /// Go straight to the entity; storage is never touched.
    PassThrough,
    /// Reads and existence checks are cached; writes and deletes invalidate.
    Cached,
}

/// Stateless routing rules for the four property operations.
pub struct DynamicAccess;

impl DynamicAccess {
    /// Declared members and disabled dynamic caching both pass through.
    pub fn mode(entity: &dyn Entity, property: &str, cache_dynamic_properties: bool) -> DynamicMode {
        if !cache_dynamic_properties || entity.has_declared_member(property) {
            DynamicMode::PassThrough
        } else {
            DynamicMode::Cached
        }
    }

    /// Arguments the read and exists accessors are keyed and invoked with.
    pub fn accessor_args(property: &str) -> Vec<Value> {
        vec![Value::from(property)]
    }

    /// Cached accessors that a write or delete of a dynamic property makes stale.
    ///
    /// Accessors the entity does not define are skipped.
    pub fn invalidation_targets(entity: &dyn Entity) -> Vec<Accessor> {
        [Accessor::Read, Accessor::Exists]
            .into_iter()
            .filter(|accessor| entity.has_method(accessor.method_name()))
            .collect()
    }
}
