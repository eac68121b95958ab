//! Instance options and per-call overrides.

use std::collections::BTreeSet;

use crate::config::ConfigError;
use crate::proxy::policy::CachePolicy;

/// Options held by an [`EntityCache`](crate::EntityCache).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityCacheOptions {
    entity_key: Option<String>,
    policy: CachePolicy,
    cache_dynamic_properties: bool,
    ttl_seconds: Option<u64>,
}

impl EntityCacheOptions {
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn entity_key(&self) -> Option<&str> {
        self.entity_key.as_deref()
    }

    pub fn set_entity_key(&mut self, entity_key: Option<String>) {
        self.entity_key = entity_key;
    }

    pub fn cache_by_default(&self) -> bool {
        self.policy.cache_by_default()
    }

    pub fn set_cache_by_default(&mut self, cache_by_default: bool) {
        self.policy.set_cache_by_default(cache_by_default);
    }

    pub fn cache_methods(&self) -> &BTreeSet<String> {
        self.policy.cache_methods()
    }

    pub fn set_cache_methods<I, S>(&mut self, methods: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.set_cache_methods(methods)
    }

    pub fn non_cache_methods(&self) -> &BTreeSet<String> {
        self.policy.non_cache_methods()
    }

    pub fn set_non_cache_methods<I, S>(&mut self, methods: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.set_non_cache_methods(methods)
    }

    pub fn cache_dynamic_properties(&self) -> bool {
        self.cache_dynamic_properties
    }

    pub fn set_cache_dynamic_properties(&mut self, enabled: bool) {
        self.cache_dynamic_properties = enabled;
    }

    pub fn ttl_seconds(&self) -> Option<u64> {
        self.ttl_seconds
    }

    pub fn set_ttl_seconds(&mut self, ttl_seconds: Option<u64>) {
        self.ttl_seconds = ttl_seconds;
    }
}

/// Per-call key overrides.
///
/// `key` replaces the whole cache key; `entity_key` replaces only the
/// configured prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallOptions {
    pub key: Option<String>,
    pub entity_key: Option<String>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_entity_key(mut self, entity_key: impl Into<String>) -> Self {
        self.entity_key = Some(entity_key.into());
        self
    }
}
