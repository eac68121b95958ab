//! The caching decorator and its single dispatch entry point.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::callback::CallbackCache;
use crate::config::{ConfigError, Settings};
use crate::error::{EntityCacheError, EntityCacheResult};
use crate::proxy::dynamic::{DynamicAccess, DynamicMode};
use crate::proxy::entity::{Accessor, Entity, Invocation, OpKind};
use crate::proxy::key::{KeyResolver, KeySource};
use crate::proxy::options::{CallOptions, EntityCacheOptions};
use crate::storage::{StorageAdapter, build_storage};

/// Method called by [`EntityCache::invoke`].
const INVOKE_METHOD: &str = "invoke";

/// Method called by [`EntityCache::to_string_value`].
const TO_STRING_METHOD: &str = "tostring";

/// Caching decorator in front of an [`Entity`].
///
/// Every call and property access goes through [`EntityCache::dispatch`].
/// The decorator shares the entity; it never owns its lifetime.
pub struct EntityCache {
    entity: Arc<dyn Entity>,
    storage: Arc<dyn StorageAdapter>,
    options: EntityCacheOptions,
    identity: String,
}

impl fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("identity", &self.identity)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl EntityCache {
    pub fn builder() -> EntityCacheBuilder {
        EntityCacheBuilder::default()
    }

    /// Build storage and options from loaded settings.
    pub async fn from_settings(
        entity: Arc<dyn Entity>,
        settings: &Settings,
    ) -> EntityCacheResult<Self> {
        let storage = build_storage(&settings.storage)
            .await
            .map_err(|e| ConfigError::InvalidStorage(e.to_string()))?;
        let options = settings.entity_cache.clone().into_options()?;

        Ok(Self::builder()
            .entity(entity)
            .storage(storage)
            .options(options)
            .build()?)
    }

    /// Route one intercepted operation.
    ///
    /// Property writes and deletes always reach the entity first; caching
    /// decisions only govern what happens to storage afterwards.
    pub async fn dispatch(
        &self,
        invocation: Invocation,
        call: &CallOptions,
    ) -> EntityCacheResult<Value> {
        let Invocation { op, name, args } = invocation;

        match op {
            OpKind::Call => self.dispatch_call(&name.to_lowercase(), &args, call).await,
            OpKind::ReadProp => self.dispatch_read(&name, call).await,
            OpKind::ExistsProp => self.dispatch_exists(&name, call).await.map(Value::Bool),
            OpKind::WriteProp => {
                let value = args.into_iter().next().unwrap_or(Value::Null);
                self.entity
                    .write_property(&name, value)
                    .await
                    .map_err(EntityCacheError::Entity)?;
                self.invalidate(&name, call).await?;
                Ok(Value::Null)
            }
            OpKind::DeleteProp => {
                self.entity
                    .delete_property(&name)
                    .await
                    .map_err(EntityCacheError::Entity)?;
                self.invalidate(&name, call).await?;
                Ok(Value::Null)
            }
        }
    }

    async fn dispatch_call(
        &self,
        method: &str,
        args: &[Value],
        call: &CallOptions,
    ) -> EntityCacheResult<Value> {
        if !self.options.policy().should_cache(method) {
            tracing::debug!(method, "cache bypassed by policy");
            return self
                .entity
                .invoke(method, args)
                .await
                .map_err(EntityCacheError::Entity);
        }

        self.cached_invoke(method, args, call).await
    }

    async fn dispatch_read(&self, property: &str, call: &CallOptions) -> EntityCacheResult<Value> {
        match self.mode(property) {
            DynamicMode::PassThrough => self
                .entity
                .read_property(property)
                .await
                .map_err(EntityCacheError::Entity),
            DynamicMode::Cached => {
                let args = DynamicAccess::accessor_args(property);
                self.cached_invoke(Accessor::Read.method_name(), &args, call)
                    .await
            }
        }
    }

    async fn dispatch_exists(&self, property: &str, call: &CallOptions) -> EntityCacheResult<bool> {
        match self.mode(property) {
            DynamicMode::PassThrough => self
                .entity
                .property_exists(property)
                .await
                .map_err(EntityCacheError::Entity),
            DynamicMode::Cached => {
                let args = DynamicAccess::accessor_args(property);
                let exists = self
                    .cached_invoke(Accessor::Exists.method_name(), &args, call)
                    .await?;
                Ok(exists.as_bool().unwrap_or(false))
            }
        }
    }

    /// Remove cached reads and existence checks of a dynamic property.
    async fn invalidate(&self, property: &str, call: &CallOptions) -> EntityCacheResult<()> {
        if self.mode(property) == DynamicMode::PassThrough {
            return Ok(());
        }

        let args = DynamicAccess::accessor_args(property);
        let keys: Vec<String> = DynamicAccess::invalidation_targets(self.entity.as_ref())
            .into_iter()
            .map(|accessor| self.key_for(accessor.method_name(), &args, call))
            .collect();

        if keys.is_empty() {
            return Ok(());
        }

        tracing::debug!(property, keys = ?keys, "invalidating dynamic property");
        self.storage.remove_many(&keys).await?;
        Ok(())
    }

    async fn cached_invoke(
        &self,
        method: &str,
        args: &[Value],
        call: &CallOptions,
    ) -> EntityCacheResult<Value> {
        let key = self.key_for(method, args, call);
        let entity = &self.entity;

        CallbackCache::new(self.storage.clone())
            .with_ttl(self.options.ttl_seconds())
            .call(&key, || entity.invoke(method, args))
            .await
    }

    fn mode(&self, property: &str) -> DynamicMode {
        DynamicAccess::mode(
            self.entity.as_ref(),
            property,
            self.options.cache_dynamic_properties(),
        )
    }

    fn key_for(&self, method: &str, args: &[Value], call: &CallOptions) -> String {
        KeyResolver::resolve(
            &self.identity,
            method,
            args,
            KeySource::resolve(call, &self.options),
        )
    }

    // ========================================================================
    // Call surface
    // ========================================================================

    pub async fn call(&self, method: &str, args: Vec<Value>) -> EntityCacheResult<Value> {
        self.call_with(method, args, &CallOptions::default()).await
    }

    pub async fn call_with(
        &self,
        method: &str,
        args: Vec<Value>,
        call: &CallOptions,
    ) -> EntityCacheResult<Value> {
        self.dispatch(Invocation::call(method, args), call).await
    }

    /// Call a callable entity through the normal policy.
    pub async fn invoke(&self, args: Vec<Value>) -> EntityCacheResult<Value> {
        self.call(INVOKE_METHOD, args).await
    }

    /// The entity's string form; not cached under the default options.
    pub async fn to_string_value(&self) -> EntityCacheResult<String> {
        match self.call(TO_STRING_METHOD, Vec::new()).await? {
            Value::String(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }

    /// The key `method(args)` resolves to, without touching storage.
    pub fn generate_key(&self, method: &str, args: &[Value], call: &CallOptions) -> String {
        self.key_for(&method.to_lowercase(), args, call)
    }

    pub async fn read_property(&self, property: &str) -> EntityCacheResult<Value> {
        self.dispatch(Invocation::read(property), &CallOptions::default())
            .await
    }

    pub async fn write_property(&self, property: &str, value: Value) -> EntityCacheResult<()> {
        self.dispatch(Invocation::write(property, value), &CallOptions::default())
            .await
            .map(|_| ())
    }

    pub async fn property_exists(&self, property: &str) -> EntityCacheResult<bool> {
        self.dispatch_exists(property, &CallOptions::default()).await
    }

    pub async fn delete_property(&self, property: &str) -> EntityCacheResult<()> {
        self.dispatch(Invocation::delete(property), &CallOptions::default())
            .await
            .map(|_| ())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn entity(&self) -> &Arc<dyn Entity> {
        &self.entity
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    pub fn options(&self) -> &EntityCacheOptions {
        &self.options
    }

    pub fn entity_key(&self) -> Option<&str> {
        self.options.entity_key()
    }

    pub fn set_entity_key(&mut self, entity_key: Option<String>) {
        self.options.set_entity_key(entity_key);
    }

    pub fn cache_by_default(&self) -> bool {
        self.options.cache_by_default()
    }

    pub fn set_cache_by_default(&mut self, cache_by_default: bool) {
        self.options.set_cache_by_default(cache_by_default);
    }

    pub fn cache_methods(&self) -> &BTreeSet<String> {
        self.options.cache_methods()
    }

    pub fn set_cache_methods<I, S>(&mut self, methods: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.set_cache_methods(methods)
    }

    pub fn non_cache_methods(&self) -> &BTreeSet<String> {
        self.options.non_cache_methods()
    }

    pub fn set_non_cache_methods<I, S>(&mut self, methods: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.set_non_cache_methods(methods)
    }

    pub fn cache_dynamic_properties(&self) -> bool {
        self.options.cache_dynamic_properties()
    }

    pub fn set_cache_dynamic_properties(&mut self, enabled: bool) {
        self.options.set_cache_dynamic_properties(enabled);
    }

    pub fn ttl_seconds(&self) -> Option<u64> {
        self.options.ttl_seconds()
    }

    pub fn set_ttl_seconds(&mut self, ttl_seconds: Option<u64>) {
        self.options.set_ttl_seconds(ttl_seconds);
    }
}

/// Builder for [`EntityCache`]; entity and storage are required.
#[derive(Default)]
pub struct EntityCacheBuilder {
    entity: Option<Arc<dyn Entity>>,
    storage: Option<Arc<dyn StorageAdapter>>,
    options: EntityCacheOptions,
    cache_methods: Option<Vec<String>>,
    non_cache_methods: Option<Vec<String>>,
}

impl EntityCacheBuilder {
    pub fn entity(mut self, entity: Arc<dyn Entity>) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn StorageAdapter>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: EntityCacheOptions) -> Self {
        self.options = options;
        self
    }

    pub fn entity_key(mut self, entity_key: impl Into<String>) -> Self {
        self.options.set_entity_key(Some(entity_key.into()));
        self
    }

    pub fn cache_by_default(mut self, cache_by_default: bool) -> Self {
        self.options.set_cache_by_default(cache_by_default);
        self
    }

    pub fn cache_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cache_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn non_cache_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_cache_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn cache_dynamic_properties(mut self, enabled: bool) -> Self {
        self.options.set_cache_dynamic_properties(enabled);
        self
    }

    pub fn ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.options.set_ttl_seconds(Some(ttl_seconds));
        self
    }

    /// Validate and build.
    ///
    /// Fails when the entity or storage is missing, or a method list holds
    /// a reserved accessor name.
    pub fn build(self) -> Result<EntityCache, ConfigError> {
        let entity = self.entity.ok_or(ConfigError::MissingOption("entity"))?;
        let storage = self.storage.ok_or(ConfigError::MissingOption("storage"))?;

        let mut options = self.options;
        if let Some(methods) = self.cache_methods {
            options.set_cache_methods(methods)?;
        }
        if let Some(methods) = self.non_cache_methods {
            options.set_non_cache_methods(methods)?;
        }

        let identity = entity.identity();
        tracing::debug!(
            identity = %identity,
            entity_key = ?options.entity_key(),
            cache_by_default = options.cache_by_default(),
            cache_dynamic_properties = options.cache_dynamic_properties(),
            "entity cache ready"
        );

        Ok(EntityCache {
            entity,
            storage,
            options,
            identity,
        })
    }
}
