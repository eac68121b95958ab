//! Configuration settings structures for entity-cache
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{LogFormat, LoggerConfig};
use crate::proxy::{DEFAULT_NON_CACHE_METHODS, EntityCacheOptions};

// ============================================================================
// Default value functions
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

fn default_true() -> bool {
    true
}

fn default_storage_ttl() -> u64 {
    300
}

fn default_storage_max_size() -> usize {
    1000
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_pool_size() -> u32 {
    4
}

fn default_redis_connection_timeout() -> u64 {
    5
}

fn default_redis_key_prefix() -> String {
    "entity-cache".to_string()
}

fn default_non_cache_methods() -> Vec<String> {
    DEFAULT_NON_CACHE_METHODS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            colored: default_true(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format: LogFormat = self
            .format
            .parse()
            .map_err(|e: anyhow::Error| ConfigError::validation("logger.format", &e.to_string()))?;

        LoggerConfig::new(self.level, format, self.colored)
            .map_err(|e| ConfigError::validation("logger", &e.to_string()))
    }
}

// ============================================================================
// Storage Configuration
// ============================================================================

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Redis,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Redis => "redis",
        }
    }
}

/// Memory storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStorageConfig {
    /// Maximum number of entries
    #[serde(default = "default_storage_max_size")]
    pub max_size: usize,

    /// Time-to-live in seconds
    #[serde(default = "default_storage_ttl")]
    pub ttl_seconds: u64,
}

impl Default for MemoryStorageConfig {
    fn default() -> Self {
        Self {
            max_size: default_storage_max_size(),
            ttl_seconds: default_storage_ttl(),
        }
    }
}

/// Redis storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisStorageConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Time-to-live in seconds
    #[serde(default = "default_storage_ttl")]
    pub ttl_seconds: u64,

    /// Connection pool size
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_redis_connection_timeout")]
    pub connection_timeout: u64,

    /// Key prefix for all entries
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStorageConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            ttl_seconds: default_storage_ttl(),
            pool_size: default_redis_pool_size(),
            connection_timeout: default_redis_connection_timeout(),
            key_prefix: default_redis_key_prefix(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Whether storage is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Storage backend type
    #[serde(default)]
    pub backend: StorageBackend,

    /// Memory storage settings
    #[serde(default)]
    pub memory: MemoryStorageConfig,

    /// Redis storage settings
    #[serde(default)]
    pub redis: RedisStorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            backend: StorageBackend::default(),
            memory: MemoryStorageConfig::default(),
            redis: RedisStorageConfig::default(),
        }
    }
}

// ============================================================================
// Entity Cache Configuration
// ============================================================================

/// Decorator options as they appear in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCacheSettings {
    /// Stable key prefix; identity-derived keys are used when absent
    #[serde(default)]
    pub entity_key: Option<String>,

    /// Cache every method except `non_cache_methods`
    #[serde(default = "default_true")]
    pub cache_by_default: bool,

    /// Methods to cache when `cache_by_default` is false
    #[serde(default)]
    pub cache_methods: Vec<String>,

    /// Methods never cached when `cache_by_default` is true
    #[serde(default = "default_non_cache_methods")]
    pub non_cache_methods: Vec<String>,

    /// Cache reads and existence checks of dynamic properties
    #[serde(default)]
    pub cache_dynamic_properties: bool,

    /// TTL passed to the storage adapter on every store
    #[serde(default)]
    pub ttl_seconds: Option<u64>,
}

impl Default for EntityCacheSettings {
    fn default() -> Self {
        Self {
            entity_key: None,
            cache_by_default: default_true(),
            cache_methods: Vec::new(),
            non_cache_methods: default_non_cache_methods(),
            cache_dynamic_properties: false,
            ttl_seconds: None,
        }
    }
}

impl EntityCacheSettings {
    /// Convert into normalized decorator options
    ///
    /// Method names are lower-cased and de-duplicated; reserved accessor
    /// names are rejected.
    pub fn into_options(self) -> Result<EntityCacheOptions, ConfigError> {
        let mut options = EntityCacheOptions::default();
        options.set_entity_key(self.entity_key);
        options.set_cache_by_default(self.cache_by_default);
        options.set_cache_methods(self.cache_methods)?;
        options.set_non_cache_methods(self.non_cache_methods)?;
        options.set_cache_dynamic_properties(self.cache_dynamic_properties);
        options.set_ttl_seconds(self.ttl_seconds);
        Ok(options)
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete settings
///
/// This structure represents the entire configuration that can be loaded
/// from TOML files and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Storage adapter configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Decorator options
    #[serde(default)]
    pub entity_cache: EntityCacheSettings,
}
