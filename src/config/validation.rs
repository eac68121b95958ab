//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    EntityCacheSettings, LoggerSettings, MemoryStorageConfig, RedisStorageConfig, Settings,
    StorageBackend, StorageConfig,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl LoggerSettings {
    /// Validate logger configuration
    ///
    /// # Validation Rules
    /// - Level must be one of: trace, debug, info, warn, error
    /// - Format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl MemoryStorageConfig {
    /// Validate memory storage configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::validation(
                "storage.memory.max_size",
                "Max size must be greater than 0.",
            ));
        }
        if self.ttl_seconds == 0 {
            return Err(ConfigError::validation(
                "storage.memory.ttl_seconds",
                "TTL must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl RedisStorageConfig {
    /// Validate redis storage configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.url.starts_with("redis://") || self.url.starts_with("rediss://")) {
            return Err(ConfigError::validation(
                "storage.redis.url",
                "Invalid redis URL format. Expected format: redis://[user:password@]host[:port][/db]",
            ));
        }
        if self.pool_size == 0 {
            return Err(ConfigError::validation(
                "storage.redis.pool_size",
                "Pool size must be greater than 0.",
            ));
        }
        if self.ttl_seconds == 0 {
            return Err(ConfigError::validation(
                "storage.redis.ttl_seconds",
                "TTL must be greater than 0 seconds.",
            ));
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Validate the selected backend only
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }
        match self.backend {
            StorageBackend::Memory => self.memory.validate(),
            StorageBackend::Redis => self.redis.validate(),
        }
    }
}

impl EntityCacheSettings {
    /// Validate decorator options
    ///
    /// # Validation Rules
    /// - Method lists must not contain reserved accessor names
    /// - An explicit entity key must not be empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.entity_key.as_deref(), Some(key) if key.trim().is_empty()) {
            return Err(ConfigError::validation(
                "entity_cache.entity_key",
                "Entity key must not be empty when set.",
            ));
        }
        if self.ttl_seconds == Some(0) {
            return Err(ConfigError::validation(
                "entity_cache.ttl_seconds",
                "TTL must be greater than 0 seconds when set.",
            ));
        }
        self.clone().into_options().map(|_| ())
    }
}

impl Settings {
    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logger.validate()?;
        self.storage.validate()?;
        self.entity_cache.validate()?;
        Ok(())
    }
}
