//! Configuration management module for entity-cache
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml` - Base default configuration
//! 2. `local.toml` - Local overrides (not committed to version control)
//! 3. `ENTITY_CACHE_*` environment variables

pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{EntityCacheSettings, LoggerSettings, Settings};
