//! Configuration loader for entity-cache
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "ENTITY_CACHE_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "ENTITY_CACHE_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "ENTITY_CACHE";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

/// Configuration loader that handles layered configuration loading
///
/// The loader supports the following configuration sources (in order of priority):
/// 1. `default.toml` - Base default configuration (required)
/// 2. `local.toml` - Local overrides (optional)
/// 3. `ENTITY_CACHE_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration directory path
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    ///
    /// This reads environment variables to determine:
    /// - Configuration directory (`ENTITY_CACHE_CONFIG_DIR`)
    /// - Specific configuration file (`ENTITY_CACHE_CONFIG_FILE`)
    ///
    /// # Errors
    ///
    /// Returns an error if both variables are set, as they are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && std::env::var(CONFIG_DIR_ENV).is_ok() {
            return Err(ConfigError::mutual_exclusivity(
                "ENTITY_CACHE_CONFIG_DIR and ENTITY_CACHE_CONFIG_FILE cannot both be set. \
                 Use ENTITY_CACHE_CONFIG_DIR for layered configuration or \
                 ENTITY_CACHE_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    /// Create a loader that reads exactly one file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
        }
    }

    /// Get the configuration directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `default.toml` is not found (when using layered loading)
    /// - Configuration parsing fails
    /// - Configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        tracing::debug!(
            config_dir = %self.config_dir.display(),
            config_file = ?self.config_file,
            "configuration loaded"
        );

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = if let Some(ref config_file) = self.config_file {
            Self::add_file_source(builder, config_file, true)?
        } else {
            let default_path = self.config_dir.join("default.toml");
            let builder = Self::add_file_source(builder, &default_path, true)?;

            let local_path = self.config_dir.join("local.toml");
            Self::add_file_source(builder, &local_path, false)?
        };

        // ENTITY_CACHE_STORAGE__BACKEND -> storage.backend
        let builder = Self::add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn add_file_source(builder: Builder, path: &Path, required: bool) -> Result<Builder, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(required),
        ))
    }

    fn add_env_source(builder: Builder) -> Builder {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::StorageBackend;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests touching process env vars must not interleave
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            let path = temp_dir.path().join(name);
            fs::write(&path, content).expect("Failed to write config file");
        }
        temp_dir
    }

    /// Restores touched environment variables on drop
    struct EnvGuard {
        vars_to_restore: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self {
                vars_to_restore: Vec::new(),
            }
        }

        fn set(&mut self, key: &str, value: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            let original = std::env::var(key).ok();
            self.vars_to_restore.push((key.to_string(), original));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original_value) in self.vars_to_restore.iter().rev() {
                unsafe {
                    match original_value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    const DEFAULT_CONFIG: &str = r#"
[logger]
level = "debug"
format = "compact"

[storage]
enabled = true
backend = "memory"

[storage.memory]
max_size = 50
ttl_seconds = 30

[entity_cache]
entity_key = "greeter"
cache_by_default = false
cache_methods = ["Greet", "greet"]
cache_dynamic_properties = true
"#;

    #[test]
    fn test_config_loader_new_default() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.remove(CONFIG_DIR_ENV);
        env.remove(CONFIG_FILE_ENV);

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir(), Path::new("config"));
        assert!(loader.config_file.is_none());
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_default_toml() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);

        let loader = ConfigLoader::new().expect("Should create loader");
        match loader.load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_default_toml_only() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.logger.level, "debug");
        assert_eq!(settings.storage.memory.max_size, 50);
        assert_eq!(settings.entity_cache.entity_key.as_deref(), Some("greeter"));
        assert!(!settings.entity_cache.cache_by_default);
        assert!(settings.entity_cache.cache_dynamic_properties);
        // Untouched defaults survive
        assert_eq!(settings.entity_cache.non_cache_methods, vec!["tostring"]);
    }

    #[test]
    fn test_load_with_local_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let local_config = r#"
[storage]
backend = "redis"

[entity_cache]
entity_key = "local"
"#;
        let temp_dir = setup_config_dir(&[
            ("default.toml", DEFAULT_CONFIG),
            ("local.toml", local_config),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert_eq!(settings.storage.backend, StorageBackend::Redis);
        assert_eq!(settings.entity_cache.entity_key.as_deref(), Some("local"));
        assert_eq!(settings.storage.memory.ttl_seconds, 30);
    }

    #[test]
    fn test_load_with_env_override() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[("default.toml", DEFAULT_CONFIG)]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);
        env.set("ENTITY_CACHE_STORAGE__ENABLED", "false");
        env.set("ENTITY_CACHE_LOGGER__LEVEL", "warn");

        let settings = ConfigLoader::new().unwrap().load().expect("Should load settings");

        assert!(!settings.storage.enabled);
        assert_eq!(settings.logger.level, "warn");
    }

    #[test]
    fn test_load_single_file() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let temp_dir = setup_config_dir(&[("custom.toml", DEFAULT_CONFIG)]);

        let loader = ConfigLoader::from_file(temp_dir.path().join("custom.toml"));
        let settings = loader.load().expect("Should load settings");

        assert_eq!(settings.logger.format, "compact");
    }

    #[test]
    fn test_load_rejects_reserved_method() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let config = r#"
[entity_cache]
cache_methods = ["property_exists"]
"#;
        let temp_dir = setup_config_dir(&[("custom.toml", config)]);

        let result = ConfigLoader::from_file(temp_dir.path().join("custom.toml")).load();
        assert!(matches!(result, Err(ConfigError::ReservedMethod { .. })));
    }

    #[test]
    fn test_load_rejects_unknown_backend() {
        let _guard = TEST_MUTEX.lock().unwrap();
        let config = r#"
[storage]
backend = "memcached"
"#;
        let temp_dir = setup_config_dir(&[("custom.toml", config)]);

        let result = ConfigLoader::from_file(temp_dir.path().join("custom.toml")).load();
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
