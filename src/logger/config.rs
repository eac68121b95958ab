//! Configuration types for the logger

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Runtime logger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub level: String, // Converted to tracing::Level on validation
    pub format: LogFormat,
    pub colored: bool,
}

impl LoggerConfig {
    /// Create a new logger configuration with validation
    pub fn new(level: String, format: LogFormat, colored: bool) -> Result<Self> {
        let config = Self {
            level,
            format,
            colored,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.parse_level()
            .with_context(|| format!("Invalid log level: {}", self.level))?;
        Ok(())
    }

    /// Parse the log level string into a tracing::Level
    pub fn parse_level(&self) -> Result<Level> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ),
        }
    }

    /// Set log format
    pub fn with_format(&mut self, format: LogFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Disable colored output
    pub fn without_colors(&mut self) -> &mut Self {
        self.colored = false;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            colored: true,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ),
        }
    }
}

impl LogFormat {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.colored);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_style_setters() {
        let mut config = LoggerConfig::default();
        config.with_format(LogFormat::Json).without_colors();
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.colored);
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(LoggerConfig::new("loud".to_string(), LogFormat::Full, false).is_err());
    }

    proptest! {
        /// Every format parses back from its own name, in any case
        #[test]
        fn property_format_parses_case_insensitively(
            format in prop_oneof![Just(LogFormat::Full), Just(LogFormat::Compact), Just(LogFormat::Json)],
            upper in any::<bool>()
        ) {
            let name = if upper { format.as_str().to_uppercase() } else { format.as_str().to_string() };
            prop_assert_eq!(name.parse::<LogFormat>().unwrap(), format);
        }

        /// Unknown level strings never validate
        #[test]
        fn property_invalid_levels_fail(level in "[a-z]{6,12}") {
            prop_assume!(!["trace", "debug", "info", "warn", "error"].contains(&level.as_str()));
            let config = LoggerConfig { level, ..LoggerConfig::default() };
            prop_assert!(config.validate().is_err());
        }
    }
}
