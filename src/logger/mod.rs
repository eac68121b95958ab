//! Logger Module
//!
//! Console logging based on `tracing-subscriber` with:
//! - Full, compact or JSON output
//! - Color control (disabled automatically when stdout is not a terminal)
//! - `EnvFilter` level directives

pub mod config;
pub mod error;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber with the given configuration
pub fn init_logger(config: LoggerConfig) -> Result<(), LoggerError> {
    config
        .validate()
        .map_err(|e| LoggerError::config(format!("{e:#}")))?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let use_ansi = config.colored && std::io::stdout().is_terminal();

    let result = match config.format {
        LogFormat::Full => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(use_ansi).with_target(true).with_level(true))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(use_ansi).with_target(true).compact())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false).json())
            .try_init(),
    };

    result.map_err(|e| LoggerError::already_installed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rejects_invalid_level() {
        let config = LoggerConfig {
            level: "chatty".to_string(),
            ..LoggerConfig::default()
        };
        assert!(matches!(init_logger(config), Err(LoggerError::Config { .. })));
    }
}
