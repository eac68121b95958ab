//! Error types for the logger

use thiserror::Error;

/// Errors that can occur while installing the logger
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Subscriber already installed: {message}")]
    AlreadyInstalled { message: String },
}

impl LoggerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn already_installed(message: impl Into<String>) -> Self {
        Self::AlreadyInstalled {
            message: message.into(),
        }
    }
}
