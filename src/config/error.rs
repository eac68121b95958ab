//! Configuration error types

use thiserror::Error;

/// Configuration error types
///
/// Raised at construction or setter time and never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required option was not supplied
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    /// A reserved accessor name was passed into a method list
    #[error("Method '{name}' is reserved for dynamic property access and cannot be listed in {option}")]
    ReservedMethod {
        /// The offending method name
        name: String,
        /// The option it was passed to
        option: &'static str,
    },

    /// The storage adapter could not be built from its configuration
    #[error("Invalid storage configuration: {0}")]
    InvalidStorage(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error with field and message
    #[error("Validation error: {field} - {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// The validation error message
        message: String,
    },

    /// Mutual exclusivity error
    #[error("Mutual exclusivity error: {0}")]
    MutualExclusivityError(String),

    /// Generic configuration error from config crate
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new file not found error
    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    /// Create a new mutual exclusivity error
    pub fn mutual_exclusivity<S: Into<String>>(message: S) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}
