//! Centralized error types for Skycast.
//!
//! Storage failures are soft everywhere in the app (logged, never shown),
//! so `StorageError` mostly travels between the store and its caller's
//! fallback path. Weather and location failures arrive from the other
//! crates already rendered as user-facing messages.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for the terminal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider or query failure; the message is already user-facing.
    #[error("{0}")]
    Weather(String),

    /// Geolocation failure; the message is already localized.
    #[error("{0}")]
    Location(String),
}

impl AppError {
    /// Returns a message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => format!("{} ({})", e.user_message(), e),
            AppError::Weather(msg) | AppError::Location(msg) => msg.clone(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config directory available on this platform")]
    NoConfigDir,

    #[error("Configuration file could not be read or written: {0}")]
    Io(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NoConfigDir => "No configuration directory found. Pass --config.",
            ConfigError::Io(_) => "Configuration file could not be accessed.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Persisted key-value storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to serialize stored data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
