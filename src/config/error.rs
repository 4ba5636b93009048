//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from locating, reading, validating or saving `serial-attr.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read configuration file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("Malformed configuration file '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Cannot write configuration file '{path}': {source}")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value the port layer would reject, e.g. a nonstandard baud rate.
    #[error("Invalid value for '{key}': {message}")]
    Invalid { key: String, message: String },

    #[error("Environment variable {var}={value:?}: {message}")]
    BadEnv {
        var: String,
        value: String,
        message: String,
    },

    /// `save` was called on a loader that was built without a file.
    #[error("No configuration file path to save to")]
    NoPath,
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn bad_env(var: impl Into<String>, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadEnv {
            var: var.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
