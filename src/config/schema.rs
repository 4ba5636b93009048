//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! All configuration sections are defined here with appropriate defaults.

use super::error::{ConfigError, ConfigResult};
use crate::port::{DataBits, Parity, StopBits};
use crate::port::codec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line settings applied on request and port aliases
    pub port: PortDefaults,
    /// Device discovery settings
    pub discovery: DiscoveryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check that every configured value is one the port accepts.
    pub fn validate(&self) -> ConfigResult<()> {
        if codec::encode_baud(self.port.baud).is_none() {
            return Err(ConfigError::invalid(
                "port.baud",
                format!("{} is not a standard baud rate", self.port.baud),
            ));
        }
        if DataBits::from_count(self.port.bits).is_none() {
            return Err(ConfigError::invalid("port.bits", "must be 5, 6, 7 or 8"));
        }
        if StopBits::from_count(self.port.stops).is_none() {
            return Err(ConfigError::invalid("port.stops", "must be 1 or 2"));
        }
        if Parity::from_symbol(&self.port.parity).is_none() {
            return Err(ConfigError::invalid("port.parity", "must be \"n\", \"o\" or \"e\""));
        }
        Ok(())
    }
}

/// Port section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortDefaults {
    /// Baud rate
    pub baud: u32,
    /// Data bits per character
    pub bits: u8,
    /// Stop bits
    pub stops: u8,
    /// Parity symbol: "n", "o" or "e"
    pub parity: String,
    /// Port aliases for convenience
    pub aliases: HashMap<String, String>,
}

impl Default for PortDefaults {
    fn default() -> Self {
        Self {
            baud: 9600,
            bits: 8,
            stops: 1,
            parity: "n".to_string(),
            aliases: HashMap::new(),
        }
    }
}

impl PortDefaults {
    /// Resolve a port name through aliases
    pub fn resolve_port(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// The line settings as attribute key/value pairs.
    pub fn attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            ("baud".to_string(), self.baud.to_string()),
            ("bits".to_string(), self.bits.to_string()),
            ("stops".to_string(), self.stops.to_string()),
            ("parity".to_string(), self.parity.clone()),
        ])
    }
}

/// Discovery section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Device name prefixes to probe
    pub prefixes: Vec<String>,
    /// Highest numeric suffix probed for each prefix
    pub max_suffix: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![
                "/dev/ttyS".to_string(),
                "/dev/ttyACM".to_string(),
                "/dev/ttyUSB".to_string(),
                "/dev/rfcomm".to_string(),
            ],
            max_suffix: 32,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Log format: "json", "pretty", "compact"
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format with colors
    Pretty,
    /// Compact format
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}
