//! Configuration module for serial-attr.
//!
//! This module provides TOML-based configuration with environment variable overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `SERIAL_ATTR_CONFIG` environment variable (explicit path)
//! 2. `./serial-attr.toml` (current directory)
//! 3. `serial-attr.toml` in the platform config directory
//!    (`~/.config/serial-attr/` on Linux)
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Any configuration value can be overridden via environment variables.
//! The pattern is: `SERIAL_ATTR_<SECTION>_<KEY>`
//!
//! Examples:
//! - `SERIAL_ATTR_PORT_BAUD=115200`
//! - `SERIAL_ATTR_DISCOVERY_MAX_SUFFIX=8`
//! - `SERIAL_ATTR_LOGGING_FORMAT=json`
//!
//! # Example
//!
//! ```rust,no_run
//! use serial_attr::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load()?;
//! let config = loader.config();
//!
//! println!("Default baud: {}", config.port.baud);
//! println!("Probing {} prefixes", config.discovery.prefixes.len());
//! # Ok::<(), serial_attr::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    get_default_config_dir, get_default_config_path, resolve_config_path, ConfigLoader,
};
pub use schema::{Config, DiscoveryConfig, LogFormat, LoggingConfig, PortDefaults};
