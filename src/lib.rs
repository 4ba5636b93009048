//! Serial port control library.
//!
//! Opens a device through a pluggable driver, moves raw bytes, configures the
//! line (baud rate, data bits, stop bits, parity) and reads or drives the
//! modem control lines. Everything is reachable both through typed accessors
//! and through a string-keyed attribute interface meant for scripting.
//!
//! # Modules
//!
//! - `port`: capability traits, codec, signals, the `Port` type and backends
//! - `attributes`: attribute keys and string coercion
//! - `discovery`: stateless probing for candidate device names
//! - `config`: Configuration management with TOML support
//! - `logging`: tracing subscriber setup for the binary
//! - `cli`: command line definitions and execution
//! - `error`: Unified error handling for the binary
//!
//! # Example
//!
//! ```
//! use serial_attr::port::{AttributeAccess, ByteStream, MockDriver, Port, SerialLine};
//!
//! let mut port = Port::new(MockDriver::new());
//! port.open("/dev/ttyMOCK0");
//!
//! port.set_attr("parity", "Even");
//! assert_eq!(port.parity().symbol(), "e");
//! assert_eq!(port.get_attrs(&["opened", "bits"]), vec!["true", "8"]);
//! ```

pub mod attributes;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod port;

// Re-export commonly used types for convenience
pub use attributes::AttributeKey;
pub use error::AppError;
pub use port::{
    AttributeAccess, ByteStream, ControlBlock, DataBits, Driver, MockDriver, ModemStatus,
    NativeDriver, Parity, Port, PortError, SerialLine, SharedPort, Signal, StopBits, Transport,
};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
