//! Port-specific error types.
//!
//! These errors travel across the driver/transport seam and out of the
//! strict `try_*` setters on [`Port`](super::Port). The lenient capability
//! traits never surface them; they log and carry on.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Attempted to use a port that's not open.
    #[error("Port is not open")]
    NotOpen,

    /// The requested baud rate has no hardware speed code.
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaud(u32),

    /// The requested character size is not 5, 6, 7 or 8.
    #[error("Unsupported data bits: {0}")]
    UnsupportedDataBits(u8),

    /// The requested stop bit count is not 1 or 2.
    #[error("Unsupported stop bits: {0}")]
    UnsupportedStopBits(u8),

    /// The requested parity symbol is not one of "n", "o" or "e".
    #[error("Unsupported parity: {0:?}")]
    UnsupportedParity(String),

    /// The control block or modem status could not be queried or applied.
    #[error("Status query failed: {0}")]
    StatusQuery(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a StatusQuery error from a message.
    pub fn status_query(message: impl Into<String>) -> Self {
        Self::StatusQuery(message.into())
    }

    /// Whether this error only reports use of a closed port.
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortError::not_found("/dev/ttyUSB0");
        assert_eq!(err.to_string(), "Serial port not found: /dev/ttyUSB0");

        let err = PortError::UnsupportedBaud(12345);
        assert_eq!(err.to_string(), "Unsupported baud rate: 12345");

        let err = PortError::UnsupportedParity("x".into());
        assert_eq!(err.to_string(), "Unsupported parity: \"x\"");

        let err = PortError::NotOpen;
        assert_eq!(err.to_string(), "Port is not open");
    }

    #[test]
    fn test_not_open_classification() {
        assert!(PortError::NotOpen.is_not_open());
        assert!(!PortError::status_query("ioctl").is_not_open());
    }
}
