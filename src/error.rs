use crate::config::ConfigError;
use crate::port::PortError;
use std::fmt;

/// Unified application error type for the command line tool.
///
/// The port layer itself never fails loudly; these variants cover the
/// places where the tool has to stop and tell the user something.
#[derive(Debug)]
pub enum AppError {
    OpenFailed(String),
    InvalidArgument(String),
    Port(PortError),
    Config(ConfigError),
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed(name) => write!(f, "Could not open serial port '{name}'."),
            Self::InvalidArgument(details) => write!(f, "Invalid argument: {details}"),
            Self::Port(e) => write!(f, "A serial port error occurred: {e}"),
            Self::Config(e) => write!(f, "A configuration error occurred: {e}"),
            Self::IoError(e) => write!(f, "An I/O error occurred: {e}"),
            Self::SerdeError(e) => write!(f, "A serialization error occurred: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Port(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::IoError(e) => Some(e),
            Self::SerdeError(e) => Some(e),
            _ => None,
        }
    }
}

// Implement `From` conversions to allow the `?` operator to work seamlessly.
impl From<PortError> for AppError {
    fn from(err: PortError) -> Self {
        AppError::Port(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerdeError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display() {
        let err = AppError::OpenFailed("/dev/ttyUSB9".into());
        assert_eq!(err.to_string(), "Could not open serial port '/dev/ttyUSB9'.");

        let err = AppError::InvalidArgument("expected KEY=VALUE, got 'baud'".into());
        assert_eq!(err.to_string(), "Invalid argument: expected KEY=VALUE, got 'baud'");
    }

    #[test]
    fn test_conversions_keep_source() {
        let err: AppError = PortError::NotOpen.into();
        assert!(matches!(err, AppError::Port(PortError::NotOpen)));
        assert!(err.source().is_some());

        let err: AppError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
