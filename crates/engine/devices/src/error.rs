//! Error types for the devices crate

use thiserror::Error;

/// Result type alias for device operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when parsing device signal values
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// Connection type string not recognised
    #[error("Unknown effective connection type: {0}")]
    UnknownConnectionType(String),

    /// Battery level outside 0.0..=1.0 or not a number
    #[error("Invalid battery level: {0}")]
    InvalidBatteryLevel(f32),
}
