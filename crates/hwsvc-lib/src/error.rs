//! Unified error type for the hwsvc-lib crate.
//!
//! [`HwsvcError`] wraps the driver error (`DriverError`) and the
//! domain-specific error kinds (`Config`, `Color`, `PermissionDenied`, `Telephony`).
//! `From` impls allow `?` to propagate across module boundaries.

use std::fmt;

use crate::driver::DriverError;

/// Unified error type for hwsvc-lib operations.
#[derive(Debug)]
pub enum HwsvcError {
    /// Light driver error (missing LED node, failed write).
    Driver(DriverError),
    /// Standard I/O error (config persistence, property files).
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// Color parsing error.
    Color(String),
    /// Caller lacks the permission required for the operation.
    PermissionDenied(String),
    /// Phone wiring or dialing error.
    Telephony(String),
}

impl fmt::Display for HwsvcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HwsvcError::Driver(e) => write!(f, "{e}"),
            HwsvcError::Io(e) => write!(f, "I/O error: {e}"),
            HwsvcError::Config(e) => write!(f, "Config error: {e}"),
            HwsvcError::Color(e) => write!(f, "Color error: {e}"),
            HwsvcError::PermissionDenied(e) => write!(f, "Permission denied: {e}"),
            HwsvcError::Telephony(e) => write!(f, "Telephony error: {e}"),
        }
    }
}

impl std::error::Error for HwsvcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HwsvcError::Driver(e) => Some(e),
            HwsvcError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DriverError> for HwsvcError {
    fn from(e: DriverError) -> Self {
        HwsvcError::Driver(e)
    }
}

impl From<std::io::Error> for HwsvcError {
    fn from(e: std::io::Error) -> Self {
        HwsvcError::Io(e)
    }
}

/// Crate-level Result alias using [`HwsvcError`].
pub type Result<T> = std::result::Result<T, HwsvcError>;
