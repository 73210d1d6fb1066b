//! Error types for the MDIO bridge
//!
//! The bridge core itself never fails: dropped triggers, ignored writes and
//! stalls are part of its register semantics. Errors only arise in the
//! software layered on top of it, organized by domain:
//! - [`ConfigError`]: Invalid addresses or configuration values
//! - [`IoError`]: Runtime failures while driving the bridge
//!
//! The unified [`Error`] enum wraps both and is returned by the host driver
//! and bus adapters.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and argument errors
///
/// These errors are raised before any bus access takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid PHY address (must be 0-7)
    InvalidPhyAddress,
    /// Invalid PHY register address (must be 0-31)
    InvalidRegisterAddress,
    /// Invalid configuration parameter
    InvalidConfig,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidRegisterAddress => "invalid register address",
            ConfigError::InvalidConfig => "invalid configuration",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime errors while driving the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Busy did not clear within the configured timeout
    Timeout,
    /// The bridge kept dropping the start pulse and retries ran out
    TriggerDropped,
    /// A bus access was never acknowledged
    BusStall,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::TriggerDropped => "transaction trigger dropped",
            IoError::BusStall => "bus access not acknowledged",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidPhyAddress)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for bridge operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn config_error_display() {
        assert_eq!(format!("{}", ConfigError::InvalidPhyAddress), "invalid PHY address");
        assert_eq!(
            format!("{}", ConfigError::InvalidRegisterAddress),
            "invalid register address"
        );
    }

    #[test]
    fn io_error_display() {
        assert_eq!(format!("{}", IoError::Timeout), "operation timed out");
        assert_eq!(format!("{}", IoError::TriggerDropped), "transaction trigger dropped");
        assert_eq!(format!("{}", IoError::BusStall), "bus access not acknowledged");
    }

    #[test]
    fn unified_error_prefixes_domain() {
        let err: Error = IoError::Timeout.into();
        assert_eq!(format!("{err}"), "io: operation timed out");

        let err: Error = ConfigError::InvalidConfig.into();
        assert_eq!(format!("{err}"), "config: invalid configuration");
    }

    #[test]
    fn from_conversions_preserve_variant() {
        assert_eq!(
            Error::from(ConfigError::InvalidPhyAddress),
            Error::Config(ConfigError::InvalidPhyAddress)
        );
        assert_eq!(Error::from(IoError::BusStall), Error::Io(IoError::BusStall));
    }
}
