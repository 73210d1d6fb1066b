//! Configuration types for the host driver and serializer model

use crate::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    DEFAULT_CLOCK_DIVIDER, DEFAULT_POLL_INTERVAL_US, DEFAULT_RETRIES, DEFAULT_TIMEOUT_US,
    MDIO_FRAME_BITS, MDIO_PREAMBLE_BITS,
};

// =============================================================================
// Host Driver Configuration
// =============================================================================

/// Polling policy of the host driver
///
/// The bridge never times out on its own; this is where software decides how
/// long to wait for `busy` and how often to re-fire a dropped trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// Give up waiting for busy to clear after this long
    pub timeout_us: u32,
    /// Delay between status polls
    pub poll_interval_us: u32,
    /// Re-triggers allowed after the bridge drops a start pulse
    pub retries: u8,
}

impl DriverConfig {
    /// Create a configuration with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout_us: DEFAULT_TIMEOUT_US,
            poll_interval_us: DEFAULT_POLL_INTERVAL_US,
            retries: DEFAULT_RETRIES,
        }
    }

    /// Set the busy timeout
    #[must_use]
    pub const fn with_timeout_us(mut self, timeout_us: u32) -> Self {
        self.timeout_us = timeout_us;
        self
    }

    /// Set the delay between status polls
    #[must_use]
    pub const fn with_poll_interval_us(mut self, poll_interval_us: u32) -> Self {
        self.poll_interval_us = poll_interval_us;
        self
    }

    /// Set the number of re-triggers
    #[must_use]
    pub const fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    /// Number of status polls that fit in the timeout
    pub const fn max_polls(&self) -> u32 {
        if self.poll_interval_us == 0 {
            0
        } else {
            self.timeout_us / self.poll_interval_us
        }
    }

    /// Check the configuration is usable
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.poll_interval_us == 0 || self.poll_interval_us > self.timeout_us {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Serializer Model Configuration
// =============================================================================

/// Timing of the behavioral serializer
///
/// A transaction occupies the serializer for one MDC period per frame bit,
/// where one MDC period is `clock_divider` bridge ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerializerConfig {
    /// Bridge ticks per MDC period
    pub clock_divider: u16,
    /// Send a 32-bit preamble before each frame
    pub preamble: bool,
}

impl SerializerConfig {
    /// Create a configuration with default values
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock_divider: DEFAULT_CLOCK_DIVIDER,
            preamble: true,
        }
    }

    /// Set the MDC clock divider
    #[must_use]
    pub const fn with_clock_divider(mut self, clock_divider: u16) -> Self {
        self.clock_divider = clock_divider;
        self
    }

    /// Enable or disable the preamble (preamble suppression when `false`)
    #[must_use]
    pub const fn with_preamble(mut self, preamble: bool) -> Self {
        self.preamble = preamble;
        self
    }

    /// Frame length in MDC periods
    pub const fn frame_bits(&self) -> u32 {
        if self.preamble {
            MDIO_FRAME_BITS + MDIO_PREAMBLE_BITS
        } else {
            MDIO_FRAME_BITS
        }
    }

    /// Ticks the serializer stays busy per transaction
    pub const fn latency_ticks(&self) -> u32 {
        self.frame_bits() * self.clock_divider as u32
    }

    /// Check the configuration is usable
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.clock_divider == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self::new()
    }
}
