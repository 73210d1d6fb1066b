//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! throughout the bridge model, host driver and testbench.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Register map**: word addresses of the four bridge registers
//! - **Register fields**: bit positions and masks inside those words
//! - **Address limits**: valid PHY and PHY-register address ranges
//! - **Timing**: driver timeouts, polling intervals and retry counts
//! - **Frame geometry**: MDIO frame lengths used by the serializer model

// =============================================================================
// Register Map
// =============================================================================

/// Status register word address (read-only)
pub const STATUS_ADDR: u8 = 0;

/// Control register word address
pub const CONTROL_ADDR: u8 = 1;

/// Read-data register word address (read-only)
pub const READ_DATA_ADDR: u8 = 2;

/// Write-data register word address
pub const WRITE_DATA_ADDR: u8 = 3;

/// Mask applied to incoming bus addresses (2-bit register select)
pub const ADDR_MASK: u8 = 0b11;

// =============================================================================
// Register Fields
// =============================================================================

/// Status: management transaction in flight
pub const STATUS_BUSY: u16 = 1 << 0;

/// Control: start a management read (write-pulsed, reads back as zero)
pub const CONTROL_READ_START: u16 = 1 << 15;

/// Control: PHY address field shift (bits 7:5)
pub const CONTROL_PHY_SHIFT: u16 = 5;

/// Control: PHY address field mask (after shifting)
pub const CONTROL_PHY_MASK: u16 = 0x7;

/// Control: register address field mask (bits 4:0)
pub const CONTROL_REG_MASK: u16 = 0x1F;

// =============================================================================
// Address Limits
// =============================================================================

/// Maximum PHY address reachable through the control register (3-bit field)
pub const MAX_PHY_ADDR: u8 = 7;

/// Maximum PHY register address (5-bit field, IEEE 802.3 Clause 22)
pub const MAX_REG_ADDR: u8 = 31;

/// Number of PHY addresses modeled by the serializer
pub const PHY_COUNT: usize = MAX_PHY_ADDR as usize + 1;

/// Number of registers per PHY
pub const PHY_REG_COUNT: usize = MAX_REG_ADDR as usize + 1;

// =============================================================================
// Timing
// =============================================================================

/// Default host driver timeout waiting for busy to clear, in microseconds
pub const DEFAULT_TIMEOUT_US: u32 = 1_000;

/// Default interval between status polls, in microseconds
pub const DEFAULT_POLL_INTERVAL_US: u32 = 10;

/// Default number of re-triggers after the bridge drops a start pulse
pub const DEFAULT_RETRIES: u8 = 3;

/// Ticks a testbench bus access may hold strobe before giving up on ack
pub const BUS_ACK_TIMEOUT_TICKS: u32 = 4;

// =============================================================================
// Frame Geometry
// =============================================================================

/// Clause 22 frame length without preamble (ST, OP, PHYAD, REGAD, TA, DATA)
pub const MDIO_FRAME_BITS: u32 = 32;

/// Preamble length (all ones) sent ahead of each frame
pub const MDIO_PREAMBLE_BITS: u32 = 32;

/// Default serializer clock divider (system ticks per MDC period)
pub const DEFAULT_CLOCK_DIVIDER: u16 = 1;
