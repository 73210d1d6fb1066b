//! Status and control register layouts

use crate::internal::constants::{
    CONTROL_PHY_MASK, CONTROL_PHY_SHIFT, CONTROL_READ_START, CONTROL_REG_MASK, STATUS_BUSY,
};

// =============================================================================
// Status Register
// =============================================================================

/// Status register (address 0)
///
/// Only bit 0 is implemented. It is a registered copy of "management state is
/// not idle" and comes out of reset set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusRegister {
    /// A management transaction is in flight
    pub busy: bool,
}

impl StatusRegister {
    /// Value at reset: busy is set until the first clock edge
    pub const fn reset() -> Self {
        Self { busy: true }
    }

    /// Bus-visible register word
    pub const fn bits(&self) -> u16 {
        if self.busy { STATUS_BUSY } else { 0 }
    }

    /// Decode a status word read from the bus
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            busy: bits & STATUS_BUSY != 0,
        }
    }
}

// =============================================================================
// Control Register
// =============================================================================

/// Control register (address 1)
///
/// Holds the target of the next management transaction. Bit 15 (read start)
/// is a write-only pulse: it fires the read trigger during the bus write and
/// is never stored, so it always reads back as zero. Bits 14:8 are reserved
/// and read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRegister {
    phy_address: u8,
    reg_address: u8,
}

impl ControlRegister {
    /// Build a control value. Out-of-range fields are truncated to their width.
    pub const fn new(phy_address: u8, reg_address: u8) -> Self {
        Self {
            phy_address: phy_address & CONTROL_PHY_MASK as u8,
            reg_address: reg_address & CONTROL_REG_MASK as u8,
        }
    }

    /// Decode the stored fields from a written bus word
    pub const fn from_bits(bits: u16) -> Self {
        Self::new(
            ((bits >> CONTROL_PHY_SHIFT) & CONTROL_PHY_MASK) as u8,
            (bits & CONTROL_REG_MASK) as u8,
        )
    }

    /// Bus-visible register word (read start and reserved bits read as zero)
    pub const fn bits(&self) -> u16 {
        ((self.phy_address as u16) << CONTROL_PHY_SHIFT) | self.reg_address as u16
    }

    /// Word to write to start a management read of this target
    pub const fn read_command(&self) -> u16 {
        self.bits() | CONTROL_READ_START
    }

    /// Whether a written control word requests a read
    pub const fn is_read_start(bits: u16) -> bool {
        bits & CONTROL_READ_START != 0
    }

    /// PHY address (3 bits)
    pub const fn phy_address(&self) -> u8 {
        self.phy_address
    }

    /// PHY register address (5 bits)
    pub const fn reg_address(&self) -> u8 {
        self.reg_address
    }

    /// Payload of the serializer target channel: PHY address in bits 7:5,
    /// register address in bits 4:0
    pub const fn target(&self) -> u8 {
        (self.phy_address << CONTROL_PHY_SHIFT) | self.reg_address
    }
}
