//! Bridge register file
//!
//! The bus side of the bridge exposes four 16-bit registers selected by a
//! 2-bit word address:
//!
//! | Addr | Register   | Access | Layout                                     |
//! |------|------------|--------|--------------------------------------------|
//! | 0    | Status     | RO     | bit 0 = busy, bits 15:1 = 0                |
//! | 1    | Control    | RW     | bit 15 = read start, 7:5 = PHY, 4:0 = reg  |
//! | 2    | Read-Data  | RO     | last value read from the management bus    |
//! | 3    | Write-Data | RW     | value sent by the next write transaction   |
//!
//! Writes to the read-only registers are accepted and acknowledged like any
//! other write but leave the register unchanged.

pub mod control;

pub use control::{ControlRegister, StatusRegister};

use crate::internal::constants::{
    ADDR_MASK, CONTROL_ADDR, READ_DATA_ADDR, STATUS_ADDR, WRITE_DATA_ADDR,
};

// =============================================================================
// Address Decode
// =============================================================================

/// Register select decoded from the 2-bit bus address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RegisterAddress {
    /// Status register (read-only)
    #[default]
    Status = STATUS_ADDR,
    /// Control register
    Control = CONTROL_ADDR,
    /// Read-data register (read-only)
    ReadData = READ_DATA_ADDR,
    /// Write-data register
    WriteData = WRITE_DATA_ADDR,
}

impl RegisterAddress {
    /// All register addresses in map order
    pub const ALL: [RegisterAddress; 4] = [
        RegisterAddress::Status,
        RegisterAddress::Control,
        RegisterAddress::ReadData,
        RegisterAddress::WriteData,
    ];

    /// Decode a bus address. Only the low two bits are significant.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & ADDR_MASK {
            STATUS_ADDR => RegisterAddress::Status,
            CONTROL_ADDR => RegisterAddress::Control,
            READ_DATA_ADDR => RegisterAddress::ReadData,
            _ => RegisterAddress::WriteData,
        }
    }

    /// Word index of this register
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Whether bus writes to this register are ignored
    pub const fn is_read_only(self) -> bool {
        matches!(self, RegisterAddress::Status | RegisterAddress::ReadData)
    }
}

// =============================================================================
// Register File
// =============================================================================

/// The four bridge registers
///
/// Plain value type: the bridge keeps one as its committed state and builds
/// the next one from a copy each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterFile {
    /// Status register
    pub status: StatusRegister,
    /// Control register
    pub control: ControlRegister,
    /// Last value read from the management bus
    pub read_data: u16,
    /// Value to send on the next write transaction
    pub write_data: u16,
}

impl RegisterFile {
    /// Register contents at reset (busy set, everything else zero)
    pub const fn reset() -> Self {
        Self {
            status: StatusRegister::reset(),
            control: ControlRegister::new(0, 0),
            read_data: 0,
            write_data: 0,
        }
    }

    /// Read a register as seen from the bus
    pub const fn read(&self, addr: RegisterAddress) -> u16 {
        match addr {
            RegisterAddress::Status => self.status.bits(),
            RegisterAddress::Control => self.control.bits(),
            RegisterAddress::ReadData => self.read_data,
            RegisterAddress::WriteData => self.write_data,
        }
    }

    /// Apply a bus write
    ///
    /// Returns `false` when the target is read-only and the write was ignored.
    pub fn write(&mut self, addr: RegisterAddress, value: u16) -> bool {
        match addr {
            RegisterAddress::Status | RegisterAddress::ReadData => false,
            RegisterAddress::Control => {
                self.control = ControlRegister::from_bits(value);
                true
            }
            RegisterAddress::WriteData => {
                self.write_data = value;
                true
            }
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::reset()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
