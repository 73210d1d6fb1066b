//! Testing utilities and mock implementations
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::VecDeque;
use std::vec::Vec;

use crate::error::{IoError, Result};
use crate::hal::bus::BusMaster;
use crate::register::RegisterAddress;

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay that records the total time requested
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Reset the delay counter
    pub fn reset(&self) {
        *self.total_ns.borrow_mut() = 0;
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Scripted Bus
// =============================================================================

/// One bus access seen by [`ScriptedBus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(RegisterAddress),
    Write(RegisterAddress, u16),
}

/// Bus master that records every access and replays scripted status words
///
/// Status reads pop from the script (0 once it runs dry); other reads return
/// the last value written or set for that address. No bridge behavior is
/// modeled, which makes it useful for checking the driver's access sequence.
#[derive(Debug, Default)]
pub struct ScriptedBus {
    registers: [u16; 4],
    status: VecDeque<u16>,
    log: Vec<Access>,
    fail_after: Option<usize>,
}

impl ScriptedBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue status words for upcoming status reads
    pub fn push_status(&mut self, words: &[u16]) {
        self.status.extend(words.iter().copied());
    }

    pub fn set_register(&mut self, addr: RegisterAddress, value: u16) {
        self.registers[addr.index() as usize] = value;
    }

    /// Fail every access after the first `accesses` with a bus stall
    pub fn fail_after(&mut self, accesses: usize) {
        self.fail_after = Some(accesses);
    }

    pub fn log(&self) -> &[Access] {
        &self.log
    }

    fn check(&self) -> Result<()> {
        match self.fail_after {
            Some(n) if self.log.len() >= n => Err(IoError::BusStall.into()),
            _ => Ok(()),
        }
    }
}

impl BusMaster for ScriptedBus {
    fn read(&mut self, addr: RegisterAddress) -> Result<u16> {
        self.check()?;
        self.log.push(Access::Read(addr));
        Ok(match addr {
            RegisterAddress::Status => self.status.pop_front().unwrap_or(0),
            _ => self.registers[addr.index() as usize],
        })
    }

    fn write(&mut self, addr: RegisterAddress, value: u16) -> Result<()> {
        self.check()?;
        self.log.push(Access::Write(addr, value));
        self.registers[addr.index() as usize] = value;
        Ok(())
    }
}

// =============================================================================
// Tests for Test Utilities
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_delay_accumulates() {
        let mut delay = MockDelay::new();

        embedded_hal::delay::DelayNs::delay_ns(&mut delay, 1000);
        embedded_hal::delay::DelayNs::delay_us(&mut delay, 2);
        assert_eq!(delay.total_ns(), 3000);

        delay.reset();
        assert_eq!(delay.total_ns(), 0);
    }

    #[test]
    fn scripted_bus_replays_status() {
        let mut bus = ScriptedBus::new();
        bus.push_status(&[1, 1]);
        assert_eq!(bus.read(RegisterAddress::Status).unwrap(), 1);
        assert_eq!(bus.read(RegisterAddress::Status).unwrap(), 1);
        assert_eq!(bus.read(RegisterAddress::Status).unwrap(), 0);
    }

    #[test]
    fn scripted_bus_records_and_stores() {
        let mut bus = ScriptedBus::new();
        bus.write(RegisterAddress::WriteData, 0x55AA).unwrap();
        assert_eq!(bus.read(RegisterAddress::WriteData).unwrap(), 0x55AA);
        assert_eq!(
            bus.log(),
            &[
                Access::Write(RegisterAddress::WriteData, 0x55AA),
                Access::Read(RegisterAddress::WriteData),
            ]
        );
    }

    #[test]
    fn scripted_bus_fails_on_demand() {
        let mut bus = ScriptedBus::new();
        bus.fail_after(0);
        assert!(bus.read(RegisterAddress::Status).is_err());
        assert!(bus.log().is_empty());
    }
}
