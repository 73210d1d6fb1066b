//! MDIO access through the bridge
//!
//! This module is the host-side driver: it turns "read/write PHY register"
//! into the bridge's register protocol. A transaction is started by a bus
//! write (control with bit 15 set for reads, write-data for writes), and
//! completion is observed by polling the status register.
//!
//! The bridge silently drops a start that arrives while it is busy or while
//! the serializer is not ready. Since the driver always waits for `busy` to
//! clear before starting, the first status poll after a start tells the two
//! cases apart: an accepted start always shows busy there, a dropped one
//! does not. Dropped starts are re-issued up to [`DriverConfig::retries`]
//! times.

use embedded_hal::delay::DelayNs;

use crate::config::DriverConfig;
use crate::error::{ConfigError, IoError, Result};
use crate::hal::bus::BusMaster;
use crate::internal::constants::{MAX_PHY_ADDR, MAX_REG_ADDR};
use crate::register::{ControlRegister, RegisterAddress, StatusRegister};

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// This trait can be implemented by different backends, allowing
/// PHY helpers to work with various MDIO implementations.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if a management transaction is in progress
    fn is_busy(&mut self) -> Result<bool>;
}

/// Validate a PHY/register address pair
pub fn check_address(phy_addr: u8, reg_addr: u8) -> Result<()> {
    if phy_addr > MAX_PHY_ADDR {
        return Err(ConfigError::InvalidPhyAddress.into());
    }
    if reg_addr > MAX_REG_ADDR {
        return Err(ConfigError::InvalidRegisterAddress.into());
    }
    Ok(())
}

// =============================================================================
// Bridge MDIO Driver
// =============================================================================

/// Outcome of the first status poll after a start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Started {
    Accepted,
    Dropped,
}

/// MDIO driver for a PHY bank behind the bridge
///
/// Generic over the bus used to reach the bridge registers and the delay
/// used between status polls.
///
/// # Timing Requirement
///
/// Drop detection reads status once right after the start write and treats
/// "not busy" as a dropped start. This is only sound while a management
/// transaction outlasts that one status read, which holds for any real MDIO
/// frame (at least 32 MDC periods). A transaction that completes before the
/// first status read looks dropped and is issued again: harmless for reads
/// of plain registers, but a write is repeated and a clear-on-read register
/// loses its first value.
#[derive(Debug)]
pub struct BridgeMdio<B: BusMaster, D: DelayNs> {
    bus: B,
    delay: D,
    config: DriverConfig,
}

impl<B: BusMaster, D: DelayNs> BridgeMdio<B, D> {
    /// Create a driver with the default polling policy
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            config: DriverConfig::new(),
        }
    }

    /// Create a driver with a custom polling policy
    pub fn with_config(bus: B, delay: D, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { bus, delay, config })
    }

    /// Active polling policy
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Underlying bus, mutably
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the bus and delay
    pub fn into_inner(self) -> (B, D) {
        (self.bus, self.delay)
    }

    fn status(&mut self) -> Result<StatusRegister> {
        Ok(StatusRegister::from_bits(
            self.bus.read(RegisterAddress::Status)?,
        ))
    }

    /// Poll until busy clears
    fn wait_not_busy(&mut self) -> Result<()> {
        for _ in 0..self.config.max_polls() {
            if !self.status()?.busy {
                return Ok(());
            }
            self.delay.delay_us(self.config.poll_interval_us);
        }
        if self.status()?.busy {
            #[cfg(feature = "defmt")]
            defmt::warn!("bridge busy after {} us", self.config.timeout_us);
            return Err(IoError::Timeout.into());
        }
        Ok(())
    }

    /// Issue a start and classify it from the first status poll
    fn start(&mut self, addr: RegisterAddress, value: u16) -> Result<Started> {
        self.bus.write(addr, value)?;
        if self.status()?.busy {
            Ok(Started::Accepted)
        } else {
            Ok(Started::Dropped)
        }
    }

    /// Start a transaction, re-issuing dropped starts, and wait for it
    fn run(&mut self, addr: RegisterAddress, value: u16) -> Result<()> {
        for _attempt in 0..=self.config.retries {
            match self.start(addr, value)? {
                Started::Accepted => return self.wait_not_busy(),
                Started::Dropped => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("start on {} dropped (attempt {})", addr, _attempt);
                    self.delay.delay_us(self.config.poll_interval_us);
                }
            }
        }
        Err(IoError::TriggerDropped.into())
    }
}

impl<B: BusMaster, D: DelayNs> MdioBus for BridgeMdio<B, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        check_address(phy_addr, reg_addr)?;
        self.wait_not_busy()?;

        let command = ControlRegister::new(phy_addr, reg_addr).read_command();
        self.run(RegisterAddress::Control, command)?;

        let value = self.bus.read(RegisterAddress::ReadData)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("mdio read phy {} reg {} = {:#06x}", phy_addr, reg_addr, value);
        Ok(value)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        check_address(phy_addr, reg_addr)?;
        self.wait_not_busy()?;

        // Target first; a control write without bit 15 starts nothing
        let target = ControlRegister::new(phy_addr, reg_addr).bits();
        self.bus.write(RegisterAddress::Control, target)?;
        self.run(RegisterAddress::WriteData, value)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("mdio write phy {} reg {} = {:#06x}", phy_addr, reg_addr, value);
        Ok(())
    }

    fn is_busy(&mut self) -> Result<bool> {
        Ok(self.status()?.busy)
    }
}

// =============================================================================
// PHY Register Definitions (IEEE 802.3 standard registers)
// =============================================================================

/// Standard PHY register addresses (IEEE 802.3 Clause 22)
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u8 = 0;
    /// Basic Mode Status Register
    pub const BMSR: u8 = 1;
    /// PHY Identifier 1
    pub const PHYIDR1: u8 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u8 = 3;
}

/// BMCR (Basic Mode Control Register) bits
pub mod bmcr {
    /// Soft reset
    pub const RESET: u16 = 1 << 15;
    /// Speed select (100 Mbps if set)
    pub const SPEED_100: u16 = 1 << 13;
    /// Auto-negotiation enable
    pub const AN_ENABLE: u16 = 1 << 12;
    /// Isolate
    pub const ISOLATE: u16 = 1 << 10;
    /// Restart auto-negotiation
    pub const AN_RESTART: u16 = 1 << 9;
    /// Duplex mode (full duplex if set)
    pub const DUPLEX_FULL: u16 = 1 << 8;
}

/// BMSR (Basic Mode Status Register) bits
pub mod bmsr {
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 5;
    /// Auto-negotiation ability
    pub const AN_ABILITY: u16 = 1 << 3;
    /// Link status
    pub const LINK_STATUS: u16 = 1 << 2;
}

// =============================================================================
// PHY Helper Functions
// =============================================================================

/// PHY status information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyStatus {
    /// Link is up
    pub link_up: bool,
    /// Auto-negotiation complete
    pub an_complete: bool,
    /// Speed (true = 100 Mbps, false = 10 Mbps)
    pub speed_100: bool,
    /// Duplex (true = full, false = half)
    pub full_duplex: bool,
}

/// Read PHY status from standard registers
pub fn read_phy_status<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyStatus> {
    let bmsr = mdio.read(phy_addr, phy_reg::BMSR)?;
    let bmcr = mdio.read(phy_addr, phy_reg::BMCR)?;

    Ok(PhyStatus {
        link_up: (bmsr & bmsr::LINK_STATUS) != 0,
        an_complete: (bmsr & bmsr::AN_COMPLETE) != 0,
        speed_100: (bmcr & bmcr::SPEED_100) != 0,
        full_duplex: (bmcr & bmcr::DUPLEX_FULL) != 0,
    })
}

/// Perform a soft reset on the PHY
pub fn reset_phy<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
    mdio.write(phy_addr, phy_reg::BMCR, bmcr::RESET)
}

/// Read the PHY identifier
pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
    let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)? as u32;
    let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)? as u32;
    Ok((id1 << 16) | id2)
}

/// Enable auto-negotiation on the PHY
pub fn enable_auto_negotiation<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
    let bmcr = mdio.read(phy_addr, phy_reg::BMCR)?;
    mdio.write(
        phy_addr,
        phy_reg::BMCR,
        (bmcr | bmcr::AN_ENABLE | bmcr::AN_RESTART) & !bmcr::ISOLATE,
    )
}

/// Scan the bank for PHYs that answer
///
/// An absent PHY never drives MDIO, so its identifier reads as all ones.
/// Returns a bitmask with bit `n` set when PHY `n` responded.
pub fn scan_phys<M: MdioBus>(mdio: &mut M) -> Result<u8> {
    let mut found = 0u8;
    for phy_addr in 0..=MAX_PHY_ADDR {
        if mdio.read(phy_addr, phy_reg::PHYIDR1)? != 0xFFFF {
            found |= 1 << phy_addr;
        }
    }
    Ok(found)
}

// =============================================================================
// Unit Tests
// =============================================================================
