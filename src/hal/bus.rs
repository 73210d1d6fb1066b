//! Host bus access to the bridge register file
//!
//! The host driver talks to the bridge through [`BusMaster`], a word-wide
//! read/write interface over the four register addresses. Two backends are
//! provided:
//!
//! - [`MmioBus`]: the bridge mapped into the host address space
//! - [`Testbench`](crate::sim::Testbench): the cycle-level model

use crate::error::Result;
use crate::register::RegisterAddress;

// =============================================================================
// Bus Master Trait
// =============================================================================

/// Trait for issuing bus-slave transactions to the bridge
///
/// One call is one complete request/acknowledge exchange.
pub trait BusMaster {
    /// Read a bridge register
    fn read(&mut self, addr: RegisterAddress) -> Result<u16>;

    /// Write a bridge register
    fn write(&mut self, addr: RegisterAddress, value: u16) -> Result<()>;
}

impl<B: BusMaster + ?Sized> BusMaster for &mut B {
    fn read(&mut self, addr: RegisterAddress) -> Result<u16> {
        (**self).read(addr)
    }

    fn write(&mut self, addr: RegisterAddress, value: u16) -> Result<()> {
        (**self).write(addr, value)
    }
}

// =============================================================================
// Memory-Mapped Backend
// =============================================================================

/// Default distance between register words in the host address space
pub const DEFAULT_MMIO_STRIDE: usize = 4;

/// Bridge register window mapped into the host address space
///
/// Each register occupies one 32-bit slot at `base + index * stride`; only
/// the low 16 bits are significant. All access is volatile.
#[derive(Debug)]
pub struct MmioBus {
    base: usize,
    stride: usize,
}

impl MmioBus {
    /// Create an accessor for a register window
    ///
    /// # Safety
    ///
    /// `base` must point to the bridge register window (or memory standing in
    /// for it), valid for volatile 32-bit reads and writes at every
    /// `base + index * stride` for index 0-3, aligned to 4 bytes, for the
    /// lifetime of the returned value.
    pub const unsafe fn new(base: usize, stride: usize) -> Self {
        Self { base, stride }
    }

    /// Window base address
    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline(always)]
    fn addr_of(&self, addr: RegisterAddress) -> usize {
        self.base + addr.index() as usize * self.stride
    }
}

impl BusMaster for MmioBus {
    fn read(&mut self, addr: RegisterAddress) -> Result<u16> {
        // SAFETY: validity of the window is guaranteed by the caller of `new`
        let word = unsafe { core::ptr::read_volatile(self.addr_of(addr) as *const u32) };
        Ok((word & 0xFFFF) as u16)
    }

    fn write(&mut self, addr: RegisterAddress, value: u16) -> Result<()> {
        // SAFETY: validity of the window is guaranteed by the caller of `new`
        unsafe { core::ptr::write_volatile(self.addr_of(addr) as *mut u32, value as u32) };
        Ok(())
    }
}
