//! ISR-safe bridge wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::bridge::{Bridge, BusInputs, BusOutputs, SerializerInputs, SerializerOutputs};

/// ISR-safe bridge wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure. A tick is one critical section, so an
/// observer never sees a half-committed state.
///
/// # Example
///
/// ```ignore
/// static BRIDGE: SharedBridge = SharedBridge::new();
///
/// let stats = BRIDGE.with(|bridge| bridge.stats());
/// ```
pub struct SharedBridge {
    inner: CriticalSectionCell<Bridge>,
}

impl SharedBridge {
    /// Create a bridge fresh out of reset (const, suitable for static initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(Bridge::new()),
        }
    }

    /// Execute a closure with exclusive access to the bridge.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Bridge) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Bridge) -> R,
    {
        self.inner.try_with(f)
    }

    /// Advance the bridge one tick.
    pub fn tick(
        &self,
        bus_in: &BusInputs,
        serializer_in: &SerializerInputs,
    ) -> (BusOutputs, SerializerOutputs) {
        self.inner.with(|bridge| bridge.tick(bus_in, serializer_in))
    }

    /// Copy of the current bridge state.
    pub fn snapshot(&self) -> Bridge {
        self.inner.with_ref(|bridge| *bridge)
    }

    /// Return the bridge to its reset state.
    pub fn reset(&self) {
        self.inner.with(Bridge::reset);
    }
}

impl Default for SharedBridge {
    fn default() -> Self {
        Self::new()
    }
}
