//! Single-slot ready/valid channel
//!
//! Models one handshake link between the bridge and the external serializer.
//! The consumer drives `ready`; the producer offers an item with
//! [`Channel::try_send`], which only succeeds while the consumer is ready and
//! the slot is empty. An item stays in the slot, unchanged, until the consumer
//! takes it with [`Channel::try_receive`], so it can be neither lost nor
//! consumed twice.
//!
//! Nothing here blocks: every operation reports whether it took effect this
//! step and leaves retry policy to the caller.

/// Single-item producer/consumer channel with backpressure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel<T> {
    slot: Option<T>,
    ready: bool,
}

impl<T: Copy> Channel<T> {
    /// Create an empty channel whose consumer is ready
    pub const fn new() -> Self {
        Self {
            slot: None,
            ready: true,
        }
    }

    // =========================================================================
    // Producer Side
    // =========================================================================

    /// Whether an item offered now would be accepted
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        self.ready && self.slot.is_none()
    }

    /// Offer an item. Returns `false` (and keeps nothing) when not ready.
    pub fn try_send(&mut self, value: T) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.slot = Some(value);
        true
    }

    // =========================================================================
    // Consumer Side
    // =========================================================================

    /// Drive the consumer's ready signal
    #[inline(always)]
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Whether an item is waiting in the slot
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.slot.is_some()
    }

    /// Look at the waiting item without consuming it
    #[inline(always)]
    pub fn peek(&self) -> Option<T> {
        self.slot
    }

    /// Take the waiting item, if any
    pub fn try_receive(&mut self) -> Option<T> {
        self.slot.take()
    }
}

impl<T: Copy> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}
