//! Behavioral model of the external MDIO serializer
//!
//! Stands in for the component that actually clocks MDC/MDIO. It honors the
//! channel contract the bridge relies on and nothing more: a job is taken from
//! the target channel (together with the write-data channel for writes), both
//! outbound channels are held not-ready for the frame duration, and a read
//! result is offered on the read-data channel until the bridge accepts it.
//!
//! Behind it sits a bank of up to eight Clause 22 PHYs with 32 registers each.
//! An absent PHY never drives MDIO, so reads from it return `0xFFFF`.

use crate::channel::Channel;
use crate::config::SerializerConfig;
use crate::internal::constants::{
    CONTROL_PHY_MASK, CONTROL_PHY_SHIFT, CONTROL_REG_MASK, PHY_COUNT, PHY_REG_COUNT,
};

/// Value read back when no PHY answers (MDIO idles high)
pub const ABSENT_PHY_VALUE: u16 = 0xFFFF;

// =============================================================================
// Transactions
// =============================================================================

/// Direction of a management transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    /// Register read
    Read,
    /// Register write
    Write,
}

/// A completed management transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transaction {
    /// Read or write
    pub operation: Operation,
    /// PHY address (0-7)
    pub phy: u8,
    /// Register address (0-31)
    pub reg: u8,
    /// Value read or written
    pub value: u16,
}

/// Split a target channel payload into PHY and register address
pub const fn decode_target(target: u8) -> (u8, u8) {
    (
        (target >> CONTROL_PHY_SHIFT) & CONTROL_PHY_MASK as u8,
        target & CONTROL_REG_MASK as u8,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Shifting { job: Transaction, remaining: u32 },
    Presenting { job: Transaction },
}

// =============================================================================
// Serializer Model
// =============================================================================

/// Behavioral serializer with an attached PHY register bank
#[derive(Debug, Clone)]
pub struct SerializerModel {
    config: SerializerConfig,
    phys: [[u16; PHY_REG_COUNT]; PHY_COUNT],
    present: [bool; PHY_COUNT],
    phase: Phase,
    responsive: bool,
    accepting: bool,
    hold_off: u32,
    completed: u32,
    last: Option<Transaction>,
}

impl SerializerModel {
    /// Create a model with all PHYs present and all registers zero
    pub const fn new(config: SerializerConfig) -> Self {
        Self {
            config,
            phys: [[0; PHY_REG_COUNT]; PHY_COUNT],
            present: [true; PHY_COUNT],
            phase: Phase::Idle,
            responsive: true,
            accepting: true,
            hold_off: 0,
            completed: 0,
            last: None,
        }
    }

    /// Model timing
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    // =========================================================================
    // PHY Bank
    // =========================================================================

    /// Set a PHY register directly (test setup)
    pub fn set_register(&mut self, phy: u8, reg: u8, value: u16) {
        if let Some(slot) = self.slot_mut(phy, reg) {
            *slot = value;
        }
    }

    /// Get a PHY register directly (test verification)
    pub fn register(&self, phy: u8, reg: u8) -> Option<u16> {
        self.phys
            .get(phy as usize)
            .and_then(|regs| regs.get(reg as usize))
            .copied()
    }

    /// Attach or detach a PHY
    pub fn set_present(&mut self, phy: u8, present: bool) {
        if let Some(p) = self.present.get_mut(phy as usize) {
            *p = present;
        }
    }

    fn slot_mut(&mut self, phy: u8, reg: u8) -> Option<&mut u16> {
        self.phys
            .get_mut(phy as usize)
            .and_then(|regs| regs.get_mut(reg as usize))
    }

    fn is_present(&self, phy: u8) -> bool {
        self.present.get(phy as usize).copied().unwrap_or(false)
    }

    // =========================================================================
    // Fault Injection
    // =========================================================================

    /// When `false`, a started transaction never finishes
    pub fn set_responsive(&mut self, responsive: bool) {
        self.responsive = responsive;
    }

    /// When `false`, readiness is withheld on both outbound channels
    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    /// Withhold readiness for the next `ticks` ticks
    pub fn hold_off(&mut self, ticks: u32) {
        self.hold_off = ticks;
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Whether a transaction is in progress
    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Transactions completed since creation
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Most recently completed transaction
    pub fn last_transaction(&self) -> Option<Transaction> {
        self.last
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Advance one tick against the three channels
    pub fn tick(
        &mut self,
        target: &mut Channel<u8>,
        write_data: &mut Channel<u16>,
        read_data: &mut Channel<u16>,
    ) {
        let phase = self.phase;
        self.phase = match phase {
            Phase::Idle => match target.try_receive() {
                Some(addr) => {
                    let (phy, reg) = decode_target(addr);
                    let job = match write_data.try_receive() {
                        Some(value) => Transaction {
                            operation: Operation::Write,
                            phy,
                            reg,
                            value,
                        },
                        None => Transaction {
                            operation: Operation::Read,
                            phy,
                            reg,
                            value: 0,
                        },
                    };
                    Phase::Shifting {
                        job,
                        remaining: self.config.latency_ticks(),
                    }
                }
                None => Phase::Idle,
            },
            Phase::Shifting { job, remaining } if !self.responsive => {
                Phase::Shifting { job, remaining }
            }
            Phase::Shifting { job, remaining } if remaining > 1 => Phase::Shifting {
                job,
                remaining: remaining - 1,
            },
            Phase::Shifting { job, .. } => self.finish(job, read_data),
            Phase::Presenting { job } => self.present(job, read_data),
        };

        let held = self.hold_off > 0;
        if held {
            self.hold_off -= 1;
        }
        let ready = self.accepting && !held && !self.is_busy();
        target.set_ready(ready);
        write_data.set_ready(ready);
    }

    fn finish(&mut self, mut job: Transaction, read_data: &mut Channel<u16>) -> Phase {
        match job.operation {
            Operation::Write => {
                if self.is_present(job.phy)
                    && let Some(slot) = self.slot_mut(job.phy, job.reg)
                {
                    *slot = job.value;
                }
                self.complete(job);
                Phase::Idle
            }
            Operation::Read => {
                job.value = if self.is_present(job.phy) {
                    self.register(job.phy, job.reg).unwrap_or(ABSENT_PHY_VALUE)
                } else {
                    ABSENT_PHY_VALUE
                };
                self.present(job, read_data)
            }
        }
    }

    fn present(&mut self, job: Transaction, read_data: &mut Channel<u16>) -> Phase {
        if read_data.try_send(job.value) {
            self.complete(job);
            Phase::Idle
        } else {
            Phase::Presenting { job }
        }
    }

    fn complete(&mut self, job: Transaction) {
        self.completed += 1;
        self.last = Some(job);
        #[cfg(feature = "defmt")]
        defmt::debug!("serializer completed {}", job);
    }
}

impl Default for SerializerModel {
    fn default() -> Self {
        Self::new(SerializerConfig::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels() -> (Channel<u8>, Channel<u16>, Channel<u16>) {
        (Channel::new(), Channel::new(), Channel::new())
    }

    fn fast() -> SerializerConfig {
        SerializerConfig::new().with_preamble(false)
    }

    #[test]
    fn target_decode() {
        assert_eq!(decode_target((5 << 5) | 19), (5, 19));
        assert_eq!(decode_target(0xFF), (7, 31));
    }

    #[test]
    fn read_job_completes_after_latency() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast());
        model.set_register(2, 3, 0xABCD);

        t.try_send((2 << 5) | 3);
        model.tick(&mut t, &mut w, &mut r);
        assert!(model.is_busy());
        assert!(!t.is_ready());
        assert!(!w.is_ready());

        for _ in 0..31 {
            model.tick(&mut t, &mut w, &mut r);
            assert!(!r.is_valid());
        }
        model.tick(&mut t, &mut w, &mut r);
        assert_eq!(r.peek(), Some(0xABCD));
        assert!(!model.is_busy());
        assert!(t.is_ready());
        assert_eq!(model.completed(), 1);
    }

    #[test]
    fn read_result_waits_for_consumer_ready() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast().with_clock_divider(1));
        model.set_register(0, 1, 0x7809);
        r.set_ready(false);

        t.try_send(1);
        for _ in 0..40 {
            model.tick(&mut t, &mut w, &mut r);
        }
        assert!(model.is_busy());
        assert!(!r.is_valid());

        r.set_ready(true);
        model.tick(&mut t, &mut w, &mut r);
        assert_eq!(r.try_receive(), Some(0x7809));
        assert!(!model.is_busy());
    }

    #[test]
    fn write_job_updates_phy_register() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast());

        t.try_send((1 << 5) | 4);
        w.try_send(0x01E1);
        for _ in 0..33 {
            model.tick(&mut t, &mut w, &mut r);
        }
        assert!(!model.is_busy());
        assert!(w.is_ready());
        assert_eq!(model.register(1, 4), Some(0x01E1));
        assert_eq!(
            model.last_transaction(),
            Some(Transaction {
                operation: Operation::Write,
                phy: 1,
                reg: 4,
                value: 0x01E1,
            })
        );
        assert!(!r.is_valid());
    }

    #[test]
    fn absent_phy_reads_all_ones_and_ignores_writes() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast());
        model.set_register(6, 2, 0x0007);
        model.set_present(6, false);

        t.try_send((6 << 5) | 2);
        for _ in 0..33 {
            model.tick(&mut t, &mut w, &mut r);
        }
        assert_eq!(r.try_receive(), Some(ABSENT_PHY_VALUE));

        t.try_send((6 << 5) | 2);
        w.try_send(0x1234);
        for _ in 0..33 {
            model.tick(&mut t, &mut w, &mut r);
        }
        assert_eq!(model.register(6, 2), Some(0x0007));
    }

    #[test]
    fn unresponsive_model_never_finishes() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast());
        model.set_responsive(false);

        t.try_send(0);
        for _ in 0..500 {
            model.tick(&mut t, &mut w, &mut r);
        }
        assert!(model.is_busy());
        assert!(!r.is_valid());
        assert!(!t.is_ready());
    }

    #[test]
    fn hold_off_withholds_readiness() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast());
        model.hold_off(3);

        for _ in 0..3 {
            model.tick(&mut t, &mut w, &mut r);
            assert!(!t.is_ready());
            assert!(!w.is_ready());
        }
        model.tick(&mut t, &mut w, &mut r);
        assert!(t.is_ready());
        assert!(w.is_ready());
    }

    #[test]
    fn not_accepting_withholds_readiness() {
        let (mut t, mut w, mut r) = channels();
        let mut model = SerializerModel::new(fast());
        model.set_accepting(false);
        model.tick(&mut t, &mut w, &mut r);
        assert!(!t.is_ready());
        model.set_accepting(true);
        model.tick(&mut t, &mut w, &mut r);
        assert!(t.is_ready());
    }

    #[test]
    fn out_of_range_register_access_is_ignored() {
        let mut model = SerializerModel::default();
        model.set_register(8, 0, 1);
        model.set_register(0, 32, 1);
        assert_eq!(model.register(8, 0), None);
        assert_eq!(model.register(0, 32), None);
    }
}
