//! Bus-slave to MDIO bridge core
//!
//! This module contains the [`Bridge`] and the pieces it is built from:
//!
//! - [`bus`] - Bus-side state machine (request / one-cycle acknowledge)
//! - [`trigger`] - Start pulses decoded from bus writes
//! - [`management`] - Management-bus control state machine
//!
//! # Clocking
//!
//! [`Bridge::tick`] is one rising clock edge. Every next-state value (both
//! state machines, the register file, the read-holding register) is computed
//! from a copy of the committed state and then committed in one assignment,
//! so no part of the step can observe another part's update.
//!
//! # Example
//!
//! ```ignore
//! use mdio_bridge::bridge::{Bridge, BusInputs, SerializerInputs};
//! use mdio_bridge::register::RegisterAddress;
//!
//! let mut bridge = Bridge::new();
//! let ready = SerializerInputs::ready();
//!
//! // Request on tick N, acknowledge on tick N+1
//! let req = BusInputs::write(RegisterAddress::WriteData, 0x1234);
//! let (bus, _) = bridge.tick(&req, &ready);
//! assert!(!bus.ack);
//! let (bus, _) = bridge.tick(&req, &ready);
//! assert!(bus.ack);
//! ```

pub mod bus;
pub mod management;
pub mod trigger;

pub use bus::{BusInputs, BusOutputs, BusState};
pub use management::{
    Beat, ManagementEvent, ManagementInputs, ManagementOutputs, ManagementState,
    SerializerInputs, SerializerOutputs,
};
pub use trigger::Triggers;

use crate::register::{RegisterAddress, RegisterFile, StatusRegister};

// =============================================================================
// Statistics
// =============================================================================

/// Counters observed across ticks
///
/// Not visible on the bus; the register interface stays silent about drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BridgeStats {
    /// Clock ticks since reset
    pub ticks: u64,
    /// Bus requests acknowledged
    pub bus_acks: u32,
    /// Read transactions started
    pub reads_started: u32,
    /// Write transactions started
    pub writes_started: u32,
    /// Read transactions completed
    pub reads_completed: u32,
    /// Write transactions completed
    pub writes_completed: u32,
    /// Start pulses ignored
    pub triggers_dropped: u32,
    /// Bus writes to read-only registers
    pub ignored_writes: u32,
}

// =============================================================================
// Bridge
// =============================================================================

/// Cycle-level model of the bridge
///
/// Holds the complete registered state. All mutation goes through
/// [`tick`](Self::tick) and [`reset`](Self::reset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bridge {
    regs: RegisterFile,
    bus: BusState,
    management: ManagementState,
    read_hold: u16,
    stats: BridgeStats,
}

impl Bridge {
    /// Create a bridge in its reset state
    ///
    /// This is a const function suitable for static initialization.
    pub const fn new() -> Self {
        Self {
            regs: RegisterFile::reset(),
            bus: BusState::Idle,
            management: ManagementState::Idle,
            read_hold: 0,
            stats: BridgeStats {
                ticks: 0,
                bus_acks: 0,
                reads_started: 0,
                writes_started: 0,
                reads_completed: 0,
                writes_completed: 0,
                triggers_dropped: 0,
                ignored_writes: 0,
            },
        }
    }

    /// Return to the reset state (status reads busy until the next tick)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Committed register file
    #[inline(always)]
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Status register
    #[inline(always)]
    pub fn status(&self) -> StatusRegister {
        self.regs.status
    }

    /// Shorthand for the status busy bit
    #[inline(always)]
    pub fn is_busy(&self) -> bool {
        self.regs.status.busy
    }

    /// Bus-side state
    #[inline(always)]
    pub fn bus_state(&self) -> BusState {
        self.bus
    }

    /// Management-bus state
    #[inline(always)]
    pub fn management_state(&self) -> ManagementState {
        self.management
    }

    /// Counters since reset
    #[inline(always)]
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Advance one clock tick
    ///
    /// Returns the outputs driven during this tick: the bus response and the
    /// serializer channel signals. Handshake completion is up to the caller:
    /// a target or write-data beat transfers only if the matching ready input
    /// was high this tick, and a read beat is consumed whenever
    /// `read_ready` and `read_valid` are both high.
    pub fn tick(
        &mut self,
        bus_in: &BusInputs,
        serializer_in: &SerializerInputs,
    ) -> (BusOutputs, SerializerOutputs) {
        let current = *self;

        let bus_step = bus::step(current.bus, &current.regs, current.read_hold, bus_in);
        let triggers = Triggers::derive(current.bus, bus_in);
        let (management_next, mgmt) = management::transition(
            current.management,
            &ManagementInputs {
                triggers,
                target: current.regs.control.target(),
                write_data: current.regs.write_data,
                serializer: *serializer_in,
            },
        );

        let mut next = current;
        next.bus = bus_step.next;
        next.read_hold = bus_step.read_hold;
        next.management = management_next;

        if let Some((addr, value)) = bus_step.write
            && !next.regs.write(addr, value)
        {
            next.stats.ignored_writes = next.stats.ignored_writes.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::debug!("bus write to read-only {} ignored", addr);
        }
        if let Some(value) = mgmt.latch {
            next.regs.read_data = value;
        }
        next.regs.status = StatusRegister {
            busy: management_next.is_busy(),
        };

        next.stats.ticks = next.stats.ticks.wrapping_add(1);
        if bus_step.outputs.ack {
            next.stats.bus_acks = next.stats.bus_acks.wrapping_add(1);
        }
        if mgmt.dropped {
            next.stats.triggers_dropped = next.stats.triggers_dropped.wrapping_add(1);
            #[cfg(feature = "defmt")]
            defmt::debug!("trigger {} dropped in {}", triggers, current.management);
        }
        let counter = match mgmt.event {
            Some(ManagementEvent::ReadStarted) => Some(&mut next.stats.reads_started),
            Some(ManagementEvent::WriteStarted) => Some(&mut next.stats.writes_started),
            Some(ManagementEvent::ReadCompleted(_)) => Some(&mut next.stats.reads_completed),
            Some(ManagementEvent::WriteCompleted) => Some(&mut next.stats.writes_completed),
            None => None,
        };
        if let Some(count) = counter {
            *count = count.wrapping_add(1);
        }

        #[cfg(feature = "defmt")]
        if management_next != current.management {
            defmt::trace!("management {} -> {}", current.management, management_next);
        }

        *self = next;
        (bus_step.outputs, mgmt.serializer)
    }

    /// Register value the bus would read right now at `addr`
    ///
    /// Debug peek; does not go through the bus state machine.
    pub fn peek(&self, addr: RegisterAddress) -> u16 {
        self.regs.read(addr)
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const READY: SerializerInputs = SerializerInputs::ready();

    /// Run one full bus access (request tick + ack tick) and return the ack outputs
    fn access(bridge: &mut Bridge, req: BusInputs, ser: SerializerInputs) -> BusOutputs {
        let (first, _) = bridge.tick(&req, &ser);
        assert!(!first.ack);
        let (second, _) = bridge.tick(&req, &ser);
        assert!(second.ack);
        second
    }

    // =========================================================================
    // Reset
    // =========================================================================

    #[test]
    fn reset_reports_busy_until_first_tick() {
        let mut bridge = Bridge::new();
        assert!(bridge.is_busy());
        assert_eq!(bridge.management_state(), ManagementState::Idle);

        bridge.tick(&BusInputs::idle(), &READY);
        assert!(!bridge.is_busy());
    }

    #[test]
    fn reset_restores_power_on_state() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x0021),
            READY,
        );
        bridge.reset();
        assert_eq!(bridge, Bridge::new());
    }

    // =========================================================================
    // Bus Timing
    // =========================================================================

    #[test]
    fn ack_follows_request_by_one_tick() {
        let mut bridge = Bridge::new();
        let req = BusInputs::read(RegisterAddress::Status);

        let (out, _) = bridge.tick(&BusInputs::idle(), &READY);
        assert!(!out.ack);
        let (out, _) = bridge.tick(&req, &READY);
        assert!(!out.ack);
        let (out, _) = bridge.tick(&req, &READY);
        assert!(out.ack);
        let (out, _) = bridge.tick(&BusInputs::idle(), &READY);
        assert!(!out.ack);
        assert_eq!(bridge.stats().bus_acks, 1);
    }

    #[test]
    fn held_strobe_is_acked_every_other_tick() {
        let mut bridge = Bridge::new();
        let req = BusInputs::read(RegisterAddress::Control);
        let acks: [bool; 6] = core::array::from_fn(|_| bridge.tick(&req, &READY).0.ack);
        assert_eq!(acks, [false, true, false, true, false, true]);
    }

    #[test]
    fn status_write_is_ignored_but_acked() {
        let mut bridge = Bridge::new();
        bridge.tick(&BusInputs::idle(), &READY);
        let before = *bridge.registers();

        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Status, 0xFFFF),
            READY,
        );
        assert_eq!(*bridge.registers(), before);
        assert_eq!(bridge.stats().ignored_writes, 1);
        assert_eq!(bridge.management_state(), ManagementState::Idle);
    }

    #[test]
    fn read_returns_addressed_register_on_ack() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x00A5),
            READY,
        );
        let out = access(&mut bridge, BusInputs::read(RegisterAddress::Control), READY);
        assert_eq!(out.data_out, 0x00A5);
    }

    #[test]
    fn data_out_holds_last_read() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x0011),
            READY,
        );
        access(&mut bridge, BusInputs::read(RegisterAddress::Control), READY);
        let (out, _) = bridge.tick(&BusInputs::idle(), &READY);
        assert_eq!(out.data_out, 0x0011);
    }

    // =========================================================================
    // Write Transaction
    // =========================================================================

    #[test]
    fn write_data_access_starts_write_in_same_tick() {
        let mut bridge = Bridge::new();
        let req = BusInputs::write(RegisterAddress::WriteData, 0xBEEF);

        bridge.tick(&req, &READY);
        assert_eq!(bridge.management_state(), ManagementState::Idle);
        bridge.tick(&req, &READY);
        assert_eq!(bridge.management_state(), ManagementState::WriteIssue);
        assert!(bridge.is_busy());

        let (_, ser) = bridge.tick(&BusInputs::idle(), &READY);
        assert!(ser.target.valid);
        assert!(ser.write_data.valid);
        assert_eq!(ser.write_data.data, 0xBEEF);
        assert_eq!(bridge.management_state(), ManagementState::WriteWait);

        let (_, ser) = bridge.tick(&BusInputs::idle(), &SerializerInputs::busy());
        assert!(!ser.write_data.valid);
        assert!(bridge.is_busy());

        bridge.tick(&BusInputs::idle(), &READY);
        assert!(!bridge.is_busy());
        assert_eq!(bridge.stats().writes_completed, 1);
    }

    #[test]
    fn write_target_comes_from_control() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, (2 << 5) | 0x0C),
            READY,
        );
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::WriteData, 0x0001),
            READY,
        );
        let (_, ser) = bridge.tick(&BusInputs::idle(), &READY);
        assert!(ser.target.valid);
        assert_eq!(ser.target.data, (2 << 5) | 0x0C);
    }

    #[test]
    fn second_write_while_busy_is_dropped() {
        let mut bridge = Bridge::new();
        let busy = SerializerInputs::busy();

        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::WriteData, 0x1111),
            READY,
        );
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::WriteData, 0x2222),
            busy,
        );
        assert_eq!(bridge.stats().triggers_dropped, 1);
        assert_eq!(bridge.management_state(), ManagementState::WriteWait);

        // Serializer finishes the first transaction
        bridge.tick(&BusInputs::idle(), &READY);
        assert_eq!(bridge.management_state(), ManagementState::Idle);

        // Nothing else gets issued afterwards
        for _ in 0..4 {
            let (_, ser) = bridge.tick(&BusInputs::idle(), &READY);
            assert!(!ser.target.valid);
            assert!(!ser.write_data.valid);
        }
        assert_eq!(bridge.stats().writes_started, 1);
        // The register still holds the latest host value
        assert_eq!(bridge.peek(RegisterAddress::WriteData), 0x2222);
    }

    // =========================================================================
    // Read Transaction
    // =========================================================================

    #[test]
    fn read_start_runs_read_and_latches_result() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x8000 | (1 << 5) | 2),
            READY,
        );
        assert_eq!(bridge.management_state(), ManagementState::ReadIssue);
        assert!(bridge.is_busy());
        // Pulse is not stored
        assert_eq!(bridge.peek(RegisterAddress::Control), (1 << 5) | 2);

        let (_, ser) = bridge.tick(&BusInputs::idle(), &SerializerInputs::busy());
        assert!(ser.target.valid);
        assert_eq!(ser.target.data, (1 << 5) | 2);
        assert!(ser.read_ready);
        assert_eq!(bridge.management_state(), ManagementState::ReadWait);

        for _ in 0..10 {
            bridge.tick(&BusInputs::idle(), &SerializerInputs::busy());
            assert!(bridge.is_busy());
        }

        bridge.tick(&BusInputs::idle(), &SerializerInputs::read_result(0x7949));
        assert!(!bridge.is_busy());
        assert_eq!(bridge.peek(RegisterAddress::ReadData), 0x7949);

        let out = access(&mut bridge, BusInputs::read(RegisterAddress::ReadData), READY);
        assert_eq!(out.data_out, 0x7949);
    }

    #[test]
    fn stale_read_beat_is_not_taken_as_result() {
        let mut bridge = Bridge::new();
        // Target ready while a leftover beat is still on the read channel
        let stale = SerializerInputs {
            target_ready: true,
            ..SerializerInputs::read_result(0xAAAA)
        };
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x8000 | 3),
            stale,
        );
        assert_eq!(bridge.management_state(), ManagementState::ReadIssue);

        let (_, ser) = bridge.tick(&BusInputs::idle(), &stale);
        assert!(ser.read_ready);
        assert_eq!(bridge.management_state(), ManagementState::ReadWait);
        assert_eq!(bridge.peek(RegisterAddress::ReadData), 0);
        assert!(bridge.is_busy());

        bridge.tick(&BusInputs::idle(), &SerializerInputs::read_result(0x1111));
        assert!(!bridge.is_busy());
        assert_eq!(bridge.peek(RegisterAddress::ReadData), 0x1111);
        assert_eq!(bridge.stats().reads_completed, 1);
    }

    #[test]
    fn read_trigger_without_target_ready_is_lost() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x8000),
            SerializerInputs::busy(),
        );
        assert_eq!(bridge.management_state(), ManagementState::Idle);
        assert_eq!(bridge.stats().triggers_dropped, 1);

        // Readiness returning later does not resurrect the pulse
        bridge.tick(&BusInputs::idle(), &READY);
        assert_eq!(bridge.management_state(), ManagementState::Idle);
    }

    #[test]
    fn stall_keeps_busy_forever() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x8000),
            READY,
        );
        for _ in 0..1_000 {
            bridge.tick(&BusInputs::idle(), &SerializerInputs::busy());
        }
        assert!(bridge.is_busy());
        assert_eq!(bridge.management_state(), ManagementState::ReadWait);
    }

    #[test]
    fn status_reads_busy_during_transaction() {
        let mut bridge = Bridge::new();
        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Control, 0x8000),
            READY,
        );
        let out = access(
            &mut bridge,
            BusInputs::read(RegisterAddress::Status),
            SerializerInputs::busy(),
        );
        assert_eq!(out.data_out, 0x0001);
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    #[test]
    fn stats_counters_wrap_instead_of_overflowing() {
        let mut bridge = Bridge::new();
        bridge.stats.bus_acks = u32::MAX;
        bridge.stats.ticks = u64::MAX;
        bridge.stats.ignored_writes = u32::MAX;

        access(
            &mut bridge,
            BusInputs::write(RegisterAddress::Status, 0xFFFF),
            READY,
        );
        assert_eq!(bridge.stats().bus_acks, 0);
        assert_eq!(bridge.stats().ticks, 1);
        assert_eq!(bridge.stats().ignored_writes, 0);
    }
}
