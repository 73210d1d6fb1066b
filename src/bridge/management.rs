//! Management-bus control state machine
//!
//! Turns start pulses into transactions on the three serializer channels:
//!
//! ```text
//!            read trigger && target ready
//!   Idle ───────────────────────────────► ReadIssue ──► ReadWait ──(read valid)──► Idle
//!     │
//!     │  write trigger && target ready && write ready
//!     └─────────────────────────────────► WriteIssue ─► WriteWait ─(write ready)─► Idle
//! ```
//!
//! Only `Idle` accepts a trigger. A pulse that arrives in any other state, or
//! while the channels it needs are not ready, is dropped; nothing is queued.
//! The wait states have no timeout.

use super::trigger::Triggers;

// =============================================================================
// States
// =============================================================================

/// Management-bus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManagementState {
    /// No transaction in flight
    #[default]
    Idle,
    /// Handing the target address to the serializer (one tick)
    ReadIssue,
    /// Waiting for read data
    ReadWait,
    /// Handing target address and write data to the serializer (one tick)
    WriteIssue,
    /// Waiting for the serializer to accept more write data
    WriteWait,
}

impl ManagementState {
    /// Drives the status busy bit
    pub const fn is_busy(self) -> bool {
        !matches!(self, ManagementState::Idle)
    }
}

// =============================================================================
// Channel Signals
// =============================================================================

/// Valid-qualified payload offered on an outbound channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Beat<T> {
    /// Producer has data
    pub valid: bool,
    /// Payload (meaningful only while valid)
    pub data: T,
}

/// Signals driven by the serializer into the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerializerInputs {
    /// Target channel will accept an address
    pub target_ready: bool,
    /// Write-data channel will accept a value
    pub write_ready: bool,
    /// Read-data channel holds a value
    pub read_valid: bool,
    /// Read-data payload
    pub read_data: u16,
}

impl SerializerInputs {
    /// Serializer idle and ready on both outbound channels
    pub const fn ready() -> Self {
        Self {
            target_ready: true,
            write_ready: true,
            read_valid: false,
            read_data: 0,
        }
    }

    /// Serializer busy: nothing ready, nothing valid
    pub const fn busy() -> Self {
        Self {
            target_ready: false,
            write_ready: false,
            read_valid: false,
            read_data: 0,
        }
    }

    /// Serializer presenting a read result
    pub const fn read_result(value: u16) -> Self {
        Self {
            target_ready: false,
            write_ready: false,
            read_valid: true,
            read_data: value,
        }
    }
}

/// Signals driven by the bridge toward the serializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerializerOutputs {
    /// Target address: PHY in bits 7:5, register in bits 4:0
    pub target: Beat<u8>,
    /// Outbound write data
    pub write_data: Beat<u16>,
    /// Bridge will accept read data
    pub read_ready: bool,
}

// =============================================================================
// Transition Function
// =============================================================================

/// Inputs to one evaluation of the management state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManagementInputs {
    /// Start pulses from this tick's bus write
    pub triggers: Triggers,
    /// Current control register target (PHY:register)
    pub target: u8,
    /// Current write-data register
    pub write_data: u16,
    /// Serializer channel signals
    pub serializer: SerializerInputs,
}

/// Something observable happened during a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManagementEvent {
    /// Read transaction accepted from Idle
    ReadStarted,
    /// Write transaction accepted from Idle
    WriteStarted,
    /// Read data latched
    ReadCompleted(u16),
    /// Write data accepted by the serializer
    WriteCompleted,
}

/// Outputs of one evaluation of the management state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManagementOutputs {
    /// Channel signals driven this tick
    pub serializer: SerializerOutputs,
    /// Value to commit into the read-data register
    pub latch: Option<u16>,
    /// Event for statistics and logging
    pub event: Option<ManagementEvent>,
    /// A start pulse arrived and was ignored
    pub dropped: bool,
}

/// Evaluate one tick: `(state, inputs) -> (next state, outputs)`
pub fn transition(
    state: ManagementState,
    inputs: &ManagementInputs,
) -> (ManagementState, ManagementOutputs) {
    let ser = &inputs.serializer;
    let mut out = ManagementOutputs {
        serializer: SerializerOutputs {
            target: Beat {
                valid: false,
                data: inputs.target,
            },
            write_data: Beat {
                valid: false,
                data: inputs.write_data,
            },
            read_ready: false,
        },
        latch: None,
        event: None,
        dropped: state.is_busy() && inputs.triggers.any(),
    };

    let next = match state {
        ManagementState::Idle => {
            let t = &inputs.triggers;
            if t.read && ser.target_ready {
                out.event = Some(ManagementEvent::ReadStarted);
                ManagementState::ReadIssue
            } else if t.write && ser.target_ready && ser.write_ready {
                out.event = Some(ManagementEvent::WriteStarted);
                ManagementState::WriteIssue
            } else {
                out.dropped = t.any();
                ManagementState::Idle
            }
        }
        ManagementState::ReadIssue => {
            out.serializer.target.valid = true;
            out.serializer.read_ready = true;
            // A beat taken this tick predates the target and is discarded
            ManagementState::ReadWait
        }
        ManagementState::ReadWait => {
            out.serializer.read_ready = true;
            if ser.read_valid {
                out.latch = Some(ser.read_data);
                out.event = Some(ManagementEvent::ReadCompleted(ser.read_data));
                ManagementState::Idle
            } else {
                ManagementState::ReadWait
            }
        }
        ManagementState::WriteIssue => {
            out.serializer.target.valid = true;
            out.serializer.write_data.valid = true;
            ManagementState::WriteWait
        }
        ManagementState::WriteWait => {
            if ser.write_ready {
                out.event = Some(ManagementEvent::WriteCompleted);
                ManagementState::Idle
            } else {
                ManagementState::WriteWait
            }
        }
    };

    (next, out)
}

// =============================================================================
// Unit Tests
// =============================================================================
