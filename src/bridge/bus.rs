//! Bus-side state machine
//!
//! Classic single-cycle slave timing: a request strobed in `Idle` on tick N
//! is acknowledged on tick N+1, after which the machine is back in `Idle`.
//! The machine never stalls and never overlaps requests.

use crate::register::{RegisterAddress, RegisterFile};

// =============================================================================
// Signals
// =============================================================================

/// Bus-side state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    /// Waiting for a request
    #[default]
    Idle,
    /// Acknowledging a read
    Reading,
    /// Acknowledging a write
    Writing,
}

impl BusState {
    /// Transition rule, evaluated once per tick
    pub const fn next(self, inputs: &BusInputs) -> Self {
        match self {
            BusState::Idle if inputs.is_request() => {
                if inputs.write_enable {
                    BusState::Writing
                } else {
                    BusState::Reading
                }
            }
            _ => BusState::Idle,
        }
    }

    /// Acknowledge is asserted in every non-idle state
    pub const fn ack(self) -> bool {
        !matches!(self, BusState::Idle)
    }
}

/// Bus-slave inputs sampled on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusInputs {
    /// Register select
    pub address: RegisterAddress,
    /// Write payload
    pub data_in: u16,
    /// 1 = write, 0 = read
    pub write_enable: bool,
    /// Request active
    pub strobe: bool,
    /// Bus cycle active
    pub cycle: bool,
}

impl BusInputs {
    /// No request on the bus
    pub const fn idle() -> Self {
        Self {
            address: RegisterAddress::Status,
            data_in: 0,
            write_enable: false,
            strobe: false,
            cycle: false,
        }
    }

    /// Read request for `address`
    pub const fn read(address: RegisterAddress) -> Self {
        Self {
            address,
            data_in: 0,
            write_enable: false,
            strobe: true,
            cycle: true,
        }
    }

    /// Write request of `value` to `address`
    pub const fn write(address: RegisterAddress, value: u16) -> Self {
        Self {
            address,
            data_in: value,
            write_enable: true,
            strobe: true,
            cycle: true,
        }
    }

    /// Strobe and cycle are both asserted
    pub const fn is_request(&self) -> bool {
        self.strobe && self.cycle
    }
}

/// Bus-slave outputs for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusOutputs {
    /// Read response (the read-holding register)
    pub data_out: u16,
    /// Request acknowledged this tick
    pub ack: bool,
}

// =============================================================================
// Step
// =============================================================================

/// Everything the bus side decides on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BusStep {
    /// State for the next tick
    pub next: BusState,
    /// Outputs driven this tick
    pub outputs: BusOutputs,
    /// Read-holding register for the next tick
    pub read_hold: u16,
    /// Register write to commit at the end of the tick
    pub write: Option<(RegisterAddress, u16)>,
}

/// Evaluate the bus side against a snapshot of the register file
pub(crate) fn step(
    state: BusState,
    regs: &RegisterFile,
    read_hold: u16,
    inputs: &BusInputs,
) -> BusStep {
    let (read_hold, write) = match state {
        BusState::Reading => (regs.read(inputs.address), None),
        BusState::Writing => (read_hold, Some((inputs.address, inputs.data_in))),
        BusState::Idle => (read_hold, None),
    };

    BusStep {
        next: state.next(inputs),
        outputs: BusOutputs {
            data_out: read_hold,
            ack: state.ack(),
        },
        read_hold,
        write,
    }
}
