//! Transaction trigger pulses
//!
//! Pure combinational decode of the bus write in progress. The pulses exist
//! only on the `Writing` tick of the triggering access and are re-derived from
//! scratch every tick, so they can never repeat without a new bus write.

use super::bus::{BusInputs, BusState};
use crate::register::{ControlRegister, RegisterAddress};

/// Start pulses for the management state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Triggers {
    /// Control written with read start set
    pub read: bool,
    /// Write-data written
    pub write: bool,
}

impl Triggers {
    /// No pulse
    pub const NONE: Triggers = Triggers {
        read: false,
        write: false,
    };

    /// Derive this tick's pulses from the bus state and inputs
    pub const fn derive(state: BusState, inputs: &BusInputs) -> Self {
        if !matches!(state, BusState::Writing) {
            return Self::NONE;
        }
        match inputs.address {
            RegisterAddress::Control => Self {
                read: ControlRegister::is_read_start(inputs.data_in),
                write: false,
            },
            RegisterAddress::WriteData => Self {
                read: false,
                write: true,
            },
            RegisterAddress::Status | RegisterAddress::ReadData => Self::NONE,
        }
    }

    /// Either pulse is asserted
    pub const fn any(&self) -> bool {
        self.read || self.write
    }
}
