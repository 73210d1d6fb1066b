//! MDIO Management Bridge
//!
//! A `no_std`, `no_alloc` cycle-level model of a bus-slave peripheral that
//! lets a host CPU reach Ethernet PHY management registers (IEEE 802.3
//! Clause 22) through an external MDIO serializer, plus the host driver that
//! talks to it.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Bridge** ([`bridge`]): four-word register file, bus-slave handshake
//!    and the management state machine, advanced one clock tick at a time
//! 2. **Simulation** ([`sim`]): behavioral serializer with a PHY bank and a
//!    testbench that wires it to the bridge through ready/valid
//!    [`Channel`]s
//! 3. **HAL** ([`hal`]): host-side bus access and an MDIO driver with
//!    timeouts, retries and Clause 22 PHY helpers
//!
//! ## Register Map
//!
//! | Word | Name       | Access | Contents                                   |
//! |------|------------|--------|--------------------------------------------|
//! | 0    | status     | R      | bit 0 = busy                               |
//! | 1    | control    | R/W    | 7:5 PHY, 4:0 register, 15 = start read     |
//! | 2    | read data  | R      | last value read from a PHY                 |
//! | 3    | write data | R/W    | writing it starts a PHY write              |
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and logging
//! - `critical-section`: Enable ISR-safe [`SharedBridge`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use mdio_bridge::hal::mdio::{read_phy_status, MdioBus};
//! use mdio_bridge::{BridgeMdio, SerializerConfig, Testbench};
//!
//! let mut bench = Testbench::new(SerializerConfig::new());
//! bench.serializer_mut().set_register(0, 1, 0x786D);
//!
//! let mut mdio = BridgeMdio::new(bench, delay);
//! let status = read_phy_status(&mut mdio, 0)?;
//! assert!(status.link_up);
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports
)]

// =============================================================================
// Modules
// =============================================================================

pub mod bridge;
pub mod channel;
pub mod config;
pub mod error;
pub mod hal;
pub mod register;
pub mod sim;

// Internal implementation details (pub(crate) only)
mod internal;

// Always built for tests; the std critical-section impl comes from dev-dependencies
#[cfg(any(test, feature = "critical-section"))]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use bridge::{
    Bridge, BridgeStats, BusInputs, BusOutputs, BusState, ManagementState, SerializerInputs,
    SerializerOutputs, Triggers,
};
pub use channel::Channel;
pub use config::{DriverConfig, SerializerConfig};
pub use error::{ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use hal::{BridgeMdio, BusMaster, MdioBus, MmioBus, PhyStatus};
pub use register::{ControlRegister, RegisterAddress, RegisterFile, StatusRegister};
pub use sim::{SerializerModel, Testbench};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedBridge};

/// Shared constants.
///
/// Register map, field layout, address limits and timing defaults.
pub mod constants {
    pub use crate::internal::constants::{
        // Register fields
        ADDR_MASK,
        // Timing
        BUS_ACK_TIMEOUT_TICKS,
        // Register map
        CONTROL_ADDR,
        CONTROL_PHY_MASK,
        CONTROL_PHY_SHIFT,
        CONTROL_READ_START,
        CONTROL_REG_MASK,
        DEFAULT_CLOCK_DIVIDER,
        DEFAULT_POLL_INTERVAL_US,
        DEFAULT_RETRIES,
        DEFAULT_TIMEOUT_US,
        // Address limits
        MAX_PHY_ADDR,
        MAX_REG_ADDR,
        // Frame geometry
        MDIO_FRAME_BITS,
        MDIO_PREAMBLE_BITS,
        PHY_COUNT,
        PHY_REG_COUNT,
        READ_DATA_ADDR,
        STATUS_ADDR,
        STATUS_BUSY,
        WRITE_DATA_ADDR,
    };
}
