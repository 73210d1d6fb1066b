//! Cycle-level simulation
//!
//! The bridge on its own only sees ready/valid signals. To exercise whole
//! transactions this module supplies the other side:
//!
//! - [`SerializerModel`]: behavioral MDIO serializer with a bank of PHYs
//! - [`Testbench`]: bridge, serializer and the three channels between them,
//!   evaluated in a fixed order each tick, usable as a
//!   [`BusMaster`](crate::hal::BusMaster)

mod serializer;
mod testbench;

pub use serializer::{ABSENT_PHY_VALUE, Operation, SerializerModel, Transaction, decode_target};
pub use testbench::Testbench;
