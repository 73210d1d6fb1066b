//! Host-side access to the bridge
//!
//! # Modules
//!
//! - [`bus`]: word access to the bridge register window
//! - [`mdio`]: MDIO driver on top of the bridge, plus Clause 22 PHY helpers
//!
//! # Delay Integration
//!
//! Status polling uses `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod bus;
pub mod mdio;

pub use bus::{BusMaster, MmioBus};
pub use mdio::{BridgeMdio, MdioBus, PhyStatus};
