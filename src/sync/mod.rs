//! Synchronization and Concurrency Support
//!
//! ISR-safe wrappers for driving the bridge model from more than one
//! execution context (for example a timer interrupt that ticks the model and
//! a main loop that inspects it).
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe
//!   interior mutability
//! - **Shared Wrappers** (`shared`): [`SharedBridge`], a critical-section
//!   protected [`Bridge`](crate::Bridge)
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module. Unit tests build it regardless,
//!   using the `std` implementation from the dev-dependencies.
//!
//! # Example
//!
//! ```ignore
//! use mdio_bridge::sync::SharedBridge;
//! use mdio_bridge::{BusInputs, SerializerInputs};
//!
//! static BRIDGE: SharedBridge = SharedBridge::new();
//!
//! #[interrupt]
//! fn TIMER_IRQ() {
//!     BRIDGE.tick(&BusInputs::idle(), &SerializerInputs::ready());
//! }
//!
//! fn main() {
//!     let busy = BRIDGE.with(|bridge| bridge.is_busy());
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedBridge;
