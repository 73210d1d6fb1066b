//! Cycle-level testbench: bridge + channels + serializer model

use crate::bridge::{Bridge, BusInputs, BusOutputs, SerializerInputs};
use crate::channel::Channel;
use crate::config::SerializerConfig;
use crate::error::{IoError, Result};
use crate::hal::bus::BusMaster;
use crate::internal::constants::BUS_ACK_TIMEOUT_TICKS;
use crate::register::RegisterAddress;

use super::serializer::SerializerModel;

/// A bridge wired to a behavioral serializer
///
/// Each [`tick`](Self::tick) is one clock edge, evaluated in this order:
///
/// 1. Sample the channel signals the bridge sees (ready / valid / data)
/// 2. Tick the bridge
/// 3. Complete handshakes: outbound beats are offered to their channels,
///    a read beat is consumed when the bridge was ready for it
/// 4. Tick the serializer model, which updates channel readiness
///
/// As a [`BusMaster`], every access holds strobe and cycle until the bridge
/// acknowledges it.
#[derive(Debug, Clone)]
pub struct Testbench {
    bridge: Bridge,
    target: Channel<u8>,
    write_data: Channel<u16>,
    read_data: Channel<u16>,
    serializer: SerializerModel,
}

impl Testbench {
    /// Create a testbench with a bridge fresh out of reset
    pub const fn new(config: SerializerConfig) -> Self {
        Self {
            bridge: Bridge::new(),
            target: Channel::new(),
            write_data: Channel::new(),
            read_data: Channel::new(),
            serializer: SerializerModel::new(config),
        }
    }

    /// The bridge under test
    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// The serializer model
    pub fn serializer(&self) -> &SerializerModel {
        &self.serializer
    }

    /// The serializer model, for setup and fault injection
    pub fn serializer_mut(&mut self) -> &mut SerializerModel {
        &mut self.serializer
    }

    /// Signals the bridge sees on the serializer side this tick
    pub fn serializer_inputs(&self) -> SerializerInputs {
        SerializerInputs {
            target_ready: self.target.is_ready(),
            write_ready: self.write_data.is_ready(),
            read_valid: self.read_data.is_valid(),
            read_data: self.read_data.peek().unwrap_or(0),
        }
    }

    /// Advance one clock tick with the given bus inputs
    pub fn tick(&mut self, bus_in: &BusInputs) -> BusOutputs {
        let ser_in = self.serializer_inputs();
        let (bus_out, ser_out) = self.bridge.tick(bus_in, &ser_in);

        if ser_out.target.valid {
            self.target.try_send(ser_out.target.data);
        }
        if ser_out.write_data.valid {
            self.write_data.try_send(ser_out.write_data.data);
        }
        self.read_data.set_ready(ser_out.read_ready);
        if ser_out.read_ready && ser_in.read_valid {
            self.read_data.try_receive();
        }

        self.serializer
            .tick(&mut self.target, &mut self.write_data, &mut self.read_data);
        bus_out
    }

    /// Advance `ticks` ticks with no bus request
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick(&BusInputs::idle());
        }
    }

    /// Advance with no bus request until the bridge is idle
    ///
    /// Returns the number of ticks taken, or `None` if still busy after
    /// `max_ticks`.
    pub fn run_until_idle(&mut self, max_ticks: u32) -> Option<u32> {
        for elapsed in 0..max_ticks {
            if !self.bridge.is_busy() {
                return Some(elapsed);
            }
            self.tick(&BusInputs::idle());
        }
        (!self.bridge.is_busy()).then_some(max_ticks)
    }

    fn access(&mut self, request: BusInputs) -> Result<u16> {
        for _ in 0..BUS_ACK_TIMEOUT_TICKS {
            let out = self.tick(&request);
            if out.ack {
                return Ok(out.data_out);
            }
        }
        Err(IoError::BusStall.into())
    }
}

impl Default for Testbench {
    fn default() -> Self {
        Self::new(SerializerConfig::new())
    }
}

impl BusMaster for Testbench {
    fn read(&mut self, addr: RegisterAddress) -> Result<u16> {
        self.access(BusInputs::read(addr))
    }

    fn write(&mut self, addr: RegisterAddress, value: u16) -> Result<()> {
        self.access(BusInputs::write(addr, value)).map(|_| ())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
