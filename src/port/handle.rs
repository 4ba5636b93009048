//! The [`Port`]: one serial connection opened through a [`Driver`].

use super::codec::{self, ControlBlock, DataBits, Parity, StopBits};
use super::error::PortError;
use super::signals::Signal;
use super::traits::{AttributeAccess, ByteStream, Driver, SerialLine, Transport};
use crate::attributes;
use std::fmt;
use tracing::{debug, info, warn};

/// A serial port backed by a driver.
///
/// The port owns its transport while open. Every configuration access goes
/// straight to the transport; nothing is cached. The lenient accessors from
/// [`SerialLine`] swallow failures, the `try_*` setters report them.
///
/// # Example
/// ```
/// use serial_attr::port::{AttributeAccess, ByteStream, MockDriver, Port, SerialLine};
///
/// let mut port = Port::new(MockDriver::new());
/// assert!(port.open("/dev/ttyMOCK0"));
///
/// port.set_attr("baud", "115200");
/// assert_eq!(port.baud(), 115200);
/// assert_eq!(port.get_attr("parity"), "n");
/// ```
pub struct Port<D: Driver> {
    driver: D,
    name: String,
    transport: Option<D::Transport>,
}

impl<D: Driver> Port<D> {
    /// Create a closed port.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            name: String::new(),
            transport: None,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn link(&self) -> Result<&D::Transport, PortError> {
        self.transport.as_ref().ok_or(PortError::NotOpen)
    }

    fn link_mut(&mut self) -> Result<&mut D::Transport, PortError> {
        self.transport.as_mut().ok_or(PortError::NotOpen)
    }

    fn block(&self) -> Option<ControlBlock> {
        match self.link().and_then(|link| link.control_block()) {
            Ok(block) => Some(block),
            Err(PortError::NotOpen) => None,
            Err(e) => {
                warn!("Failed to read control block of {}: {}", self.name, e);
                None
            }
        }
    }

    /// One read, one field update, one write.
    fn update_block(&mut self, update: impl FnOnce(&mut ControlBlock)) -> Result<(), PortError> {
        let link = self.link_mut()?;
        let mut block = link.control_block()?;
        update(&mut block);
        link.set_control_block(&block)
    }

    /// Set the baud rate, failing if the port is closed or the rate has no
    /// speed code. The control block is not touched on failure.
    pub fn try_set_baud(&mut self, rate: u32) -> Result<(), PortError> {
        self.link()?;
        let code = codec::encode_baud(rate).ok_or(PortError::UnsupportedBaud(rate))?;
        self.update_block(|block| block.set_speed(code))
    }

    pub fn try_set_data_bits(&mut self, bits: u8) -> Result<(), PortError> {
        self.link()?;
        let bits = DataBits::from_count(bits).ok_or(PortError::UnsupportedDataBits(bits))?;
        self.update_block(|block| block.set_data_bits(bits))
    }

    pub fn try_set_stop_bits(&mut self, stops: u8) -> Result<(), PortError> {
        self.link()?;
        let stops = StopBits::from_count(stops).ok_or(PortError::UnsupportedStopBits(stops))?;
        self.update_block(|block| block.set_stop_bits(stops))
    }

    /// Set parity from its one-letter symbol.
    pub fn try_set_parity(&mut self, symbol: &str) -> Result<(), PortError> {
        self.link()?;
        let parity =
            Parity::from_symbol(symbol).ok_or_else(|| PortError::UnsupportedParity(symbol.into()))?;
        self.update_block(|block| block.set_parity(parity))
    }

    fn signal(&self, signal: Signal) -> bool {
        match self.link().and_then(|link| link.modem_status()) {
            Ok(status) => status.contains(signal),
            Err(PortError::NotOpen) => false,
            Err(e) => {
                debug!("Modem status query on {} failed, reporting {:?} low: {}", self.name, signal, e);
                false
            }
        }
    }

    /// Fetch, change one bit, write back. The write is skipped if the fetch fails.
    fn try_set_signal(&mut self, signal: Signal, asserted: bool) -> Result<(), PortError> {
        let link = self.link_mut()?;
        let status = link.modem_status()?;
        link.set_modem_status(status.with(signal, asserted))
    }

    fn set_signal(&mut self, signal: Signal, asserted: bool) {
        if let Err(e) = self.try_set_signal(signal, asserted) {
            if !e.is_not_open() {
                debug!("Skipping {:?} update on {}: {}", signal, self.name, e);
            }
        }
    }

    fn lenient(&self, what: &str, result: Result<(), PortError>) {
        match result {
            Ok(()) | Err(PortError::NotOpen) => {}
            Err(e) => debug!("Ignoring {} on {}: {}", what, self.name, e),
        }
    }
}

impl<D: Driver> ByteStream for Port<D> {
    fn open(&mut self, name: &str) -> bool {
        if self.transport.is_some() {
            debug!("{} already open, ignoring open of {}", self.name, name);
            return true;
        }

        let mut transport = match self.driver.open(name) {
            Ok(transport) => transport,
            Err(e) => {
                warn!("Failed to open {}: {}", name, e);
                return false;
            }
        };

        let raw = transport.control_block().and_then(|mut block| {
            block.make_raw();
            transport.set_control_block(&block)
        });
        if let Err(e) = raw {
            warn!("Could not switch {} to raw mode: {}", name, e);
        }

        info!("Opened serial port {}", name);
        self.name = name.to_string();
        self.transport = Some(transport);
        true
    }

    fn close(&mut self) {
        if self.transport.take().is_some() {
            info!("Closed serial port {}", self.name);
        }
    }

    fn available(&self) -> u32 {
        match self.link().and_then(|link| link.available()) {
            Ok(n) => n,
            Err(PortError::NotOpen) => 0,
            Err(e) => {
                debug!("Available-byte query on {} failed: {}", self.name, e);
                0
            }
        }
    }

    fn flush(&mut self) {
        let result = self.link_mut().and_then(|link| link.flush());
        self.lenient("flush", result);
    }

    fn read(&mut self, max: u32) -> Vec<u8> {
        let available = self.available();
        let size = if max > 0 && max < available { max } else { available };
        if size == 0 {
            return Vec::new();
        }

        match self.link_mut().and_then(|link| link.read(size as usize)) {
            Ok(data) => data,
            Err(e) => {
                warn!("Read from {} failed: {}", self.name, e);
                Vec::new()
            }
        }
    }

    fn write(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let result = self.link_mut().and_then(|link| link.write(data));
        match result {
            Ok(()) | Err(PortError::NotOpen) => {}
            Err(e) => warn!("Write to {} failed: {}", self.name, e),
        }
    }
}

impl<D: Driver> SerialLine for Port<D> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    fn baud(&self) -> u32 {
        self.block().map_or(0, |block| block.baud())
    }

    fn set_baud(&mut self, rate: u32) {
        let result = self.try_set_baud(rate);
        self.lenient("baud change", result);
    }

    fn data_bits(&self) -> u8 {
        self.block().map_or(0, |block| block.data_bits().count())
    }

    fn set_data_bits(&mut self, bits: u8) {
        let result = self.try_set_data_bits(bits);
        self.lenient("data bits change", result);
    }

    fn stop_bits(&self) -> u8 {
        self.block().map_or(0, |block| block.stop_bits().count())
    }

    fn set_stop_bits(&mut self, stops: u8) {
        let result = self.try_set_stop_bits(stops);
        self.lenient("stop bits change", result);
    }

    fn parity(&self) -> Parity {
        self.block().map_or(Parity::None, |block| block.parity())
    }

    fn set_parity(&mut self, parity: Parity) {
        let result = self.try_set_parity(parity.symbol());
        self.lenient("parity change", result);
    }

    fn dtr(&self) -> bool {
        self.signal(Signal::Dtr)
    }

    fn set_dtr(&mut self, asserted: bool) {
        self.set_signal(Signal::Dtr, asserted);
    }

    fn rts(&self) -> bool {
        self.signal(Signal::Rts)
    }

    fn set_rts(&mut self, asserted: bool) {
        self.set_signal(Signal::Rts, asserted);
    }

    fn dsr(&self) -> bool {
        self.signal(Signal::Dsr)
    }

    fn dcd(&self) -> bool {
        self.signal(Signal::Dcd)
    }

    fn cts(&self) -> bool {
        self.signal(Signal::Cts)
    }

    fn ri(&self) -> bool {
        self.signal(Signal::Ri)
    }
}

impl<D: Driver> AttributeAccess for Port<D> {
    fn get_attr(&self, key: &str) -> String {
        attributes::get(self, key)
    }

    fn set_attr(&mut self, key: &str, value: &str) {
        attributes::set(self, key, value);
    }
}

impl<D: Driver> fmt::Debug for Port<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Port")
            .field("name", &self.name)
            .field("open", &self.transport.is_some())
            .finish()
    }
}
