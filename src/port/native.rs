//! Native serial backend.
//!
//! Wraps the `serialport` crate. Line settings are translated between the
//! crate's typed setters and the [`ControlBlock`] encoding; flags the crate
//! does not expose are kept in a shadow copy. `serialport` cannot read back
//! DTR and RTS, so the transport remembers the last values it wrote.

use super::codec::{self, ControlBlock, DataBits, Parity, StopBits};
use super::error::PortError;
use super::signals::{ModemStatus, Signal};
use super::traits::{Driver, Transport};
use parking_lot::Mutex;
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

/// Opens real devices through `serialport`.
#[derive(Debug, Clone)]
pub struct NativeDriver {
    /// Rate the device is opened at before any reconfiguration.
    pub baud_rate: u32,
    /// Read/write timeout handed to `serialport`.
    pub timeout: Duration,
}

impl Default for NativeDriver {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            timeout: Duration::from_millis(10),
        }
    }
}

impl NativeDriver {
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Default::default()
        }
    }
}

impl Driver for NativeDriver {
    type Transport = NativeTransport;

    fn open(&self, name: &str) -> Result<NativeTransport, PortError> {
        let port = serialport::new(name, self.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .flow_control(serialport::FlowControl::None)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(self.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(name),
                _ => PortError::Serial(e),
            })?;

        Ok(NativeTransport {
            port: Mutex::new(port),
            shadow: ControlBlock::default(),
            outputs: ModemStatus(ModemStatus::DTR | ModemStatus::RTS),
        })
    }
}

/// An open native device.
pub struct NativeTransport {
    // Status reads need `&mut` on the serialport handle.
    port: Mutex<Box<dyn serialport::SerialPort>>,
    shadow: ControlBlock,
    outputs: ModemStatus,
}

impl Transport for NativeTransport {
    fn available(&self) -> Result<u32, PortError> {
        Ok(self.port.lock().bytes_to_read()?)
    }

    fn flush(&mut self) -> Result<(), PortError> {
        Ok(self.port.get_mut().clear(serialport::ClearBuffer::All)?)
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>, PortError> {
        let mut buffer = vec![0u8; max];
        let n = self.port.get_mut().read(&mut buffer)?;
        buffer.truncate(n);
        Ok(buffer)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), PortError> {
        Ok(self.port.get_mut().write_all(data)?)
    }

    fn control_block(&self) -> Result<ControlBlock, PortError> {
        let port = self.port.lock();
        let mut block = self.shadow;
        block.set_speed(codec::encode_baud(port.baud_rate()?).unwrap_or(codec::BOTHER));
        block.set_data_bits(DataBits::from(port.data_bits()?));
        block.set_stop_bits(StopBits::from(port.stop_bits()?));
        block.set_parity(Parity::from(port.parity()?));
        Ok(block)
    }

    fn set_control_block(&mut self, block: &ControlBlock) -> Result<(), PortError> {
        let port = self.port.get_mut();

        let rate = codec::decode_baud(block.ospeed);
        if rate != 0 && port.baud_rate()? != rate {
            debug!("Switching {:?} to {} baud", port.name(), rate);
            port.set_baud_rate(rate)?;
        }
        port.set_data_bits(block.data_bits().into())?;
        port.set_stop_bits(block.stop_bits().into())?;
        port.set_parity(block.parity().into())?;

        self.shadow = *block;
        Ok(())
    }

    fn modem_status(&self) -> Result<ModemStatus, PortError> {
        let mut port = self.port.lock();
        let status = self
            .outputs
            .with(Signal::Dsr, port.read_data_set_ready()?)
            .with(Signal::Dcd, port.read_carrier_detect()?)
            .with(Signal::Cts, port.read_clear_to_send()?)
            .with(Signal::Ri, port.read_ring_indicator()?);
        Ok(status)
    }

    fn set_modem_status(&mut self, status: ModemStatus) -> Result<(), PortError> {
        let port = self.port.get_mut();
        if status.contains(Signal::Dtr) != self.outputs.contains(Signal::Dtr) {
            port.write_data_terminal_ready(status.contains(Signal::Dtr))?;
        }
        if status.contains(Signal::Rts) != self.outputs.contains(Signal::Rts) {
            port.write_request_to_send(status.contains(Signal::Rts))?;
        }
        self.outputs = ModemStatus(status.bits() & (ModemStatus::DTR | ModemStatus::RTS));
        Ok(())
    }
}

impl std::fmt::Debug for NativeTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let port = self.port.lock();
        f.debug_struct("NativeTransport")
            .field("name", &port.name())
            .field("baud_rate", &port.baud_rate().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_not_found_error() {
        let result = NativeDriver::default().open("/dev/nonexistent_port_12345");

        match result {
            Err(PortError::NotFound(name)) => assert!(name.contains("nonexistent")),
            Err(PortError::Serial(_)) => {}
            other => panic!("Expected open failure, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_default_driver() {
        let driver = NativeDriver::default();
        assert_eq!(driver.baud_rate, 9600);
        assert_eq!(NativeDriver::new(115200).baud_rate, 115200);
    }
}
