//! In-memory driver for tests and demos.
//!
//! [`MockDriver`] hands out [`MockTransport`]s that all share one simulated
//! device. The driver keeps a handle to that device, so a test can queue
//! received bytes, drive input lines, inject failures and inspect everything
//! the port wrote.

use super::codec::ControlBlock;
use super::error::PortError;
use super::signals::{ModemStatus, Signal};
use super::traits::{Driver, Transport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug)]
struct MockDevice {
    block: ControlBlock,
    modem: ModemStatus,
    read_queue: VecDeque<u8>,
    write_log: Vec<Vec<u8>>,
    open_log: Vec<String>,
    open_handles: usize,
    flush_count: usize,
    block_writes: usize,
    modem_writes: usize,
    fail_open: bool,
    fail_control: bool,
    fail_status: bool,
    known_devices: Option<Vec<String>>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self {
            block: ControlBlock::default(),
            modem: ModemStatus(ModemStatus::DTR | ModemStatus::RTS),
            read_queue: VecDeque::new(),
            write_log: Vec::new(),
            open_log: Vec::new(),
            open_handles: 0,
            flush_count: 0,
            block_writes: 0,
            modem_writes: 0,
            fail_open: false,
            fail_control: false,
            fail_status: false,
            known_devices: None,
        }
    }
}

/// Driver for a simulated serial device.
///
/// # Example
/// ```
/// use serial_attr::port::{ByteStream, MockDriver, Port};
///
/// let driver = MockDriver::new();
/// let mut port = Port::new(driver.clone());
/// port.open("MOCK0");
///
/// driver.enqueue_read(b"Hello");
/// assert_eq!(port.read(0), b"Hello");
///
/// port.write(b"ACK");
/// assert_eq!(driver.write_log(), vec![b"ACK".to_vec()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    device: Arc<Mutex<MockDevice>>,
}

impl MockDriver {
    /// A driver that opens any name. The line starts at the Linux tty
    /// defaults with DTR and RTS asserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver that only opens the given names.
    pub fn with_devices<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let driver = Self::new();
        driver.device.lock().known_devices = Some(names.into_iter().map(Into::into).collect());
        driver
    }

    /// Queue bytes to be returned by subsequent reads.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.device.lock().read_queue.extend(data);
    }

    /// Every buffer passed to `write`, in order.
    pub fn write_log(&self) -> Vec<Vec<u8>> {
        self.device.lock().write_log.clone()
    }

    pub fn clear_write_log(&self) {
        self.device.lock().write_log.clear();
    }

    /// Names passed to successful opens, in order.
    pub fn open_log(&self) -> Vec<String> {
        self.device.lock().open_log.clone()
    }

    /// Whether a transport is currently alive.
    pub fn is_connected(&self) -> bool {
        self.device.lock().open_handles > 0
    }

    pub fn flush_count(&self) -> usize {
        self.device.lock().flush_count
    }

    pub fn pending_bytes(&self) -> usize {
        self.device.lock().read_queue.len()
    }

    pub fn control_block(&self) -> ControlBlock {
        self.device.lock().block
    }

    pub fn set_control_block(&self, block: ControlBlock) {
        self.device.lock().block = block;
    }

    /// Number of control block writes seen so far.
    pub fn control_block_writes(&self) -> usize {
        self.device.lock().block_writes
    }

    pub fn modem_status(&self) -> ModemStatus {
        self.device.lock().modem
    }

    /// Replace the whole bitmask, including bits with no [`Signal`] name.
    pub fn set_modem_status(&self, status: ModemStatus) {
        self.device.lock().modem = status;
    }

    /// Number of modem status writes seen so far.
    pub fn modem_status_writes(&self) -> usize {
        self.device.lock().modem_writes
    }

    /// Drive a line from the remote side.
    pub fn set_line(&self, signal: Signal, asserted: bool) {
        let mut device = self.device.lock();
        device.modem = device.modem.with(signal, asserted);
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.device.lock().fail_open = fail;
    }

    /// Make control block reads and writes fail.
    pub fn set_fail_control(&self, fail: bool) {
        self.device.lock().fail_control = fail;
    }

    /// Make modem status reads fail.
    pub fn set_fail_status(&self, fail: bool) {
        self.device.lock().fail_status = fail;
    }
}

impl Driver for MockDriver {
    type Transport = MockTransport;

    fn open(&self, name: &str) -> Result<MockTransport, PortError> {
        let mut device = self.device.lock();
        if device.fail_open {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "simulated open failure",
            )));
        }
        if let Some(known) = &device.known_devices {
            if !known.iter().any(|n| n == name) {
                return Err(PortError::not_found(name));
            }
        }
        device.open_log.push(name.to_string());
        device.open_handles += 1;
        drop(device);

        Ok(MockTransport {
            device: Arc::clone(&self.device),
        })
    }
}

/// Open handle on a [`MockDriver`] device.
#[derive(Debug)]
pub struct MockTransport {
    device: Arc<Mutex<MockDevice>>,
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        let mut device = self.device.lock();
        device.open_handles = device.open_handles.saturating_sub(1);
    }
}

impl Transport for MockTransport {
    fn available(&self) -> Result<u32, PortError> {
        Ok(self.device.lock().read_queue.len() as u32)
    }

    fn flush(&mut self) -> Result<(), PortError> {
        let mut device = self.device.lock();
        device.read_queue.clear();
        device.flush_count += 1;
        Ok(())
    }

    fn read(&mut self, max: usize) -> Result<Vec<u8>, PortError> {
        let mut device = self.device.lock();
        let n = max.min(device.read_queue.len());
        Ok(device.read_queue.drain(..n).collect())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), PortError> {
        self.device.lock().write_log.push(data.to_vec());
        Ok(())
    }

    fn control_block(&self) -> Result<ControlBlock, PortError> {
        let device = self.device.lock();
        if device.fail_control {
            return Err(PortError::status_query("simulated TCGETS failure"));
        }
        Ok(device.block)
    }

    fn set_control_block(&mut self, block: &ControlBlock) -> Result<(), PortError> {
        let mut device = self.device.lock();
        if device.fail_control {
            return Err(PortError::status_query("simulated TCSETS failure"));
        }
        device.block = *block;
        device.block_writes += 1;
        Ok(())
    }

    fn modem_status(&self) -> Result<ModemStatus, PortError> {
        let device = self.device.lock();
        if device.fail_status {
            return Err(PortError::status_query("simulated TIOCMGET failure"));
        }
        Ok(device.modem)
    }

    fn set_modem_status(&mut self, status: ModemStatus) -> Result<(), PortError> {
        let mut device = self.device.lock();
        device.modem = status;
        device.modem_writes += 1;
        Ok(())
    }
}
