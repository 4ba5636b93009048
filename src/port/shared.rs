//! Lock-guarded forwarding wrapper for sharing one port between threads.

use super::codec::Parity;
use super::traits::{AttributeAccess, ByteStream, SerialLine};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// A port behind a mutex. Clones refer to the same port.
///
/// Every forwarded call holds the lock for the whole logical operation, so
/// a signal read-modify-write or a `get_attrs`/`set_attrs` batch is never
/// interleaved with another caller. Use [`lock`](Self::lock) to group
/// several calls into one critical section.
///
/// # Example
/// ```
/// use serial_attr::port::{ByteStream, MockDriver, Port, SerialLine, SharedPort};
///
/// let mut shared = SharedPort::new(Port::new(MockDriver::new()));
/// shared.open("MOCK0");
///
/// let mut other = shared.clone();
/// std::thread::spawn(move || other.set_baud(19200)).join().unwrap();
/// assert_eq!(shared.baud(), 19200);
/// ```
#[derive(Debug)]
pub struct SharedPort<P> {
    inner: Arc<Mutex<P>>,
}

impl<P> Clone for SharedPort<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> SharedPort<P> {
    pub fn new(port: P) -> Self {
        Self {
            inner: Arc::new(Mutex::new(port)),
        }
    }

    /// Exclusive access until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, P> {
        self.inner.lock()
    }
}

impl<P: ByteStream> ByteStream for SharedPort<P> {
    fn open(&mut self, name: &str) -> bool {
        self.inner.lock().open(name)
    }

    fn close(&mut self) {
        self.inner.lock().close();
    }

    fn available(&self) -> u32 {
        self.inner.lock().available()
    }

    fn flush(&mut self) {
        self.inner.lock().flush();
    }

    fn read(&mut self, max: u32) -> Vec<u8> {
        self.inner.lock().read(max)
    }

    fn write(&mut self, data: &[u8]) {
        self.inner.lock().write(data);
    }
}

impl<P: SerialLine> SerialLine for SharedPort<P> {
    fn name(&self) -> String {
        self.inner.lock().name()
    }

    fn is_open(&self) -> bool {
        self.inner.lock().is_open()
    }

    fn baud(&self) -> u32 {
        self.inner.lock().baud()
    }

    fn set_baud(&mut self, rate: u32) {
        self.inner.lock().set_baud(rate);
    }

    fn data_bits(&self) -> u8 {
        self.inner.lock().data_bits()
    }

    fn set_data_bits(&mut self, bits: u8) {
        self.inner.lock().set_data_bits(bits);
    }

    fn stop_bits(&self) -> u8 {
        self.inner.lock().stop_bits()
    }

    fn set_stop_bits(&mut self, stops: u8) {
        self.inner.lock().set_stop_bits(stops);
    }

    fn parity(&self) -> Parity {
        self.inner.lock().parity()
    }

    fn set_parity(&mut self, parity: Parity) {
        self.inner.lock().set_parity(parity);
    }

    fn dtr(&self) -> bool {
        self.inner.lock().dtr()
    }

    fn set_dtr(&mut self, asserted: bool) {
        self.inner.lock().set_dtr(asserted);
    }

    fn rts(&self) -> bool {
        self.inner.lock().rts()
    }

    fn set_rts(&mut self, asserted: bool) {
        self.inner.lock().set_rts(asserted);
    }

    fn dsr(&self) -> bool {
        self.inner.lock().dsr()
    }

    fn dcd(&self) -> bool {
        self.inner.lock().dcd()
    }

    fn cts(&self) -> bool {
        self.inner.lock().cts()
    }

    fn ri(&self) -> bool {
        self.inner.lock().ri()
    }
}

impl<P: AttributeAccess> AttributeAccess for SharedPort<P> {
    fn keys(&self) -> &'static [&'static str] {
        self.inner.lock().keys()
    }

    fn get_attr(&self, key: &str) -> String {
        self.inner.lock().get_attr(key)
    }

    fn set_attr(&mut self, key: &str, value: &str) {
        self.inner.lock().set_attr(key, value);
    }

    fn get_attrs(&self, keys: &[&str]) -> Vec<String> {
        self.inner.lock().get_attrs(keys)
    }

    fn set_attrs(&mut self, attrs: &HashMap<String, String>) {
        self.inner.lock().set_attrs(attrs);
    }
}
