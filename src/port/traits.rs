//! Core traits for serial port abstraction.
//!
//! Two layers live here. [`Driver`] and [`Transport`] are the seam to the
//! platform: a driver opens a device name and hands back a transport that
//! owns the device until it is dropped. [`ByteStream`], [`SerialLine`] and
//! [`AttributeAccess`] are the capabilities callers program against; a
//! backend implements whichever of them it can.

use super::codec::ControlBlock;
use super::error::PortError;
use super::signals::ModemStatus;
use crate::attributes::AttributeKey;
use std::collections::HashMap;

/// An open device handle. Dropping it closes the device.
pub trait Transport: Send {
    /// Bytes waiting in the receive buffer.
    fn available(&self) -> Result<u32, PortError>;

    /// Discard both receive and transmit buffers.
    fn flush(&mut self) -> Result<(), PortError>;

    /// Read at most `max` bytes that are already buffered. Must not wait.
    fn read(&mut self, max: usize) -> Result<Vec<u8>, PortError>;

    /// Queue `data` for transmission.
    fn write(&mut self, data: &[u8]) -> Result<(), PortError>;

    fn control_block(&self) -> Result<ControlBlock, PortError>;

    fn set_control_block(&mut self, block: &ControlBlock) -> Result<(), PortError>;

    fn modem_status(&self) -> Result<ModemStatus, PortError>;

    fn set_modem_status(&mut self, status: ModemStatus) -> Result<(), PortError>;
}

/// Opens transports by device name.
pub trait Driver {
    type Transport: Transport;

    fn open(&self, name: &str) -> Result<Self::Transport, PortError>;
}

/// Raw byte transport capability.
///
/// None of these report failure: on a closed port reads are empty, counts
/// are zero and everything else does nothing.
pub trait ByteStream {
    /// Open `name`. Returns whether the port is open afterwards; if it was
    /// already open the existing connection is kept.
    fn open(&mut self, name: &str) -> bool;

    fn close(&mut self);

    fn available(&self) -> u32;

    fn flush(&mut self);

    /// Return the bytes already received, at most `max` of them. `max == 0`
    /// returns everything available.
    fn read(&mut self, max: u32) -> Vec<u8>;

    fn write(&mut self, data: &[u8]);
}

/// Full serial capability: byte transport plus line configuration and
/// modem signals.
///
/// Getters read live hardware state on every call. Setters given a value
/// outside the supported set leave the line unchanged. On a closed port
/// numeric getters return 0, parity reads as none and signals read low.
pub trait SerialLine: ByteStream {
    /// Name of the most recently opened device, empty if none.
    fn name(&self) -> String;

    fn is_open(&self) -> bool;

    fn baud(&self) -> u32;
    fn set_baud(&mut self, rate: u32);

    fn data_bits(&self) -> u8;
    fn set_data_bits(&mut self, bits: u8);

    fn stop_bits(&self) -> u8;
    fn set_stop_bits(&mut self, stops: u8);

    fn parity(&self) -> super::Parity;
    fn set_parity(&mut self, parity: super::Parity);

    fn dtr(&self) -> bool;
    fn set_dtr(&mut self, asserted: bool);
    fn rts(&self) -> bool;
    fn set_rts(&mut self, asserted: bool);

    fn dsr(&self) -> bool;
    fn dcd(&self) -> bool;
    fn cts(&self) -> bool;
    fn ri(&self) -> bool;
}

/// String-keyed attribute capability.
///
/// Keys are case-insensitive. Unknown keys read as the empty string and
/// ignore writes.
pub trait AttributeAccess {
    /// The attribute keys, always the same fixed list in the same order.
    fn keys(&self) -> &'static [&'static str] {
        AttributeKey::NAMES
    }

    fn get_attr(&self, key: &str) -> String;

    fn set_attr(&mut self, key: &str, value: &str);

    /// One value per key, in the order given.
    fn get_attrs(&self, keys: &[&str]) -> Vec<String> {
        keys.iter().map(|key| self.get_attr(key)).collect()
    }

    /// Apply every pair; the order across distinct keys is unspecified.
    fn set_attrs(&mut self, attrs: &HashMap<String, String>) {
        for (key, value) in attrs {
            self.set_attr(key, value);
        }
    }
}
