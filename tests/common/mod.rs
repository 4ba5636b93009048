//! Shared test utilities for port tests.

#![allow(dead_code)]

use serial_attr::port::{ByteStream, ControlBlock, MockDriver, Port};

pub const MOCK_PORT: &str = "/dev/ttyMOCK0";

/// A mock driver and a port already opened on it.
pub fn open_mock() -> (MockDriver, Port<MockDriver>) {
    let driver = MockDriver::new();
    let mut port = Port::new(driver.clone());
    assert!(port.open(MOCK_PORT), "mock port should open");
    (driver, port)
}

/// The control block a mock device holds right after a successful open.
pub fn opened_block() -> ControlBlock {
    let mut block = ControlBlock::default();
    block.make_raw();
    block
}
