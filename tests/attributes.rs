//! String-keyed attribute access.

mod common;

use common::{open_mock, MOCK_PORT};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serial_attr::attributes::{self, parse_int};
use serial_attr::port::{
    AttributeAccess, ByteStream, MockDriver, Parity, Port, SerialLine, Signal,
};
use std::collections::HashMap;

const ALL_KEYS: [&str; 12] = [
    "name", "opened", "baud", "bits", "stops", "parity", "dtr", "dsr", "rts", "cts", "dcd", "ri",
];

fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_keys_are_fixed() {
    let (_driver, mut port) = open_mock();
    assert_eq!(port.keys(), ALL_KEYS);

    port.set_attr("bogus", "1");
    port.set_attrs(&attrs(&[("baud", "9600"), ("other", "x")]));
    assert_eq!(port.keys(), ALL_KEYS);

    let closed = Port::new(MockDriver::new());
    assert_eq!(closed.keys(), ALL_KEYS);
}

#[test]
fn test_values_match_typed_getters() {
    let (driver, mut port) = open_mock();
    port.set_baud(57600);
    port.set_data_bits(7);
    port.set_stop_bits(2);
    port.set_parity(Parity::Odd);
    driver.set_line(Signal::Dcd, true);

    let values = port.get_attrs(&ALL_KEYS);
    assert_eq!(
        values,
        vec![
            port.name(),
            port.is_open().to_string(),
            port.baud().to_string(),
            port.data_bits().to_string(),
            port.stop_bits().to_string(),
            port.parity().symbol().to_string(),
            "1".to_string(),
            "0".to_string(),
            "1".to_string(),
            "0".to_string(),
            "1".to_string(),
            "0".to_string(),
        ]
    );
    assert_eq!(values[0], MOCK_PORT);
    assert_eq!(values[1], "true");
    assert_eq!(values[2], "57600");
    assert_eq!(values[5], "o");
}

#[test]
fn test_keys_are_case_insensitive() {
    let (_driver, mut port) = open_mock();
    port.set_attr("BAUD", "19200");
    assert_eq!(port.get_attr("Baud"), "19200");
    assert_eq!(port.get_attr("baud"), "19200");

    port.set_attr("Dtr", "0");
    assert_eq!(port.get_attr("DTR"), "0");
}

#[test]
fn test_unknown_keys() {
    let (driver, mut port) = open_mock();
    let before = driver.control_block();

    assert_eq!(port.get_attr("bogus"), "");
    assert_eq!(port.get_attr(""), "");
    port.set_attr("bogus", "9600");

    assert_eq!(driver.control_block(), before);
    assert_eq!(driver.modem_status_writes(), 0);
}

#[test]
fn test_batch_get_matches_single_gets() {
    let (_driver, port) = open_mock();
    let keys = ["parity", "bogus", "baud", "baud", "opened"];
    let single: Vec<String> = keys.iter().map(|k| port.get_attr(k)).collect();

    assert_eq!(port.get_attrs(&keys), single);
    assert_eq!(port.get_attrs(&keys), vec!["n", "", "38400", "38400", "true"]);
    assert!(port.get_attrs(&[]).is_empty());
}

#[test]
fn test_batch_set_applies_every_pair() {
    let (_driver, mut port) = open_mock();
    port.set_attrs(&attrs(&[
        ("baud", "9600"),
        ("parity", "Even"),
        ("dtr", "true"),
        ("bogus", "1"),
    ]));

    assert_eq!(port.baud(), 9600);
    assert_eq!(port.parity(), Parity::Even);
    assert!(port.dtr());
    assert_eq!(
        port.get_attrs(&["baud", "parity", "dtr"]),
        vec!["9600", "e", "1"]
    );
}

#[test]
fn test_empty_batch_set_is_a_no_op() {
    let (driver, mut port) = open_mock();
    let writes = driver.control_block_writes();
    port.set_attrs(&HashMap::new());
    assert_eq!(driver.control_block_writes(), writes);
}

#[test]
fn test_read_only_keys_ignore_writes() {
    let (_driver, mut port) = open_mock();
    port.set_attr("name", "/dev/other");
    port.set_attr("opened", "false");
    port.set_attr("cts", "1");

    assert_eq!(port.get_attr("name"), MOCK_PORT);
    assert_eq!(port.get_attr("opened"), "true");
    assert_eq!(port.get_attr("cts"), "0");
    assert!(port.is_open());
}

#[test]
fn test_integer_syntax() {
    let (_driver, mut port) = open_mock();

    port.set_attr("baud", "0x2580");
    assert_eq!(port.baud(), 9600);

    port.set_attr("baud", "0b1001011000000");
    assert_eq!(port.baud(), 4800);

    port.set_attr("baud", "115_200");
    assert_eq!(port.baud(), 115200);

    port.set_attr("bits", "07");
    assert_eq!(port.data_bits(), 7);

    port.set_attr("baud", "fast");
    port.set_attr("baud", "");
    port.set_attr("bits", "seven");
    assert_eq!(port.baud(), 115200);
    assert_eq!(port.data_bits(), 7);
}

#[test]
fn test_out_of_range_values_are_ignored() {
    let (_driver, mut port) = open_mock();
    port.set_attr("bits", "7");

    port.set_attr("bits", "300");
    port.set_attr("bits", "-1");
    port.set_attr("stops", "128");
    port.set_attr("baud", "-9600");
    port.set_attr("baud", "4294967296");

    assert_eq!(port.data_bits(), 7);
    assert_eq!(port.stop_bits(), 1);
    assert_eq!(port.baud(), 38400);
}

#[test]
fn test_parity_uses_first_letter() {
    let (_driver, mut port) = open_mock();

    port.set_attr("parity", "ODD");
    assert_eq!(port.get_attr("parity"), "o");

    port.set_attr("parity", "none");
    assert_eq!(port.get_attr("parity"), "n");

    port.set_attr("parity", "E");
    assert_eq!(port.get_attr("parity"), "e");

    port.set_attr("parity", "mark");
    port.set_attr("parity", "");
    assert_eq!(port.get_attr("parity"), "e");
}

#[test]
fn test_signal_flags() {
    let (_driver, mut port) = open_mock();

    for (value, expected) in [
        ("0", "0"),
        ("true", "1"),
        ("FALSE", "0"),
        ("1", "1"),
        ("false", "0"),
        ("2", "1"),
        ("0x0", "0"),
    ] {
        port.set_attr("dtr", value);
        assert_eq!(port.get_attr("dtr"), expected, "dtr={:?}", value);
    }

    port.set_attr("rts", "0");
    port.set_attr("rts", "yes");
    assert_eq!(port.get_attr("rts"), "0");
}

#[test]
fn test_closed_port_attributes() {
    let driver = MockDriver::new();
    let mut port = Port::new(driver.clone());

    assert_eq!(
        port.get_attrs(&ALL_KEYS),
        vec!["", "false", "0", "0", "0", "n", "0", "0", "0", "0", "0", "0"]
    );

    port.set_attrs(&attrs(&[("baud", "9600"), ("dtr", "0")]));
    assert_eq!(driver.control_block_writes(), 0);
    assert_eq!(driver.modem_status_writes(), 0);

    assert!(port.open(MOCK_PORT));
    port.close();
    assert_eq!(port.get_attr("name"), MOCK_PORT);
    assert_eq!(port.get_attr("opened"), "false");
}

/// Only the attribute capability, no serial line behind it.
#[derive(Default)]
struct Registers {
    values: HashMap<String, String>,
}

impl AttributeAccess for Registers {
    fn get_attr(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    fn set_attr(&mut self, key: &str, value: &str) {
        if self.keys().contains(&key) {
            self.values.insert(key.to_string(), value.to_string());
        }
    }
}

/// Only the byte stream capability.
#[derive(Default)]
struct Loopback {
    open: bool,
    buffer: Vec<u8>,
}

impl ByteStream for Loopback {
    fn open(&mut self, _name: &str) -> bool {
        self.open = true;
        true
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn available(&self) -> u32 {
        self.buffer.len() as u32
    }

    fn flush(&mut self) {
        self.buffer.clear();
    }

    fn read(&mut self, max: u32) -> Vec<u8> {
        let n = if max == 0 { self.buffer.len() } else { (max as usize).min(self.buffer.len()) };
        self.buffer.drain(..n).collect()
    }

    fn write(&mut self, data: &[u8]) {
        if self.open {
            self.buffer.extend_from_slice(data);
        }
    }
}

fn snapshot(target: &impl AttributeAccess) -> Vec<String> {
    target.get_attrs(target.keys())
}

fn echo(stream: &mut impl ByteStream, data: &[u8]) -> Vec<u8> {
    stream.write(data);
    stream.read(0)
}

#[test]
fn test_capabilities_stand_alone() {
    let mut registers = Registers::default();
    registers.set_attrs(&attrs(&[("baud", "9600"), ("bogus", "1")]));
    let values = snapshot(&registers);
    assert_eq!(values.len(), ALL_KEYS.len());
    assert_eq!(values[2], "9600");
    assert_eq!(registers.get_attr("bogus"), "");

    let mut loopback = Loopback::default();
    assert!(loopback.open("loop"));
    assert_eq!(echo(&mut loopback, b"ping"), b"ping");

    let (driver, mut port) = open_mock();
    driver.enqueue_read(b"pong");
    assert_eq!(echo(&mut port, b"ping"), b"pong");
    assert_eq!(snapshot(&port)[1], "true");
}

#[test]
fn test_free_functions_work_on_any_line() {
    let (_driver, mut port) = open_mock();
    attributes::set(&mut port, "stops", "2");
    assert_eq!(attributes::get(&port, "stops"), "2");

    let line: &mut dyn SerialLine = &mut port;
    attributes::set(&mut *line, "baud", "1200");
    assert_eq!(attributes::get(&*line, "baud"), "1200");
}

proptest! {
    #[test]
    fn prop_parse_int_accepts_every_i32(n in any::<i32>()) {
        prop_assert_eq!(parse_int(&n.to_string(), 32), Some(n as i64));
        if n >= 0 {
            prop_assert_eq!(parse_int(&format!("0x{:x}", n), 32), Some(n as i64));
            prop_assert_eq!(parse_int(&format!("0o{:o}", n), 32), Some(n as i64));
        }
    }

    #[test]
    fn prop_parse_int_rejects_beyond_bit_size(n in 128i64..100_000) {
        prop_assert_eq!(parse_int(&n.to_string(), 8), None);
        prop_assert_eq!(parse_int(&(-n - 1).to_string(), 8), None);
    }
}
