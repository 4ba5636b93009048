//! Drive a port entirely through string attributes.
//!
//! Runs against the in-memory driver, so no hardware is needed.
//!
//! ```bash
//! cargo run --example attribute_scripting
//! ```

use serial_attr::port::{AttributeAccess, ByteStream, MockDriver, Port, Signal};
use std::collections::HashMap;

fn main() {
    let driver = MockDriver::new();
    let mut port = Port::new(driver.clone());

    println!("Before open:");
    dump(&port);

    if !port.open("/dev/ttyMOCK0") {
        eprintln!("open failed");
        return;
    }

    let script = [
        ("baud", "0x1C200"),
        ("bits", "7"),
        ("parity", "Even"),
        ("stops", "2"),
        ("dtr", "false"),
        ("speed", "fast"),
    ];
    for (key, value) in script {
        port.set_attr(key, value);
        println!("set {}={} -> {:?}", key, value, port.get_attr(key));
    }

    driver.set_line(Signal::Cts, true);
    driver.set_line(Signal::Dcd, true);

    println!("\nAfter script:");
    dump(&port);

    let restore = HashMap::from([
        ("baud".to_string(), "9600".to_string()),
        ("parity".to_string(), "n".to_string()),
        ("dtr".to_string(), "1".to_string()),
    ]);
    port.set_attrs(&restore);

    println!("\nRestored:");
    dump(&port);
}

fn dump(port: &impl AttributeAccess) {
    let keys = port.keys();
    for (key, value) in keys.iter().zip(port.get_attrs(keys)) {
        println!("  {:<7}{}", key, value);
    }
}
