//! Probe for serial devices and print their line settings.
//!
//! ```bash
//! cargo run --example check_ports
//! ```

use serial_attr::config::DiscoveryConfig;
use serial_attr::discovery::scan_ports;
use serial_attr::port::{AttributeAccess, ByteStream, NativeDriver, Port};

fn main() {
    println!("Serial Port Detection Utility");
    println!("{:=<70}", "");

    let ports = scan_ports(&DiscoveryConfig::default());
    if ports.is_empty() {
        println!("No candidate device names exist on this system.");
        return;
    }

    for name in ports {
        let mut port = Port::new(NativeDriver::default());
        if !port.open(&name) {
            println!("{:<20} present, could not open", name);
            continue;
        }
        let values = port.get_attrs(&["baud", "bits", "parity", "stops", "dtr", "rts"]);
        println!(
            "{:<20} {} {}{}{}  dtr={} rts={}",
            name, values[0], values[1], values[2], values[3], values[4], values[5]
        );
        port.close();
    }
}
