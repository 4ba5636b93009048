//! Command line interface: argument definitions and command execution.
//!
//! Commands run against any [`Driver`], so the binary uses the native
//! backend while tests drive the same code with the mock.

use crate::attributes::AttributeKey;
use crate::config::Config;
use crate::discovery;
use crate::error::AppError;
use crate::port::{AttributeAccess, ByteStream, Driver, Port};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

/// Inspect and configure serial ports through named attributes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (overrides the standard search path).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List candidate device names that exist on this host.
    Ports,

    /// List the attribute keys.
    Keys,

    /// Print attributes of a port (all of them if no key is given).
    Get {
        /// Device name or configured alias.
        port: String,
        /// Attribute keys to print.
        keys: Vec<String>,
        /// Print a JSON object instead of key=value lines.
        #[arg(long)]
        json: bool,
    },

    /// Set attributes on a port and print the resulting values.
    Set {
        /// Device name or configured alias.
        port: String,
        /// Assignments in KEY=VALUE form.
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },

    /// Print the bytes currently waiting on a port.
    Read {
        /// Device name or configured alias.
        port: String,
        /// Maximum number of bytes (0 for everything available).
        #[arg(short, long, default_value_t = 0)]
        max: u32,
    },

    /// Send text to a port.
    Write {
        /// Device name or configured alias.
        port: String,
        /// Text to send.
        text: String,
    },

    /// Open a port and apply the configured line settings.
    Configure {
        /// Device name or configured alias.
        port: String,
    },
}

fn parse_assignment(assignment: &str) -> Result<(String, String), AppError> {
    assignment
        .split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| {
            AppError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", assignment))
        })
}

fn open<D: Driver>(driver: D, config: &Config, name: &str) -> Result<Port<D>, AppError> {
    let name = config.port.resolve_port(name);
    let mut port = Port::new(driver);
    if !port.open(&name) {
        return Err(AppError::OpenFailed(name));
    }
    Ok(port)
}

fn print_attrs<W: Write>(
    out: &mut W,
    port: &impl AttributeAccess,
    keys: &[&str],
) -> Result<(), AppError> {
    for (key, value) in keys.iter().zip(port.get_attrs(keys)) {
        writeln!(out, "{}={}", key.to_lowercase(), value)?;
    }
    Ok(())
}

/// Run one command, writing its output to `out`.
pub fn execute<D: Driver, W: Write>(
    command: &Command,
    driver: D,
    config: &Config,
    out: &mut W,
) -> Result<(), AppError> {
    match command {
        Command::Ports => {
            for name in discovery::scan_ports(&config.discovery) {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Keys => {
            for key in AttributeKey::NAMES {
                writeln!(out, "{}", key)?;
            }
        }
        Command::Get { port, keys, json } => {
            let port = open(driver, config, port)?;
            let keys: Vec<&str> = if keys.is_empty() {
                port.keys().to_vec()
            } else {
                keys.iter().map(String::as_str).collect()
            };
            if *json {
                let object: serde_json::Map<String, serde_json::Value> = keys
                    .iter()
                    .zip(port.get_attrs(&keys))
                    .map(|(k, v)| (k.to_lowercase(), serde_json::Value::String(v)))
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&object)?)?;
            } else {
                print_attrs(out, &port, &keys)?;
            }
        }
        Command::Set { port, assignments } => {
            let attrs = assignments
                .iter()
                .map(String::as_str)
                .map(parse_assignment)
                .collect::<Result<HashMap<_, _>, _>>()?;
            let mut port = open(driver, config, port)?;
            port.set_attrs(&attrs);

            let keys: Vec<&str> = assignments
                .iter()
                .filter_map(|a| a.split_once('=').map(|(k, _)| k.trim()))
                .collect();
            print_attrs(out, &port, &keys)?;
        }
        Command::Read { port, max } => {
            let mut port = open(driver, config, port)?;
            let data = port.read(*max);
            out.write_all(&data)?;
        }
        Command::Write { port, text } => {
            let mut port = open(driver, config, port)?;
            port.write(text.as_bytes());
        }
        Command::Configure { port } => {
            let mut port = open(driver, config, port)?;
            port.set_attrs(&config.port.attributes());
            print_attrs(out, &port, &["baud", "bits", "stops", "parity"])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("baud=9600").unwrap(),
            ("baud".to_string(), "9600".to_string())
        );
        assert_eq!(
            parse_assignment(" dtr = true ").unwrap(),
            ("dtr".to_string(), "true".to_string())
        );
        assert_eq!(
            parse_assignment("parity=").unwrap(),
            ("parity".to_string(), String::new())
        );
        assert!(parse_assignment("baud").is_err());
        assert!(parse_assignment("=9600").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["serial-attr", "-v", "get", "/dev/ttyUSB0", "baud", "--json"]);
        assert_eq!(cli.verbose, 1);
        assert_eq!(
            cli.command,
            Command::Get {
                port: "/dev/ttyUSB0".into(),
                keys: vec!["baud".into()],
                json: true,
            }
        );

        let cli = Cli::parse_from(["serial-attr", "set", "modem", "baud=19200", "dtr=0"]);
        assert!(matches!(cli.command, Command::Set { ref assignments, .. } if assignments.len() == 2));

        assert!(Cli::try_parse_from(["serial-attr", "set", "modem"]).is_err());
    }
}
