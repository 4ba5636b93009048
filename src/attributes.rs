//! String-keyed attribute layer over [`SerialLine`].
//!
//! All values cross this boundary as strings. Reads render numbers in
//! decimal, signals as `"1"`/`"0"` and the open flag as `"true"`/`"false"`.
//! Writes that fail to parse are skipped without error.

use crate::port::{Parity, SerialLine};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A known attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Name,
    Opened,
    Baud,
    Bits,
    Stops,
    Parity,
    Dtr,
    Dsr,
    Rts,
    Cts,
    Dcd,
    Ri,
}

impl AttributeKey {
    /// Every key, in the order reported by `keys()`.
    pub const ALL: [AttributeKey; 12] = [
        AttributeKey::Name,
        AttributeKey::Opened,
        AttributeKey::Baud,
        AttributeKey::Bits,
        AttributeKey::Stops,
        AttributeKey::Parity,
        AttributeKey::Dtr,
        AttributeKey::Dsr,
        AttributeKey::Rts,
        AttributeKey::Cts,
        AttributeKey::Dcd,
        AttributeKey::Ri,
    ];

    pub const NAMES: &'static [&'static str] = &[
        "name", "opened", "baud", "bits", "stops", "parity", "dtr", "dsr", "rts", "cts", "dcd",
        "ri",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Name => "name",
            AttributeKey::Opened => "opened",
            AttributeKey::Baud => "baud",
            AttributeKey::Bits => "bits",
            AttributeKey::Stops => "stops",
            AttributeKey::Parity => "parity",
            AttributeKey::Dtr => "dtr",
            AttributeKey::Dsr => "dsr",
            AttributeKey::Rts => "rts",
            AttributeKey::Cts => "cts",
            AttributeKey::Dcd => "dcd",
            AttributeKey::Ri => "ri",
        }
    }

    /// Whether `set` has any effect for this key.
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            AttributeKey::Baud
                | AttributeKey::Bits
                | AttributeKey::Stops
                | AttributeKey::Parity
                | AttributeKey::Dtr
                | AttributeKey::Rts
        )
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown attribute key: {:?}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for AttributeKey {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        AttributeKey::ALL
            .into_iter()
            .find(|key| key.as_str() == lower)
            .ok_or_else(|| UnknownKey(s.to_string()))
    }
}

/// Parse a signed integer that must fit in `bit_size` bits.
///
/// The base comes from the prefix: `0x` hex, `0b` binary, `0o` or a bare
/// leading `0` octal, decimal otherwise. An optional sign goes before the
/// prefix and `_` may separate digits.
pub fn parse_int(input: &str, bit_size: u32) -> Option<i64> {
    let (negative, rest) = match input.as_bytes().first()? {
        b'+' => (false, &input[1..]),
        b'-' => (true, &input[1..]),
        _ => (false, input),
    };

    let (radix, digits, prefixed) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..], true),
        Some("0b" | "0B") => (2, &rest[2..], true),
        Some("0o" | "0O") => (8, &rest[2..], true),
        _ if rest.len() > 1 && rest.starts_with('0') => (8, &rest[1..], true),
        _ => (10, rest, false),
    };

    if !separators_ok(digits, prefixed) {
        return None;
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = u64::from_str_radix(&cleaned, radix).ok()?;
    let limit = 1u64 << (bit_size - 1);
    if negative {
        if magnitude > limit {
            return None;
        }
        Some((magnitude as i64).wrapping_neg())
    } else {
        if magnitude >= limit {
            return None;
        }
        Some(magnitude as i64)
    }
}

// Underscores only between digits, or directly after a base prefix.
fn separators_ok(digits: &str, prefixed: bool) -> bool {
    if digits.ends_with('_') || digits.contains("__") {
        return false;
    }
    prefixed || !digits.starts_with('_')
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = match value.to_lowercase().as_str() {
        "true" => "1".to_string(),
        "false" => "0".to_string(),
        _ => value.to_string(),
    };
    parse_int(&value, 8).map(|n| n as u8 != 0)
}

fn flag(asserted: bool) -> String {
    u8::from(asserted).to_string()
}

/// Read one attribute from `line`. Unknown keys read as `""`.
pub fn get<L: SerialLine + ?Sized>(line: &L, key: &str) -> String {
    let Ok(key) = key.parse::<AttributeKey>() else {
        return String::new();
    };
    match key {
        AttributeKey::Name => line.name(),
        AttributeKey::Opened => line.is_open().to_string(),
        AttributeKey::Baud => line.baud().to_string(),
        AttributeKey::Bits => line.data_bits().to_string(),
        AttributeKey::Stops => line.stop_bits().to_string(),
        AttributeKey::Parity => line.parity().symbol().to_string(),
        AttributeKey::Dtr => flag(line.dtr()),
        AttributeKey::Dsr => flag(line.dsr()),
        AttributeKey::Rts => flag(line.rts()),
        AttributeKey::Cts => flag(line.cts()),
        AttributeKey::Dcd => flag(line.dcd()),
        AttributeKey::Ri => flag(line.ri()),
    }
}

/// Write one attribute on `line`. Unknown keys, read-only keys and values
/// that do not parse are ignored.
pub fn set<L: SerialLine + ?Sized>(line: &mut L, key: &str, value: &str) {
    let Ok(key) = key.parse::<AttributeKey>() else {
        debug!("Ignoring unknown attribute {:?}", key);
        return;
    };
    match key {
        AttributeKey::Baud => match parse_int(value, 32) {
            Some(n) => line.set_baud(n as u32),
            None => debug!("Ignoring unparseable baud {:?}", value),
        },
        AttributeKey::Bits => match parse_int(value, 8) {
            Some(n) => line.set_data_bits(n as u8),
            None => debug!("Ignoring unparseable bits {:?}", value),
        },
        AttributeKey::Stops => match parse_int(value, 8) {
            Some(n) => line.set_stop_bits(n as u8),
            None => debug!("Ignoring unparseable stops {:?}", value),
        },
        AttributeKey::Parity => {
            let Some(first) = value.to_lowercase().chars().next() else {
                return;
            };
            match Parity::from_symbol(&first.to_string()) {
                Some(parity) => line.set_parity(parity),
                None => debug!("Ignoring unknown parity {:?}", value),
            }
        }
        AttributeKey::Dtr => match parse_flag(value) {
            Some(on) => line.set_dtr(on),
            None => debug!("Ignoring unparseable dtr {:?}", value),
        },
        AttributeKey::Rts => match parse_flag(value) {
            Some(on) => line.set_rts(on),
            None => debug!("Ignoring unparseable rts {:?}", value),
        },
        _ => debug!("Attribute {} is read-only", key),
    }
}
