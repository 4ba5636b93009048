//! Line configuration codec.
//!
//! Translates symbolic line settings (baud rate, character size, stop bits,
//! parity) to and from the hardware control block. Bit values follow the
//! Linux termios layout so a real backend can hand the block to the kernel
//! unchanged; other backends treat it as opaque.

use serde::{Deserialize, Serialize};

/// Character size mask in `cflag`.
pub const CSIZE: u32 = 0o60;
pub const CS5: u32 = 0o00;
pub const CS6: u32 = 0o20;
pub const CS7: u32 = 0o40;
pub const CS8: u32 = 0o60;
/// Two stop bits when set, one when clear.
pub const CSTOPB: u32 = 0o100;
pub const CREAD: u32 = 0o200;
pub const PARENB: u32 = 0o400;
pub const PARODD: u32 = 0o1000;
pub const HUPCL: u32 = 0o2000;
pub const CLOCAL: u32 = 0o4000;

pub const ISIG: u32 = 0o1;
pub const ICANON: u32 = 0o2;
pub const ECHO: u32 = 0o10;
pub const ECHOE: u32 = 0o20;
pub const ECHOK: u32 = 0o40;
pub const ECHONL: u32 = 0o100;
pub const IEXTEN: u32 = 0o100000;

pub const BRKINT: u32 = 0o2;
pub const INPCK: u32 = 0o20;
pub const ISTRIP: u32 = 0o40;
pub const ICRNL: u32 = 0o400;
pub const IXON: u32 = 0o2000;

pub const OPOST: u32 = 0o1;

/// Speed code for a hung-up line.
pub const B0: u32 = 0;
pub const B38400: u32 = 0o17;
/// Speed code reported for a rate outside the standard table.
pub const BOTHER: u32 = 0o10000;

/// Standard rates and their hardware speed codes, ascending by rate.
pub const BAUD_TABLE: [(u32, u32); 30] = [
    (50, 0o1),
    (75, 0o2),
    (110, 0o3),
    (134, 0o4),
    (150, 0o5),
    (200, 0o6),
    (300, 0o7),
    (600, 0o10),
    (1200, 0o11),
    (1800, 0o12),
    (2400, 0o13),
    (4800, 0o14),
    (9600, 0o15),
    (19200, 0o16),
    (38400, B38400),
    (57600, 0o10001),
    (115200, 0o10002),
    (230400, 0o10003),
    (460800, 0o10004),
    (500000, 0o10005),
    (576000, 0o10006),
    (921600, 0o10007),
    (1000000, 0o10010),
    (1152000, 0o10011),
    (1500000, 0o10012),
    (2000000, 0o10013),
    (2500000, 0o10014),
    (3000000, 0o10015),
    (3500000, 0o10016),
    (4000000, 0o10017),
];

/// Speed code for a standard rate, or `None` if the rate is not in the table.
pub fn encode_baud(rate: u32) -> Option<u32> {
    BAUD_TABLE
        .iter()
        .find(|&&(r, _)| r == rate)
        .map(|&(_, code)| code)
}

/// Rate for a hardware speed code; unknown codes decode to 0.
pub fn decode_baud(code: u32) -> u32 {
    BAUD_TABLE
        .iter()
        .find(|&&(_, c)| c == code)
        .map_or(0, |&(rate, _)| rate)
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

const DATA_BITS_TABLE: [(DataBits, u8, u32); 4] = [
    (DataBits::Five, 5, CS5),
    (DataBits::Six, 6, CS6),
    (DataBits::Seven, 7, CS7),
    (DataBits::Eight, 8, CS8),
];

impl DataBits {
    /// Look up a character size by bit count.
    pub fn from_count(count: u8) -> Option<Self> {
        DATA_BITS_TABLE
            .iter()
            .find(|&&(_, n, _)| n == count)
            .map(|&(bits, _, _)| bits)
    }

    /// The bit count of this character size.
    pub fn count(self) -> u8 {
        DATA_BITS_TABLE
            .iter()
            .find(|&&(bits, _, _)| bits == self)
            .map_or(0, |&(_, n, _)| n)
    }

    fn flag(self) -> u32 {
        DATA_BITS_TABLE
            .iter()
            .find(|&&(bits, _, _)| bits == self)
            .map_or(CS8, |&(_, _, flag)| flag)
    }

    fn from_flag(flag: u32) -> Self {
        DATA_BITS_TABLE
            .iter()
            .find(|&&(_, _, f)| f == flag & CSIZE)
            .map_or(Self::Eight, |&(bits, _, _)| bits)
    }
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

impl From<serialport::DataBits> for DataBits {
    fn from(bits: serialport::DataBits) -> Self {
        match bits {
            serialport::DataBits::Five => DataBits::Five,
            serialport::DataBits::Six => DataBits::Six,
            serialport::DataBits::Seven => DataBits::Seven,
            serialport::DataBits::Eight => DataBits::Eight,
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    /// Look up a stop bit setting by count; only 1 and 2 exist.
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

impl From<serialport::StopBits> for StopBits {
    fn from(bits: serialport::StopBits) -> Self {
        match bits {
            serialport::StopBits::One => StopBits::One,
            serialport::StopBits::Two => StopBits::Two,
        }
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl Parity {
    /// Parse the one-letter parity symbol: `n`, `o` or `e`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "n" => Some(Self::None),
            "o" => Some(Self::Odd),
            "e" => Some(Self::Even),
            _ => None,
        }
    }

    /// The one-letter symbol used on the attribute interface.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::None => "n",
            Self::Odd => "o",
            Self::Even => "e",
        }
    }
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

impl From<serialport::Parity> for Parity {
    fn from(parity: serialport::Parity) -> Self {
        match parity {
            serialport::Parity::None => Parity::None,
            serialport::Parity::Odd => Parity::Odd,
            serialport::Parity::Even => Parity::Even,
        }
    }
}

/// Hardware control block for one line.
///
/// Mirrors the fields of `struct termios` that the core touches. The
/// `Default` value is the state of a freshly created Linux tty: 38400 baud,
/// 8 data bits, canonical mode with echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBlock {
    pub iflag: u32,
    pub oflag: u32,
    pub cflag: u32,
    pub lflag: u32,
    pub vmin: u8,
    pub vtime: u8,
    pub ispeed: u32,
    pub ospeed: u32,
}

impl Default for ControlBlock {
    fn default() -> Self {
        Self {
            iflag: ICRNL | IXON,
            oflag: OPOST,
            cflag: CS8 | CREAD | HUPCL,
            lflag: ISIG | ICANON | ECHO | ECHOE | ECHOK | IEXTEN,
            vmin: 1,
            vtime: 0,
            ispeed: B38400,
            ospeed: B38400,
        }
    }
}

impl ControlBlock {
    /// Input speed code; the rate reported for the line.
    pub fn speed(&self) -> u32 {
        self.ispeed
    }

    /// Set both input and output speed codes.
    pub fn set_speed(&mut self, code: u32) {
        self.ispeed = code;
        self.ospeed = code;
    }

    pub fn baud(&self) -> u32 {
        decode_baud(self.ispeed)
    }

    pub fn data_bits(&self) -> DataBits {
        DataBits::from_flag(self.cflag)
    }

    pub fn set_data_bits(&mut self, bits: DataBits) {
        self.cflag = (self.cflag & !CSIZE) | bits.flag();
    }

    pub fn stop_bits(&self) -> StopBits {
        if self.cflag & CSTOPB != 0 {
            StopBits::Two
        } else {
            StopBits::One
        }
    }

    pub fn set_stop_bits(&mut self, stops: StopBits) {
        match stops {
            StopBits::One => self.cflag &= !CSTOPB,
            StopBits::Two => self.cflag |= CSTOPB,
        }
    }

    pub fn parity(&self) -> Parity {
        match (self.cflag & PARENB != 0, self.cflag & PARODD != 0) {
            (false, _) => Parity::None,
            (true, true) => Parity::Odd,
            (true, false) => Parity::Even,
        }
    }

    /// Only the enable and odd flags change; `PARODD` is left alone for `None`.
    pub fn set_parity(&mut self, parity: Parity) {
        match parity {
            Parity::None => self.cflag &= !PARENB,
            Parity::Odd => self.cflag |= PARENB | PARODD,
            Parity::Even => {
                self.cflag |= PARENB;
                self.cflag &= !PARODD;
            }
        }
    }

    /// Switch to raw byte mode: receiver on, modem control lines ignored,
    /// no line discipline processing, reads return after one byte.
    pub fn make_raw(&mut self) {
        self.cflag |= CLOCAL | CREAD;
        self.lflag &= !(ICANON | ECHO | ECHOE | ECHOK | ECHONL | ISIG | IEXTEN);
        self.iflag &= !(BRKINT | ICRNL | INPCK | ISTRIP | IXON);
        self.oflag &= !OPOST;
        self.vmin = 1;
        self.vtime = 0;
    }

    /// Whether [`make_raw`](Self::make_raw) has been applied.
    pub fn is_raw(&self) -> bool {
        self.cflag & (CLOCAL | CREAD) == (CLOCAL | CREAD)
            && self.lflag & (ICANON | ECHO | ISIG | IEXTEN) == 0
            && self.iflag & (ICRNL | IXON) == 0
            && self.oflag & OPOST == 0
            && self.vmin == 1
            && self.vtime == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_baud_table_is_bijective() {
        let rates: HashSet<u32> = BAUD_TABLE.iter().map(|&(r, _)| r).collect();
        let codes: HashSet<u32> = BAUD_TABLE.iter().map(|&(_, c)| c).collect();
        assert_eq!(rates.len(), BAUD_TABLE.len());
        assert_eq!(codes.len(), BAUD_TABLE.len());

        for &(rate, code) in BAUD_TABLE.iter() {
            assert_eq!(encode_baud(rate), Some(code));
            assert_eq!(decode_baud(code), rate);
        }
    }

    #[test]
    fn test_baud_table_bounds() {
        assert_eq!(BAUD_TABLE.first().map(|e| e.0), Some(50));
        assert_eq!(BAUD_TABLE.last().map(|e| e.0), Some(4_000_000));
    }

    #[test]
    fn test_unknown_baud() {
        assert_eq!(encode_baud(0), None);
        assert_eq!(encode_baud(12345), None);
        assert_eq!(encode_baud(10_000_000), None);
        assert_eq!(decode_baud(B0), 0);
        assert_eq!(decode_baud(BOTHER), 0);
        assert_eq!(decode_baud(0xdead), 0);
    }

    #[test]
    fn test_data_bits_table() {
        for count in 5..=8 {
            let bits = DataBits::from_count(count).unwrap();
            assert_eq!(bits.count(), count);

            let mut block = ControlBlock::default();
            block.set_data_bits(bits);
            assert_eq!(block.data_bits(), bits);
        }
        assert_eq!(DataBits::from_count(4), None);
        assert_eq!(DataBits::from_count(9), None);
        assert_eq!(DataBits::from_count(0), None);
    }

    #[test]
    fn test_data_bits_keeps_other_flags() {
        let mut block = ControlBlock::default();
        block.cflag |= CSTOPB | PARENB;
        block.set_data_bits(DataBits::Five);
        assert_eq!(block.cflag & CSIZE, CS5);
        assert_eq!(block.cflag & (CSTOPB | PARENB), CSTOPB | PARENB);
    }

    #[test]
    fn test_stop_bits_flag() {
        let mut block = ControlBlock::default();
        block.set_stop_bits(StopBits::Two);
        assert_ne!(block.cflag & CSTOPB, 0);
        assert_eq!(block.stop_bits(), StopBits::Two);

        block.set_stop_bits(StopBits::One);
        assert_eq!(block.cflag & CSTOPB, 0);
        assert_eq!(block.stop_bits(), StopBits::One);

        assert_eq!(StopBits::from_count(3), None);
        assert_eq!(StopBits::from_count(0), None);
    }

    #[test]
    fn test_parity_flags() {
        let mut block = ControlBlock::default();

        block.set_parity(Parity::Odd);
        assert_eq!(block.cflag & (PARENB | PARODD), PARENB | PARODD);
        assert_eq!(block.parity(), Parity::Odd);

        block.set_parity(Parity::Even);
        assert_eq!(block.cflag & (PARENB | PARODD), PARENB);
        assert_eq!(block.parity(), Parity::Even);

        block.set_parity(Parity::None);
        assert_eq!(block.cflag & PARENB, 0);
        assert_eq!(block.parity(), Parity::None);
    }

    #[test]
    fn test_parity_disabled_ignores_odd_flag() {
        let block = ControlBlock {
            cflag: CS8 | PARODD,
            ..ControlBlock::default()
        };
        assert_eq!(block.parity(), Parity::None);
    }

    #[test]
    fn test_parity_symbols() {
        for parity in [Parity::None, Parity::Odd, Parity::Even] {
            assert_eq!(Parity::from_symbol(parity.symbol()), Some(parity));
        }
        assert_eq!(Parity::from_symbol("N"), None);
        assert_eq!(Parity::from_symbol("x"), None);
        assert_eq!(Parity::from_symbol(""), None);
    }

    #[test]
    fn test_make_raw() {
        let mut block = ControlBlock::default();
        assert!(!block.is_raw());
        let speed = block.speed();

        block.make_raw();
        assert!(block.is_raw());
        assert_eq!(block.speed(), speed);
        assert_eq!(block.data_bits(), DataBits::Eight);
        assert_eq!(block.cflag & HUPCL, HUPCL);
    }

    #[test]
    fn test_serialport_conversions() {
        let bits: serialport::DataBits = DataBits::Seven.into();
        assert_eq!(bits, serialport::DataBits::Seven);
        assert_eq!(DataBits::from(serialport::DataBits::Six), DataBits::Six);

        let parity: serialport::Parity = Parity::Even.into();
        assert_eq!(parity, serialport::Parity::Even);
        assert_eq!(Parity::from(serialport::Parity::Odd), Parity::Odd);

        let stops: serialport::StopBits = StopBits::Two.into();
        assert_eq!(stops, serialport::StopBits::Two);
    }
}
