//! Modem control signal bitmask.
//!
//! Bit positions follow the Linux `TIOCM_*` constants so a native backend
//! can pass the mask straight through `TIOCMGET`/`TIOCMSET`.

use std::fmt;

/// A modem control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Data Terminal Ready (output).
    Dtr,
    /// Request To Send (output).
    Rts,
    /// Data Set Ready (input).
    Dsr,
    /// Data Carrier Detect (input).
    Dcd,
    /// Clear To Send (input).
    Cts,
    /// Ring Indicator (input).
    Ri,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::Dtr,
        Signal::Rts,
        Signal::Dsr,
        Signal::Dcd,
        Signal::Cts,
        Signal::Ri,
    ];

    pub fn mask(self) -> u32 {
        match self {
            Signal::Dtr => ModemStatus::DTR,
            Signal::Rts => ModemStatus::RTS,
            Signal::Dsr => ModemStatus::DSR,
            Signal::Dcd => ModemStatus::CD,
            Signal::Cts => ModemStatus::CTS,
            Signal::Ri => ModemStatus::RI,
        }
    }

    /// Whether the line is driven by this side and may be written.
    pub fn is_output(self) -> bool {
        matches!(self, Signal::Dtr | Signal::Rts)
    }
}

/// Full modem status bitmask as reported by the transport.
///
/// Bits this crate has no name for are carried through untouched.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct ModemStatus(pub u32);

impl ModemStatus {
    pub const LE: u32 = 0x001;
    pub const DTR: u32 = 0x002;
    pub const RTS: u32 = 0x004;
    pub const ST: u32 = 0x008;
    pub const SR: u32 = 0x010;
    pub const CTS: u32 = 0x020;
    pub const CD: u32 = 0x040;
    pub const RI: u32 = 0x080;
    pub const DSR: u32 = 0x100;

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, signal: Signal) -> bool {
        self.0 & signal.mask() != 0
    }

    /// Copy of this mask with only `signal` changed.
    #[must_use]
    pub fn with(self, signal: Signal, asserted: bool) -> Self {
        if asserted {
            Self(self.0 | signal.mask())
        } else {
            Self(self.0 & !signal.mask())
        }
    }
}

impl fmt::Debug for ModemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for signal in Signal::ALL {
            if self.contains(signal) {
                set.entry(&signal);
            }
        }
        set.finish()?;
        write!(f, " ({:#05x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct() {
        let mut seen = 0u32;
        for signal in Signal::ALL {
            assert_eq!(seen & signal.mask(), 0, "{:?} overlaps", signal);
            seen |= signal.mask();
        }
    }

    #[test]
    fn test_with_only_touches_target() {
        let status = ModemStatus(ModemStatus::LE | ModemStatus::RTS | ModemStatus::CTS | 0x4000);

        let raised = status.with(Signal::Dtr, true);
        assert_eq!(raised.bits(), status.bits() | ModemStatus::DTR);

        let lowered = raised.with(Signal::Rts, false);
        assert_eq!(
            lowered.bits(),
            ModemStatus::LE | ModemStatus::DTR | ModemStatus::CTS | 0x4000
        );
    }

    #[test]
    fn test_outputs() {
        let outputs: Vec<Signal> = Signal::ALL.into_iter().filter(|s| s.is_output()).collect();
        assert_eq!(outputs, vec![Signal::Dtr, Signal::Rts]);
    }

    #[test]
    fn test_debug_lists_asserted_lines() {
        let status = ModemStatus(ModemStatus::DTR | ModemStatus::RI);
        assert_eq!(format!("{:?}", status), "{Dtr, Ri} (0x082)");
    }
}
