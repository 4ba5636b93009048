//! Port abstraction layer for serial communication.
//!
//! Provides the capability traits, the line configuration codec, the modem
//! signal bitmask and the [`Port`] that ties them to a driver. Backends:
//! [`NativeDriver`] for real devices, [`MockDriver`] for tests.

pub mod codec;
pub mod error;
pub mod handle;
pub mod mock;
pub mod native;
pub mod shared;
pub mod signals;
pub mod traits;

pub use codec::{ControlBlock, DataBits, Parity, StopBits};
pub use error::PortError;
pub use handle::Port;
pub use mock::{MockDriver, MockTransport};
pub use native::{NativeDriver, NativeTransport};
pub use shared::SharedPort;
pub use signals::{ModemStatus, Signal};
pub use traits::*;
