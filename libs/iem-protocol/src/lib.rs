//! IEM Protocol Engine
//!
//! Master side of the point-to-point request/response protocol spoken by the
//! IEM over a half-duplex serial line.
//!
//! # Architecture
//!
//! ```text
//! iem-protocol
//!     ├── crc        (CRC-16, generator 0x1021, table driven)
//!     ├── frame      (delimiters + top-nibble byte stuffing)
//!     ├── catalog    (static (selector, subselector) → descriptor table)
//!     ├── transport  (TransportSession: one send, one bounded receive)
//!     └── client     (ProtocolClient: query / command)
//! ```
//!
//! One exchange runs to completion before the next starts. Failures are
//! returned to the caller as [`ProtocolError`]; the engine never retries.

pub mod catalog;
pub mod client;
pub mod constants;
pub mod crc;
pub mod error;
pub mod frame;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export core types
pub use catalog::{lookup, CommandKind, Descriptor, ParamRule, CATALOG};
pub use client::{ProtocolClient, SpeedSensorReference};
pub use error::{ProtocolError, Result};
pub use frame::Message;
pub use transport::{open_serial, SerialParams, TransportSession};
