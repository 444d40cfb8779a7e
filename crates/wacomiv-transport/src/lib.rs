//! Serial line transport for Wacom protocol IV tablets.
//!
//! This is the lowest layer of wacomiv. It opens a serial port at 8N1 and a
//! fixed rate, and hands back a [`SerialStream`] that the upper layers read
//! one chunk at a time and write command strings to.
//!
//! Rate negotiation is not attempted: the tablet is expected to already be
//! talking at the configured rate.

pub mod config;
pub mod error;
pub mod serial;
pub mod stream;

pub use config::{BaudRate, LinkConfig};
pub use error::{Result, TransportError};
pub use serial::open;
pub use stream::SerialStream;
