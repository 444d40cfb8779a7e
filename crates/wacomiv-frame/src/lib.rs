//! Byte-at-a-time frame assembly for Wacom protocol IV.
//!
//! A protocol IV tablet interleaves two kinds of frame on one line:
//! - 7-byte binary motion packets, marked by bit 7 set on the first byte
//!   and clear on every other byte
//! - ASCII responses to text queries, terminated by a carriage return
//!
//! [`FrameAssembler`] is fed one byte at a time and tells the caller when a
//! complete frame of either kind is ready. It never blocks.

pub mod assembler;
pub mod buffer;
pub mod error;

pub use assembler::{Feed, Frame, FrameAssembler};
pub use buffer::{FrameBuffer, DEFAULT_CAPACITY};
pub use error::{FrameError, Result};

/// Length of a binary motion packet.
pub const PACKET_LENGTH: usize = 7;

/// Bit set on the first byte of every binary packet and on no other byte.
pub const SYNC_BIT: u8 = 0x80;

/// Terminator of ASCII responses.
pub const CR: u8 = b'\r';

/// Returns true if `byte` marks the start of a binary packet.
pub fn is_sync(byte: u8) -> bool {
    byte & SYNC_BIT != 0
}
