use bytes::{Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Default accumulation capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 32;

/// Capacity-bounded byte accumulator.
///
/// The length never exceeds the capacity: [`push`](Self::push) refuses the
/// byte with [`FrameError::Overflow`] instead.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: BytesMut,
    capacity: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A buffer holding at most `capacity` bytes (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            return Err(FrameError::Overflow {
                capacity: self.capacity,
            });
        }
        self.buf.extend_from_slice(&[byte]);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Take the buffered bytes, leaving the buffer empty.
    pub fn take(&mut self) -> Bytes {
        self.buf.split().freeze()
    }

    pub fn first(&self) -> Option<u8> {
        self.buf.first().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
