use bytes::Bytes;
use tracing::debug;

use crate::buffer::FrameBuffer;
use crate::{is_sync, CR, PACKET_LENGTH};

/// A complete frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A binary motion packet. Byte 0 always has the sync bit set.
    Packet([u8; PACKET_LENGTH]),
    /// An ASCII response without its trailing carriage return.
    Response(Bytes),
}

/// Result of feeding one byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    Ready(Frame),
    Incomplete,
}

/// Splits the inbound byte stream into packets and responses.
///
/// - A byte with the sync bit set always starts a new packet, discarding
///   whatever was being accumulated.
/// - A full buffer is thrown away as garbage before the next byte is stored.
/// - Seven bytes starting with a sync byte make a packet.
/// - A carriage return completes a response, unless the buffer started with
///   a sync byte (CR is ordinary 7-bit payload inside a packet).
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buf: FrameBuffer,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: FrameBuffer::with_capacity(capacity.max(PACKET_LENGTH)),
        }
    }

    /// Feed one byte from the line.
    pub fn feed(&mut self, byte: u8) -> Feed {
        if is_sync(byte) && !self.buf.is_empty() {
            debug!(
                discarded = self.buf.len(),
                "sync byte interrupted partial frame"
            );
            self.buf.clear();
        }

        if let Err(err) = self.buf.push(byte) {
            debug!(%err, "throwing away {} bytes of garbage", self.buf.len());
            self.buf.clear();
            // Cannot fail: the buffer is empty and holds at least one byte.
            let _ = self.buf.push(byte);
        }

        let starts_with_sync = self.buf.first().is_some_and(is_sync);

        if starts_with_sync && self.buf.len() == PACKET_LENGTH {
            let mut packet = [0u8; PACKET_LENGTH];
            packet.copy_from_slice(self.buf.as_slice());
            self.buf.clear();
            return Feed::Ready(Frame::Packet(packet));
        }

        if byte == CR && !starts_with_sync {
            let mut text = self.buf.take();
            text.truncate(text.len() - 1);
            return Feed::Ready(Frame::Response(text));
        }

        Feed::Incomplete
    }

    /// Number of bytes of the frame in progress.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Take an unterminated response that is still being accumulated.
    ///
    /// Returns `None` (and leaves the buffer alone) when nothing is buffered
    /// or the partial frame is a binary packet.
    pub fn take_partial_response(&mut self) -> Option<Bytes> {
        match self.buf.first() {
            Some(first) if !is_sync(first) => Some(self.buf.take()),
            _ => None,
        }
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::DEFAULT_CAPACITY;

    fn feed_all(assembler: &mut FrameAssembler, bytes: &[u8]) -> Vec<Frame> {
        bytes
            .iter()
            .filter_map(|&b| match assembler.feed(b) {
                Feed::Ready(frame) => Some(frame),
                Feed::Incomplete => None,
            })
            .collect()
    }

    #[test]
    fn assembles_binary_packet() {
        let mut assembler = FrameAssembler::new();
        let bytes = [0xC0, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];

        for &b in &bytes[..6] {
            assert_eq!(assembler.feed(b), Feed::Incomplete);
        }
        assert_eq!(
            assembler.feed(bytes[6]),
            Feed::Ready(Frame::Packet(bytes))
        );
        assert_eq!(assembler.pending_len(), 0);
    }

    #[test]
    fn text_response_drops_terminator() {
        let mut assembler = FrameAssembler::new();
        let frames = feed_all(&mut assembler, b"~C5103,3711\r");
        assert_eq!(
            frames,
            vec![Frame::Response(Bytes::from_static(b"~C5103,3711"))]
        );
        assert_eq!(assembler.pending_len(), 0);
    }

    #[test]
    fn carriage_return_inside_packet_is_payload() {
        let mut assembler = FrameAssembler::new();
        let bytes = [0xE0, CR, 0x00, CR, 0x00, 0x00, CR];
        let frames = feed_all(&mut assembler, &bytes);
        assert_eq!(frames, vec![Frame::Packet(bytes)]);
    }

    #[test]
    fn sync_byte_resets_partial_text() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, b"~#ET");
        assert_eq!(assembler.pending_len(), 4);

        let packet = [0x80, 0, 0, 0, 0, 0, 0x40];
        let frames = feed_all(&mut assembler, &packet);
        assert_eq!(frames, vec![Frame::Packet(packet)]);
    }

    #[test]
    fn short_packet_interrupted_by_sync_is_dropped() {
        let mut assembler = FrameAssembler::new();
        let mut bytes = vec![0xC0, 0x11, 0x22];
        let packet = [0xA0, 1, 2, 3, 4, 5, 6];
        bytes.extend_from_slice(&packet);

        let frames = feed_all(&mut assembler, &bytes);
        assert_eq!(frames, vec![Frame::Packet(packet)]);
    }

    #[test]
    fn overflow_discards_garbage() {
        let mut assembler = FrameAssembler::new();
        let garbage = vec![b'x'; DEFAULT_CAPACITY];
        assert!(feed_all(&mut assembler, &garbage).is_empty());
        assert_eq!(assembler.pending_len(), DEFAULT_CAPACITY);

        let frames = feed_all(&mut assembler, b"~C1,2\r");
        assert_eq!(frames, vec![Frame::Response(Bytes::from_static(b"~C1,2"))]);
    }

    #[test]
    fn lone_carriage_return_is_empty_response() {
        let mut assembler = FrameAssembler::new();
        assert_eq!(
            assembler.feed(CR),
            Feed::Ready(Frame::Response(Bytes::new()))
        );
    }

    #[test]
    fn partial_response_can_be_taken() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, b"~R00,0,0");
        let partial = assembler.take_partial_response().unwrap();
        assert_eq!(partial.as_ref(), b"~R00,0,0");
        assert_eq!(assembler.pending_len(), 0);
        assert!(assembler.take_partial_response().is_none());
    }

    #[test]
    fn partial_packet_is_not_taken_as_response() {
        let mut assembler = FrameAssembler::new();
        feed_all(&mut assembler, &[0xC0, 0x01]);
        assert!(assembler.take_partial_response().is_none());
        assert_eq!(assembler.pending_len(), 2);

        assembler.reset();
        assert_eq!(assembler.pending_len(), 0);
    }

    #[test]
    fn capacity_never_below_packet_length() {
        let mut assembler = FrameAssembler::with_capacity(2);
        let packet = [0x80, 1, 2, 3, 4, 5, 6];
        assert_eq!(feed_all(&mut assembler, &packet), vec![Frame::Packet(packet)]);
    }

    #[test]
    fn arbitrary_streams_keep_framing_invariants() {
        let mut assembler = FrameAssembler::new();
        let mut seed: u32 = 0x1234_5678;

        for _ in 0..20_000 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let byte = match seed >> 28 {
                0 => CR,
                1 | 2 => 0x80 | (seed >> 8) as u8,
                _ => (seed >> 16) as u8 & 0x7f,
            };

            match assembler.feed(byte) {
                Feed::Ready(Frame::Packet(packet)) => {
                    assert_eq!(packet.len(), PACKET_LENGTH);
                    assert!(is_sync(packet[0]));
                }
                Feed::Ready(Frame::Response(text)) => {
                    assert!(text.first().is_none_or(|&b| !is_sync(b)));
                }
                Feed::Incomplete => {}
            }

            assert!(assembler.pending_len() <= DEFAULT_CAPACITY);
            if is_sync(byte) {
                assert_eq!(assembler.pending_len(), 1);
            }
        }
    }
}
