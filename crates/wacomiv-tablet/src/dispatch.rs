use wacomiv_frame::Frame;

use crate::event::{EventSink, MotionEvent};
use crate::packet::report_packet;
use crate::response::{decode_response, ResponseOutcome};
use crate::state::TabletState;

/// What a completed frame produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Motion(MotionEvent),
    Response(ResponseOutcome),
}

/// Route a completed frame to the packet or response decoder.
///
/// Capabilities are re-published to the sink after every recognised
/// response, so the sink always holds the current ranges before the
/// caller learns the response arrived.
pub fn dispatch<S: EventSink + ?Sized>(
    frame: &Frame,
    state: &mut TabletState,
    sink: &mut S,
) -> Dispatched {
    match frame {
        Frame::Packet(packet) => Dispatched::Motion(report_packet(packet, state, sink)),
        Frame::Response(text) => Dispatched::Response(dispatch_response(text, state, sink)),
    }
}

/// Decode a response body directly, e.g. an unterminated one recovered
/// after a timeout.
pub fn dispatch_response<S: EventSink + ?Sized>(
    text: &[u8],
    state: &mut TabletState,
    sink: &mut S,
) -> ResponseOutcome {
    let outcome = decode_response(text, state);
    if outcome.kind().is_some() {
        sink.set_capabilities(&state.capabilities());
    }
    outcome
}
