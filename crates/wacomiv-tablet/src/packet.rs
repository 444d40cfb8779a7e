//! Binary motion packet decoding.
//!
//! ```text
//!         bit 7   6      5      4    3    2     1    0
//! byte 0:   1   prox  stylus   -    -   z0    x15  x14
//! byte 1:   0   x13 .. x7
//! byte 2:   0   x6  .. x0
//! byte 3:   0   b3    b2     b1   b0   z1    y15  y14
//! byte 4:   0   y13 .. y7
//! byte 5:   0   y6  .. y0
//! byte 6:   0   z (7 high bits)
//! ```
//!
//! `z1` is the first extra low-order pressure bit. With a second extra bit
//! the pressure is shifted once more and `z0` is OR'd in where it sits on
//! the wire (bit 2), not as bit 0.

use tracing::trace;
use wacomiv_frame::PACKET_LENGTH;

use crate::event::{EventSink, MotionEvent, Report, Tool};
use crate::state::TabletState;

const PROXIMITY_BIT: u8 = 0x40;
const STYLUS_BIT: u8 = 0x20;

const TOUCH_BUTTON: u8 = 0x01;
const STYLUS_BUTTON: u8 = 0x02;
const STYLUS2_BUTTON: u8 = 0x04;

/// Decode a packet against the current capability state. Pure.
pub fn decode_packet(packet: &[u8; PACKET_LENGTH], state: &TabletState) -> MotionEvent {
    let in_proximity = packet[0] & PROXIMITY_BIT != 0;
    let is_stylus = packet[0] & STYLUS_BIT != 0;
    let buttons = (packet[3] & 0x78) >> 3;

    let x = coordinate(packet[0], packet[1], packet[2]);
    let y = coordinate(packet[3], packet[4], packet[5]);
    let pressure = pressure(packet, state.extra_pressure_bits);

    let tool = if !is_stylus {
        Tool::Cursor
    } else if buttons & state.eraser_button_mask != 0 {
        Tool::Eraser
    } else {
        Tool::Stylus
    };

    MotionEvent {
        in_proximity,
        tool,
        buttons,
        x,
        y,
        pressure,
    }
}

/// Decode a packet, track the active tool, and report the result to `sink`.
///
/// When the tool changes from one non-`None` tool to another while the old
/// tool is still in proximity, the old tool is reported out of proximity in
/// its own batch first, so the sink never sees two tools in proximity at
/// once. A tool whose last packet already reported it out is not repeated.
/// The device id is reported for the decoded tool whether or not it is in
/// proximity.
pub fn report_packet<S: EventSink + ?Sized>(
    packet: &[u8; PACKET_LENGTH],
    state: &mut TabletState,
    sink: &mut S,
) -> MotionEvent {
    let event = decode_packet(packet, state);

    let previous = state.current_tool;
    if previous != Tool::None && previous != event.tool && state.tool_in_proximity {
        trace!(from = previous.as_str(), to = event.tool.as_str(), "tool change");
        sink.report(Report::Tool {
            tool: previous,
            in_proximity: false,
        });
        sink.report(Report::Sync);
    }
    state.current_tool = event.tool;
    state.tool_in_proximity = event.in_proximity;
    state.packets = state.packets.wrapping_add(1);

    sink.report(Report::Tool {
        tool: event.tool,
        in_proximity: event.in_proximity,
    });
    sink.report(Report::Serial {
        count: state.packets,
    });
    sink.report(Report::DeviceId {
        id: event.tool.device_id(),
    });
    sink.report(Report::X { value: event.x });
    sink.report(Report::Y { value: event.y });
    sink.report(Report::Pressure {
        value: event.pressure,
    });
    sink.report(Report::Touch {
        pressed: event.buttons & TOUCH_BUTTON != 0,
    });
    sink.report(Report::Stylus {
        pressed: event.buttons & STYLUS_BUTTON != 0,
    });
    if state.supports_stylus2 {
        sink.report(Report::Stylus2 {
            pressed: event.buttons & STYLUS2_BUTTON != 0,
        });
    }
    sink.report(Report::Sync);

    event
}

fn coordinate(high: u8, mid: u8, low: u8) -> u32 {
    u32::from(high & 0x03) << 14 | u32::from(mid & 0x7f) << 7 | u32::from(low & 0x7f)
}

/// 7 base bits, up to two extra bits, then re-centred by flipping the top
/// bit so the result always lies in `0..=2^(7+extra)-1`.
fn pressure(packet: &[u8; PACKET_LENGTH], extra_bits: u8) -> u16 {
    let mut z = u16::from(packet[6] & 0x7f);
    if extra_bits >= 1 {
        z = z << 1 | u16::from((packet[3] & 0x04) >> 2);
    }
    if extra_bits > 1 {
        z = z << 1 | u16::from(packet[0] & 0x04);
    }
    z ^ (0x40 << extra_bits)
}
