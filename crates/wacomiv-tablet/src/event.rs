use serde::Serialize;

use crate::state::Capabilities;

/// Wacom device class identifiers reported alongside each packet.
pub const STYLUS_DEVICE_ID: u8 = 0x02;
pub const TOUCH_DEVICE_ID: u8 = 0x03;
pub const CURSOR_DEVICE_ID: u8 = 0x06;
pub const ERASER_DEVICE_ID: u8 = 0x0A;

/// The implement the tablet is sensing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    None,
    Stylus,
    Eraser,
    Cursor,
    Touch,
}

impl Tool {
    /// Device class identifier, `0` for [`Tool::None`].
    pub fn device_id(self) -> u8 {
        match self {
            Tool::None => 0,
            Tool::Stylus => STYLUS_DEVICE_ID,
            Tool::Eraser => ERASER_DEVICE_ID,
            Tool::Cursor => CURSOR_DEVICE_ID,
            Tool::Touch => TOUCH_DEVICE_ID,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::None => "none",
            Tool::Stylus => "stylus",
            Tool::Eraser => "eraser",
            Tool::Cursor => "cursor",
            Tool::Touch => "touch",
        }
    }
}

/// One decoded binary packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotionEvent {
    pub in_proximity: bool,
    pub tool: Tool,
    /// 4-bit button field from the packet.
    pub buttons: u8,
    pub x: u32,
    pub y: u32,
    pub pressure: u16,
}

/// Individual values reported to an [`EventSink`], in the order a packet
/// produces them. Every batch ends with [`Report::Sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Tool { tool: Tool, in_proximity: bool },
    /// Running packet counter.
    Serial { count: u32 },
    DeviceId { id: u8 },
    X { value: u32 },
    Y { value: u32 },
    Pressure { value: u16 },
    Touch { pressed: bool },
    Stylus { pressed: bool },
    Stylus2 { pressed: bool },
    Sync,
}

/// Consumer of decoded tablet input.
pub trait EventSink {
    /// Receive one report. Called from the byte-processing path; must not block.
    fn report(&mut self, report: Report);

    /// Receive new coordinate, pressure, or resolution ranges.
    fn set_capabilities(&mut self, capabilities: &Capabilities) {
        let _ = capabilities;
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn report(&mut self, report: Report) {
        (**self).report(report);
    }

    fn set_capabilities(&mut self, capabilities: &Capabilities) {
        (**self).set_capabilities(capabilities);
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn report(&mut self, _report: Report) {}
}

/// Sink that records everything it is given.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub reports: Vec<Report>,
    pub capabilities: Vec<Capabilities>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports split into sync-terminated batches. A trailing unterminated
    /// batch is dropped.
    pub fn batches(&self) -> Vec<&[Report]> {
        let mut out = Vec::new();
        let mut start = 0;
        for (i, report) in self.reports.iter().enumerate() {
            if *report == Report::Sync {
                out.push(&self.reports[start..=i]);
                start = i + 1;
            }
        }
        out
    }

    pub fn last_capabilities(&self) -> Option<&Capabilities> {
        self.capabilities.last()
    }
}

impl EventSink for EventLog {
    fn report(&mut self, report: Report) {
        self.reports.push(report);
    }

    fn set_capabilities(&mut self, capabilities: &Capabilities) {
        self.capabilities.push(*capabilities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_ids() {
        assert_eq!(Tool::None.device_id(), 0);
        assert_eq!(Tool::Stylus.device_id(), 0x02);
        assert_eq!(Tool::Eraser.device_id(), 0x0A);
        assert_eq!(Tool::Cursor.device_id(), 0x06);
        assert_eq!(Tool::Touch.device_id(), 0x03);
    }

    #[test]
    fn event_log_splits_batches() {
        let mut log = EventLog::new();
        log.report(Report::X { value: 1 });
        log.report(Report::Sync);
        log.report(Report::Y { value: 2 });
        log.report(Report::Sync);
        log.report(Report::Pressure { value: 3 });

        let batches = log.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], &[Report::X { value: 1 }, Report::Sync]);
        assert_eq!(batches[1], &[Report::Y { value: 2 }, Report::Sync]);
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink: Box<EventLog> = Box::default();
        EventSink::report(&mut sink, Report::Sync);
        assert_eq!(sink.reports, vec![Report::Sync]);
    }
}
