use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use wacomiv_setup::SetupReport;
use wacomiv_tablet::{Capabilities, EventSink, Extent, Model, Report, Tool, Version};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One sync-terminated batch of reports, folded into a single record.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub tool: Tool,
    pub in_proximity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub touch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylus: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylus2: Option<bool>,
}

impl EventRecord {
    fn apply(&mut self, report: Report) {
        match report {
            Report::Tool { tool, in_proximity } => {
                self.tool = tool;
                self.in_proximity = in_proximity;
            }
            Report::Serial { count } => self.serial = Some(count),
            Report::DeviceId { id } => self.device_id = Some(id),
            Report::X { value } => self.x = Some(value),
            Report::Y { value } => self.y = Some(value),
            Report::Pressure { value } => self.pressure = Some(value),
            Report::Touch { pressed } => self.touch = Some(pressed),
            Report::Stylus { pressed } => self.stylus = Some(pressed),
            Report::Stylus2 { pressed } => self.stylus2 = Some(pressed),
            Report::Sync => {}
        }
    }

    fn buttons(&self) -> String {
        let mut held = Vec::new();
        if self.touch == Some(true) {
            held.push("touch");
        }
        if self.stylus == Some(true) {
            held.push("stylus");
        }
        if self.stylus2 == Some(true) {
            held.push("stylus2");
        }
        if held.is_empty() {
            "-".to_string()
        } else {
            held.join(",")
        }
    }
}

/// Outcome of decoding a captured stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    pub bytes: usize,
    pub packets: usize,
    pub responses: usize,
    pub rejected_responses: usize,
    pub model: Model,
    pub version: Version,
    pub capabilities: Capabilities,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    Event(&'a EventRecord),
    Capabilities(&'a Capabilities),
    Setup(&'a SetupReport),
    Summary(&'a DecodeSummary),
}

/// A record waiting to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Queued {
    Event(EventRecord),
    Capabilities(Capabilities),
}

impl Queued {
    pub fn is_event(&self) -> bool {
        matches!(self, Queued::Event(_))
    }
}

/// Event sink that folds each sync-terminated batch into one record.
///
/// Reports arrive on the byte path, under the device lock, so nothing is
/// written here. Records queue up until the owner takes them with
/// [`take_queued`](Self::take_queued) and prints them with [`print_queued`].
#[derive(Debug, Default)]
pub struct EventPrinter {
    current: EventRecord,
    queued: Vec<Queued>,
    events: usize,
}

impl EventPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events completed so far, printed or not.
    pub fn events(&self) -> usize {
        self.events
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Take every record queued since the last call, oldest first.
    pub fn take_queued(&mut self) -> Vec<Queued> {
        std::mem::take(&mut self.queued)
    }
}

impl EventSink for EventPrinter {
    fn report(&mut self, report: Report) {
        self.current.apply(report);
        if report == Report::Sync {
            let event = std::mem::take(&mut self.current);
            self.queued.push(Queued::Event(event));
            self.events = self.events.saturating_add(1);
        }
    }

    fn set_capabilities(&mut self, capabilities: &Capabilities) {
        self.queued.push(Queued::Capabilities(*capabilities));
    }
}

/// Print queued records in order. Stops after `limit` events, if given.
/// Returns how many events were printed.
pub fn print_queued(
    out: &mut impl Write,
    queued: &[Queued],
    format: OutputFormat,
    limit: Option<usize>,
) -> usize {
    let mut events = 0usize;
    for record in queued {
        if limit.is_some_and(|limit| events >= limit) {
            break;
        }
        match record {
            Queued::Event(event) => {
                print_event(out, event, format);
                events += 1;
            }
            Queued::Capabilities(capabilities) => print_capabilities(out, capabilities, format),
        }
    }
    let _ = out.flush();
    events
}

fn print_event(out: &mut impl Write, event: &EventRecord, format: OutputFormat) {
    match format {
        OutputFormat::Json => write_json(out, &Line::Event(event)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TOOL", "PROX", "X", "Y", "PRESSURE", "BUTTONS"])
                .add_row(vec![
                    event.tool.as_str().to_string(),
                    yes_no(event.in_proximity).to_string(),
                    optional(event.x),
                    optional(event.y),
                    optional(event.pressure),
                    event.buttons(),
                ]);
            let _ = writeln!(out, "{table}");
        }
        OutputFormat::Pretty => {
            let state = if event.in_proximity { "in" } else { "out" };
            let _ = match (event.x, event.y) {
                (Some(x), Some(y)) => writeln!(
                    out,
                    "{} {state} x={x} y={y} pressure={} buttons={}",
                    event.tool.as_str(),
                    optional(event.pressure),
                    event.buttons()
                ),
                _ => writeln!(out, "{} {state}", event.tool.as_str()),
            };
        }
    }
}

pub fn print_capabilities(out: &mut impl Write, capabilities: &Capabilities, format: OutputFormat) {
    match format {
        OutputFormat::Json => write_json(out, &Line::Capabilities(capabilities)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BOUNDS", "MAX PRESSURE", "RESOLUTION"])
                .add_row(vec![
                    extent(capabilities.bounds),
                    capabilities.max_pressure.to_string(),
                    extent(capabilities.resolution),
                ]);
            let _ = writeln!(out, "{table}");
        }
        OutputFormat::Pretty => {
            let _ = writeln!(
                out,
                "capabilities bounds={} max_pressure={} resolution={}",
                extent(capabilities.bounds),
                capabilities.max_pressure,
                extent(capabilities.resolution)
            );
        }
    }
    let _ = out.flush();
}

pub fn print_setup(report: &SetupReport, format: OutputFormat) {
    let mut out = std::io::stdout();
    match format {
        OutputFormat::Json => write_json(&mut out, &Line::Setup(report)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"])
                .add_row(vec!["model".to_string(), report.model.to_string()])
                .add_row(vec!["version".to_string(), report.version.to_string()])
                .add_row(vec![
                    "bounds".to_string(),
                    extent(report.capabilities.bounds),
                ])
                .add_row(vec![
                    "max pressure".to_string(),
                    report.capabilities.max_pressure.to_string(),
                ])
                .add_row(vec![
                    "resolution".to_string(),
                    extent(report.capabilities.resolution),
                ]);
            for step in &report.steps {
                table.add_row(vec![step.step.to_string(), format!("{:?}", step.outcome)]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "model={} version={} bounds={} max_pressure={} resolution={}",
                report.model,
                report.version,
                extent(report.capabilities.bounds),
                report.capabilities.max_pressure,
                extent(report.capabilities.resolution)
            );
            for step in &report.steps {
                println!("  {}: {:?}", step.step, step.outcome);
            }
        }
    }
}

pub fn print_summary(summary: &DecodeSummary, format: OutputFormat) {
    let mut out = std::io::stdout();
    match format {
        OutputFormat::Json => write_json(&mut out, &Line::Summary(summary)),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BYTES", "PACKETS", "RESPONSES", "REJECTED", "MODEL"])
                .add_row(vec![
                    summary.bytes.to_string(),
                    summary.packets.to_string(),
                    summary.responses.to_string(),
                    summary.rejected_responses.to_string(),
                    summary.model.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "decoded {} bytes: {} packets, {} responses ({} rejected), model={}",
                summary.bytes,
                summary.packets,
                summary.responses,
                summary.rejected_responses,
                summary.model
            );
        }
    }
}

fn write_json(out: &mut impl Write, line: &Line<'_>) {
    let _ = writeln!(
        out,
        "{}",
        serde_json::to_string(line).unwrap_or_else(|_| "{}".to_string())
    );
}

fn extent(value: Option<Extent>) -> String {
    match value {
        Some(e) => format!("{}x{}", e.x, e.y),
        None => "-".to_string(),
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stylus_batch() -> Vec<Report> {
        vec![
            Report::Tool {
                tool: Tool::Stylus,
                in_proximity: true,
            },
            Report::Serial { count: 1 },
            Report::DeviceId { id: 2 },
            Report::X { value: 100 },
            Report::Y { value: 50 },
            Report::Pressure { value: 64 },
            Report::Touch { pressed: true },
            Report::Stylus { pressed: false },
            Report::Sync,
        ]
    }

    fn printed(format: OutputFormat, reports: Vec<Report>) -> String {
        let mut printer = EventPrinter::new();
        for report in reports {
            printer.report(report);
        }
        let mut out = Vec::new();
        print_queued(&mut out, &printer.take_queued(), format, None);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn json_line_per_batch() {
        let out = printed(OutputFormat::Json, stylus_batch());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["tool"], "stylus");
        assert_eq!(value["x"], 100);
        assert_eq!(value["pressure"], 64);
        assert_eq!(value["touch"], true);
        assert!(value.get("stylus2").is_none());
    }

    #[test]
    fn tool_change_batch_prints_only_the_tool() {
        let mut reports = vec![
            Report::Tool {
                tool: Tool::Stylus,
                in_proximity: false,
            },
            Report::Sync,
        ];
        reports.extend(stylus_batch());
        let out = printed(OutputFormat::Pretty, reports);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "stylus out");
        assert_eq!(lines[1], "stylus in x=100 y=50 pressure=64 buttons=touch");
    }

    #[test]
    fn reports_queue_until_taken() {
        let mut printer = EventPrinter::new();
        for report in stylus_batch().into_iter().chain(stylus_batch()) {
            printer.report(report);
        }
        assert_eq!(printer.events(), 2);
        assert_eq!(printer.queued_len(), 2);

        let queued = printer.take_queued();
        assert_eq!(queued.len(), 2);
        assert!(queued.iter().all(Queued::is_event));
        assert_eq!(printer.queued_len(), 0);
        assert!(printer.take_queued().is_empty());
        assert_eq!(printer.events(), 2);
    }

    #[test]
    fn print_stops_at_limit() {
        let mut printer = EventPrinter::new();
        for report in stylus_batch().into_iter().chain(stylus_batch()) {
            printer.report(report);
        }
        let mut out = Vec::new();
        let n = print_queued(&mut out, &printer.take_queued(), OutputFormat::Table, Some(1));
        assert_eq!(n, 1);

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("PRESSURE").count(), 1);
    }

    #[test]
    fn capabilities_keep_their_place_in_the_queue() {
        let mut printer = EventPrinter::new();
        printer.set_capabilities(&Capabilities {
            bounds: Some(Extent::new(5103, 3711)),
            max_pressure: 511,
            resolution: None,
        });
        for report in stylus_batch() {
            printer.report(report);
        }

        let mut out = Vec::new();
        let events = print_queued(&mut out, &printer.take_queued(), OutputFormat::Json, None);
        assert_eq!(events, 1);

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines[0]["type"], "capabilities");
        assert_eq!(lines[0]["bounds"]["x"], 5103);
        assert_eq!(lines[0]["max_pressure"], 511);
        assert_eq!(lines[1]["type"], "event");
    }
}
