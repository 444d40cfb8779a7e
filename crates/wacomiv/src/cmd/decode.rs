use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use wacomiv_frame::{Feed, FrameAssembler};
use wacomiv_tablet::{dispatch, dispatch_response, Dispatched, EventSink, ResponseOutcome, TabletState};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_queued, print_summary, DecodeSummary, EventPrinter, OutputFormat};

const READ_CHUNK: usize = 4096;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input: Box<dyn Read> = match args.file.as_deref() {
        Some(path) if path != Path::new("-") => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("open {}", path.display()), err))?,
        ),
        _ => Box::new(io::stdin().lock()),
    };

    let mut out = io::stdout();
    let mut printer = EventPrinter::new();
    let summary = decode_stream(input, &mut printer, |printer| {
        print_queued(&mut out, &printer.take_queued(), format, None);
    })?;
    print_summary(&summary, format);

    if summary.bytes > 0 && summary.packets == 0 && summary.responses == 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("no protocol IV frames in {} bytes of input", summary.bytes),
        ));
    }
    Ok(SUCCESS)
}

/// Decode everything `input` yields, reporting into `sink`. `after_chunk`
/// runs once per chunk read and once more at end of input.
///
/// A response left unterminated at end of input is decoded as-is, the
/// same way setup treats one that times out.
pub fn decode_stream<R, S>(
    mut input: R,
    sink: &mut S,
    mut after_chunk: impl FnMut(&mut S),
) -> CliResult<DecodeSummary>
where
    R: Read,
    S: EventSink,
{
    let mut assembler = FrameAssembler::new();
    let mut state = TabletState::new();
    let mut bytes = 0usize;
    let mut packets = 0usize;
    let mut responses = 0usize;
    let mut rejected_responses = 0usize;

    let mut count = |outcome: ResponseOutcome| match outcome {
        ResponseOutcome::Decoded { applied: true, .. } => responses += 1,
        _ => rejected_responses += 1,
    };

    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(io_error("read failed", err)),
        };
        bytes += n;

        for &byte in &chunk[..n] {
            if let Feed::Ready(frame) = assembler.feed(byte) {
                match dispatch(&frame, &mut state, sink) {
                    Dispatched::Motion(_) => packets += 1,
                    Dispatched::Response(outcome) => count(outcome),
                }
            }
        }
        after_chunk(sink);
    }

    if let Some(text) = assembler.take_partial_response() {
        tracing::debug!(len = text.len(), "decoding unterminated trailing response");
        count(dispatch_response(&text, &mut state, sink));
    }
    after_chunk(sink);

    Ok(DecodeSummary {
        bytes,
        packets,
        responses,
        rejected_responses,
        model: state.model(),
        version: state.version(),
        capabilities: state.capabilities(),
    })
}

#[cfg(test)]
mod tests {
    use wacomiv_tablet::{EventLog, Extent, Model, Report, Tool};

    use super::*;

    #[test]
    fn decodes_capture_with_model_and_packets() {
        let mut capture = b"~#ET0405-V1.0\r".to_vec();
        capture.extend_from_slice(&[0xE0, 0x00, 0x64, 0x01, 0x00, 0x32, 0x40]);
        capture.extend_from_slice(&[0xE0, 0x00, 0x65, 0x01, 0x00, 0x33, 0x40]);

        let mut log = EventLog::new();
        let summary = decode_stream(capture.as_slice(), &mut log, |_| {}).unwrap();

        assert_eq!(summary.bytes, capture.len());
        assert_eq!(summary.packets, 2);
        assert_eq!(summary.responses, 1);
        assert_eq!(summary.model, Model::Graphire);
        assert_eq!(summary.capabilities.bounds, Some(Extent::new(5103, 3711)));
        assert_eq!(log.batches().len(), 2);
        assert_eq!(
            log.reports[0],
            Report::Tool {
                tool: Tool::Stylus,
                in_proximity: true
            }
        );
    }

    #[test]
    fn trailing_unterminated_response_is_decoded() {
        let mut log = EventLog::new();
        let summary = decode_stream(&b"~C5103,3711"[..], &mut log, |_| {}).unwrap();
        assert_eq!(summary.responses, 1);
        assert_eq!(summary.capabilities.bounds, Some(Extent::new(5103, 3711)));
    }

    #[test]
    fn queued_events_are_handed_over_per_chunk() {
        let mut capture = vec![0xE0, 0x00, 0x64, 0x01, 0x00, 0x32, 0x40];
        capture.extend_from_slice(b"~C5103,3711");

        let mut printer = EventPrinter::new();
        let mut taken = Vec::new();
        decode_stream(capture.as_slice(), &mut printer, |printer| {
            taken.extend(printer.take_queued());
        })
        .unwrap();

        assert_eq!(taken.len(), 2);
        assert!(taken[0].is_event());
        assert!(!taken[1].is_event());
        assert_eq!(printer.queued_len(), 0);
    }

    #[test]
    fn garbage_is_counted_not_fatal() {
        let mut log = EventLog::new();
        let summary = decode_stream(&b"hello\r~Zfoo\r"[..], &mut log, |_| {}).unwrap();
        assert_eq!(summary.packets, 0);
        assert_eq!(summary.responses, 0);
        assert_eq!(summary.rejected_responses, 2);
        assert!(log.reports.is_empty());
    }
}
