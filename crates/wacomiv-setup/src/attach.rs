use std::io::{Read, Write};
use std::path::Path;

use wacomiv_tablet::EventSink;
use wacomiv_transport::{LinkConfig, SerialStream, TransportError};

use crate::device::Tablet;
use crate::error::Result;
use crate::reader::{spawn_reader, ReaderHandle};
use crate::sequencer::{run_setup, SetupConfig, SetupReport};

/// A tablet that finished setup and is being pumped by a reader thread.
#[derive(Debug)]
pub struct Attached<S, L> {
    tablet: Tablet<S>,
    line: L,
    reader: ReaderHandle,
    report: SetupReport,
}

impl<S, L> Attached<S, L> {
    pub fn tablet(&self) -> &Tablet<S> {
        &self.tablet
    }

    pub fn report(&self) -> &SetupReport {
        &self.report
    }

    /// True once the reader stopped, e.g. because the line closed.
    pub fn is_finished(&self) -> bool {
        self.reader.is_finished()
    }

    /// Stop the reader and close the handle. Returns how the reader ended.
    pub fn detach(self) -> Result<L> {
        self.reader.stop();
        let ended = self.reader.join();
        self.tablet.close();
        ended.map(|()| self.line)
    }
}

/// Run setup over an already-open line.
///
/// `reader_line` is the read half (usually a clone of `line`); it is moved
/// to a reader thread before any query is written. It needs a read
/// timeout, otherwise stopping the reader waits for the next byte. If setup
/// fails the reader is stopped and the handle closed before the error is
/// returned.
pub fn attach_line<S, L, R>(
    mut line: L,
    reader_line: R,
    sink: S,
    config: SetupConfig,
) -> Result<Attached<S, L>>
where
    S: EventSink + Send + 'static,
    L: Write,
    R: Read + Send + 'static,
{
    let tablet = Tablet::new(sink);
    let reader = spawn_reader(reader_line, tablet.clone()).map_err(TransportError::Io)?;

    match run_setup(&tablet, &mut line, config) {
        Ok(report) => Ok(Attached {
            tablet,
            line,
            reader,
            report,
        }),
        Err(e) => {
            reader.stop();
            tablet.close();
            if let Err(reader_err) = reader.join() {
                tracing::debug!(error = %reader_err, "reader ended with error after failed setup");
            }
            Err(e)
        }
    }
}

/// Open a serial tablet at `path` and bring it up.
pub fn attach<S>(
    path: impl AsRef<Path>,
    link: &LinkConfig,
    config: SetupConfig,
    sink: S,
) -> Result<Attached<S, SerialStream>>
where
    S: EventSink + Send + 'static,
{
    let path = path.as_ref();
    let line = wacomiv_transport::open(path, link)?;
    let reader_line = line.try_clone()?;
    tracing::info!(path = %path.display(), baud = %link.baud, "attaching tablet");
    attach_line(line, reader_line, sink, config)
}
