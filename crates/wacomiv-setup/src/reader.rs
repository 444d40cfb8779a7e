use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use wacomiv_tablet::EventSink;
use wacomiv_transport::TransportError;

use crate::device::Tablet;
use crate::error::{Result, SetupError};

const READ_CHUNK: usize = 64;

/// Background thread pumping line bytes into a [`Tablet`].
#[derive(Debug)]
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ReaderHandle {
    /// Ask the pump to exit after its current read returns.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the pump to exit and return how it ended.
    pub fn join(mut self) -> Result<()> {
        match self.thread.take() {
            Some(thread) => thread.join().unwrap_or_else(|_| {
                Err(SetupError::Transport(TransportError::Io(io::Error::other(
                    "reader thread panicked",
                ))))
            }),
            None => Ok(()),
        }
    }
}

/// Spawn a thread that reads from `line` and feeds every byte to `tablet`.
///
/// Read timeouts are expected (the serial line polls) and just loop. End of
/// stream or a hard read error closes the tablet handle so waiters see a
/// disconnect.
pub fn spawn_reader<R, S>(line: R, tablet: Tablet<S>) -> io::Result<ReaderHandle>
where
    R: Read + Send + 'static,
    S: EventSink + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name("wacomiv-reader".into())
        .spawn(move || pump(line, tablet, flag))?;
    Ok(ReaderHandle {
        stop,
        thread: Some(thread),
    })
}

fn pump<R: Read, S: EventSink>(mut line: R, tablet: Tablet<S>, stop: Arc<AtomicBool>) -> Result<()> {
    let mut chunk = [0u8; READ_CHUNK];
    while !stop.load(Ordering::Relaxed) && !tablet.is_closed() {
        match line.read(&mut chunk) {
            Ok(0) => {
                tracing::debug!("tablet line reached end of stream");
                tablet.close();
                return Ok(());
            }
            Ok(n) => {
                tracing::trace!(n, "read from tablet line");
                tablet.receive(&chunk[..n]);
            }
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) => {}
            Err(e) => {
                tracing::warn!(error = %e, "tablet line read failed");
                tablet.close();
                return Err(SetupError::Transport(TransportError::Io(e)));
            }
        }
    }
    Ok(())
}
