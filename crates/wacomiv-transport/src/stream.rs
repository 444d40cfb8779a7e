use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serialport::SerialPort;

#[cfg(unix)]
use crate::config::LinkConfig;
use crate::error::Result;

/// An open serial line to a tablet. Implements Read + Write.
///
/// Reads are polled: when the line stays idle for the configured
/// `read_poll` interval, `read` fails with `ErrorKind::TimedOut`. A
/// zero-length read or any other error means the line is gone.
pub struct SerialStream {
    port: Box<dyn SerialPort>,
    path: PathBuf,
}

impl SerialStream {
    pub(crate) fn new(port: Box<dyn SerialPort>, path: PathBuf) -> Self {
        Self { port, path }
    }

    /// The device path this stream was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try to clone this stream (duplicates the port handle).
    pub fn try_clone(&self) -> Result<Self> {
        let port = self.port.try_clone()?;
        Ok(Self::new(port, self.path.clone()))
    }

    /// Open a pseudo-terminal pair, returned as `(device, host)`.
    ///
    /// The host end behaves like a tablet port opened with [`open`](crate::open);
    /// the device end is where an emulator writes packets and reads commands.
    #[cfg(unix)]
    pub fn pair(config: &LinkConfig) -> Result<(Self, Self)> {
        let (mut device, mut host) = serialport::TTYPort::pair()?;
        device.set_timeout(config.read_poll)?;
        host.set_timeout(config.read_poll)?;
        let path = host.name().map(PathBuf::from).unwrap_or_default();
        Ok((
            Self::new(Box::new(device), PathBuf::new()),
            Self::new(Box::new(host), path),
        ))
    }
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("path", &self.path)
            .finish()
    }
}
