use std::path::PathBuf;

/// Errors that can occur on the serial transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device or apply its line settings.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The device opened but its buffers could not be cleared.
    #[error("failed to configure {path}: {source}")]
    Configure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested line rate is not one the tablet family supports.
    #[error("unsupported baud rate {0} (expected 1200, 2400, 4800, 9600, 19200 or 38400)")]
    UnsupportedBaud(u32),

    /// An I/O error occurred on the open line.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The serial port layer rejected an operation on the open line.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
