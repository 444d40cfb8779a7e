use std::path::Path;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, StopBits};
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::error::{Result, TransportError};
use crate::stream::SerialStream;

/// Open a serial port and configure it for a protocol IV tablet.
///
/// The line runs 8 data bits, no parity, one stop bit, no flow control,
/// at `config.baud`. Pending input and output are discarded so setup
/// starts from a quiet line.
pub fn open(path: impl AsRef<Path>, config: &LinkConfig) -> Result<SerialStream> {
    let path = path.as_ref().to_path_buf();

    let port = serialport::new(path.to_string_lossy(), config.baud.bits_per_second())
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(config.read_poll)
        .open()
        .map_err(|e| TransportError::Open {
            path: path.clone(),
            source: e.into(),
        })?;

    port.clear(ClearBuffer::All)
        .map_err(|e| TransportError::Configure {
            path: path.clone(),
            source: e.into(),
        })?;
    debug!(read_poll = ?config.read_poll, "applied 8N1 line settings");

    info!(?path, baud = %config.baud, "opened serial line");
    Ok(SerialStream::new(port, path))
}
