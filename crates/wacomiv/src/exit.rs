use std::fmt;
use std::io;

use wacomiv_setup::SetupError;
use wacomiv_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
            CliError::new(PERMISSION_DENIED, format!("{context}: {source}"))
        }
        TransportError::Io(source) => io_error(context, source),
        TransportError::UnsupportedBaud(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn setup_error(context: &str, err: SetupError) -> CliError {
    match err {
        SetupError::Transport(err) => transport_error(context, err),
        SetupError::Write { source, step } => io_error(&format!("{context}: {step}"), source),
        SetupError::Timeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        SetupError::Disconnected(_) => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use wacomiv_setup::SetupStep;

    use super::*;

    #[test]
    fn missing_device_is_a_transport_error() {
        let err = TransportError::Open {
            path: PathBuf::from("/dev/ttyS9"),
            source: io::ErrorKind::NotFound.into(),
        };
        assert_eq!(transport_error("attach", err).code, TRANSPORT_ERROR);
    }

    #[test]
    fn locked_device_is_permission_denied() {
        let err = TransportError::Open {
            path: PathBuf::from("/dev/ttyS0"),
            source: io::ErrorKind::PermissionDenied.into(),
        };
        assert_eq!(transport_error("attach", err).code, PERMISSION_DENIED);
    }

    #[test]
    fn serial_port_failure_is_a_transport_error() {
        let err = TransportError::Serial(serialport::Error::new(
            serialport::ErrorKind::NoDevice,
            "port vanished",
        ));
        let cli = transport_error("attach", err);
        assert_eq!(cli.code, TRANSPORT_ERROR);
        assert!(cli.message.contains("port vanished"));
    }

    #[test]
    fn setup_errors_map_to_exit_codes() {
        let timeout = SetupError::Timeout {
            step: SetupStep::QueryModel,
            timeout: Duration::from_secs(1),
        };
        let err = setup_error("setup failed", timeout);
        assert_eq!(err.code, TIMEOUT);
        assert!(err.message.contains("model query"));

        let gone = setup_error(
            "setup failed",
            SetupError::Disconnected(SetupStep::QueryCoordinates),
        );
        assert_eq!(gone.code, FAILURE);

        let baud = setup_error(
            "setup failed",
            SetupError::Transport(TransportError::UnsupportedBaud(300)),
        );
        assert_eq!(baud.code, USAGE);
    }
}
