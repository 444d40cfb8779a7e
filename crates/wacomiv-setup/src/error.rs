use std::time::Duration;

use crate::sequencer::SetupStep;

/// Errors that end device bring-up.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Transport-level error (opening the line, reading from it).
    #[error("transport error: {0}")]
    Transport(#[from] wacomiv_transport::TransportError),

    /// Writing a query or command to the tablet failed.
    #[error("{step} failed: {source}")]
    Write {
        step: SetupStep,
        source: std::io::Error,
    },

    /// A query the tablet must answer went unanswered.
    #[error("{step} timed out after {timeout:?}")]
    Timeout { step: SetupStep, timeout: Duration },

    /// The line closed before setup finished.
    #[error("tablet disconnected during {0}")]
    Disconnected(SetupStep),
}

pub type Result<T> = std::result::Result<T, SetupError>;
