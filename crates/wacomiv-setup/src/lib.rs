//! Setup handshake and shared device handle for protocol IV tablets.
//!
//! A [`Tablet`] owns the frame assembler, decoding state and event sink
//! for one device. Bytes reach it from a reader thread
//! ([`spawn_reader`]); the [`Sequencer`] writes queries and waits on the
//! same handle for their responses.
//!
//! ```no_run
//! use wacomiv_setup::{attach, SetupConfig};
//! use wacomiv_tablet::EventLog;
//! use wacomiv_transport::LinkConfig;
//!
//! let attached = attach("/dev/ttyS0", &LinkConfig::default(), SetupConfig::default(), EventLog::new())?;
//! println!("{}", attached.report().model);
//! # Ok::<(), wacomiv_setup::SetupError>(())
//! ```

pub mod attach;
pub mod commands;
pub mod device;
pub mod error;
pub mod pending;
pub mod reader;
pub mod sequencer;

pub use attach::{attach, attach_line, Attached};
pub use device::{Tablet, Wait};
pub use error::{Result, SetupError};
pub use pending::PendingRequest;
pub use reader::{spawn_reader, ReaderHandle};
pub use sequencer::{
    run_setup, Sequencer, SetupConfig, SetupPhase, SetupReport, SetupStep, StepOutcome,
    StepReport, DEFAULT_RESPONSE_TIMEOUT,
};
