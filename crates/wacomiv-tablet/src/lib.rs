//! Decoding of Wacom protocol IV frames against per-tablet state.
//!
//! - [`packet`] turns 7-byte binary packets into [`MotionEvent`]s and
//!   sink reports, tracking the active tool
//! - [`response`] parses model, configuration, and coordinate responses
//!   into [`TabletState`]
//! - [`dispatch`] routes frames from the assembler to one or the other

pub mod dispatch;
pub mod error;
pub mod event;
pub mod model;
pub mod packet;
pub mod response;
pub mod state;

pub use dispatch::{dispatch, dispatch_response, Dispatched};
pub use error::{ResponseError, Result};
pub use event::{EventLog, EventSink, MotionEvent, NullSink, Report, Tool};
pub use model::{Model, Version};
pub use packet::{decode_packet, report_packet};
pub use response::{decode_response, ResponseKind, ResponseOutcome};
pub use state::{Capabilities, Extent, TabletState};
