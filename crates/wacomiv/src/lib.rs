//! Wacom protocol IV serial tablet driver.
//!
//! wacomiv decodes the byte stream of Wacom serial tablets (Digitizer II,
//! ArtPad II, PenPartner, Graphire, early Cintiq) into tool, position,
//! pressure and button reports, and runs the query handshake that
//! identifies the tablet and starts it streaming.
//!
//! # Crate Structure
//!
//! - [`transport`]: raw serial line setup and the byte stream
//! - [`frame`]: splitting the stream into packets and text responses
//! - [`tablet`]: packet and response decoding against per-tablet state
//! - [`setup`]: the shared device handle and the setup handshake

/// Re-export transport types.
pub mod transport {
    pub use wacomiv_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use wacomiv_frame::*;
}

/// Re-export decoding types.
pub mod tablet {
    pub use wacomiv_tablet::*;
}

/// Re-export setup types.
pub mod setup {
    pub use wacomiv_setup::*;
}
