//! Command vocabulary understood by protocol IV tablets.
//!
//! Every command is an ASCII token terminated by a carriage return.

use wacomiv_tablet::{Model, ResponseKind};

pub const REQUEST_MODEL_AND_ROM_VERSION: &str = "~#";
pub const REQUEST_CONFIGURATION_STRING: &str = "~R";
pub const REQUEST_MAX_COORDINATES: &str = "~C";

pub const STOP_SENDING_PACKETS: &str = "SP";
pub const START_SENDING_PACKETS: &str = "ST";
pub const MULTI_MODE_INPUT: &str = "MU1";
pub const ORIGIN_IN_UPPER_LEFT: &str = "OC1";
pub const ENABLE_ALL_MACRO_BUTTONS: &str = "~M0";
pub const DISABLE_GROUP_1_MACRO_BUTTONS: &str = "~M1";
pub const TRANSMIT_AT_MAX_RATE: &str = "IT0";
pub const DISABLE_INCREMENTAL_OUTPUT: &str = "IN0";
pub const ENABLE_CONTINUOUS_MODE: &str = "SR";
pub const ENABLE_PRESSURE_MODE: &str = "PH1";
pub const Z_FILTER: &str = "ZF1";

const CINTIQ_MODE: &[&str] = &[
    ORIGIN_IN_UPPER_LEFT,
    TRANSMIT_AT_MAX_RATE,
    ENABLE_CONTINUOUS_MODE,
    START_SENDING_PACKETS,
];

const PENPARTNER_MODE: &[&str] = &[ENABLE_PRESSURE_MODE, START_SENDING_PACKETS];

const DEFAULT_MODE: &[&str] = &[
    MULTI_MODE_INPUT,
    ORIGIN_IN_UPPER_LEFT,
    ENABLE_ALL_MACRO_BUTTONS,
    DISABLE_GROUP_1_MACRO_BUTTONS,
    TRANSMIT_AT_MAX_RATE,
    DISABLE_INCREMENTAL_OUTPUT,
    ENABLE_CONTINUOUS_MODE,
    Z_FILTER,
    START_SENDING_PACKETS,
];

/// The query that asks the tablet for a response of `kind`.
pub fn query_for(kind: ResponseKind) -> &'static str {
    match kind {
        ResponseKind::Model => REQUEST_MODEL_AND_ROM_VERSION,
        ResponseKind::Configuration => REQUEST_CONFIGURATION_STRING,
        ResponseKind::Coordinates => REQUEST_MAX_COORDINATES,
    }
}

/// Commands that put `model` into streaming mode, ending with start.
pub fn mode_commands(model: Model) -> &'static [&'static str] {
    match model {
        Model::Cintiq | Model::Cintiq2 => CINTIQ_MODE,
        Model::Penpartner => PENPARTNER_MODE,
        _ => DEFAULT_MODE,
    }
}

/// Wire form of a command sequence: each token followed by CR.
pub fn encode(commands: &[&str]) -> Vec<u8> {
    let mut out = Vec::with_capacity(commands.iter().map(|c| c.len() + 1).sum());
    for command in commands {
        out.extend_from_slice(command.as_bytes());
        out.push(wacomiv_frame::CR);
    }
    out
}
