//! ASCII response decoding.
//!
//! Responses start with `~` followed by a tag naming the query they answer:
//! - `~#<model><rev> V<major>.<minor>` model and ROM version
//! - `~R<hex>,<dec>,<dec>,<dec>,<dec>` configuration; the last two fields are
//!   the X and Y resolution
//! - `~C<dec>,<dec>` maximum X and Y coordinates

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ResponseError, Result};
use crate::model::{Model, Version};
use crate::state::{Extent, TabletState, MAX_EXTRA_PRESSURE_BITS};

/// The queries a response can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Model,
    Configuration,
    Coordinates,
}

impl ResponseKind {
    /// The tag character following `~`.
    pub fn tag(self) -> u8 {
        match self {
            ResponseKind::Model => b'#',
            ResponseKind::Configuration => b'R',
            ResponseKind::Coordinates => b'C',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'#' => Some(ResponseKind::Model),
            b'R' => Some(ResponseKind::Configuration),
            b'C' => Some(ResponseKind::Coordinates),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResponseKind::Model => "model",
            ResponseKind::Configuration => "configuration",
            ResponseKind::Coordinates => "coordinates",
        })
    }
}

/// What a response turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseOutcome {
    /// Tag recognised. `applied` is false when the body was malformed and
    /// nothing changed.
    Decoded { kind: ResponseKind, applied: bool },
    /// Well-formed prefix with a tag we do not handle.
    Unrecognized { tag: u8 },
    /// Too short or not starting with `~`.
    Garbled,
}

impl ResponseOutcome {
    pub fn kind(self) -> Option<ResponseKind> {
        match self {
            ResponseOutcome::Decoded { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Decode one response (without its terminator) into `state`.
pub fn decode_response(text: &[u8], state: &mut TabletState) -> ResponseOutcome {
    if text.len() < 2 || text[0] != b'~' {
        debug!(
            len = text.len(),
            text = %String::from_utf8_lossy(text),
            "got a garbled response"
        );
        return ResponseOutcome::Garbled;
    }

    let Some(kind) = ResponseKind::from_tag(text[1]) else {
        debug!(text = %String::from_utf8_lossy(text), "got an unexpected response");
        return ResponseOutcome::Unrecognized { tag: text[1] };
    };

    let applied = match kind {
        ResponseKind::Model => {
            apply_model(text, state);
            true
        }
        ResponseKind::Configuration => apply(parse_configuration(text), |resolution| {
            state.resolution = Some(resolution);
        }),
        ResponseKind::Coordinates => apply(parse_coordinates(text), |bounds| {
            state.bounds = Some(bounds);
        }),
    };

    ResponseOutcome::Decoded { kind, applied }
}

fn apply<T>(parsed: Result<T>, set: impl FnOnce(T)) -> bool {
    match parsed {
        Ok(value) => {
            set(value);
            true
        }
        Err(err) => {
            warn!(%err, "ignoring response");
            false
        }
    }
}

fn apply_model(text: &[u8], state: &mut TabletState) {
    let version = parse_version(text);
    let code = match text.get(2..4) {
        Some(&[hi, lo]) => u16::from_be_bytes([hi, lo]),
        _ => 0,
    };
    let revision = match text.get(5..7) {
        Some(&[hi, lo]) => u16::from_be_bytes([hi, lo]),
        _ => 0,
    };

    let model = Model::from_code(code);
    state.model = model;
    state.version = version;

    match model {
        Model::Cintiq | Model::Cintiq2 => {
            state.resolution = Some(Extent::new(508, 508));
            match &revision.to_be_bytes() {
                b"71" => {
                    // PL-710
                    state.resolution = Some(Extent::new(2540, 2540));
                    state.extra_pressure_bits = 2;
                }
                b"55" | b"80" => state.extra_pressure_bits = 2,
                _ => {}
            }
            state.covers_screen = true;
        }
        Model::Penpartner => {
            state.resolution = Some(Extent::new(1000, 1000));
        }
        Model::Graphire => {
            state.resolution = Some(Extent::new(1016, 1016));
            state.bounds = Some(Extent::new(5103, 3711));
            state.extra_pressure_bits = 2;
            state.eraser_button_mask = 0x08;
            state.supports_stylus2 = true;
        }
        Model::DigitizerII | Model::ArtpadII => {
            if version.major == 1 && version.minor <= 2 {
                state.extra_pressure_bits = 0;
            }
        }
        Model::Intuos | Model::Intuos2 => {
            warn!("Intuos tablets are not supported by protocol IV decoding");
        }
        Model::Unknown(_) => {
            debug!(text = %String::from_utf8_lossy(text), "didn't understand model string");
        }
    }
    state.extra_pressure_bits = state.extra_pressure_bits.min(MAX_EXTRA_PRESSURE_BITS);

    info!(
        model = %model,
        version = %version,
        max_pressure = state.max_pressure(),
        "identified tablet"
    );
}

/// `<major>.<minor>` after the last `V`; `0.0` unless both parse.
pub fn parse_version(text: &[u8]) -> Version {
    let Some(pos) = text.iter().rposition(|&b| b == b'V') else {
        return Version::default();
    };
    let rest = &text[pos + 1..];
    let Some((major, rest)) = leading_number(rest, 10) else {
        return Version::default();
    };
    let Some(rest) = rest.strip_prefix(b".") else {
        return Version::default();
    };
    match leading_number(rest, 10) {
        Some((minor, _)) => Version::new(major, minor),
        None => Version::default(),
    }
}

/// Resolution from `~R<hex>,<dec>,<dec>,<dec>,<dec>`.
pub fn parse_configuration(text: &[u8]) -> Result<Extent> {
    let malformed = || malformed(ResponseKind::Configuration, text);
    let body = text.strip_prefix(b"~R").ok_or_else(malformed)?;

    let mut fields = body.split(|&b| b == b',');
    let radices = [16, 10, 10, 10, 10];
    let mut values = [0u32; 5];
    for (value, radix) in values.iter_mut().zip(radices) {
        let field = fields.next().ok_or_else(malformed)?;
        *value = whole_number(field, radix).ok_or_else(malformed)?;
    }

    Ok(Extent::new(values[3], values[4]))
}

/// Maximum coordinates from `~C<dec>,<dec>`.
pub fn parse_coordinates(text: &[u8]) -> Result<Extent> {
    let malformed = || malformed(ResponseKind::Coordinates, text);
    let body = text.strip_prefix(b"~C").ok_or_else(malformed)?;

    let mut fields = body.split(|&b| b == b',');
    let x = fields
        .next()
        .and_then(|f| whole_number(f, 10))
        .ok_or_else(malformed)?;
    let y = fields
        .next()
        .and_then(|f| whole_number(f, 10))
        .ok_or_else(malformed)?;

    Ok(Extent::new(x, y))
}

fn malformed(kind: ResponseKind, text: &[u8]) -> ResponseError {
    ResponseError::Malformed {
        kind,
        text: String::from_utf8_lossy(text).into_owned(),
    }
}

/// A field that is a number, allowing surrounding blanks.
fn whole_number(field: &[u8], radix: u32) -> Option<u32> {
    let (value, rest) = leading_number(field, radix)?;
    rest.iter()
        .all(|b| b.is_ascii_whitespace() || *b == 0)
        .then_some(value)
}

/// Parse leading digits after optional blanks, returning the rest.
fn leading_number(input: &[u8], radix: u32) -> Option<(u32, &[u8])> {
    let start = input
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(input.len());
    let input = &input[start..];
    let digits = input
        .iter()
        .take_while(|b| char::from(**b).is_digit(radix))
        .count();
    if digits == 0 {
        return None;
    }
    let text = std::str::from_utf8(&input[..digits]).ok()?;
    let value = u32::from_str_radix(text, radix).ok()?;
    Some((value, &input[digits..]))
}
