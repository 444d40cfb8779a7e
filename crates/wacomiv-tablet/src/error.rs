use crate::response::ResponseKind;

/// A response that was recognised by its tag but could not be parsed.
///
/// These never interrupt decoding: the decoder logs them and leaves the
/// tablet state untouched.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("malformed {kind} response: {text:?}")]
    Malformed { kind: ResponseKind, text: String },
}

pub type Result<T> = std::result::Result<T, ResponseError>;
