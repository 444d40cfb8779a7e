/// Errors raised while accumulating frames.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// The accumulation buffer is full; the byte was not stored.
    #[error("frame buffer full ({capacity} bytes)")]
    Overflow { capacity: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
