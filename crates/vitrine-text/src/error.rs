use thiserror::Error;

pub type Result<T> = std::result::Result<T, TextError>;

/// Errors raised by text operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("invalid truncation length: {max_len} (must be at least 1)")]
    InvalidLength { max_len: usize },
}
