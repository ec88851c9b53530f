use thiserror::Error;

/// Reasons a settings payload is rejected.
/// Any of these abandons the whole payload; nothing partial is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("payload truncated: wanted {wanted} bytes but only {remaining} remain")]
    Truncated { wanted: usize, remaining: usize },

    #[error("padded length of {0} bytes overflows")]
    Overflow(u32),

    #[error("invalid byte order {0}, expected 0 (LSBFirst) or 1 (MSBFirst)")]
    MalformedHeader(u8),

    #[error("setting {0} appears more than once")]
    DuplicateKey(String),

    #[error("setting type {0} is unknown and is followed by more entries")]
    UnknownType(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
