//! Protocol-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("VarInt is too long (more than {max_bytes} bytes)")]
    VarIntTooLong { max_bytes: usize },

    #[error("declared length {declared} exceeds maximum {max}")]
    LengthTooLarge { declared: usize, max: usize },

    #[error("value of {len} bytes does not fit its length prefix (max {max})")]
    ValueTooLong { len: usize, max: usize },

    #[error("negative length: {0}")]
    NegativeLength(i32),

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid UUID: {0:?}")]
    InvalidUuid(String),

    #[error("unknown {kind} id {id}")]
    UnknownTypeId { kind: &'static str, id: i32 },

    #[error("decompression error: {0}")]
    DecompressError(String),

    #[error("compression error: {0}")]
    CompressError(String),

    #[error("decompressed size mismatch: declared {declared}, got {actual}")]
    DecompressedSizeMismatch { declared: usize, actual: usize },

    #[error("frame of {len} bytes exceeds maximum {max}")]
    FrameTooLarge { len: usize, max: usize },

    #[error("unexpected packet 0x{id:02X} in {state} state")]
    UnexpectedPacket { state: &'static str, id: i32 },

    #[error("{0} trailing bytes left after decoding packet")]
    TrailingBytes(usize),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
