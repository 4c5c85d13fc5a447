//! NBT error types.

use mcj_proto::ProtoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NbtError {
    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error("unknown tag type: {0}")]
    UnknownTagType(u8),

    #[error("list of kind {expected} holds a tag of kind {got}")]
    MixedList { expected: u8, got: u8 },

    #[error("nesting too deep (limit: {limit})")]
    NestingTooDeep { limit: usize },

    #[error("negative array length: {0}")]
    NegativeLength(i32),

    #[error("gzip error: {0}")]
    Gzip(String),
}
