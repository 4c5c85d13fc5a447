//! Error type for registry loading and game-data decoding.

use mcj_nbt::NbtError;
use mcj_proto::ProtoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error(transparent)]
    Nbt(#[from] NbtError),

    #[error("unknown entity metadata type {id} for protocol {version}")]
    UnknownMetadataType { id: i32, version: i32 },

    #[error("particle {id} ({name}) has no known payload layout")]
    UnknownParticle { id: i32, name: String },

    #[error("invalid {kind} value {value}")]
    InvalidEnum { kind: &'static str, value: i32 },

    #[error("registry error: {0}")]
    Registry(String),

    #[error("failed to read registry file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),
}
