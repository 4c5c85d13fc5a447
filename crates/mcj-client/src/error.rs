use mcj_command::CommandError;
use mcj_crypto::CryptoError;
use mcj_data::DataError;
use mcj_proto::ProtoError;
use thiserror::Error;

use crate::handshake::HandshakeState;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Handshake(#[from] HandshakeError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("protocol {0} is not supported by this client")]
    UnsupportedVersion(i32),

    #[error("disconnected by server: {0}")]
    Disconnected(String),

    #[error("connection closed by server")]
    ConnectionClosed,
}

/// Reasons the login key exchange ends the connection. None are retried.
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("encryption request received in state {0:?}")]
    UnexpectedState(HandshakeState),

    #[error("server public key rejected: {0}")]
    PublicKey(CryptoError),

    #[error("session join failed: {0}")]
    JoinRejected(String),

    #[error("encrypting the response failed: {0}")]
    Encrypt(CryptoError),
}
