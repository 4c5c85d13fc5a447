//! LoginDisconnect (0x00) — Server → Client.

use bytes::BufMut;

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::version::ProtocolVersion;

/// Sent by the server to refuse a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginDisconnect {
    /// JSON chat component.
    pub reason: String,
}

impl ProtoEncode for LoginDisconnect {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_string(buf, &self.reason)
    }
}

impl ProtoDecode for LoginDisconnect {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        Ok(Self {
            reason: cursor.read_chat()?,
        })
    }
}
