//! Disconnect (play) — Server → Client.

use bytes::BufMut;
use mcj_proto::codec::{put_string, ProtoDecode, ProtoEncode};
use mcj_proto::{ByteCursor, ProtoError, ProtocolVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnect {
    /// JSON chat component.
    pub reason: String,
}

impl ProtoEncode for Disconnect {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        put_string(buf, &self.reason)
    }
}

impl ProtoDecode for Disconnect {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        Ok(Self {
            reason: cursor.read_chat()?,
        })
    }
}
