//! SetHeldItem — Server → Client.

use bytes::BufMut;
use mcj_proto::codec::{ProtoDecode, ProtoEncode};
use mcj_proto::{ByteCursor, ProtoError, ProtocolVersion};

/// Selects hotbar slot 0-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetHeldItem {
    pub slot: i8,
}

impl ProtoEncode for SetHeldItem {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        buf.put_i8(self.slot);
        Ok(())
    }
}

impl ProtoDecode for SetHeldItem {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        Ok(Self {
            slot: cursor.read_i8()?,
        })
    }
}
