//! LoginPluginRequest (0x04) — Server → Client, and its response (0x02).
//!
//! Custom login channels from 1.13 onwards. This client understands none of
//! them and answers every request with "not understood".

use bytes::{BufMut, Bytes};

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::types::Identifier;
use crate::version::ProtocolVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPluginRequest {
    pub message_id: i32,
    pub channel: Identifier,
    pub data: Bytes,
}

impl ProtoDecode for LoginPluginRequest {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        Ok(Self {
            message_id: cursor.read_var_int()?,
            channel: cursor.read_identifier()?,
            data: cursor.read_remaining(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPluginResponse {
    pub message_id: i32,
    /// `None` means the channel is not understood.
    pub data: Option<Bytes>,
}

impl LoginPluginResponse {
    pub fn not_understood(message_id: i32) -> Self {
        Self {
            message_id,
            data: None,
        }
    }
}

impl ProtoEncode for LoginPluginResponse {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_var_int(buf, self.message_id);
        codec::put_bool(buf, self.data.is_some());
        if let Some(data) = &self.data {
            buf.put_slice(data);
        }
        Ok(())
    }
}
