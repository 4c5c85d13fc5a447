//! SetCompression (0x03) — Server → Client.

use bytes::BufMut;

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::version::ProtocolVersion;

/// Enables frame compression for payloads of at least `threshold` bytes.
/// A negative threshold disables compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCompression {
    pub threshold: i32,
}

impl ProtoEncode for SetCompression {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_var_int(buf, self.threshold);
        Ok(())
    }
}

impl ProtoDecode for SetCompression {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        Ok(Self {
            threshold: cursor.read_var_int()?,
        })
    }
}
