//! EncryptionResponse (0x01) — Client → Server.

use bytes::{BufMut, Bytes};

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::version::{ProtocolVersion, Threshold, VersionTable, V_1_19, V_1_19_2};

/// 1.19 and 1.19.2 let the client send a signed salt instead of the
/// verify token; a boolean says which follows.
const HAS_TOKEN_FLAG: VersionTable<bool> = VersionTable::new(
    &[
        (Threshold::Below(V_1_19), false),
        (Threshold::AtMost(V_1_19_2), true),
    ],
    false,
);

/// Shared secret and verify token, both encrypted with the server's public
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionResponse {
    pub shared_secret: Bytes,
    pub verify_token: Bytes,
}

impl ProtoEncode for EncryptionResponse {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_byte_array(buf, &self.shared_secret, version)?;
        if HAS_TOKEN_FLAG.select(version) {
            codec::put_bool(buf, true);
        }
        codec::put_byte_array(buf, &self.verify_token, version)
    }
}

impl ProtoDecode for EncryptionResponse {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let shared_secret = cursor.read_byte_array()?;
        if HAS_TOKEN_FLAG.select(cursor.version()) && !cursor.read_bool()? {
            return Err(ProtoError::InvalidData(
                "signed salt in place of verify token".into(),
            ));
        }
        let verify_token = cursor.read_byte_array()?;
        Ok(Self {
            shared_secret,
            verify_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{V_1_19_3, V_1_8};
    use bytes::BytesMut;

    fn sample() -> EncryptionResponse {
        EncryptionResponse {
            shared_secret: Bytes::from_static(&[0xAA; 8]),
            verify_token: Bytes::from_static(&[0xBB; 4]),
        }
    }

    #[test]
    fn token_flag_only_on_1_19_and_1_19_2() {
        for (id, expected_len) in [
            (V_1_8, 1 + 8 + 1 + 4),
            (V_1_19, 1 + 8 + 1 + 1 + 4),
            (V_1_19_2, 1 + 8 + 1 + 1 + 4),
            (V_1_19_3, 1 + 8 + 1 + 4),
        ] {
            let version = ProtocolVersion(id);
            let mut buf = BytesMut::new();
            sample().proto_encode(&mut buf, version).unwrap();
            assert_eq!(buf.len(), expected_len, "protocol {id}");
            let mut cursor = ByteCursor::new(buf.freeze(), version);
            assert_eq!(EncryptionResponse::proto_decode(&mut cursor).unwrap(), sample());
        }
    }
}
