//! EncryptionRequest (0x01) — Server → Client.

use bytes::{BufMut, Bytes};

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::version::{ProtocolVersion, Threshold, VersionTable, V_1_20_5};

const HAS_SHOULD_AUTHENTICATE: VersionTable<bool> =
    VersionTable::new(&[(Threshold::Below(V_1_20_5), false)], true);

/// Starts the key exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionRequest {
    /// Usually empty on vanilla servers.
    pub server_id: String,
    /// SubjectPublicKeyInfo DER of the server's RSA key.
    pub public_key: Bytes,
    pub verify_token: Bytes,
    /// Whether the client must contact the session service. Always true
    /// before 1.20.5.
    pub should_authenticate: bool,
}

impl ProtoEncode for EncryptionRequest {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_string(buf, &self.server_id)?;
        codec::put_byte_array(buf, &self.public_key, version)?;
        codec::put_byte_array(buf, &self.verify_token, version)?;
        if HAS_SHOULD_AUTHENTICATE.select(version) {
            codec::put_bool(buf, self.should_authenticate);
        }
        Ok(())
    }
}

impl ProtoDecode for EncryptionRequest {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let server_id = cursor.read_string()?;
        let public_key = cursor.read_byte_array()?;
        let verify_token = cursor.read_byte_array()?;
        let should_authenticate = if HAS_SHOULD_AUTHENTICATE.select(cursor.version()) {
            cursor.read_bool()?
        } else {
            true
        };
        Ok(Self {
            server_id,
            public_key,
            verify_token,
            should_authenticate,
        })
    }
}
