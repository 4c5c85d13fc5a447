//! LoginSuccess (0x02) — Server → Client.

use bytes::BufMut;

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::types::Uuid;
use crate::version::{ProtocolVersion, Threshold, VersionTable, V_1_19, V_1_20_5, V_20W12A};

/// 1.20.5 and 1.21 append a strict-error-handling flag; 1.21.2 drops it.
const V_1_21_2: i32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UuidEncoding {
    /// Hyphenated (or bare) string.
    Text,
    Binary,
}

const UUID_ENCODING: VersionTable<UuidEncoding> = VersionTable::new(
    &[(Threshold::Below(V_20W12A), UuidEncoding::Text)],
    UuidEncoding::Binary,
);

const HAS_PROPERTIES: VersionTable<bool> =
    VersionTable::new(&[(Threshold::Below(V_1_19), false)], true);

const HAS_STRICT_ERRORS: VersionTable<bool> = VersionTable::new(
    &[
        (Threshold::Below(V_1_20_5), false),
        (Threshold::Below(V_1_21_2), true),
    ],
    false,
);

/// A signed game-profile property such as `textures`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

/// Ends the login state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub uuid: Uuid,
    pub username: String,
    pub properties: Vec<ProfileProperty>,
}

impl ProtoEncode for LoginSuccess {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        match UUID_ENCODING.select(version) {
            UuidEncoding::Text => codec::put_string(buf, &self.uuid.to_string())?,
            UuidEncoding::Binary => self.uuid.proto_encode(buf, version)?,
        }
        codec::put_string(buf, &self.username)?;
        if HAS_PROPERTIES.select(version) {
            codec::put_var_int(buf, self.properties.len() as i32);
            for property in &self.properties {
                codec::put_string(buf, &property.name)?;
                codec::put_string(buf, &property.value)?;
                codec::put_bool(buf, property.signature.is_some());
                if let Some(signature) = &property.signature {
                    codec::put_string(buf, signature)?;
                }
            }
        }
        if HAS_STRICT_ERRORS.select(version) {
            codec::put_bool(buf, true);
        }
        Ok(())
    }
}

impl ProtoDecode for LoginSuccess {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let uuid = match UUID_ENCODING.select(cursor.version()) {
            UuidEncoding::Text => cursor.read_string()?.parse::<Uuid>()?,
            UuidEncoding::Binary => cursor.read_uuid()?,
        };
        let username = cursor.read_string()?;
        let mut properties = Vec::new();
        if HAS_PROPERTIES.select(cursor.version()) {
            let count = cursor.read_count()?;
            for _ in 0..count {
                let name = cursor.read_string()?;
                let value = cursor.read_string()?;
                let signature = if cursor.read_bool()? {
                    Some(cursor.read_string()?)
                } else {
                    None
                };
                properties.push(ProfileProperty {
                    name,
                    value,
                    signature,
                });
            }
        }
        if HAS_STRICT_ERRORS.select(cursor.version()) {
            cursor.read_bool()?;
        }
        Ok(Self {
            uuid,
            username,
            properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{V_1_12_2, V_1_16};
    use bytes::BytesMut;

    fn roundtrip(id: i32, pkt: &LoginSuccess) -> LoginSuccess {
        let version = ProtocolVersion(id);
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf, version).unwrap();
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        let decoded = LoginSuccess::proto_decode(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        decoded
    }

    #[test]
    fn text_uuid_before_20w12a() {
        let pkt = LoginSuccess {
            uuid: Uuid::new(0x069a79f444e94726, 0xa5befca90e38aaf5),
            username: "Notch".into(),
            properties: Vec::new(),
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf, ProtocolVersion(V_1_12_2)).unwrap();
        assert_eq!(buf[0], 36);
        assert_eq!(roundtrip(V_1_12_2, &pkt), pkt);
        assert_eq!(roundtrip(V_1_16, &pkt), pkt);
    }

    #[test]
    fn properties_from_1_19() {
        let pkt = LoginSuccess {
            uuid: Uuid::new(1, 2),
            username: "Alex".into(),
            properties: vec![ProfileProperty {
                name: "textures".into(),
                value: "e30=".into(),
                signature: Some("sig".into()),
            }],
        };
        assert_eq!(roundtrip(V_1_19, &pkt), pkt);
        assert_eq!(roundtrip(V_1_20_5, &pkt), pkt);
        assert!(roundtrip(V_1_16, &pkt).properties.is_empty());
    }
}
