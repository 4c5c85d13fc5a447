//! LoginStart (0x00) — Client → Server.

use bytes::BufMut;

use crate::codec::{self, ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::types::Uuid;
use crate::version::{ProtocolVersion, Threshold, VersionTable, V_1_19, V_1_19_2, V_1_20};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    NameOnly,
    /// name, has-signature-data flag
    SignatureFlag,
    /// name, has-signature-data flag, optional uuid
    SignatureFlagOptionalUuid,
    /// name, optional uuid
    OptionalUuid,
    /// name, uuid
    Uuid,
}

const LAYOUT: VersionTable<Layout> = VersionTable::new(
    &[
        (Threshold::Below(V_1_19), Layout::NameOnly),
        (Threshold::Below(V_1_19_2), Layout::SignatureFlag),
        (Threshold::Exactly(V_1_19_2), Layout::SignatureFlagOptionalUuid),
        (Threshold::AtMost(V_1_20), Layout::OptionalUuid),
    ],
    Layout::Uuid,
);

/// Begins the login; carries the player name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStart {
    pub username: String,
    pub uuid: Option<Uuid>,
}

impl ProtoEncode for LoginStart {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        codec::put_string(buf, &self.username)?;
        match LAYOUT.select(version) {
            Layout::NameOnly => {}
            // Chat signing keys are never sent.
            Layout::SignatureFlag => codec::put_bool(buf, false),
            Layout::SignatureFlagOptionalUuid => {
                codec::put_bool(buf, false);
                put_optional_uuid(buf, self.uuid, version)?;
            }
            Layout::OptionalUuid => put_optional_uuid(buf, self.uuid, version)?,
            Layout::Uuid => self.uuid.unwrap_or_default().proto_encode(buf, version)?,
        }
        Ok(())
    }
}

fn put_optional_uuid(
    buf: &mut impl BufMut,
    uuid: Option<Uuid>,
    version: ProtocolVersion,
) -> Result<(), ProtoError> {
    codec::put_bool(buf, uuid.is_some());
    match uuid {
        Some(uuid) => uuid.proto_encode(buf, version),
        None => Ok(()),
    }
}

impl ProtoDecode for LoginStart {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let username = cursor.read_string()?;
        let read_optional_uuid = |cursor: &mut ByteCursor| -> Result<Option<Uuid>, ProtoError> {
            if cursor.read_bool()? {
                Ok(Some(cursor.read_uuid()?))
            } else {
                Ok(None)
            }
        };
        let skip_signature = |cursor: &mut ByteCursor| -> Result<(), ProtoError> {
            if cursor.read_bool()? {
                cursor.read_i64()?;
                cursor.read_byte_array()?;
                cursor.read_byte_array()?;
            }
            Ok(())
        };
        let uuid = match LAYOUT.select(cursor.version()) {
            Layout::NameOnly => None,
            Layout::SignatureFlag => {
                skip_signature(cursor)?;
                None
            }
            Layout::SignatureFlagOptionalUuid => {
                skip_signature(cursor)?;
                read_optional_uuid(cursor)?
            }
            Layout::OptionalUuid => read_optional_uuid(cursor)?,
            Layout::Uuid => Some(cursor.read_uuid()?),
        };
        Ok(Self { username, uuid })
    }
}
