//! Protocol encoding/decoding traits and write helpers.
//!
//! Decoding always goes through a [`ByteCursor`], which carries the
//! negotiated version; encoding takes the version explicitly. Writers here
//! mirror the `read_*` methods on the cursor one-to-one.

use bytes::BufMut;

use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::types::{BlockPos, VarInt, VarLong};
use crate::version::{ProtocolVersion, Threshold, VersionTable, V_14W04A, V_14W21A};

/// Encode a value onto a buffer for the given protocol version. Fails only
/// when a field cannot be represented on the wire (an oversize string).
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError>;
}

/// Decode a value from a cursor, honouring the cursor's version.
pub trait ProtoDecode: Sized {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError>;
}

// ---------------------------------------------------------------------------
// Length prefixes
// ---------------------------------------------------------------------------

/// How a byte array announces its length. Strings are VarInt-prefixed in
/// every framed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LengthPrefix {
    U16,
    VarInt,
}

pub(crate) const BYTE_ARRAY_PREFIX: VersionTable<LengthPrefix> = VersionTable::new(
    &[(Threshold::Below(V_14W21A), LengthPrefix::U16)],
    LengthPrefix::VarInt,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityIdWidth {
    Int,
    VarInt,
}

pub(crate) const ENTITY_ID: VersionTable<EntityIdWidth> = VersionTable::new(
    &[(Threshold::Below(V_14W04A), EntityIdWidth::Int)],
    EntityIdWidth::VarInt,
);

fn put_length(buf: &mut impl BufMut, prefix: LengthPrefix, len: usize) -> Result<(), ProtoError> {
    match prefix {
        LengthPrefix::U16 => {
            let len = u16::try_from(len).map_err(|_| ProtoError::ValueTooLong {
                len,
                max: u16::MAX as usize,
            })?;
            buf.put_u16(len);
        }
        LengthPrefix::VarInt => {
            let len = i32::try_from(len).map_err(|_| ProtoError::ValueTooLong {
                len,
                max: i32::MAX as usize,
            })?;
            VarInt::write(buf, len);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub fn put_var_int(buf: &mut impl BufMut, value: i32) {
    VarInt::write(buf, value);
}

pub fn put_var_long(buf: &mut impl BufMut, value: i64) {
    VarLong::write(buf, value);
}

pub fn put_bool(buf: &mut impl BufMut, value: bool) {
    buf.put_u8(value as u8);
}

pub fn put_string(buf: &mut impl BufMut, s: &str) -> Result<(), ProtoError> {
    put_length(buf, LengthPrefix::VarInt, s.len())?;
    buf.put_slice(s.as_bytes());
    Ok(())
}

pub fn put_byte_array(buf: &mut impl BufMut, data: &[u8], version: ProtocolVersion) -> Result<(), ProtoError> {
    put_length(buf, BYTE_ARRAY_PREFIX.select(version), data.len())?;
    buf.put_slice(data);
    Ok(())
}

pub fn put_entity_id(buf: &mut impl BufMut, id: i32, version: ProtocolVersion) {
    match ENTITY_ID.select(version) {
        EntityIdWidth::Int => buf.put_i32(id),
        EntityIdWidth::VarInt => VarInt::write(buf, id),
    }
}

pub fn put_packed_position(buf: &mut impl BufMut, pos: BlockPos, version: ProtocolVersion) {
    buf.put_i64(pos.to_packed(version));
}

pub fn put_var_int_array(buf: &mut impl BufMut, values: &[i32]) {
    VarInt::write(buf, values.len() as i32);
    for value in values {
        VarInt::write(buf, *value);
    }
}

/// Degrees to the one-byte angle encoding (256 steps per turn).
pub fn put_angle(buf: &mut impl BufMut, degrees: f32) {
    buf.put_i8((degrees * 256.0 / 360.0) as i32 as i8);
}

pub fn put_fixed_point_int(buf: &mut impl BufMut, value: f64) {
    buf.put_i32((value * 32.0) as i32);
}

pub fn put_fixed_point_byte(buf: &mut impl BufMut, value: f64) {
    buf.put_i8((value * 32.0) as i8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{V_14W28B, V_1_7_2, V_1_8};
    use bytes::BytesMut;

    #[test]
    fn string_is_var_int_prefixed() {
        let mut buf = BytesMut::new();
        put_string(&mut buf, "abc").unwrap();
        assert_eq!(&buf[..], &[0x03, b'a', b'b', b'c']);
    }

    #[test]
    fn byte_array_prefix_by_epoch() {
        let mut buf = BytesMut::new();
        put_byte_array(&mut buf, &[9, 9], ProtocolVersion(V_1_7_2)).unwrap();
        assert_eq!(&buf[..], &[0x00, 0x02, 9, 9]);

        let mut buf = BytesMut::new();
        put_byte_array(&mut buf, &[9, 9], ProtocolVersion(V_14W28B)).unwrap();
        assert_eq!(&buf[..], &[0x02, 9, 9]);
    }

    #[test]
    fn oversize_legacy_byte_array_is_refused() {
        let data = vec![0u8; u16::MAX as usize + 1];
        let mut buf = BytesMut::new();
        assert!(matches!(
            put_byte_array(&mut buf, &data, ProtocolVersion(V_1_7_2)),
            Err(ProtoError::ValueTooLong { len: 65536, max: 65535 })
        ));
        assert!(buf.is_empty());

        put_byte_array(&mut buf, &data, ProtocolVersion(V_14W28B)).unwrap();
        assert_eq!(buf.len(), 3 + data.len());
    }

    #[test]
    fn entity_id_width_by_epoch() {
        let mut buf = BytesMut::new();
        put_entity_id(&mut buf, 1, ProtocolVersion(V_1_7_2));
        assert_eq!(&buf[..], &[0, 0, 0, 1]);

        let mut buf = BytesMut::new();
        put_entity_id(&mut buf, 1, ProtocolVersion(V_1_8));
        assert_eq!(&buf[..], &[1]);
    }

    #[test]
    fn angle_encoding() {
        let mut buf = BytesMut::new();
        put_angle(&mut buf, 90.0);
        put_angle(&mut buf, 180.0);
        put_angle(&mut buf, -90.0);
        assert_eq!(&buf[..], &[64, 0x80, 0xC0]);
    }
}
