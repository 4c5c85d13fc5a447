//! Forward-only, bounds-checked reader over one received frame.
//!
//! A [`ByteCursor`] owns the frame's bytes, the read position and the
//! negotiated [`ProtocolVersion`]. Every read either consumes exactly the
//! bytes it decoded or fails without producing a partial value. The
//! position never moves past the end.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{EntityIdWidth, LengthPrefix, BYTE_ARRAY_PREFIX, ENTITY_ID};
use crate::error::ProtoError;
use crate::types::{BlockPos, Identifier, Location, Uuid, VarInt, VarLong, Vec3f};
use crate::version::ProtocolVersion;

/// Upper bounds checked against declared lengths before any data is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Longest string payload in bytes.
    pub max_string_len: usize,
    /// Longest byte array in bytes.
    pub max_array_len: usize,
}

impl DecodeLimits {
    pub const DEFAULT_MAX_STRING_LEN: usize = 32767;
    pub const DEFAULT_MAX_ARRAY_LEN: usize = 2 * 1024 * 1024;
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_string_len: Self::DEFAULT_MAX_STRING_LEN,
            max_array_len: Self::DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ByteCursor {
    bytes: Bytes,
    position: usize,
    version: ProtocolVersion,
    limits: DecodeLimits,
}

impl ByteCursor {
    pub fn new(bytes: impl Into<Bytes>, version: ProtocolVersion) -> Self {
        Self::with_limits(bytes, version, DecodeLimits::default())
    }

    pub fn with_limits(bytes: impl Into<Bytes>, version: ProtocolVersion, limits: DecodeLimits) -> Self {
        Self {
            bytes: bytes.into(),
            position: 0,
            version,
            limits,
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless every byte of the frame has been consumed.
    pub fn expect_end(&self) -> Result<(), ProtoError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ProtoError::TrailingBytes(n)),
        }
    }

    fn ensure(&self, needed: usize) -> Result<(), ProtoError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(ProtoError::BufferTooShort { needed, remaining });
        }
        Ok(())
    }

    /// Take `n` bytes as a zero-copy slice of the frame.
    fn take(&mut self, n: usize) -> Result<Bytes, ProtoError> {
        self.ensure(n)?;
        let out = self.bytes.slice(self.position..self.position + n);
        self.position += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ProtoError> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.position..self.position + N]);
        self.position += N;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Fixed-width primitives (big-endian)
    // -----------------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8, ProtoError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ProtoError> {
        Ok(self.read_u8()? as i8)
    }

    /// `1` is true, every other value is false.
    pub fn read_bool(&mut self) -> Result<bool, ProtoError> {
        Ok(self.read_u8()? == 1)
    }

    pub fn read_u16(&mut self) -> Result<u16, ProtoError> {
        Ok(u16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, ProtoError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtoError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ProtoError> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, ProtoError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, ProtoError> {
        Ok(f32::from_be_bytes(self.take_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, ProtoError> {
        Ok(f64::from_be_bytes(self.take_array()?))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Bytes, ProtoError> {
        self.take(n)
    }

    /// Everything left in the frame.
    pub fn read_remaining(&mut self) -> Bytes {
        let out = self.bytes.slice(self.position..);
        self.position = self.bytes.len();
        out
    }

    // -----------------------------------------------------------------------
    // Variable-length integers
    // -----------------------------------------------------------------------

    pub fn read_var_int(&mut self) -> Result<i32, ProtoError> {
        let mut result: u32 = 0;
        for i in 0..VarInt::MAX_BYTES {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7F) as u32) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result as i32);
            }
        }
        Err(ProtoError::VarIntTooLong {
            max_bytes: VarInt::MAX_BYTES,
        })
    }

    pub fn read_var_long(&mut self) -> Result<i64, ProtoError> {
        let mut result: u64 = 0;
        for i in 0..VarLong::MAX_BYTES {
            let byte = self.read_u8()?;
            result |= ((byte & 0x7F) as u64) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result as i64);
            }
        }
        Err(ProtoError::VarIntTooLong {
            max_bytes: VarLong::MAX_BYTES,
        })
    }

    /// VarInt-counted list of VarInts.
    pub fn read_var_int_array(&mut self) -> Result<Vec<i32>, ProtoError> {
        let count = self.read_count()?;
        // Each element needs at least one byte.
        self.ensure(count)?;
        (0..count).map(|_| self.read_var_int()).collect()
    }

    /// A VarInt element count; negative counts are format violations.
    pub fn read_count(&mut self) -> Result<usize, ProtoError> {
        let count = self.read_var_int()?;
        usize::try_from(count).map_err(|_| ProtoError::NegativeLength(count))
    }

    // -----------------------------------------------------------------------
    // Length-prefixed data
    // -----------------------------------------------------------------------

    fn read_length(&mut self, prefix: LengthPrefix, max: usize) -> Result<usize, ProtoError> {
        let declared = match prefix {
            LengthPrefix::U16 => self.read_u16()? as usize,
            LengthPrefix::VarInt => {
                let len = self.read_var_int()?;
                usize::try_from(len).map_err(|_| ProtoError::NegativeLength(len))?
            }
        };
        if declared > max {
            return Err(ProtoError::LengthTooLarge { declared, max });
        }
        Ok(declared)
    }

    pub fn read_string(&mut self) -> Result<String, ProtoError> {
        let len = self.read_length(LengthPrefix::VarInt, self.limits.max_string_len)?;
        let data = self.take(len)?;
        String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)
    }

    pub fn read_byte_array(&mut self) -> Result<Bytes, ProtoError> {
        let len = self.read_length(BYTE_ARRAY_PREFIX.select(self.version), self.limits.max_array_len)?;
        self.take(len)
    }

    pub fn read_identifier(&mut self) -> Result<Identifier, ProtoError> {
        Identifier::parse(&self.read_string()?)
    }

    /// Chat components travel as JSON text; they are kept verbatim.
    pub fn read_chat(&mut self) -> Result<String, ProtoError> {
        self.read_string()
    }

    /// Carve out the next `n` bytes as an independent cursor with the same
    /// version and limits.
    pub fn sub_cursor(&mut self, n: usize) -> Result<ByteCursor, ProtoError> {
        let bytes = self.take(n)?;
        Ok(ByteCursor::with_limits(bytes, self.version, self.limits))
    }

    // -----------------------------------------------------------------------
    // Game-specific encodings
    // -----------------------------------------------------------------------

    pub fn read_entity_id(&mut self) -> Result<i32, ProtoError> {
        match ENTITY_ID.select(self.version) {
            EntityIdWidth::Int => self.read_i32(),
            EntityIdWidth::VarInt => self.read_var_int(),
        }
    }

    pub fn read_uuid(&mut self) -> Result<Uuid, ProtoError> {
        self.ensure(16)?;
        Ok(Uuid::new(self.read_u64()?, self.read_u64()?))
    }

    pub fn read_fixed_point_int(&mut self) -> Result<f64, ProtoError> {
        Ok(self.read_i32()? as f64 / 32.0)
    }

    pub fn read_fixed_point_byte(&mut self) -> Result<f64, ProtoError> {
        Ok(self.read_i8()? as f64 / 32.0)
    }

    /// One signed byte, 256 steps per full turn, returned in degrees.
    pub fn read_angle(&mut self) -> Result<f32, ProtoError> {
        Ok(self.read_i8()? as f32 * 360.0 / 256.0)
    }

    pub fn read_packed_position(&mut self) -> Result<BlockPos, ProtoError> {
        let raw = self.read_i64()?;
        Ok(BlockPos::from_packed(raw, self.version))
    }

    /// `i32 x, u8 y, i32 z`, used by pre-1.8 block packets.
    pub fn read_block_position_byte(&mut self) -> Result<BlockPos, ProtoError> {
        self.ensure(9)?;
        let x = self.read_i32()?;
        let y = self.read_u8()? as i32;
        let z = self.read_i32()?;
        Ok(BlockPos::new(x, y, z))
    }

    /// `i32 x, i16 y, i32 z`, used by pre-1.8 block packets.
    pub fn read_block_position_short(&mut self) -> Result<BlockPos, ProtoError> {
        self.ensure(10)?;
        let x = self.read_i32()?;
        let y = self.read_i16()? as i32;
        let z = self.read_i32()?;
        Ok(BlockPos::new(x, y, z))
    }

    /// `i32 x, i32 y, i32 z`.
    pub fn read_block_position_int(&mut self) -> Result<BlockPos, ProtoError> {
        self.ensure(12)?;
        Ok(BlockPos::new(self.read_i32()?, self.read_i32()?, self.read_i32()?))
    }

    pub fn read_location(&mut self) -> Result<Location, ProtoError> {
        self.ensure(24)?;
        Ok(Location::new(self.read_f64()?, self.read_f64()?, self.read_f64()?))
    }

    pub fn read_small_location(&mut self) -> Result<Vec3f, ProtoError> {
        self.ensure(12)?;
        Ok(Vec3f::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{put_byte_array, put_string};
    use crate::version::{V_1_12_2, V_1_14, V_1_8};
    use bytes::{BufMut, BytesMut};

    fn cursor(bytes: &[u8]) -> ByteCursor {
        ByteCursor::new(Bytes::copy_from_slice(bytes), ProtocolVersion(V_1_12_2))
    }

    #[test]
    fn big_endian_primitives() {
        let mut c = cursor(&[
            0x12, 0x34, // u16
            0xFF, 0xFE, // i16
            0x00, 0x00, 0x01, 0x00, // i32
            0x3F, 0x80, 0x00, 0x00, // f32 1.0
        ]);
        assert_eq!(c.read_u16().unwrap(), 0x1234);
        assert_eq!(c.read_i16().unwrap(), -2);
        assert_eq!(c.read_i32().unwrap(), 256);
        assert_eq!(c.read_f32().unwrap(), 1.0);
        assert!(c.is_empty());
    }

    #[test]
    fn bool_only_one_is_true() {
        let mut c = cursor(&[1, 0, 2, 0xFF]);
        assert!(c.read_bool().unwrap());
        assert!(!c.read_bool().unwrap());
        assert!(!c.read_bool().unwrap());
        assert!(!c.read_bool().unwrap());
    }

    #[test]
    fn read_past_end_fails_without_advancing() {
        let mut c = cursor(&[0x00, 0x01, 0x02]);
        assert!(matches!(
            c.read_i32(),
            Err(ProtoError::BufferTooShort {
                needed: 4,
                remaining: 3
            })
        ));
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_u8().unwrap(), 0);
    }

    #[test]
    fn var_int_decoding() {
        let mut c = cursor(&[0xDD, 0xC7, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(c.read_var_int().unwrap(), 25565);
        assert_eq!(c.position(), 3);
        assert_eq!(c.read_var_int().unwrap(), -1);
        assert!(c.is_empty());
    }

    #[test]
    fn var_int_six_bytes_rejected() {
        let mut c = cursor(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert!(matches!(
            c.read_var_int(),
            Err(ProtoError::VarIntTooLong { max_bytes: 5 })
        ));
    }

    #[test]
    fn var_long_eleven_bytes_rejected() {
        let mut bytes = vec![0x80; 10];
        bytes.push(0x01);
        let mut c = cursor(&bytes);
        assert!(matches!(
            c.read_var_long(),
            Err(ProtoError::VarIntTooLong { max_bytes: 10 })
        ));
    }

    #[test]
    fn truncated_var_int_is_bounds_error() {
        let mut c = cursor(&[0x80, 0x80]);
        assert!(matches!(
            c.read_var_int(),
            Err(ProtoError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn string_over_limit_rejected_before_reading() {
        // Declares 40000 bytes but carries none; must fail on the length.
        let mut buf = BytesMut::new();
        VarInt::write(&mut buf, 40000);
        let mut c = cursor(&buf);
        assert!(matches!(
            c.read_string(),
            Err(ProtoError::LengthTooLarge {
                declared: 40000,
                max: 32767
            })
        ));
    }

    #[test]
    fn string_limit_is_configurable() {
        let mut buf = BytesMut::new();
        put_string(&mut buf, "hello").unwrap();
        let limits = DecodeLimits {
            max_string_len: 4,
            ..DecodeLimits::default()
        };
        let mut c = ByteCursor::with_limits(buf.freeze(), ProtocolVersion(V_1_8), limits);
        assert!(c.read_string().is_err());
    }

    #[test]
    fn negative_string_length_rejected() {
        let mut buf = BytesMut::new();
        VarInt::write(&mut buf, -1);
        assert!(matches!(
            cursor(&buf).read_string(),
            Err(ProtoError::NegativeLength(-1))
        ));
    }

    #[test]
    fn string_invalid_utf8() {
        let mut c = cursor(&[0x02, 0xC3, 0x28]);
        assert!(matches!(c.read_string(), Err(ProtoError::InvalidUtf8)));
    }

    #[test]
    fn byte_array_with_legacy_prefix() {
        let mut buf = BytesMut::new();
        let version = ProtocolVersion(4);
        put_byte_array(&mut buf, &[1, 2, 3], version).unwrap();
        let mut c = ByteCursor::new(buf.freeze(), version);
        assert_eq!(&c.read_byte_array().unwrap()[..], &[1, 2, 3]);
        assert!(c.is_empty());
    }

    #[test]
    fn byte_array_over_limit() {
        let mut buf = BytesMut::new();
        VarInt::write(&mut buf, 3 * 1024 * 1024);
        assert!(matches!(
            cursor(&buf).read_byte_array(),
            Err(ProtoError::LengthTooLarge { .. })
        ));
    }

    #[test]
    fn packed_position_follows_cursor_version() {
        let raw: i64 = (1 << 38) | (2 << 26) | 3;
        let mut buf = BytesMut::new();
        buf.put_i64(raw);
        let bytes = buf.freeze();

        let mut old = ByteCursor::new(bytes.clone(), ProtocolVersion(V_1_12_2));
        assert_eq!(old.read_packed_position().unwrap(), BlockPos::new(1, 2, 3));
        let mut new = ByteCursor::new(bytes, ProtocolVersion(V_1_14));
        assert_eq!(new.read_packed_position().unwrap(), BlockPos::new(1, 3, 32768));
    }

    #[test]
    fn angle_and_fixed_point() {
        let mut c = cursor(&[64, 0x80, 0x00, 0x00, 0x00, 0x40, 0xF0]);
        assert_eq!(c.read_angle().unwrap(), 90.0);
        assert_eq!(c.read_angle().unwrap(), -180.0);
        assert_eq!(c.read_fixed_point_int().unwrap(), 2.0);
        assert_eq!(c.read_fixed_point_byte().unwrap(), -0.5);
    }

    #[test]
    fn entity_id_width() {
        let mut old = ByteCursor::new(Bytes::from_static(&[0, 0, 1, 0]), ProtocolVersion(5));
        assert_eq!(old.read_entity_id().unwrap(), 256);
        let mut new = ByteCursor::new(Bytes::from_static(&[0x80, 0x02]), ProtocolVersion(V_1_8));
        assert_eq!(new.read_entity_id().unwrap(), 256);
    }

    #[test]
    fn legacy_block_positions() {
        let mut c = cursor(&[0, 0, 0, 1, 64, 0, 0, 0, 2]);
        assert_eq!(c.read_block_position_byte().unwrap(), BlockPos::new(1, 64, 2));

        let mut c = cursor(&[0, 0, 0, 1, 0xFF, 0xFF, 0, 0, 0, 2]);
        assert_eq!(c.read_block_position_short().unwrap(), BlockPos::new(1, -1, 2));
    }

    #[test]
    fn var_int_array_and_count() {
        let mut c = cursor(&[3, 1, 0x80, 0x01, 5]);
        assert_eq!(c.read_var_int_array().unwrap(), vec![1, 128, 5]);

        let mut c = cursor(&[10, 1]);
        assert!(c.read_var_int_array().is_err());
    }

    #[test]
    fn sub_cursor_and_remaining() {
        let mut c = cursor(&[1, 2, 3, 4, 5]);
        let mut sub = c.sub_cursor(2).unwrap();
        assert_eq!(sub.read_u8().unwrap(), 1);
        assert_eq!(sub.read_u8().unwrap(), 2);
        assert!(sub.read_u8().is_err());
        assert_eq!(c.position(), 2);
        assert_eq!(&c.read_remaining()[..], &[3, 4, 5]);
        assert!(c.expect_end().is_ok());
    }

    #[test]
    fn expect_end_reports_trailing() {
        let c = cursor(&[1, 2]);
        assert!(matches!(c.expect_end(), Err(ProtoError::TrailingBytes(2))));
    }
}
