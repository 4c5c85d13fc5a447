//! Base data types used throughout the Java protocol.

use std::fmt;
use std::str::FromStr;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::cursor::ByteCursor;
use crate::error::ProtoError;
use crate::version::{ProtocolVersion, Threshold, VersionTable, V_18W43A};

// ---------------------------------------------------------------------------
// VarInt (i32, LEB128 over the two's-complement bits)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Maximum bytes a VarInt can occupy.
    pub const MAX_BYTES: usize = 5;

    /// Number of bytes `value` takes on the wire.
    pub fn encoded_len(value: i32) -> usize {
        let mut value = value as u32;
        let mut len = 1;
        while value & !0x7F != 0 {
            value >>= 7;
            len += 1;
        }
        len
    }

    /// Decode from the front of a byte slice without consuming it.
    ///
    /// Returns `Ok(None)` when the slice ends before the final byte, which
    /// lets the frame reader wait for more input.
    pub fn peek(buf: &[u8]) -> Result<Option<(i32, usize)>, ProtoError> {
        let mut result: u32 = 0;
        for (i, &byte) in buf.iter().enumerate() {
            if i >= Self::MAX_BYTES {
                return Err(ProtoError::VarIntTooLong {
                    max_bytes: Self::MAX_BYTES,
                });
            }
            result |= ((byte & 0x7F) as u32) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(Some((result as i32, i + 1)));
            }
        }
        if buf.len() >= Self::MAX_BYTES {
            return Err(ProtoError::VarIntTooLong {
                max_bytes: Self::MAX_BYTES,
            });
        }
        Ok(None)
    }

    pub fn write(buf: &mut impl BufMut, value: i32) {
        let mut value = value as u32;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoEncode for VarInt {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        Self::write(buf, self.0);
        Ok(())
    }
}

impl ProtoDecode for VarInt {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        cursor.read_var_int().map(VarInt)
    }
}

// ---------------------------------------------------------------------------
// VarLong (i64, LEB128 over the two's-complement bits)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarLong(pub i64);

impl VarLong {
    /// Maximum bytes a VarLong can occupy.
    pub const MAX_BYTES: usize = 10;

    pub fn write(buf: &mut impl BufMut, value: i64) {
        let mut value = value as u64;
        while value >= 0x80 {
            buf.put_u8(value as u8 | 0x80);
            value >>= 7;
        }
        buf.put_u8(value as u8);
    }
}

impl ProtoEncode for VarLong {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        Self::write(buf, self.0);
        Ok(())
    }
}

impl ProtoDecode for VarLong {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        cursor.read_var_long().map(VarLong)
    }
}

// ---------------------------------------------------------------------------
// Uuid (two big-endian u64)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Uuid {
    pub most_significant: u64,
    pub least_significant: u64,
}

impl Uuid {
    pub const ZERO: Self = Self {
        most_significant: 0,
        least_significant: 0,
    };

    pub fn new(most: u64, least: u64) -> Self {
        Self {
            most_significant: most,
            least_significant: least,
        }
    }

    pub fn as_u128(&self) -> u128 {
        ((self.most_significant as u128) << 64) | self.least_significant as u128
    }
}

impl ProtoEncode for Uuid {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        buf.put_u64(self.most_significant);
        buf.put_u64(self.least_significant);
        Ok(())
    }
}

impl ProtoDecode for Uuid {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        cursor.read_uuid()
    }
}

/// Accepts both the hyphenated form and the bare 32-digit form that old
/// login-success packets used.
impl FromStr for Uuid {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(|c| *c != '-').collect();
        if digits.len() != 32 {
            return Err(ProtoError::InvalidUuid(s.to_string()));
        }
        let value =
            u128::from_str_radix(&digits, 16).map_err(|_| ProtoError::InvalidUuid(s.to_string()))?;
        Ok(Self::new((value >> 64) as u64, value as u64))
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.as_u128();
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xFFFF_FFFF_FFFF,
        )
    }
}

// ---------------------------------------------------------------------------
// BlockPos (packed into one i64)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionLayout {
    /// x(26) y(12, unsigned) z(26)
    XYZ,
    /// x(26) z(26) y(12, signed)
    XZY,
}

const POSITION_LAYOUT: VersionTable<PositionLayout> = VersionTable::new(
    &[(Threshold::Below(V_18W43A), PositionLayout::XYZ)],
    PositionLayout::XZY,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Unpack a 64-bit position using the bit layout of `version`.
    pub fn from_packed(raw: i64, version: ProtocolVersion) -> Self {
        match POSITION_LAYOUT.select(version) {
            PositionLayout::XYZ => Self {
                x: (raw >> 38) as i32,
                y: ((raw >> 26) & 0xFFF) as i32,
                z: (raw << 38 >> 38) as i32,
            },
            PositionLayout::XZY => Self {
                x: (raw >> 38) as i32,
                y: (raw << 52 >> 52) as i32,
                z: (raw << 26 >> 38) as i32,
            },
        }
    }

    pub fn to_packed(&self, version: ProtocolVersion) -> i64 {
        let x = (self.x as i64) & 0x3FF_FFFF;
        let y = (self.y as i64) & 0xFFF;
        let z = (self.z as i64) & 0x3FF_FFFF;
        match POSITION_LAYOUT.select(version) {
            PositionLayout::XYZ => (x << 38) | (y << 26) | z,
            PositionLayout::XZY => (x << 38) | (z << 12) | y,
        }
    }
}

impl ProtoEncode for BlockPos {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        buf.put_i64(self.to_packed(version));
        Ok(())
    }
}

impl ProtoDecode for BlockPos {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        cursor.read_packed_position()
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Location (f64 x, y, z) and small location (f32 x, y, z)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl ProtoEncode for Location {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        buf.put_f64(self.x);
        buf.put_f64(self.y);
        buf.put_f64(self.z);
        Ok(())
    }
}

impl ProtoDecode for Location {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        cursor.read_location()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3f {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl ProtoEncode for Vec3f {
    fn proto_encode(&self, buf: &mut impl BufMut, _version: ProtocolVersion) -> Result<(), ProtoError> {
        buf.put_f32(self.x);
        buf.put_f32(self.y);
        buf.put_f32(self.z);
        Ok(())
    }
}

impl ProtoDecode for Vec3f {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        cursor.read_small_location()
    }
}

// ---------------------------------------------------------------------------
// Identifier (namespace:path)
// ---------------------------------------------------------------------------

/// A resource location such as `minecraft:stone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    pub namespace: String,
    pub path: String,
}

impl Identifier {
    pub const DEFAULT_NAMESPACE: &'static str = "minecraft";

    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    pub fn minecraft(path: impl Into<String>) -> Self {
        Self::new(Self::DEFAULT_NAMESPACE, path)
    }

    /// Parse `namespace:path`; a bare `path` gets the default namespace.
    pub fn parse(s: &str) -> Result<Self, ProtoError> {
        let (namespace, path) = match s.split_once(':') {
            Some((ns, path)) => (ns, path),
            None => (Self::DEFAULT_NAMESPACE, s),
        };
        if namespace.is_empty() || path.is_empty() || path.contains(':') {
            return Err(ProtoError::InvalidIdentifier(s.to_string()));
        }
        Ok(Self::new(namespace, path))
    }
}

impl FromStr for Identifier {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
