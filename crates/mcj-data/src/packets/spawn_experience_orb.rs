//! SpawnExperienceOrb — Server → Client.

use bytes::BufMut;
use mcj_proto::codec::{put_entity_id, put_fixed_point_int, ProtoDecode, ProtoEncode};
use mcj_proto::types::Location;
use mcj_proto::version::V_16W06A;
use mcj_proto::{ByteCursor, ProtoError, ProtocolVersion, Threshold, VersionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionFormat {
    /// `i32` fixed point, 1/32 block.
    FixedPoint,
    Double,
}

const POSITION_FORMAT: VersionTable<PositionFormat> = VersionTable::new(
    &[(Threshold::Below(V_16W06A), PositionFormat::FixedPoint)],
    PositionFormat::Double,
);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnExperienceOrb {
    pub entity_id: i32,
    pub position: Location,
    pub count: u16,
}

impl ProtoEncode for SpawnExperienceOrb {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        put_entity_id(buf, self.entity_id, version);
        match POSITION_FORMAT.select(version) {
            PositionFormat::FixedPoint => {
                put_fixed_point_int(buf, self.position.x);
                put_fixed_point_int(buf, self.position.y);
                put_fixed_point_int(buf, self.position.z);
            }
            PositionFormat::Double => self.position.proto_encode(buf, version)?,
        }
        buf.put_u16(self.count);
        Ok(())
    }
}

impl ProtoDecode for SpawnExperienceOrb {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let entity_id = cursor.read_entity_id()?;
        let position = match POSITION_FORMAT.select(cursor.version()) {
            PositionFormat::FixedPoint => Location::new(
                cursor.read_fixed_point_int()?,
                cursor.read_fixed_point_int()?,
                cursor.read_fixed_point_int()?,
            ),
            PositionFormat::Double => cursor.read_location()?,
        };
        Ok(Self {
            entity_id,
            position,
            count: cursor.read_u16()?,
        })
    }
}
