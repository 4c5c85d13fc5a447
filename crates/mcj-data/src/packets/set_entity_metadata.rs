//! SetEntityMetadata — Server → Client.

use mcj_proto::ByteCursor;

use super::PlayDecode;
use crate::entity_metadata::EntityMetadata;
use crate::error::DataError;
use crate::registry::Registries;

/// A partial metadata update for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SetEntityMetadata {
    pub entity_id: i32,
    pub metadata: EntityMetadata,
}

impl PlayDecode for SetEntityMetadata {
    fn play_decode(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Self, DataError> {
        Ok(Self {
            entity_id: cursor.read_entity_id()?,
            metadata: EntityMetadata::read(cursor, registries)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistrySet;
    use bytes::{BufMut, BytesMut};
    use mcj_proto::codec::put_var_int;
    use mcj_proto::version::{V_1_12_2, V_1_7_10};
    use mcj_proto::ProtocolVersion;

    #[test]
    fn decode_modern() {
        let mut buf = BytesMut::new();
        put_var_int(&mut buf, 1234);
        buf.put_u8(0);
        put_var_int(&mut buf, 0);
        buf.put_i8(0x01);
        buf.put_u8(0xFF);
        let mut cursor = ByteCursor::new(buf.freeze(), ProtocolVersion(V_1_12_2));
        let packet = SetEntityMetadata::play_decode(&mut cursor, &RegistrySet::empty()).unwrap();
        assert_eq!(packet.entity_id, 1234);
        assert_eq!(packet.metadata.get_byte(0, 0), 1);
        assert!(cursor.is_empty());
    }

    #[test]
    fn decode_legacy_int_entity_id() {
        let mut buf = BytesMut::new();
        buf.put_i32(7);
        buf.put_u8(0x7F);
        let mut cursor = ByteCursor::new(buf.freeze(), ProtocolVersion(V_1_7_10));
        let packet = SetEntityMetadata::play_decode(&mut cursor, &RegistrySet::empty()).unwrap();
        assert_eq!(packet.entity_id, 7);
        assert!(packet.metadata.is_empty());
    }
}
