//! SetContainerSlot — Server → Client.

use bytes::BufMut;
use mcj_proto::codec::put_var_int;
use mcj_proto::version::V_1_17_1;
use mcj_proto::{ByteCursor, ProtocolVersion, Threshold, VersionTable};

use super::PlayDecode;
use crate::error::DataError;
use crate::item_stack::{read_slot, write_slot, ItemStack};
use crate::registry::Registries;

const HAS_STATE_ID: VersionTable<bool> =
    VersionTable::new(&[(Threshold::Below(V_1_17_1), false)], true);

#[derive(Debug, Clone, PartialEq)]
pub struct SetContainerSlot {
    pub window_id: u8,
    /// Container revision, from 1.17.1.
    pub state_id: Option<i32>,
    /// `-1` with window `255` addresses the cursor.
    pub slot: i16,
    pub item: Option<ItemStack>,
}

impl SetContainerSlot {
    pub fn encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), DataError> {
        buf.put_u8(self.window_id);
        if HAS_STATE_ID.select(version) {
            put_var_int(buf, self.state_id.unwrap_or(0));
        }
        buf.put_i16(self.slot);
        write_slot(buf, self.item.as_ref(), version)
    }
}

impl PlayDecode for SetContainerSlot {
    fn play_decode(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Self, DataError> {
        let window_id = cursor.read_u8()?;
        let state_id = if HAS_STATE_ID.select(cursor.version()) {
            Some(cursor.read_var_int()?)
        } else {
            None
        };
        Ok(Self {
            window_id,
            state_id,
            slot: cursor.read_i16()?,
            item: read_slot(cursor, registries)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ItemKind, RegistrySet};
    use bytes::BytesMut;
    use mcj_proto::types::Identifier;
    use mcj_proto::version::{V_1_12_2, V_1_18_2};

    fn registries() -> RegistrySet {
        let mut set = RegistrySet::empty();
        set.insert_legacy_item(1, 0, Identifier::minecraft("stone"));
        set.insert_item(1, Identifier::minecraft("stone"));
        set
    }

    fn roundtrip(packet: &SetContainerSlot, version: i32) -> SetContainerSlot {
        let version = ProtocolVersion(version);
        let mut buf = BytesMut::new();
        packet.encode(&mut buf, version).unwrap();
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        let decoded = SetContainerSlot::play_decode(&mut cursor, &registries()).unwrap();
        assert!(cursor.is_empty());
        decoded
    }

    #[test]
    fn without_state_id() {
        let packet = SetContainerSlot {
            window_id: 0,
            state_id: None,
            slot: 36,
            item: Some(ItemStack::new(ItemKind::new(1, Identifier::minecraft("stone")), 64)),
        };
        assert_eq!(roundtrip(&packet, V_1_12_2), packet);
    }

    #[test]
    fn with_state_id() {
        let packet = SetContainerSlot {
            window_id: 255,
            state_id: Some(17),
            slot: -1,
            item: None,
        };
        assert_eq!(roundtrip(&packet, V_1_18_2), packet);
    }
}
