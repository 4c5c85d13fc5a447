//! CollectItem — Server → Client.

use bytes::BufMut;
use mcj_proto::codec::{put_entity_id, put_var_int, ProtoDecode, ProtoEncode};
use mcj_proto::version::{V_14W04A, V_16W32A};
use mcj_proto::{ByteCursor, ProtoError, ProtocolVersion, Threshold, VersionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Both ids as `i32`.
    Ints,
    VarInts,
    /// VarInt ids plus the picked-up count.
    WithCount,
}

const LAYOUT: VersionTable<Layout> = VersionTable::new(
    &[
        (Threshold::Below(V_14W04A), Layout::Ints),
        (Threshold::Below(V_16W32A), Layout::VarInts),
    ],
    Layout::WithCount,
);

/// Pickup animation: `collector` picked up the item entity `collected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectItem {
    pub collected_entity_id: i32,
    pub collector_entity_id: i32,
    /// Unknown before 16w32a.
    pub count: Option<i32>,
}

impl ProtoEncode for CollectItem {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        put_entity_id(buf, self.collected_entity_id, version);
        put_entity_id(buf, self.collector_entity_id, version);
        if LAYOUT.select(version) == Layout::WithCount {
            put_var_int(buf, self.count.unwrap_or(1));
        }
        Ok(())
    }
}

impl ProtoDecode for CollectItem {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let layout = LAYOUT.select(cursor.version());
        let collected_entity_id = cursor.read_entity_id()?;
        let collector_entity_id = match layout {
            Layout::Ints => cursor.read_i32()?,
            Layout::VarInts | Layout::WithCount => cursor.read_var_int()?,
        };
        let count = match layout {
            Layout::WithCount => Some(cursor.read_var_int()?),
            _ => None,
        };
        Ok(Self {
            collected_entity_id,
            collector_entity_id,
            count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use mcj_proto::version::{V_1_12_2, V_1_7_10, V_1_8};

    #[test]
    fn layouts() {
        for (version, len, count) in [(V_1_7_10, 8, None), (V_1_8, 2, None), (V_1_12_2, 3, Some(5))] {
            let version = ProtocolVersion(version);
            let packet = CollectItem {
                collected_entity_id: 10,
                collector_entity_id: 20,
                count,
            };
            let mut buf = BytesMut::new();
            packet.proto_encode(&mut buf, version).unwrap();
            assert_eq!(buf.len(), len);
            let mut cursor = ByteCursor::new(buf.freeze(), version);
            assert_eq!(CollectItem::proto_decode(&mut cursor).unwrap(), packet);
        }
    }
}
