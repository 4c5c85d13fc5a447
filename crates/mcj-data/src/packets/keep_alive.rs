//! KeepAlive — both directions. The client echoes the id back.

use bytes::BufMut;
use mcj_proto::codec::{put_var_int, ProtoDecode, ProtoEncode};
use mcj_proto::version::{V_14W04A, V_1_12_2};
use mcj_proto::{ByteCursor, ProtoError, ProtocolVersion, Threshold, VersionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdWidth {
    Int,
    VarInt,
    Long,
}

const ID_WIDTH: VersionTable<IdWidth> = VersionTable::new(
    &[
        (Threshold::Below(V_14W04A), IdWidth::Int),
        (Threshold::Below(V_1_12_2), IdWidth::VarInt),
    ],
    IdWidth::Long,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub id: i64,
}

impl ProtoEncode for KeepAlive {
    fn proto_encode(&self, buf: &mut impl BufMut, version: ProtocolVersion) -> Result<(), ProtoError> {
        match ID_WIDTH.select(version) {
            IdWidth::Int => buf.put_i32(self.id as i32),
            IdWidth::VarInt => put_var_int(buf, self.id as i32),
            IdWidth::Long => buf.put_i64(self.id),
        }
        Ok(())
    }
}

impl ProtoDecode for KeepAlive {
    fn proto_decode(cursor: &mut ByteCursor) -> Result<Self, ProtoError> {
        let id = match ID_WIDTH.select(cursor.version()) {
            IdWidth::Int => i64::from(cursor.read_i32()?),
            IdWidth::VarInt => i64::from(cursor.read_var_int()?),
            IdWidth::Long => cursor.read_i64()?,
        };
        Ok(Self { id })
    }
}
