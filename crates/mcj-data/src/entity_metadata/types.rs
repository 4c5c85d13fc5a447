//! Metadata type ids, one table per format epoch.
//!
//! The wire type id is an index into the epoch's table. Epochs only ever
//! append or insert, so a type keeps its meaning but not its id.

use mcj_proto::version::{
    V_15W31A, V_17W06A, V_17W47A, V_18W43A, V_1_19, V_1_19_3, V_1_19_4, V_1_9,
};
use mcj_proto::{ProtocolVersion, Threshold, VersionTable};

use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataType {
    Byte,
    Short,
    Int,
    VarInt,
    VarLong,
    Float,
    String,
    Chat,
    OptChat,
    Slot,
    Bool,
    Rotation,
    /// Three plain `i32`s, pre-1.9 only.
    LegacyPosition,
    Position,
    OptPosition,
    Direction,
    OptUuid,
    BlockState,
    OptBlockState,
    Nbt,
    Particle,
    VillagerData,
    OptVarInt,
    Pose,
    CatVariant,
    FrogVariant,
    OptGlobalPos,
    PaintingVariant,
    SnifferState,
    Vector3,
    Quaternion,
}

use MetadataType::*;

const LEGACY: &[MetadataType] = &[Byte, Short, Int, Float, String, Slot, LegacyPosition, Rotation];

const V1_9: &[MetadataType] = &[
    Byte, VarInt, Float, String, Chat, Slot, Bool, Rotation, Position, OptPosition, Direction,
    OptUuid, OptBlockState,
];

const V1_12: &[MetadataType] = &[
    Byte, VarInt, Float, String, Chat, Slot, Bool, Rotation, Position, OptPosition, Direction,
    OptUuid, OptBlockState, Nbt,
];

const V1_13: &[MetadataType] = &[
    Byte, VarInt, Float, String, Chat, OptChat, Slot, Bool, Rotation, Position, OptPosition,
    Direction, OptUuid, OptBlockState, Nbt, Particle,
];

const V1_14: &[MetadataType] = &[
    Byte, VarInt, Float, String, Chat, OptChat, Slot, Bool, Rotation, Position, OptPosition,
    Direction, OptUuid, OptBlockState, Nbt, Particle, VillagerData, OptVarInt, Pose,
];

const V1_19: &[MetadataType] = &[
    Byte, VarInt, Float, String, Chat, OptChat, Slot, Bool, Rotation, Position, OptPosition,
    Direction, OptUuid, OptBlockState, Nbt, Particle, VillagerData, OptVarInt, Pose, CatVariant,
    FrogVariant, OptGlobalPos, PaintingVariant,
];

const V1_19_3: &[MetadataType] = &[
    Byte, VarInt, VarLong, Float, String, Chat, OptChat, Slot, Bool, Rotation, Position,
    OptPosition, Direction, OptUuid, OptBlockState, Nbt, Particle, VillagerData, OptVarInt, Pose,
    CatVariant, FrogVariant, OptGlobalPos, PaintingVariant,
];

const V1_19_4: &[MetadataType] = &[
    Byte, VarInt, VarLong, Float, String, Chat, OptChat, Slot, Bool, Rotation, Position,
    OptPosition, Direction, OptUuid, BlockState, OptBlockState, Nbt, Particle, VillagerData,
    OptVarInt, Pose, CatVariant, FrogVariant, OptGlobalPos, PaintingVariant, SnifferState,
    Vector3, Quaternion,
];

const TYPE_TABLE: VersionTable<&'static [MetadataType]> = VersionTable::new(
    &[
        (Threshold::Below(V_15W31A), LEGACY),
        (Threshold::Below(V_17W06A), V1_9),
        (Threshold::Below(V_17W47A), V1_12),
        (Threshold::Below(V_18W43A), V1_13),
        (Threshold::Below(V_1_19), V1_14),
        (Threshold::Below(V_1_19_3), V1_19),
        (Threshold::Below(V_1_19_4), V1_19_3),
    ],
    V1_19_4,
);

/// How the entry loop is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopFormat {
    /// `(type << 5) | index` in one byte, `0x7F` terminates.
    Packed,
    /// Index byte (`0xFF` terminates), then a one-byte type id.
    ByteType,
    /// Index byte (`0xFF` terminates), then a VarInt type id.
    VarIntType,
}

pub(crate) const LOOP_FORMAT: VersionTable<LoopFormat> = VersionTable::new(
    &[
        (Threshold::Below(V_15W31A), LoopFormat::Packed),
        (Threshold::Below(V_1_9), LoopFormat::ByteType),
    ],
    LoopFormat::VarIntType,
);

impl MetadataType {
    /// Resolve a wire type id for `version`. Unknown ids are fatal: the
    /// value length is unknown, so the rest of the frame cannot be parsed.
    pub fn from_id(id: i32, version: ProtocolVersion) -> Result<Self, DataError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| TYPE_TABLE.select(version).get(i).copied())
            .ok_or(DataError::UnknownMetadataType {
                id,
                version: version.id(),
            })
    }

    /// Wire id of this type for `version`, if the epoch has it.
    pub fn id(self, version: ProtocolVersion) -> Option<i32> {
        TYPE_TABLE
            .select(version)
            .iter()
            .position(|t| *t == self)
            .map(|i| i as i32)
    }
}
