//! Entity metadata: a sparse `index -> typed value` table.
//!
//! The server only sends the indices that changed, so a decoded table is
//! usually partial and is merged into the entity's stored table with
//! [`EntityMetadata::merge`]. Per-entity meaning of the indices lives in
//! [`fields`].

pub mod fields;
pub mod types;

use std::collections::BTreeMap;

use mcj_nbt::{read_nbt, NbtRoot};
use mcj_proto::types::{BlockPos, Identifier, Uuid, Vec3f};
use mcj_proto::ByteCursor;
use tracing::{debug, warn};

use crate::error::DataError;
use crate::item_stack::{read_slot, ItemStack};
use crate::particle::{read_particle, Particle};
use crate::registry::{resolve_block, BlockKind, Registries};

pub use fields::{EntityFlags, EntityView, ParrotVariant};
pub use types::MetadataType;
use types::{LoopFormat, LOOP_FORMAT};

const PACKED_TERMINATOR: u8 = 0x7F;
const INDEX_TERMINATOR: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub fn from_id(id: i32) -> Result<Self, DataError> {
        Ok(match id {
            0 => Direction::Down,
            1 => Direction::Up,
            2 => Direction::North,
            3 => Direction::South,
            4 => Direction::West,
            5 => Direction::East,
            value => {
                return Err(DataError::InvalidEnum {
                    kind: "direction",
                    value,
                })
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VillagerData {
    pub kind: i32,
    pub profession: i32,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalPos {
    pub dimension: Identifier,
    pub position: BlockPos,
}

/// One decoded metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(i8),
    Short(i16),
    /// Fixed-width `i32`, pre-1.9.
    Int(i32),
    VarInt(i32),
    VarLong(i64),
    Float(f32),
    String(String),
    Chat(String),
    OptChat(Option<String>),
    Slot(Option<ItemStack>),
    Bool(bool),
    Rotation(Vec3f),
    Position(BlockPos),
    OptPosition(Option<BlockPos>),
    Direction(Direction),
    OptUuid(Option<Uuid>),
    BlockState(BlockKind),
    OptBlockState(Option<BlockKind>),
    Nbt(Option<NbtRoot>),
    Particle(Particle),
    VillagerData(VillagerData),
    OptVarInt(Option<i32>),
    Pose(i32),
    CatVariant(i32),
    FrogVariant(i32),
    OptGlobalPos(Option<GlobalPos>),
    PaintingVariant(i32),
    SnifferState(i32),
    Vector3(Vec3f),
    Quaternion([f32; 4]),
}

impl MetadataValue {
    /// Decode the value of a known type.
    pub fn read(
        kind: MetadataType,
        cursor: &mut ByteCursor,
        registries: &dyn Registries,
    ) -> Result<Self, DataError> {
        Ok(match kind {
            MetadataType::Byte => Self::Byte(cursor.read_i8()?),
            MetadataType::Short => Self::Short(cursor.read_i16()?),
            MetadataType::Int => Self::Int(cursor.read_i32()?),
            MetadataType::VarInt => Self::VarInt(cursor.read_var_int()?),
            MetadataType::VarLong => Self::VarLong(cursor.read_var_long()?),
            MetadataType::Float => Self::Float(cursor.read_f32()?),
            MetadataType::String => Self::String(cursor.read_string()?),
            MetadataType::Chat => Self::Chat(cursor.read_chat()?),
            MetadataType::OptChat => Self::OptChat(if cursor.read_bool()? {
                Some(cursor.read_chat()?)
            } else {
                None
            }),
            MetadataType::Slot => Self::Slot(read_slot(cursor, registries)?),
            MetadataType::Bool => Self::Bool(cursor.read_bool()?),
            MetadataType::Rotation => Self::Rotation(cursor.read_small_location()?),
            MetadataType::LegacyPosition => Self::Position(cursor.read_block_position_int()?),
            MetadataType::Position => Self::Position(cursor.read_packed_position()?),
            MetadataType::OptPosition => Self::OptPosition(if cursor.read_bool()? {
                Some(cursor.read_packed_position()?)
            } else {
                None
            }),
            MetadataType::Direction => Self::Direction(Direction::from_id(cursor.read_var_int()?)?),
            MetadataType::OptUuid => Self::OptUuid(if cursor.read_bool()? {
                Some(cursor.read_uuid()?)
            } else {
                None
            }),
            MetadataType::BlockState => Self::BlockState(resolve_block(registries, cursor.read_var_int()?)),
            MetadataType::OptBlockState => match cursor.read_var_int()? {
                0 => Self::OptBlockState(None),
                id => Self::OptBlockState(Some(resolve_block(registries, id))),
            },
            MetadataType::Nbt => Self::Nbt(read_nbt(cursor)?),
            MetadataType::Particle => Self::Particle(read_particle(cursor, registries)?),
            MetadataType::VillagerData => Self::VillagerData(VillagerData {
                kind: cursor.read_var_int()?,
                profession: cursor.read_var_int()?,
                level: cursor.read_var_int()?,
            }),
            MetadataType::OptVarInt => match cursor.read_var_int()? {
                0 => Self::OptVarInt(None),
                v => Self::OptVarInt(Some(v - 1)),
            },
            MetadataType::Pose => Self::Pose(cursor.read_var_int()?),
            MetadataType::CatVariant => Self::CatVariant(cursor.read_var_int()?),
            MetadataType::FrogVariant => Self::FrogVariant(cursor.read_var_int()?),
            MetadataType::OptGlobalPos => Self::OptGlobalPos(if cursor.read_bool()? {
                Some(GlobalPos {
                    dimension: cursor.read_identifier()?,
                    position: cursor.read_packed_position()?,
                })
            } else {
                None
            }),
            MetadataType::PaintingVariant => Self::PaintingVariant(cursor.read_var_int()?),
            MetadataType::SnifferState => Self::SnifferState(cursor.read_var_int()?),
            MetadataType::Vector3 => Self::Vector3(cursor.read_small_location()?),
            MetadataType::Quaternion => Self::Quaternion([
                cursor.read_f32()?,
                cursor.read_f32()?,
                cursor.read_f32()?,
                cursor.read_f32()?,
            ]),
        })
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::VarInt(_) => "varint",
            Self::VarLong(_) => "varlong",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Chat(_) => "chat",
            Self::OptChat(_) => "optional chat",
            Self::Slot(_) => "slot",
            Self::Bool(_) => "bool",
            Self::Rotation(_) => "rotation",
            Self::Position(_) => "position",
            Self::OptPosition(_) => "optional position",
            Self::Direction(_) => "direction",
            Self::OptUuid(_) => "optional uuid",
            Self::BlockState(_) => "block state",
            Self::OptBlockState(_) => "optional block state",
            Self::Nbt(_) => "nbt",
            Self::Particle(_) => "particle",
            Self::VillagerData(_) => "villager data",
            Self::OptVarInt(_) => "optional varint",
            Self::Pose(_) => "pose",
            Self::CatVariant(_) => "cat variant",
            Self::FrogVariant(_) => "frog variant",
            Self::OptGlobalPos(_) => "optional global position",
            Self::PaintingVariant(_) => "painting variant",
            Self::SnifferState(_) => "sniffer state",
            Self::Vector3(_) => "vector3",
            Self::Quaternion(_) => "quaternion",
        }
    }
}

/// Decoded metadata of one entity, keyed by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMetadata {
    entries: BTreeMap<u8, MetadataValue>,
}

impl EntityMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read entries until the terminator. A duplicate index overwrites
    /// the earlier value.
    pub fn read(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Self, DataError> {
        let version = cursor.version();
        let format = LOOP_FORMAT.select(version);
        let mut entries = BTreeMap::new();

        loop {
            let head = cursor.read_u8()?;
            let (index, type_id) = match format {
                LoopFormat::Packed => {
                    if head == PACKED_TERMINATOR {
                        break;
                    }
                    (head & 0x1F, i32::from(head >> 5))
                }
                LoopFormat::ByteType => {
                    if head == INDEX_TERMINATOR {
                        break;
                    }
                    (head, i32::from(cursor.read_u8()?))
                }
                LoopFormat::VarIntType => {
                    if head == INDEX_TERMINATOR {
                        break;
                    }
                    (head, cursor.read_var_int()?)
                }
            };
            let kind = MetadataType::from_id(type_id, version)?;
            let value = MetadataValue::read(kind, cursor, registries)?;
            entries.insert(index, value);
        }

        debug!("Decoded {} metadata entries", entries.len());
        Ok(Self { entries })
    }

    pub fn insert(&mut self, index: u8, value: MetadataValue) {
        self.entries.insert(index, value);
    }

    /// Apply a partial update: indices present in `update` replace ours,
    /// the rest are left untouched.
    pub fn merge(&mut self, update: EntityMetadata) {
        self.entries.extend(update.entries);
    }

    pub fn get(&self, index: u8) -> Option<&MetadataValue> {
        self.entries.get(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &MetadataValue)> {
        self.entries.iter().map(|(i, v)| (*i, v))
    }

    // -----------------------------------------------------------------------
    // Lookups with defaults
    // -----------------------------------------------------------------------

    fn mismatch(&self, index: u8, expected: &str) {
        if let Some(value) = self.entries.get(&index) {
            warn!(
                "Metadata index {index} holds a {} value, expected {expected}",
                value.type_name()
            );
        }
    }

    pub fn get_byte(&self, index: u8, default: i8) -> i8 {
        match self.get(index) {
            Some(MetadataValue::Byte(v)) => *v,
            _ => {
                self.mismatch(index, "byte");
                default
            }
        }
    }

    /// Any integer-valued entry: int, varint or short.
    pub fn get_int(&self, index: u8, default: i32) -> i32 {
        match self.get(index) {
            Some(MetadataValue::Int(v) | MetadataValue::VarInt(v)) => *v,
            Some(MetadataValue::Short(v)) => i32::from(*v),
            _ => {
                self.mismatch(index, "int");
                default
            }
        }
    }

    pub fn get_float(&self, index: u8, default: f32) -> f32 {
        match self.get(index) {
            Some(MetadataValue::Float(v)) => *v,
            _ => {
                self.mismatch(index, "float");
                default
            }
        }
    }

    pub fn get_bool(&self, index: u8, default: bool) -> bool {
        match self.get(index) {
            Some(MetadataValue::Bool(v)) => *v,
            _ => {
                self.mismatch(index, "bool");
                default
            }
        }
    }

    /// String, chat and present optional chat entries.
    pub fn get_text(&self, index: u8) -> Option<&str> {
        match self.get(index) {
            Some(MetadataValue::String(s) | MetadataValue::Chat(s)) => Some(s),
            Some(MetadataValue::OptChat(s)) => s.as_deref(),
            _ => {
                self.mismatch(index, "text");
                None
            }
        }
    }

    pub fn get_slot(&self, index: u8) -> Option<&ItemStack> {
        match self.get(index) {
            Some(MetadataValue::Slot(slot)) => slot.as_ref(),
            _ => {
                self.mismatch(index, "slot");
                None
            }
        }
    }

    pub fn get_position(&self, index: u8) -> Option<BlockPos> {
        match self.get(index) {
            Some(MetadataValue::Position(pos)) => Some(*pos),
            Some(MetadataValue::OptPosition(pos)) => *pos,
            _ => {
                self.mismatch(index, "position");
                None
            }
        }
    }

    pub fn get_uuid(&self, index: u8) -> Option<Uuid> {
        match self.get(index) {
            Some(MetadataValue::OptUuid(uuid)) => *uuid,
            _ => {
                self.mismatch(index, "uuid");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistrySet;
    use bytes::{BufMut, BytesMut};
    use mcj_proto::codec::{put_bool, put_packed_position, put_string, put_var_int};
    use mcj_proto::version::{V_1_12_2, V_1_14_4, V_1_19_4, V_1_8, V_1_9};
    use mcj_proto::{ProtoError, ProtocolVersion};

    fn read(bytes: BytesMut, version: i32) -> Result<EntityMetadata, DataError> {
        let mut cursor = ByteCursor::new(bytes.freeze(), ProtocolVersion(version));
        let meta = EntityMetadata::read(&mut cursor, &RegistrySet::empty())?;
        assert!(cursor.is_empty());
        Ok(meta)
    }

    #[test]
    fn terminator_first_is_empty() {
        let mut legacy = BytesMut::new();
        legacy.put_u8(0x7F);
        assert!(read(legacy, V_1_8).unwrap().is_empty());

        let mut modern = BytesMut::new();
        modern.put_u8(0xFF);
        assert!(read(modern, V_1_14_4).unwrap().is_empty());
    }

    #[test]
    fn legacy_packed_header() {
        let version = ProtocolVersion(V_1_8);
        let mut buf = BytesMut::new();
        // type 0 (byte), index 0
        buf.put_u8(0x00);
        buf.put_i8(0x02);
        // type 4 (string), index 2
        buf.put_u8((4 << 5) | 2);
        put_string(&mut buf, "Grumm").unwrap();
        // type 3 (float), index 6
        buf.put_u8((3 << 5) | 6);
        buf.put_f32(20.0);
        // type 6 (int position), index 9
        buf.put_u8((6 << 5) | 9);
        buf.put_i32(1);
        buf.put_i32(2);
        buf.put_i32(3);
        buf.put_u8(0x7F);

        let meta = read(buf, V_1_8).unwrap();
        assert_eq!(meta.len(), 4);
        assert_eq!(meta.get_byte(0, 0), 2);
        assert_eq!(meta.get_text(2), Some("Grumm"));
        assert_eq!(meta.get_float(6, 0.0), 20.0);
        assert_eq!(meta.get_position(9), Some(BlockPos::new(1, 2, 3)));
    }

    #[test]
    fn modern_varint_types() {
        let version = ProtocolVersion(V_1_14_4);
        let mut buf = BytesMut::new();
        buf.put_u8(0);
        put_var_int(&mut buf, 0);
        buf.put_i8(0x20);
        buf.put_u8(1);
        put_var_int(&mut buf, 1);
        put_var_int(&mut buf, 300);
        buf.put_u8(2);
        put_var_int(&mut buf, 5);
        put_bool(&mut buf, true);
        put_string(&mut buf, "{\"text\":\"Bob\"}").unwrap();
        buf.put_u8(10);
        put_var_int(&mut buf, 10);
        put_bool(&mut buf, true);
        put_packed_position(&mut buf, BlockPos::new(-1, 70, 8), version);
        buf.put_u8(11);
        put_var_int(&mut buf, 17);
        put_var_int(&mut buf, 0);
        buf.put_u8(12);
        put_var_int(&mut buf, 16);
        put_var_int(&mut buf, 2);
        put_var_int(&mut buf, 5);
        put_var_int(&mut buf, 1);
        buf.put_u8(0xFF);

        let meta = read(buf, V_1_14_4).unwrap();
        assert_eq!(meta.get_byte(0, 0), 0x20);
        assert_eq!(meta.get_int(1, 0), 300);
        assert_eq!(meta.get_text(2), Some("{\"text\":\"Bob\"}"));
        assert_eq!(meta.get_position(10), Some(BlockPos::new(-1, 70, 8)));
        assert_eq!(meta.get(11), Some(&MetadataValue::OptVarInt(None)));
        assert_eq!(
            meta.get(12),
            Some(&MetadataValue::VillagerData(VillagerData {
                kind: 2,
                profession: 5,
                level: 1
            }))
        );
    }

    #[test]
    fn byte_type_ids_between_15w31a_and_1_9() {
        let mut buf = BytesMut::new();
        buf.put_u8(3);
        buf.put_u8(6); // bool in the 1.9 table
        put_bool(&mut buf, true);
        buf.put_u8(0xFF);
        let meta = read(buf, mcj_proto::version::V_15W31A).unwrap();
        assert!(meta.get_bool(3, false));
    }

    #[test]
    fn duplicate_index_later_wins() {
        let mut buf = BytesMut::new();
        for value in [1i8, 2, 3] {
            buf.put_u8(4);
            put_var_int(&mut buf, 0);
            buf.put_i8(value);
        }
        buf.put_u8(0xFF);
        let meta = read(buf, V_1_12_2).unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get_byte(4, 0), 3);
    }

    #[test]
    fn varlong_only_exists_from_1_19_3() {
        let mut buf = BytesMut::new();
        buf.put_u8(0);
        put_var_int(&mut buf, 2);
        buf.put_u8(0x05);
        buf.put_u8(0xFF);
        let meta = read(buf, V_1_19_4).unwrap();
        assert_eq!(meta.get(0), Some(&MetadataValue::VarLong(5)));
    }

    #[test]
    fn unknown_type_is_fatal() {
        let mut buf = BytesMut::new();
        buf.put_u8(0);
        put_var_int(&mut buf, 13);
        buf.put_u8(0xFF);
        assert!(matches!(
            read(buf, V_1_9),
            Err(DataError::UnknownMetadataType { id: 13, version: V_1_9 })
        ));
    }

    #[test]
    fn missing_terminator_is_bounds_error() {
        let mut buf = BytesMut::new();
        buf.put_u8(0);
        put_var_int(&mut buf, 0);
        buf.put_i8(1);
        let mut cursor = ByteCursor::new(buf.freeze(), ProtocolVersion(V_1_12_2));
        assert!(matches!(
            EntityMetadata::read(&mut cursor, &RegistrySet::empty()),
            Err(DataError::Proto(ProtoError::BufferTooShort { .. }))
        ));
    }

    #[test]
    fn invalid_direction() {
        let mut buf = BytesMut::new();
        buf.put_u8(0);
        put_var_int(&mut buf, 10);
        put_var_int(&mut buf, 6);
        buf.put_u8(0xFF);
        let mut cursor = ByteCursor::new(buf.freeze(), ProtocolVersion(V_1_12_2));
        assert!(matches!(
            EntityMetadata::read(&mut cursor, &RegistrySet::empty()),
            Err(DataError::InvalidEnum { kind: "direction", value: 6 })
        ));
    }

    #[test]
    fn merge_keeps_unmentioned_indices() {
        let mut stored = EntityMetadata::new();
        stored.insert(0, MetadataValue::Byte(1));
        stored.insert(2, MetadataValue::String("a".into()));

        let mut update = EntityMetadata::new();
        update.insert(2, MetadataValue::String("b".into()));
        update.insert(7, MetadataValue::Float(1.5));

        stored.merge(update);
        assert_eq!(stored.len(), 3);
        assert_eq!(stored.get_byte(0, 0), 1);
        assert_eq!(stored.get_text(2), Some("b"));
        assert_eq!(stored.get_float(7, 0.0), 1.5);
    }

    #[test]
    fn defaults_on_absent_or_mismatched() {
        let mut meta = EntityMetadata::new();
        meta.insert(0, MetadataValue::Float(2.0));
        assert_eq!(meta.get_byte(0, 9), 9);
        assert_eq!(meta.get_byte(1, 7), 7);
        assert!(meta.get_slot(0).is_none());
        assert!(!meta.get_bool(5, false));
    }
}
