//! Typed per-entity views over [`EntityMetadata`].
//!
//! Every field has its own version table because indices shift whenever a
//! superclass gains a field. A field missing from a version reads as its
//! default.

use mcj_proto::types::{BlockPos, Uuid};
use mcj_proto::version::{V_1_11_2, V_1_12_2, V_1_13_2, V_1_8, V_1_9_4};
use mcj_proto::{ProtocolVersion, Threshold, VersionTable};

use super::{EntityMetadata, MetadataValue};
use crate::item_stack::ItemStack;

/// How a flag is tested against its byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitTest {
    Mask(u8),
    /// The whole byte must equal the value (legacy arrows).
    Equals(u8),
}

impl BitTest {
    fn test(self, value: i8) -> bool {
        let value = value as u8;
        match self {
            BitTest::Mask(mask) => value & mask == mask,
            BitTest::Equals(expected) => value == expected,
        }
    }
}

type Field = Option<u8>;
type Flag = Option<(u8, BitTest)>;

// ---------------------------------------------------------------------------
// Index tables
// ---------------------------------------------------------------------------

const CUSTOM_NAME: VersionTable<u8> = VersionTable::new(&[(Threshold::Below(V_1_8), 10)], 2);

const CUSTOM_NAME_VISIBLE: VersionTable<u8> = VersionTable::new(&[(Threshold::Below(V_1_8), 11)], 3);

const ITEM_STACK: VersionTable<u8> = VersionTable::new(
    &[
        (Threshold::AtMost(V_1_8), 10),
        (Threshold::Exactly(V_1_9_4), 5),
        (Threshold::AtMost(V_1_13_2), 6),
    ],
    7,
);

const FIREWORK_ITEM: VersionTable<u8> = VersionTable::new(
    &[
        (Threshold::AtMost(V_1_8), 8),
        (Threshold::Exactly(V_1_9_4), 5),
        (Threshold::AtMost(V_1_13_2), 6),
    ],
    7,
);

const FIREWORK_SHOOTER: VersionTable<Field> = VersionTable::new(
    &[
        (Threshold::Below(V_1_11_2), None),
        (Threshold::AtMost(V_1_13_2), Some(7)),
    ],
    Some(8),
);

const ARROW_CRITICAL: VersionTable<Flag> = VersionTable::new(
    &[
        (Threshold::AtMost(V_1_8), Some((16, BitTest::Equals(0x01)))),
        (Threshold::AtMost(V_1_9_4), Some((5, BitTest::Mask(0x01)))),
        (Threshold::AtMost(V_1_13_2), Some((6, BitTest::Mask(0x01)))),
    ],
    Some((7, BitTest::Mask(0x01))),
);

const ARROW_NO_CLIP: VersionTable<Flag> = VersionTable::new(
    &[
        (Threshold::Below(V_1_13_2), None),
        (Threshold::Exactly(V_1_13_2), Some((6, BitTest::Mask(0x02)))),
    ],
    Some((7, BitTest::Mask(0x02))),
);

const ARROW_SHOOTER: VersionTable<Field> = VersionTable::new(
    &[
        (Threshold::Below(V_1_13_2), None),
        (Threshold::Exactly(V_1_13_2), Some(7)),
    ],
    Some(8),
);

const CRYSTAL_BEAM_TARGET: VersionTable<Field> = VersionTable::new(
    &[
        (Threshold::AtMost(V_1_8), None),
        (Threshold::AtMost(V_1_9_4), Some(5)),
        (Threshold::AtMost(V_1_13_2), Some(6)),
    ],
    Some(7),
);

const CRYSTAL_SHOW_BOTTOM: VersionTable<Field> = VersionTable::new(
    &[
        (Threshold::AtMost(V_1_8), None),
        (Threshold::AtMost(V_1_9_4), Some(6)),
        (Threshold::AtMost(V_1_13_2), Some(7)),
    ],
    Some(8),
);

const SNOW_GOLEM_PUMPKIN: VersionTable<Flag> = VersionTable::new(
    &[
        (Threshold::Below(V_1_9_4), None),
        (Threshold::Exactly(V_1_9_4), Some((10, BitTest::Mask(0x10)))),
        (Threshold::AtMost(V_1_11_2), Some((12, BitTest::Mask(0x10)))),
        // Known-incorrect mask kept for wire compatibility with what these
        // versions were decoded as. Do not "fix" without a capture.
        (Threshold::AtMost(V_1_13_2), Some((12, BitTest::Mask(0x01)))),
    ],
    Some((14, BitTest::Mask(0x10))),
);

const PARROT_VARIANT: VersionTable<Field> = VersionTable::new(
    &[
        (Threshold::Below(V_1_12_2), None),
        (Threshold::AtMost(V_1_13_2), Some(15)),
    ],
    Some(17),
);

// ---------------------------------------------------------------------------
// Generic entity flags (index 0)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityFlags(pub u8);

impl EntityFlags {
    pub const ON_FIRE: u8 = 0x01;
    pub const SNEAKING: u8 = 0x02;
    pub const SPRINTING: u8 = 0x08;
    pub const SWIMMING: u8 = 0x10;
    pub const INVISIBLE: u8 = 0x20;
    pub const GLOWING: u8 = 0x40;
    pub const FLYING_WITH_ELYTRA: u8 = 0x80;

    fn has(self, mask: u8) -> bool {
        self.0 & mask != 0
    }

    pub fn on_fire(self) -> bool {
        self.has(Self::ON_FIRE)
    }

    pub fn sneaking(self) -> bool {
        self.has(Self::SNEAKING)
    }

    pub fn sprinting(self) -> bool {
        self.has(Self::SPRINTING)
    }

    pub fn swimming(self) -> bool {
        self.has(Self::SWIMMING)
    }

    pub fn invisible(self) -> bool {
        self.has(Self::INVISIBLE)
    }

    pub fn glowing(self) -> bool {
        self.has(Self::GLOWING)
    }

    pub fn flying_with_elytra(self) -> bool {
        self.has(Self::FLYING_WITH_ELYTRA)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParrotVariant {
    RedBlue,
    Blue,
    Green,
    YellowBlue,
    Silver,
}

impl ParrotVariant {
    pub fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            0 => ParrotVariant::RedBlue,
            1 => ParrotVariant::Blue,
            2 => ParrotVariant::Green,
            3 => ParrotVariant::YellowBlue,
            4 => ParrotVariant::Silver,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Version-aware accessors over one entity's metadata.
#[derive(Debug, Clone, Copy)]
pub struct EntityView<'a> {
    metadata: &'a EntityMetadata,
    version: ProtocolVersion,
}

impl<'a> EntityView<'a> {
    pub fn new(metadata: &'a EntityMetadata, version: ProtocolVersion) -> Self {
        Self { metadata, version }
    }

    fn flag(&self, table: &VersionTable<Flag>, default: bool) -> bool {
        match table.select(self.version) {
            Some((index, test)) => match self.metadata.get(index) {
                Some(MetadataValue::Byte(v)) => test.test(*v),
                _ => default,
            },
            None => default,
        }
    }

    pub fn flags(&self) -> EntityFlags {
        EntityFlags(self.metadata.get_byte(0, 0) as u8)
    }

    pub fn custom_name(&self) -> Option<&'a str> {
        self.metadata
            .get_text(CUSTOM_NAME.select(self.version))
            .filter(|name| !name.is_empty())
    }

    pub fn custom_name_visible(&self) -> bool {
        match self.metadata.get(CUSTOM_NAME_VISIBLE.select(self.version)) {
            Some(MetadataValue::Bool(v)) => *v,
            Some(MetadataValue::Byte(v)) => *v != 0,
            _ => false,
        }
    }

    /// Item carried by a dropped item entity.
    pub fn dropped_item(&self) -> Option<&'a ItemStack> {
        self.metadata.get_slot(ITEM_STACK.select(self.version))
    }

    pub fn firework_item(&self) -> Option<&'a ItemStack> {
        self.metadata.get_slot(FIREWORK_ITEM.select(self.version))
    }

    /// Entity id of whoever used the firework; 0 when unknown.
    pub fn firework_shooter(&self) -> i32 {
        FIREWORK_SHOOTER
            .select(self.version)
            .map_or(0, |index| self.metadata.get_int(index, 0))
    }

    pub fn arrow_is_critical(&self) -> bool {
        self.flag(&ARROW_CRITICAL, false)
    }

    pub fn arrow_no_clip(&self) -> bool {
        self.flag(&ARROW_NO_CLIP, false)
    }

    pub fn arrow_shooter(&self) -> Option<Uuid> {
        ARROW_SHOOTER
            .select(self.version)
            .and_then(|index| self.metadata.get_uuid(index))
    }

    pub fn crystal_beam_target(&self) -> Option<BlockPos> {
        CRYSTAL_BEAM_TARGET
            .select(self.version)
            .and_then(|index| self.metadata.get_position(index))
    }

    pub fn crystal_shows_bottom(&self) -> bool {
        CRYSTAL_SHOW_BOTTOM
            .select(self.version)
            .map_or(true, |index| self.metadata.get_bool(index, true))
    }

    /// Before 1.9.4 snow golems always wear the pumpkin.
    pub fn snow_golem_has_pumpkin(&self) -> bool {
        self.flag(&SNOW_GOLEM_PUMPKIN, true)
    }

    pub fn parrot_variant(&self) -> ParrotVariant {
        PARROT_VARIANT
            .select(self.version)
            .and_then(|index| ParrotVariant::from_id(self.metadata.get_int(index, 0)))
            .unwrap_or(ParrotVariant::RedBlue)
    }
}
