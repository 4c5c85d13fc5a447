//! Item stack ("slot") serialization.
//!
//! Two layouts exist. The legacy one starts with an `i16` item id where
//! `-1` marks an empty slot:
//! ```text
//! i16(id)  -- -1 = empty, return after 2 bytes
//! i8(count)
//! i16(damage)              -- before 17w47a
//! NBT                      -- gzip with i16 length before 14w28b, raw after
//! ```
//! From 1.13.2 the slot starts with a presence flag:
//! ```text
//! bool(present)  -- false = empty, return after 1 byte
//! VarInt(id)
//! i8(count)
//! NBT (raw, END = none)
//! ```

use bytes::BufMut;
use mcj_nbt::{read_compressed_nbt, read_nbt, write_compressed_nbt, write_nbt, NbtRoot, NbtTag};
use mcj_proto::codec::{put_bool, put_var_int};
use mcj_proto::version::{V_14W28B, V_17W47A, V_1_13_2_PRE1};
use mcj_proto::{ByteCursor, ProtocolVersion, Threshold, VersionTable};

use crate::error::DataError;
use crate::registry::{resolve_item, resolve_legacy_item, ItemKind, Registries};

/// A non-empty item stack. Empty slots are `None` throughout the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    pub item: ItemKind,
    pub count: i8,
    /// Damage or sub-type. Only carried on the wire before 17w47a.
    pub damage: i16,
    /// Item tag. `None` is the empty compound: the `-1` length sentinel of
    /// gzip framing and a raw END root both decode to it, and it encodes
    /// back as the same sentinel.
    pub nbt: Option<NbtRoot>,
}

impl ItemStack {
    pub fn new(item: ItemKind, count: i8) -> Self {
        Self {
            item,
            count,
            damage: 0,
            nbt: None,
        }
    }

    /// Custom display name from `display.Name`, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.nbt
            .as_ref()?
            .get("display")?
            .get("Name")
            .and_then(NbtTag::as_string)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotLayout {
    Legacy,
    Presence,
}

const SLOT_LAYOUT: VersionTable<SlotLayout> = VersionTable::new(
    &[(Threshold::Below(V_1_13_2_PRE1), SlotLayout::Legacy)],
    SlotLayout::Presence,
);

const HAS_DAMAGE: VersionTable<bool> =
    VersionTable::new(&[(Threshold::Below(V_17W47A), true)], false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NbtFraming {
    Compressed,
    Raw,
}

const SLOT_NBT: VersionTable<NbtFraming> = VersionTable::new(
    &[(Threshold::Below(V_14W28B), NbtFraming::Compressed)],
    NbtFraming::Raw,
);

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Read one slot. `Ok(None)` is an empty slot.
pub fn read_slot(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Option<ItemStack>, DataError> {
    let version = cursor.version();
    match SLOT_LAYOUT.select(version) {
        SlotLayout::Legacy => {
            let id = cursor.read_i16()?;
            if id == -1 {
                return Ok(None);
            }
            let count = cursor.read_i8()?;
            let (item, damage) = if HAS_DAMAGE.select(version) {
                let damage = cursor.read_i16()?;
                (resolve_legacy_item(registries, id.into(), damage), damage)
            } else {
                (resolve_item(registries, id.into()), 0)
            };
            let nbt = match SLOT_NBT.select(version) {
                NbtFraming::Compressed => read_compressed_nbt(cursor)?,
                NbtFraming::Raw => read_nbt(cursor)?,
            };
            Ok(Some(ItemStack {
                item,
                count,
                damage,
                nbt,
            }))
        }
        SlotLayout::Presence => {
            if !cursor.read_bool()? {
                return Ok(None);
            }
            let id = cursor.read_var_int()?;
            let count = cursor.read_i8()?;
            let nbt = read_nbt(cursor)?;
            Ok(Some(ItemStack {
                item: resolve_item(registries, id),
                count,
                damage: 0,
                nbt,
            }))
        }
    }
}

/// Read a VarInt-counted array of slots.
pub fn read_slot_array(
    cursor: &mut ByteCursor,
    registries: &dyn Registries,
) -> Result<Vec<Option<ItemStack>>, DataError> {
    let count = cursor.read_count()?;
    let mut slots = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        slots.push(read_slot(cursor, registries)?);
    }
    Ok(slots)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

pub fn write_slot(
    buf: &mut impl BufMut,
    slot: Option<&ItemStack>,
    version: ProtocolVersion,
) -> Result<(), DataError> {
    match SLOT_LAYOUT.select(version) {
        SlotLayout::Legacy => {
            let Some(stack) = slot else {
                buf.put_i16(-1);
                return Ok(());
            };
            buf.put_i16(stack.item.id as i16);
            buf.put_i8(stack.count);
            if HAS_DAMAGE.select(version) {
                buf.put_i16(stack.damage);
            }
            match SLOT_NBT.select(version) {
                NbtFraming::Compressed => write_compressed_nbt(buf, stack.nbt.as_ref())?,
                NbtFraming::Raw => write_nbt(buf, stack.nbt.as_ref(), version)?,
            }
        }
        SlotLayout::Presence => {
            let Some(stack) = slot else {
                put_bool(buf, false);
                return Ok(());
            };
            put_bool(buf, true);
            put_var_int(buf, stack.item.id);
            buf.put_i8(stack.count);
            write_nbt(buf, stack.nbt.as_ref(), version)?;
        }
    }
    Ok(())
}

pub fn write_slot_array(
    buf: &mut impl BufMut,
    slots: &[Option<ItemStack>],
    version: ProtocolVersion,
) -> Result<(), DataError> {
    put_var_int(buf, slots.len() as i32);
    for slot in slots {
        write_slot(buf, slot.as_ref(), version)?;
    }
    Ok(())
}
