//! Particle type + per-type payload, as carried in entity metadata.

use mcj_proto::types::{BlockPos, Identifier, Vec3f};
use mcj_proto::version::V_1_19;
use mcj_proto::{ByteCursor, Threshold, VersionTable};

use crate::error::DataError;
use crate::item_stack::{read_slot, ItemStack};
use crate::registry::{resolve_block, BlockKind, ParticleKind, Registries};

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub data: ParticleData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionSource {
    Block(BlockPos),
    Entity { id: i32, eye_height: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleData {
    None,
    Block(BlockKind),
    Dust {
        color: Vec3f,
        scale: f32,
    },
    DustColorTransition {
        from: Vec3f,
        scale: f32,
        to: Vec3f,
    },
    Item(Option<ItemStack>),
    Vibration {
        /// Only sent before 1.19.
        origin: Option<BlockPos>,
        destination: PositionSource,
        ticks: i32,
    },
    SculkCharge {
        roll: f32,
    },
    Shriek {
        delay: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VibrationLayout {
    WithOrigin,
    SourceOnly,
}

const VIBRATION_LAYOUT: VersionTable<VibrationLayout> = VersionTable::new(
    &[(Threshold::Below(V_1_19), VibrationLayout::WithOrigin)],
    VibrationLayout::SourceOnly,
);

/// Read a VarInt particle id followed by the payload its type requires.
/// A particle the registry does not know is fatal: its payload length is
/// unknown, so nothing after it in the frame can be parsed.
pub fn read_particle(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Particle, DataError> {
    let id = cursor.read_var_int()?;
    let kind = registries
        .particle_by_id(id)
        .cloned()
        .ok_or_else(|| DataError::UnknownParticle {
            id,
            name: "unregistered".into(),
        })?;
    let data = read_particle_data(cursor, &kind, registries)?;
    Ok(Particle { kind, data })
}

fn read_particle_data(
    cursor: &mut ByteCursor,
    kind: &ParticleKind,
    registries: &dyn Registries,
) -> Result<ParticleData, DataError> {
    let name = &kind.name;
    if name.namespace != Identifier::DEFAULT_NAMESPACE {
        return Err(DataError::UnknownParticle {
            id: kind.id,
            name: name.to_string(),
        });
    }
    Ok(match name.path.as_str() {
        "block" | "falling_dust" | "block_marker" => {
            ParticleData::Block(resolve_block(registries, cursor.read_var_int()?))
        }
        "dust" => ParticleData::Dust {
            color: cursor.read_small_location()?,
            scale: cursor.read_f32()?,
        },
        "dust_color_transition" => ParticleData::DustColorTransition {
            from: cursor.read_small_location()?,
            scale: cursor.read_f32()?,
            to: cursor.read_small_location()?,
        },
        "item" => ParticleData::Item(read_slot(cursor, registries)?),
        "vibration" => read_vibration(cursor)?,
        "sculk_charge" => ParticleData::SculkCharge {
            roll: cursor.read_f32()?,
        },
        "shriek" => ParticleData::Shriek {
            delay: cursor.read_var_int()?,
        },
        _ => ParticleData::None,
    })
}

fn read_vibration(cursor: &mut ByteCursor) -> Result<ParticleData, DataError> {
    let layout = VIBRATION_LAYOUT.select(cursor.version());
    let origin = match layout {
        VibrationLayout::WithOrigin => Some(cursor.read_packed_position()?),
        VibrationLayout::SourceOnly => None,
    };
    let source_type = cursor.read_identifier()?;
    let destination = match source_type.path.as_str() {
        "block" => PositionSource::Block(cursor.read_packed_position()?),
        "entity" => {
            let id = cursor.read_var_int()?;
            let eye_height = match layout {
                VibrationLayout::WithOrigin => 0.0,
                VibrationLayout::SourceOnly => cursor.read_f32()?,
            };
            PositionSource::Entity { id, eye_height }
        }
        other => {
            return Err(DataError::Registry(format!(
                "unknown vibration position source {other:?}"
            )))
        }
    };
    Ok(ParticleData::Vibration {
        origin,
        destination,
        ticks: cursor.read_var_int()?,
    })
}
