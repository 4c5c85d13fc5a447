//! Game data for the Java edition protocol: registries, item stacks,
//! entity metadata, particles and the play packets that carry them.

pub mod entity_metadata;
pub mod error;
pub mod item_stack;
pub mod packets;
pub mod particle;
pub mod registry;

pub use entity_metadata::{EntityMetadata, EntityView, MetadataType, MetadataValue};
pub use error::DataError;
pub use item_stack::{read_slot, read_slot_array, write_slot, write_slot_array, ItemStack};
pub use particle::{Particle, ParticleData};
pub use registry::{BlockKind, ItemKind, ParticleKind, Registries, RegistrySet};
