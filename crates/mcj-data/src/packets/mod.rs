//! Play-state packets that carry game data.
//!
//! Packet ids differ per version and come from the registry file under
//! the names in [`name`].

pub mod collect_item;
pub mod disconnect;
pub mod keep_alive;
pub mod set_container_slot;
pub mod set_cooldown;
pub mod set_entity_metadata;
pub mod set_held_item;
pub mod spawn_experience_orb;

pub use collect_item::CollectItem;
pub use disconnect::Disconnect;
pub use keep_alive::KeepAlive;
pub use set_container_slot::SetContainerSlot;
pub use set_cooldown::SetCooldown;
pub use set_entity_metadata::SetEntityMetadata;
pub use set_held_item::SetHeldItem;
pub use spawn_experience_orb::SpawnExperienceOrb;

use mcj_proto::ByteCursor;

use crate::error::DataError;
use crate::registry::Registries;

/// Decode a packet whose body needs registry lookups.
pub trait PlayDecode: Sized {
    fn play_decode(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Self, DataError>;
}

/// Registry names of play-state packets.
pub mod name {
    pub const SET_ENTITY_METADATA: &str = "set_entity_metadata";
    pub const SET_CONTAINER_SLOT: &str = "set_container_slot";
    pub const DECLARE_COMMANDS: &str = "declare_commands";
    pub const COLLECT_ITEM: &str = "collect_item";
    pub const SPAWN_EXPERIENCE_ORB: &str = "spawn_experience_orb";
    pub const SET_COOLDOWN: &str = "set_cooldown";
    pub const SET_HELD_ITEM: &str = "set_held_item";
    pub const KEEP_ALIVE: &str = "keep_alive";
    pub const DISCONNECT: &str = "disconnect";
    /// Serverbound.
    pub const KEEP_ALIVE_RESPONSE: &str = "keep_alive_response";
}
