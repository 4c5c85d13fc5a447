//! Game registries: numeric wire ids to named items, blocks and particles.
//!
//! Loaded once from a JSON file at start-up and shared read-only between
//! connections. Decoders only see the [`Registries`] trait, so tests can
//! build a registry in code.

use std::collections::HashMap;
use std::path::Path;

use mcj_proto::types::Identifier;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::DataError;

/// An item type as known for the negotiated version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKind {
    /// Numeric id on the wire (legacy or flattened, depending on version).
    pub id: i32,
    pub name: Identifier,
}

impl ItemKind {
    pub fn new(id: i32, name: Identifier) -> Self {
        Self { id, name }
    }

    /// Placeholder for ids the registry does not know.
    pub fn unknown(id: i32) -> Self {
        Self {
            id,
            name: Identifier::minecraft("unknown"),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name.namespace == Identifier::DEFAULT_NAMESPACE && self.name.path == "unknown"
    }
}

/// A block state id and the block it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockKind {
    pub id: i32,
    pub name: Identifier,
}

impl BlockKind {
    pub fn unknown(id: i32) -> Self {
        Self {
            id,
            name: Identifier::minecraft("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticleKind {
    pub id: i32,
    pub name: Identifier,
}

/// Lookups decoders need. Implementations must be immutable once built.
pub trait Registries: Send + Sync {
    fn item_by_id(&self, id: i32) -> Option<&ItemKind>;

    /// Pre-flattening lookup by numeric id and damage/sub-type.
    fn item_by_legacy_id(&self, id: i32, meta: i16) -> Option<&ItemKind>;

    fn block_by_id(&self, id: i32) -> Option<&BlockKind>;

    fn particle_by_id(&self, id: i32) -> Option<&ParticleKind>;

    /// Play-state packet id by name, e.g. `"set_entity_metadata"`.
    fn packet_id(&self, name: &str) -> Option<i32>;
}

// ---------------------------------------------------------------------------
// Fallback helpers
// ---------------------------------------------------------------------------

pub fn resolve_item(registries: &dyn Registries, id: i32) -> ItemKind {
    match registries.item_by_id(id) {
        Some(item) => item.clone(),
        None => {
            warn!("Unknown item id {id}, using fallback");
            ItemKind::unknown(id)
        }
    }
}

/// Legacy lookup: exact `(id, meta)` first, then the base item `(id, 0)`.
pub fn resolve_legacy_item(registries: &dyn Registries, id: i32, meta: i16) -> ItemKind {
    if let Some(item) = registries
        .item_by_legacy_id(id, meta)
        .or_else(|| registries.item_by_legacy_id(id, 0))
    {
        return item.clone();
    }
    warn!("Unknown legacy item {id}:{meta}, using fallback");
    ItemKind::unknown(id)
}

pub fn resolve_block(registries: &dyn Registries, id: i32) -> BlockKind {
    match registries.block_by_id(id) {
        Some(block) => block.clone(),
        None => {
            warn!("Unknown block state {id}, using fallback");
            BlockKind::unknown(id)
        }
    }
}

// ---------------------------------------------------------------------------
// JSON-backed registry
// ---------------------------------------------------------------------------

/// Raw registry file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistryFile {
    pub items: HashMap<i32, String>,
    /// Keys are `"id:meta"`.
    pub legacy_items: HashMap<String, String>,
    pub blocks: HashMap<i32, String>,
    pub particles: HashMap<i32, String>,
    pub packets: HashMap<String, i32>,
    /// Command argument parsers in numeric-id order (1.19+). Empty keeps
    /// the built-in list.
    pub command_parsers: Vec<String>,
}

impl RegistryFile {
    /// Parse from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Registry built from a [`RegistryFile`].
#[derive(Debug, Default)]
pub struct RegistrySet {
    items: HashMap<i32, ItemKind>,
    legacy_items: HashMap<(i32, i16), ItemKind>,
    blocks: HashMap<i32, BlockKind>,
    particles: HashMap<i32, ParticleKind>,
    packets: HashMap<String, i32>,
    command_parsers: Vec<Identifier>,
}

impl RegistrySet {
    /// An empty registry: every lookup misses and falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(file: RegistryFile) -> Result<Self, DataError> {
        let mut set = Self::empty();
        for (id, name) in file.items {
            set.items.insert(id, ItemKind::new(id, parse_name(&name)?));
        }
        for (key, name) in file.legacy_items {
            let (id, meta) = parse_legacy_key(&key)?;
            set.legacy_items.insert((id, meta), ItemKind::new(id, parse_name(&name)?));
        }
        for (id, name) in file.blocks {
            set.blocks.insert(
                id,
                BlockKind {
                    id,
                    name: parse_name(&name)?,
                },
            );
        }
        for (id, name) in file.particles {
            set.particles.insert(
                id,
                ParticleKind {
                    id,
                    name: parse_name(&name)?,
                },
            );
        }
        set.packets = file.packets;
        set.command_parsers = file
            .command_parsers
            .iter()
            .map(|name| parse_name(name))
            .collect::<Result<_, _>>()?;
        Ok(set)
    }

    pub fn from_json(json: &str) -> Result<Self, DataError> {
        Self::from_file(RegistryFile::parse_json(json)?)
    }

    /// Load a registry file from disk.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json(&json)?;
        info!(
            "Loaded registry {} ({} items, {} legacy items, {} blocks, {} particles, {} packets)",
            path.display(),
            set.items.len(),
            set.legacy_items.len(),
            set.blocks.len(),
            set.particles.len(),
            set.packets.len(),
        );
        Ok(set)
    }

    pub fn insert_item(&mut self, id: i32, name: Identifier) {
        self.items.insert(id, ItemKind::new(id, name));
    }

    pub fn insert_legacy_item(&mut self, id: i32, meta: i16, name: Identifier) {
        self.legacy_items.insert((id, meta), ItemKind::new(id, name));
    }

    pub fn insert_block(&mut self, id: i32, name: Identifier) {
        self.blocks.insert(id, BlockKind { id, name });
    }

    pub fn insert_particle(&mut self, id: i32, name: Identifier) {
        self.particles.insert(id, ParticleKind { id, name });
    }

    pub fn insert_packet(&mut self, name: impl Into<String>, id: i32) {
        self.packets.insert(name.into(), id);
    }

    pub fn command_parsers(&self) -> &[Identifier] {
        &self.command_parsers
    }
}

impl Registries for RegistrySet {
    fn item_by_id(&self, id: i32) -> Option<&ItemKind> {
        self.items.get(&id)
    }

    fn item_by_legacy_id(&self, id: i32, meta: i16) -> Option<&ItemKind> {
        self.legacy_items.get(&(id, meta))
    }

    fn block_by_id(&self, id: i32) -> Option<&BlockKind> {
        self.blocks.get(&id)
    }

    fn particle_by_id(&self, id: i32) -> Option<&ParticleKind> {
        self.particles.get(&id)
    }

    fn packet_id(&self, name: &str) -> Option<i32> {
        self.packets.get(name).copied()
    }
}

fn parse_name(name: &str) -> Result<Identifier, DataError> {
    Identifier::parse(name).map_err(|e| DataError::Registry(e.to_string()))
}

fn parse_legacy_key(key: &str) -> Result<(i32, i16), DataError> {
    let bad = || DataError::Registry(format!("legacy item key {key:?} is not \"id:meta\""));
    let (id, meta) = key.split_once(':').ok_or_else(bad)?;
    let id = id.parse().map_err(|_| bad())?;
    let meta = meta.parse().map_err(|_| bad())?;
    Ok((id, meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "items": { "1": "minecraft:stone", "802": "diamond_sword" },
        "legacy_items": { "1:0": "minecraft:stone", "1:1": "minecraft:granite" },
        "blocks": { "0": "minecraft:air" },
        "particles": { "3": "minecraft:block" },
        "packets": { "keep_alive": 31 }
    }"#;

    #[test]
    fn parse_sample() {
        let set = RegistrySet::from_json(SAMPLE).unwrap();
        assert_eq!(set.item_by_id(1).unwrap().name, Identifier::minecraft("stone"));
        assert_eq!(set.item_by_id(802).unwrap().name.to_string(), "minecraft:diamond_sword");
        assert_eq!(
            set.item_by_legacy_id(1, 1).unwrap().name,
            Identifier::minecraft("granite")
        );
        assert_eq!(set.block_by_id(0).unwrap().name.path, "air");
        assert_eq!(set.particle_by_id(3).unwrap().name.path, "block");
        assert_eq!(set.packet_id("keep_alive"), Some(31));
        assert_eq!(set.packet_id("disconnect"), None);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let set = RegistrySet::from_json("{}").unwrap();
        assert!(set.item_by_id(1).is_none());
        assert!(set.command_parsers().is_empty());
    }

    #[test]
    fn command_parser_list() {
        let set = RegistrySet::from_json(
            r#"{ "command_parsers": ["brigadier:bool", "minecraft:entity"] }"#,
        )
        .unwrap();
        assert_eq!(set.command_parsers()[1], Identifier::minecraft("entity"));
    }

    #[test]
    fn bad_legacy_key() {
        let err = RegistrySet::from_json(r#"{ "legacy_items": { "1-0": "stone" } }"#).unwrap_err();
        assert!(matches!(err, DataError::Registry(_)));
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            RegistrySet::from_json("{ items: "),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn fallbacks() {
        let set = RegistrySet::from_json(SAMPLE).unwrap();
        assert!(resolve_item(&set, 9999).is_unknown());
        assert_eq!(resolve_item(&set, 9999).id, 9999);
        assert_eq!(resolve_legacy_item(&set, 1, 1).name.path, "granite");
        // Unknown sub-type falls back to the base item.
        assert_eq!(resolve_legacy_item(&set, 1, 6).name.path, "stone");
        assert!(resolve_legacy_item(&set, 2, 0).is_unknown());
        assert_eq!(resolve_block(&set, 77).name.path, "unknown");
        assert_eq!(set.particle_by_id(3).map(|p| p.name.path.as_str()), Some("block"));
    }
}
