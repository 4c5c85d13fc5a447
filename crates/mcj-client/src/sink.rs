//! Consumer of decoded play-state values.

use std::collections::HashMap;

use mcj_command::DeclareCommands;
use mcj_data::packets::{
    CollectItem, SetContainerSlot, SetCooldown, SetEntityMetadata, SetHeldItem, SpawnExperienceOrb,
};
use mcj_data::{EntityMetadata, EntityView};
use mcj_proto::packets::LoginSuccess;
use mcj_proto::ProtocolVersion;
use tracing::{debug, info};

/// Receives every decoded value by value, in arrival order. Methods default
/// to dropping the value.
pub trait WorldSink: Send {
    fn login_success(&mut self, _login: LoginSuccess) {}
    fn entity_metadata(&mut self, _update: SetEntityMetadata) {}
    fn container_slot(&mut self, _slot: SetContainerSlot) {}
    fn commands(&mut self, _commands: DeclareCommands) {}
    fn collect_item(&mut self, _collect: CollectItem) {}
    fn experience_orb(&mut self, _orb: SpawnExperienceOrb) {}
    fn cooldown(&mut self, _cooldown: SetCooldown) {}
    fn held_item(&mut self, _held: SetHeldItem) {}
}

/// Logs what arrives and keeps the merged metadata of every entity seen.
pub struct LoggingSink {
    version: ProtocolVersion,
    entities: HashMap<i32, EntityMetadata>,
}

impl LoggingSink {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            entities: HashMap::new(),
        }
    }

    pub fn entity(&self, entity_id: i32) -> Option<&EntityMetadata> {
        self.entities.get(&entity_id)
    }
}

impl WorldSink for LoggingSink {
    fn login_success(&mut self, login: LoginSuccess) {
        info!("Logged in as {} ({})", login.username, login.uuid);
    }

    fn entity_metadata(&mut self, update: SetEntityMetadata) {
        let entry = self.entities.entry(update.entity_id).or_default();
        entry.merge(update.metadata);
        let view = EntityView::new(entry, self.version);
        debug!(
            entity = update.entity_id,
            entries = entry.len(),
            on_fire = view.flags().on_fire(),
            "Entity metadata"
        );
        if let Some(name) = view.custom_name() {
            debug!(entity = update.entity_id, "Custom name {name}");
        }
    }

    fn container_slot(&mut self, slot: SetContainerSlot) {
        match &slot.item {
            Some(stack) => {
                let name = stack
                    .display_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| stack.item.name.to_string());
                debug!(window = slot.window_id, slot = slot.slot, "{name} x{}", stack.count);
            }
            None => debug!(window = slot.window_id, slot = slot.slot, "Slot cleared"),
        }
    }

    fn commands(&mut self, commands: DeclareCommands) {
        let names: Vec<&str> = commands.graph.root().literal_children().map(|(name, _)| name).collect();
        info!("Server declared {} commands: {}", names.len(), names.join(", "));
    }

    fn collect_item(&mut self, collect: CollectItem) {
        let item = self
            .entity(collect.collected_entity_id)
            .and_then(|metadata| EntityView::new(metadata, self.version).dropped_item())
            .map(|stack| stack.item.name.to_string());
        debug!(
            "Entity {} picked up entity {} ({})",
            collect.collector_entity_id,
            collect.collected_entity_id,
            item.as_deref().unwrap_or("not an item")
        );
        self.entities.remove(&collect.collected_entity_id);
    }

    fn experience_orb(&mut self, orb: SpawnExperienceOrb) {
        debug!(entity = orb.entity_id, count = orb.count, "Experience orb at {:?}", orb.position);
    }

    fn cooldown(&mut self, cooldown: SetCooldown) {
        debug!("Cooldown {} for {} ticks", cooldown.item.name, cooldown.ticks);
    }

    fn held_item(&mut self, held: SetHeldItem) {
        debug!("Held item slot {}", held.slot);
    }
}
