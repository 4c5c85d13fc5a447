use mcj_command::DeclareCommands;
use mcj_data::packets::{
    name, CollectItem, Disconnect, KeepAlive, PlayDecode, SetContainerSlot, SetCooldown,
    SetEntityMetadata, SetHeldItem, SpawnExperienceOrb,
};
use mcj_data::Registries;
use mcj_proto::codec::ProtoDecode;
use tracing::{debug, trace, warn};

use super::*;

const HANDLED: &[&str] = &[
    name::SET_ENTITY_METADATA,
    name::SET_CONTAINER_SLOT,
    name::DECLARE_COMMANDS,
    name::COLLECT_ITEM,
    name::SPAWN_EXPERIENCE_ORB,
    name::SET_COOLDOWN,
    name::SET_HELD_ITEM,
    name::KEEP_ALIVE,
    name::DISCONNECT,
];

/// Map the registry's ids for the handled packets back to their names.
pub(super) fn play_packet_ids(registries: &dyn Registries) -> HashMap<i32, &'static str> {
    let mut ids = HashMap::new();
    for &packet in HANDLED {
        match registries.packet_id(packet) {
            Some(id) => {
                ids.insert(id, packet);
            }
            None => warn!("Registry has no id for play packet {packet}, it will be skipped"),
        }
    }
    ids
}

impl<S, W, V> Connection<S, W, V>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: WorldSink,
    V: SessionVerifier,
{
    pub(super) async fn handle_play_packet(&mut self, packet: RawPacket) -> Result<(), ClientError> {
        let Some(&kind) = self.play_ids.get(&packet.id) else {
            trace!(id = packet.id, len = packet.body.len(), "Skipping play packet");
            return Ok(());
        };
        let mut cursor = packet.cursor(self.options.version, self.options.limits);
        let registries = Arc::clone(&self.registries);
        let registries = registries.as_ref();

        match kind {
            name::SET_ENTITY_METADATA => {
                let update = SetEntityMetadata::play_decode(&mut cursor, registries)?;
                self.sink.entity_metadata(update);
            }
            name::SET_CONTAINER_SLOT => {
                let slot = SetContainerSlot::play_decode(&mut cursor, registries)?;
                self.sink.container_slot(slot);
            }
            name::DECLARE_COMMANDS => {
                let commands = DeclareCommands::decode(&mut cursor, &self.parsers)?;
                self.sink.commands(commands);
            }
            name::COLLECT_ITEM => self.sink.collect_item(CollectItem::proto_decode(&mut cursor)?),
            name::SPAWN_EXPERIENCE_ORB => {
                self.sink.experience_orb(SpawnExperienceOrb::proto_decode(&mut cursor)?)
            }
            name::SET_COOLDOWN => {
                let cooldown = SetCooldown::play_decode(&mut cursor, registries)?;
                self.sink.cooldown(cooldown);
            }
            name::SET_HELD_ITEM => self.sink.held_item(SetHeldItem::proto_decode(&mut cursor)?),
            name::KEEP_ALIVE => {
                let keep_alive = KeepAlive::proto_decode(&mut cursor)?;
                self.answer_keep_alive(keep_alive).await?;
            }
            name::DISCONNECT => {
                let disconnect = Disconnect::proto_decode(&mut cursor)?;
                return Err(ClientError::Disconnected(disconnect.reason));
            }
            other => trace!("No handler for {other}"),
        }

        if !cursor.is_empty() {
            debug!(packet = kind, trailing = cursor.remaining(), "Unread bytes after play packet");
        }
        Ok(())
    }

    async fn answer_keep_alive(&mut self, keep_alive: KeepAlive) -> Result<(), ClientError> {
        match self.registries.packet_id(name::KEEP_ALIVE_RESPONSE) {
            Some(id) => {
                trace!(id = keep_alive.id, "Answering keep-alive");
                self.send(id, &keep_alive).await
            }
            None => {
                warn!("Registry has no keep-alive response id, server will time out");
                Ok(())
            }
        }
    }
}
