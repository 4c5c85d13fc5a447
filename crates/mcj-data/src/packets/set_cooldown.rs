//! SetCooldown — Server → Client.

use mcj_proto::ByteCursor;

use super::PlayDecode;
use crate::error::DataError;
use crate::registry::{resolve_item, ItemKind, Registries};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCooldown {
    pub item: ItemKind,
    pub ticks: i32,
}

impl PlayDecode for SetCooldown {
    fn play_decode(cursor: &mut ByteCursor, registries: &dyn Registries) -> Result<Self, DataError> {
        let item = resolve_item(registries, cursor.read_var_int()?);
        Ok(Self {
            item,
            ticks: cursor.read_var_int()?,
        })
    }
}
