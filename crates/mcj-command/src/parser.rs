//! Argument parsers and their wire properties.
//!
//! Every argument node names a parser, and the parser decides how many
//! property bytes follow. An unregistered parser leaves the rest of the
//! node array unreadable, so it is fatal.

use std::collections::HashMap;

use mcj_proto::types::Identifier;
use mcj_proto::version::{V_1_19, V_1_19_3};
use mcj_proto::{ByteCursor, Threshold, VersionTable};

use crate::error::CommandError;

/// How brigadier's string argument consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMode {
    SingleWord,
    QuotablePhrase,
    GreedyPhrase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParserProperties {
    None,
    Integer { min: Option<i32>, max: Option<i32> },
    Long { min: Option<i64>, max: Option<i64> },
    Float { min: Option<f32>, max: Option<f32> },
    Double { min: Option<f64>, max: Option<f64> },
    String(StringMode),
    Entity { single: bool, players_only: bool },
    ScoreHolder { allow_multiple: bool },
    Range { decimals: bool },
    /// Minimum tick count. Only sent from 1.19.3; zero before.
    Time { min: i32 },
    Resource { registry: Identifier },
}

pub type PropertyDecoder = fn(&mut ByteCursor) -> Result<ParserProperties, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserIdFormat {
    Named,
    Indexed,
}

const PARSER_ID_FORMAT: VersionTable<ParserIdFormat> = VersionTable::new(
    &[(Threshold::Below(V_1_19), ParserIdFormat::Named)],
    ParserIdFormat::Indexed,
);

const HAS_TIME_MIN: VersionTable<bool> =
    VersionTable::new(&[(Threshold::Below(V_1_19_3), false)], true);

/// Numeric parser ids used from 1.19, in wire order.
pub const DEFAULT_NUMERIC_IDS: &[&str] = &[
    "brigadier:bool",
    "brigadier:float",
    "brigadier:double",
    "brigadier:integer",
    "brigadier:long",
    "brigadier:string",
    "minecraft:entity",
    "minecraft:game_profile",
    "minecraft:block_pos",
    "minecraft:column_pos",
    "minecraft:vec3",
    "minecraft:vec2",
    "minecraft:block_state",
    "minecraft:block_predicate",
    "minecraft:item_stack",
    "minecraft:item_predicate",
    "minecraft:color",
    "minecraft:component",
    "minecraft:message",
    "minecraft:nbt",
    "minecraft:nbt_tag",
    "minecraft:nbt_path",
    "minecraft:objective",
    "minecraft:objective_criteria",
    "minecraft:operation",
    "minecraft:particle",
    "minecraft:angle",
    "minecraft:rotation",
    "minecraft:scoreboard_slot",
    "minecraft:score_holder",
    "minecraft:swizzle",
    "minecraft:team",
    "minecraft:item_slot",
    "minecraft:resource_location",
    "minecraft:mob_effect",
    "minecraft:function",
    "minecraft:entity_anchor",
    "minecraft:int_range",
    "minecraft:float_range",
    "minecraft:item_enchantment",
    "minecraft:entity_summon",
    "minecraft:dimension",
    "minecraft:time",
    "minecraft:resource_or_tag",
    "minecraft:resource",
    "minecraft:template_mirror",
    "minecraft:template_rotation",
    "minecraft:uuid",
];

/// Parsers that carry no properties.
const PLAIN_PARSERS: &[&str] = &[
    "brigadier:bool",
    "minecraft:game_profile",
    "minecraft:block_pos",
    "minecraft:column_pos",
    "minecraft:vec3",
    "minecraft:vec2",
    "minecraft:block_state",
    "minecraft:block_predicate",
    "minecraft:item_stack",
    "minecraft:item_predicate",
    "minecraft:color",
    "minecraft:component",
    "minecraft:message",
    "minecraft:nbt",
    "minecraft:nbt_compound_tag",
    "minecraft:nbt_tag",
    "minecraft:nbt_path",
    "minecraft:objective",
    "minecraft:objective_criteria",
    "minecraft:operation",
    "minecraft:particle",
    "minecraft:angle",
    "minecraft:rotation",
    "minecraft:scoreboard_slot",
    "minecraft:swizzle",
    "minecraft:team",
    "minecraft:item_slot",
    "minecraft:resource_location",
    "minecraft:mob_effect",
    "minecraft:function",
    "minecraft:entity_anchor",
    "minecraft:int_range",
    "minecraft:float_range",
    "minecraft:item_enchantment",
    "minecraft:entity_summon",
    "minecraft:dimension",
    "minecraft:gamemode",
    "minecraft:template_mirror",
    "minecraft:template_rotation",
    "minecraft:uuid",
];

/// Property decoders keyed by parser identifier, plus the numeric id list
/// used from 1.19.
pub struct ParserRegistry {
    decoders: HashMap<Identifier, PropertyDecoder>,
    numeric_ids: Vec<Identifier>,
}

impl ParserRegistry {
    /// Registry with every built-in parser and the default numeric ids.
    pub fn new() -> Self {
        let mut registry = Self {
            decoders: HashMap::new(),
            numeric_ids: DEFAULT_NUMERIC_IDS
                .iter()
                .filter_map(|s| Identifier::parse(s).ok())
                .collect(),
        };
        for name in PLAIN_PARSERS {
            registry.register_plain(name);
        }
        registry.register_named("brigadier:integer", read_integer);
        registry.register_named("brigadier:long", read_long);
        registry.register_named("brigadier:float", read_float);
        registry.register_named("brigadier:double", read_double);
        registry.register_named("brigadier:string", read_string_mode);
        registry.register_named("minecraft:entity", read_entity);
        registry.register_named("minecraft:score_holder", read_score_holder);
        registry.register_named("minecraft:range", read_range);
        registry.register_named("minecraft:time", read_time);
        registry.register_named("minecraft:resource", read_resource);
        registry.register_named("minecraft:resource_or_tag", read_resource);
        registry.register_named("minecraft:resource_key", read_resource);
        registry.register_named("minecraft:resource_or_tag_key", read_resource);
        registry
    }

    pub fn register(&mut self, parser: Identifier, decoder: PropertyDecoder) {
        self.decoders.insert(parser, decoder);
    }

    /// Register a parser whose nodes carry no property bytes.
    pub fn register_plain(&mut self, parser: &str) {
        self.register_named(parser, |_| Ok(ParserProperties::None));
    }

    fn register_named(&mut self, parser: &str, decoder: PropertyDecoder) {
        if let Ok(id) = Identifier::parse(parser) {
            self.register(id, decoder);
        }
    }

    /// Replace the numeric id list. Ids index into `ids` from 1.19 on.
    pub fn set_numeric_ids(&mut self, ids: Vec<Identifier>) {
        self.numeric_ids = ids;
    }

    pub fn numeric_ids(&self) -> &[Identifier] {
        &self.numeric_ids
    }

    pub fn contains(&self, parser: &Identifier) -> bool {
        self.decoders.contains_key(parser)
    }

    /// Read a parser reference: an identifier string before 1.19, a VarInt
    /// index into the numeric list after.
    pub fn read_parser_id(&self, cursor: &mut ByteCursor) -> Result<Identifier, CommandError> {
        match PARSER_ID_FORMAT.select(cursor.version()) {
            ParserIdFormat::Named => Ok(cursor.read_identifier()?),
            ParserIdFormat::Indexed => {
                let id = cursor.read_var_int()?;
                usize::try_from(id)
                    .ok()
                    .and_then(|i| self.numeric_ids.get(i))
                    .cloned()
                    .ok_or(CommandError::UnknownParserId(id))
            }
        }
    }

    pub fn decode_properties(
        &self,
        parser: &Identifier,
        cursor: &mut ByteCursor,
    ) -> Result<ParserProperties, CommandError> {
        let decoder = self
            .decoders
            .get(parser)
            .ok_or_else(|| CommandError::UnknownParser(parser.clone()))?;
        decoder(cursor)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Built-in property decoders
// ---------------------------------------------------------------------------

const HAS_MIN: u8 = 0x01;
const HAS_MAX: u8 = 0x02;

fn read_bounds<T>(
    cursor: &mut ByteCursor,
    read: fn(&mut ByteCursor) -> Result<T, mcj_proto::ProtoError>,
) -> Result<(Option<T>, Option<T>), CommandError> {
    let flags = cursor.read_u8()?;
    let min = if flags & HAS_MIN != 0 { Some(read(cursor)?) } else { None };
    let max = if flags & HAS_MAX != 0 { Some(read(cursor)?) } else { None };
    Ok((min, max))
}

fn read_integer(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let (min, max) = read_bounds(cursor, ByteCursor::read_i32)?;
    Ok(ParserProperties::Integer { min, max })
}

fn read_long(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let (min, max) = read_bounds(cursor, ByteCursor::read_i64)?;
    Ok(ParserProperties::Long { min, max })
}

fn read_float(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let (min, max) = read_bounds(cursor, ByteCursor::read_f32)?;
    Ok(ParserProperties::Float { min, max })
}

fn read_double(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let (min, max) = read_bounds(cursor, ByteCursor::read_f64)?;
    Ok(ParserProperties::Double { min, max })
}

fn read_string_mode(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let mode = match cursor.read_var_int()? {
        0 => StringMode::SingleWord,
        1 => StringMode::QuotablePhrase,
        2 => StringMode::GreedyPhrase,
        other => {
            return Err(CommandError::InvalidProperty {
                parser: "brigadier:string",
                detail: format!("mode {other}"),
            })
        }
    };
    Ok(ParserProperties::String(mode))
}

fn read_entity(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let flags = cursor.read_u8()?;
    Ok(ParserProperties::Entity {
        single: flags & 0x01 != 0,
        players_only: flags & 0x02 != 0,
    })
}

fn read_score_holder(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let flags = cursor.read_u8()?;
    Ok(ParserProperties::ScoreHolder {
        allow_multiple: flags & 0x01 != 0,
    })
}

fn read_range(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let flags = cursor.read_u8()?;
    Ok(ParserProperties::Range {
        decimals: flags & 0x01 != 0,
    })
}

fn read_time(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    let min = if HAS_TIME_MIN.select(cursor.version()) {
        cursor.read_i32()?
    } else {
        0
    };
    Ok(ParserProperties::Time { min })
}

fn read_resource(cursor: &mut ByteCursor) -> Result<ParserProperties, CommandError> {
    Ok(ParserProperties::Resource {
        registry: cursor.read_identifier()?,
    })
}
