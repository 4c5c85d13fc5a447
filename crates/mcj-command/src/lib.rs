//! Command graph decoding: the node array carried by DeclareCommands, the
//! argument parser registry, and traversal over the resolved graph.

pub mod error;
pub mod graph;
pub mod packets;
pub mod parser;

pub use error::CommandError;
pub use graph::{CommandGraph, NodeKind, NodeRef, RawNode};
pub use packets::DeclareCommands;
pub use parser::{ParserProperties, ParserRegistry, StringMode};
