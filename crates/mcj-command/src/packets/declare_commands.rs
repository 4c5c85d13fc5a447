//! DeclareCommands (0x11 in 1.13.2) — Server → Client.
//!
//! The full command tree, sent on join and whenever permissions change.

use mcj_proto::ByteCursor;
use tracing::debug;

use crate::error::CommandError;
use crate::graph::{read_nodes, CommandGraph};
use crate::parser::ParserRegistry;

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareCommands {
    pub graph: CommandGraph,
}

impl DeclareCommands {
    /// Decode the node array and trailing root index. Trailing bytes after
    /// the root index are an error.
    pub fn decode(cursor: &mut ByteCursor, parsers: &ParserRegistry) -> Result<Self, CommandError> {
        let nodes = read_nodes(cursor, parsers)?;
        let root = cursor.read_var_int()?;
        cursor.expect_end()?;
        let graph = CommandGraph::resolve(nodes, root)?;
        debug!(
            nodes = graph.len(),
            top_level = graph.root().literal_children().count(),
            "Received command tree"
        );
        Ok(Self { graph })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{encode, NodeSpec};
    use mcj_proto::codec::put_var_int;
    use mcj_proto::version::V_1_13_2;
    use mcj_proto::ProtocolVersion;

    fn nodes() -> [NodeSpec<'static>; 3] {
        [
            NodeSpec::root(&[1]),
            NodeSpec::literal("gamemode", &[2]),
            NodeSpec::argument("mode", "brigadier:bool", &[]),
        ]
    }

    #[test]
    fn decode_with_root_index() {
        let version = ProtocolVersion(V_1_13_2);
        let mut buf = encode(&nodes());
        put_var_int(&mut buf, 0);
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        let packet = DeclareCommands::decode(&mut cursor, &ParserRegistry::new()).unwrap();
        let gamemode = packet.graph.find_path(&["gamemode"]).unwrap();
        assert_eq!(gamemode.argument_children().count(), 1);
    }

    #[test]
    fn missing_root_index() {
        let version = ProtocolVersion(V_1_13_2);
        let buf = encode(&nodes());
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        assert!(matches!(
            DeclareCommands::decode(&mut cursor, &ParserRegistry::new()),
            Err(CommandError::Proto(_))
        ));
    }

    #[test]
    fn bad_root_index() {
        let version = ProtocolVersion(V_1_13_2);
        let mut buf = encode(&nodes());
        put_var_int(&mut buf, 3);
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        assert!(matches!(
            DeclareCommands::decode(&mut cursor, &ParserRegistry::new()),
            Err(CommandError::RootOutOfRange { index: 3, count: 3 })
        ));
    }
}
