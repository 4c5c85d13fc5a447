//! Command graph: a flat node array with integer cross-references.
//!
//! Nodes may point forward or backward (and redirects may form cycles), so
//! decoding runs in two passes. The first reads every node with its raw
//! indices, the second validates the indices and partitions each node's
//! children once the whole array exists.

use indexmap::IndexMap;
use mcj_proto::types::Identifier;
use mcj_proto::ByteCursor;
use tracing::{trace, warn};

use crate::error::CommandError;
use crate::parser::{ParserProperties, ParserRegistry};

const TYPE_MASK: u8 = 0x03;
const EXECUTABLE: u8 = 0x04;
const HAS_REDIRECT: u8 = 0x08;
const HAS_SUGGESTIONS: u8 = 0x10;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Literal {
        name: String,
    },
    Argument {
        name: String,
        parser: Identifier,
        properties: ParserProperties,
        suggestions: Option<Identifier>,
    },
}

impl NodeKind {
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Root => None,
            NodeKind::Literal { name } | NodeKind::Argument { name, .. } => Some(name),
        }
    }
}

/// A node as read off the wire, before its indices are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub kind: NodeKind,
    pub executable: bool,
    pub children: Vec<i32>,
    pub redirect: Option<i32>,
}

impl RawNode {
    pub fn read(cursor: &mut ByteCursor, parsers: &ParserRegistry) -> Result<Self, CommandError> {
        let flags = cursor.read_u8()?;
        let node_type = flags & TYPE_MASK;
        if node_type > 2 {
            return Err(CommandError::InvalidNodeType { node: 0, kind: node_type });
        }
        let children = cursor.read_var_int_array()?;
        let redirect = if flags & HAS_REDIRECT != 0 {
            Some(cursor.read_var_int()?)
        } else {
            None
        };
        let kind = match node_type {
            0 => NodeKind::Root,
            1 => NodeKind::Literal {
                name: cursor.read_string()?,
            },
            _ => {
                let name = cursor.read_string()?;
                let parser = parsers.read_parser_id(cursor)?;
                let properties = parsers.decode_properties(&parser, cursor)?;
                let suggestions = if flags & HAS_SUGGESTIONS != 0 {
                    Some(cursor.read_identifier()?)
                } else {
                    None
                };
                NodeKind::Argument {
                    name,
                    parser,
                    properties,
                    suggestions,
                }
            }
        };
        Ok(Self {
            kind,
            executable: flags & EXECUTABLE != 0,
            children,
            redirect,
        })
    }
}

/// Read a VarInt-counted node array.
pub fn read_nodes(cursor: &mut ByteCursor, parsers: &ParserRegistry) -> Result<Vec<RawNode>, CommandError> {
    let count = cursor.read_count()?;
    let mut nodes = Vec::with_capacity(count.min(cursor.remaining()));
    for index in 0..count {
        let node = RawNode::read(cursor, parsers).map_err(|e| match e {
            CommandError::InvalidNodeType { kind, .. } => CommandError::InvalidNodeType { node: index, kind },
            other => other,
        })?;
        nodes.push(node);
    }
    Ok(nodes)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandNode {
    pub kind: NodeKind,
    pub executable: bool,
    literals: IndexMap<String, usize>,
    arguments: Vec<usize>,
    redirect: Option<usize>,
}

/// Resolved command graph. Nodes live in one arena and refer to each
/// other by index.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandGraph {
    nodes: Vec<CommandNode>,
    root: usize,
}

impl CommandGraph {
    /// Validate every index in `raw` and build the child partitions.
    pub fn resolve(raw: Vec<RawNode>, root: i32) -> Result<Self, CommandError> {
        let count = raw.len();
        let root = checked_index(root, count).ok_or(CommandError::RootOutOfRange { index: root, count })?;

        // Kinds are needed to partition children, so take them first.
        let kinds: Vec<u8> = raw
            .iter()
            .map(|node| match node.kind {
                NodeKind::Root => 0,
                NodeKind::Literal { .. } => 1,
                NodeKind::Argument { .. } => 2,
            })
            .collect();
        let names: Vec<Option<String>> = raw.iter().map(|n| n.kind.name().map(str::to_owned)).collect();

        let mut nodes = Vec::with_capacity(count);
        for (index, node) in raw.into_iter().enumerate() {
            let redirect = match node.redirect {
                Some(target) => Some(checked_index(target, count).ok_or(CommandError::IndexOutOfRange {
                    node: index,
                    index: target,
                    count,
                })?),
                None => None,
            };
            let mut literals = IndexMap::new();
            let mut arguments = Vec::new();
            for child in node.children {
                let child_index = checked_index(child, count).ok_or(CommandError::IndexOutOfRange {
                    node: index,
                    index: child,
                    count,
                })?;
                match (kinds[child_index], &names[child_index]) {
                    (1, Some(name)) => {
                        literals.insert(name.clone(), child_index);
                    }
                    (2, _) => arguments.push(child_index),
                    _ => warn!(node = index, child = child_index, "Root node listed as a child, ignoring"),
                }
            }
            nodes.push(CommandNode {
                kind: node.kind,
                executable: node.executable,
                literals,
                arguments,
                redirect,
            });
        }
        trace!(nodes = count, root, "Resolved command graph");
        Ok(Self { nodes, root })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            graph: self,
            index: self.root,
        }
    }

    pub fn node(&self, index: usize) -> Option<NodeRef<'_>> {
        (index < self.nodes.len()).then_some(NodeRef { graph: self, index })
    }

    /// Walk literal names from the root. A node with no children of its
    /// own continues through its redirect, as `execute run` does.
    pub fn find_path(&self, path: &[&str]) -> Option<NodeRef<'_>> {
        let mut node = self.root();
        for segment in path {
            let parent = match node.redirect() {
                Some(target) if node.node().literals.is_empty() && node.node().arguments.is_empty() => target,
                _ => node,
            };
            node = parent.literal_child(segment)?;
        }
        Some(node)
    }
}

fn checked_index(index: i32, count: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < count)
}

/// Borrowed view of one node in a [`CommandGraph`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g CommandGraph,
    index: usize,
}

impl<'g> NodeRef<'g> {
    fn node(&self) -> &'g CommandNode {
        &self.graph.nodes[self.index]
    }

    fn at(&self, index: usize) -> NodeRef<'g> {
        NodeRef {
            graph: self.graph,
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &'g NodeKind {
        &self.node().kind
    }

    pub fn name(&self) -> Option<&'g str> {
        self.node().kind.name()
    }

    pub fn is_executable(&self) -> bool {
        self.node().executable
    }

    pub fn parser(&self) -> Option<&'g Identifier> {
        match &self.node().kind {
            NodeKind::Argument { parser, .. } => Some(parser),
            _ => None,
        }
    }

    pub fn redirect(&self) -> Option<NodeRef<'g>> {
        self.node().redirect.map(|i| self.at(i))
    }

    pub fn literal_child(&self, name: &str) -> Option<NodeRef<'g>> {
        self.node().literals.get(name).map(|&i| self.at(i))
    }

    pub fn literal_children(&self) -> impl Iterator<Item = (&'g str, NodeRef<'g>)> + 'g {
        let this = *self;
        self.node()
            .literals
            .iter()
            .map(move |(name, &i)| (name.as_str(), this.at(i)))
    }

    /// Argument children in wire order.
    pub fn argument_children(&self) -> impl Iterator<Item = NodeRef<'g>> + 'g {
        let this = *self;
        self.node().arguments.iter().map(move |&i| this.at(i))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.index == other.index
    }
}
