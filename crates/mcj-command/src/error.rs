use mcj_proto::types::Identifier;
use mcj_proto::ProtoError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error("node {node}: index {index} out of range for {count} nodes")]
    IndexOutOfRange { node: usize, index: i32, count: usize },

    #[error("root index {index} out of range for {count} nodes")]
    RootOutOfRange { index: i32, count: usize },

    #[error("node {node}: invalid node type {kind}")]
    InvalidNodeType { node: usize, kind: u8 },

    #[error("unknown argument parser {0}")]
    UnknownParser(Identifier),

    #[error("unknown numeric parser id {0}")]
    UnknownParserId(i32),

    #[error("parser {parser}: invalid property {detail}")]
    InvalidProperty { parser: &'static str, detail: String },
}
