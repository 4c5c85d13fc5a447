//! Minecraft Java Edition protocol primitives: byte cursor, version policy,
//! framing and login-state packets.

pub mod codec;
pub mod compression;
pub mod cursor;
pub mod error;
pub mod frame;
pub mod packets;
pub mod types;
pub mod version;

pub use cursor::{ByteCursor, DecodeLimits};
pub use error::ProtoError;
pub use version::{ProtocolVersion, Threshold, VersionTable};
