//! NBT (Named Binary Tag) implementation for Minecraft Java Edition.
//!
//! All values are big-endian, strings carry a `u16` byte length and arrays
//! an `i32` element count. Two framings exist on the wire:
//! - **Raw**: a root tag read straight from the frame. A root of kind END
//!   means "no data". From 1.20.2 the root compound has no name.
//! - **Compressed**: an `i16` byte length (`-1` = no data) followed by a
//!   gzip stream holding a named root. Used by item stacks before 14w28b.

pub mod error;
mod io;
pub mod tag;

pub use error::NbtError;
pub use tag::{NbtCompound, NbtList, NbtRoot, NbtTag, TagKind};

use bytes::BufMut;
use mcj_proto::compression::{compress, decompress_with, CompressionAlgorithm};
use mcj_proto::{ByteCursor, ProtocolVersion};

/// Read a raw root tag using the cursor's version for root naming.
/// Any tag kind is accepted at the root. `Ok(None)` means the sender wrote
/// an END tag, which callers treat as an empty compound.
pub fn read_nbt(cursor: &mut ByteCursor) -> Result<Option<NbtRoot>, NbtError> {
    let naming = io::root_name_for(cursor.version());
    io::read_root(cursor, naming)
}

/// Write a raw root tag; `None` writes a single END byte.
pub fn write_nbt(
    buf: &mut impl BufMut,
    root: Option<&NbtRoot>,
    version: ProtocolVersion,
) -> Result<(), NbtError> {
    io::write_root(buf, root, io::root_name_for(version))
}

/// Read a length-prefixed gzip NBT blob. A length of `-1` means no data and
/// yields `Ok(None)`, the same value an END root produces.
pub fn read_compressed_nbt(cursor: &mut ByteCursor) -> Result<Option<NbtRoot>, NbtError> {
    let len = cursor.read_i16()?;
    if len == -1 {
        return Ok(None);
    }
    let len = usize::try_from(len).map_err(|_| NbtError::NegativeLength(len as i32))?;
    let compressed = cursor.read_bytes(len)?;
    let limits = cursor.limits();
    let inflated = decompress_with(&compressed, CompressionAlgorithm::Gzip, limits.max_array_len)
        .map_err(|e| NbtError::Gzip(e.to_string()))?;
    let mut inner = ByteCursor::with_limits(inflated, cursor.version(), limits);
    io::read_root(&mut inner, io::RootName::Named)
}

/// Write a length-prefixed gzip NBT blob; `None` writes the `-1` sentinel.
pub fn write_compressed_nbt(buf: &mut impl BufMut, root: Option<&NbtRoot>) -> Result<(), NbtError> {
    let Some(root) = root else {
        buf.put_i16(-1);
        return Ok(());
    };
    let mut raw = Vec::new();
    io::write_root(&mut raw, Some(root), io::RootName::Named)?;
    let compressed =
        compress(&raw, CompressionAlgorithm::Gzip, 6).map_err(|e| NbtError::Gzip(e.to_string()))?;
    let len = i16::try_from(compressed.len())
        .map_err(|_| NbtError::Gzip(format!("{} byte blob exceeds i16 length", compressed.len())))?;
    buf.put_i16(len);
    buf.put_slice(&compressed);
    Ok(())
}
