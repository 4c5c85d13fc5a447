//! Big-endian NBT read/write engine.

use bytes::BufMut;
use mcj_proto::version::{ProtocolVersion, Threshold, VersionTable, V_1_20_2};
use mcj_proto::{ByteCursor, ProtoError};

use crate::error::NbtError;
use crate::tag::{NbtCompound, NbtList, NbtRoot, NbtTag, TagKind};

/// Maximum nesting depth to prevent stack overflow.
pub(crate) const MAX_DEPTH: usize = 512;

/// Whether the root compound carries a name. Network NBT dropped it in
/// 1.20.2; disk and gzip NBT always keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootName {
    Named,
    Nameless,
}

pub(crate) const ROOT_NAME: VersionTable<RootName> = VersionTable::new(
    &[(Threshold::Below(V_1_20_2), RootName::Named)],
    RootName::Nameless,
);

// -----------------------------------------------------------------------
// Reading
// -----------------------------------------------------------------------

/// Read a root tag of any kind. A root of kind END means "no data".
pub(crate) fn read_root(cursor: &mut ByteCursor, naming: RootName) -> Result<Option<NbtRoot>, NbtError> {
    let kind = TagKind::from_id(cursor.read_u8()?)?;
    if kind == TagKind::End {
        return Ok(None);
    }
    let name = match naming {
        RootName::Named => read_string(cursor)?,
        RootName::Nameless => String::new(),
    };
    let tag = read_tag(cursor, kind, 0)?;
    Ok(Some(NbtRoot { name, tag }))
}

fn read_tag(cursor: &mut ByteCursor, kind: TagKind, depth: usize) -> Result<NbtTag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }

    Ok(match kind {
        TagKind::End => return Err(NbtError::UnknownTagType(TagKind::End.id())),
        TagKind::Byte => NbtTag::Byte(cursor.read_i8()?),
        TagKind::Short => NbtTag::Short(cursor.read_i16()?),
        TagKind::Int => NbtTag::Int(cursor.read_i32()?),
        TagKind::Long => NbtTag::Long(cursor.read_i64()?),
        TagKind::Float => NbtTag::Float(cursor.read_f32()?),
        TagKind::Double => NbtTag::Double(cursor.read_f64()?),
        TagKind::ByteArray => {
            let len = read_array_len(cursor, 1)?;
            let data = cursor.read_bytes(len)?;
            NbtTag::ByteArray(data.iter().map(|&b| b as i8).collect())
        }
        TagKind::String => NbtTag::String(read_string(cursor)?),
        TagKind::List => {
            let element = TagKind::from_id(cursor.read_u8()?)?;
            let len = read_array_len(cursor, 0)?;
            if element == TagKind::End && len > 0 {
                return Err(NbtError::UnknownTagType(TagKind::End.id()));
            }
            // Never trust the declared count for the allocation.
            let mut items = Vec::with_capacity(len.min(cursor.remaining()));
            for _ in 0..len {
                items.push(read_tag(cursor, element, depth + 1)?);
            }
            NbtTag::List(NbtList {
                kind: element,
                items,
            })
        }
        TagKind::Compound => NbtTag::Compound(read_compound(cursor, depth + 1)?),
        TagKind::IntArray => {
            let len = read_array_len(cursor, 4)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(cursor.read_i32()?);
            }
            NbtTag::IntArray(arr)
        }
        TagKind::LongArray => {
            let len = read_array_len(cursor, 8)?;
            let mut arr = Vec::with_capacity(len);
            for _ in 0..len {
                arr.push(cursor.read_i64()?);
            }
            NbtTag::LongArray(arr)
        }
    })
}

fn read_compound(cursor: &mut ByteCursor, depth: usize) -> Result<NbtCompound, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::NestingTooDeep { limit: MAX_DEPTH });
    }
    let mut map = NbtCompound::new();
    loop {
        let kind = TagKind::from_id(cursor.read_u8()?)?;
        if kind == TagKind::End {
            break;
        }
        let name = read_string(cursor)?;
        let tag = read_tag(cursor, kind, depth)?;
        map.insert(name, tag);
    }
    Ok(map)
}

/// Read an i32 element count. When `element_size` is non-zero the whole
/// array must fit in what is left of the frame.
fn read_array_len(cursor: &mut ByteCursor, element_size: usize) -> Result<usize, NbtError> {
    let len = cursor.read_i32()?;
    let len = usize::try_from(len).map_err(|_| NbtError::NegativeLength(len))?;
    let needed = len.saturating_mul(element_size);
    if needed > cursor.remaining() {
        return Err(ProtoError::BufferTooShort {
            needed,
            remaining: cursor.remaining(),
        }
        .into());
    }
    Ok(len)
}

fn read_string(cursor: &mut ByteCursor) -> Result<String, NbtError> {
    let len = cursor.read_u16()? as usize;
    let data = cursor.read_bytes(len)?;
    String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8.into())
}

// -----------------------------------------------------------------------
// Writing
// -----------------------------------------------------------------------

pub(crate) fn write_root(
    buf: &mut impl BufMut,
    root: Option<&NbtRoot>,
    naming: RootName,
) -> Result<(), NbtError> {
    let Some(root) = root else {
        buf.put_u8(TagKind::End.id());
        return Ok(());
    };
    buf.put_u8(root.tag.kind().id());
    if naming == RootName::Named {
        write_string(buf, &root.name)?;
    }
    write_tag(buf, &root.tag)
}

fn write_tag(buf: &mut impl BufMut, tag: &NbtTag) -> Result<(), NbtError> {
    match tag {
        NbtTag::Byte(v) => buf.put_i8(*v),
        NbtTag::Short(v) => buf.put_i16(*v),
        NbtTag::Int(v) => buf.put_i32(*v),
        NbtTag::Long(v) => buf.put_i64(*v),
        NbtTag::Float(v) => buf.put_f32(*v),
        NbtTag::Double(v) => buf.put_f64(*v),
        NbtTag::ByteArray(arr) => {
            put_count(buf, arr.len())?;
            for &b in arr {
                buf.put_i8(b);
            }
        }
        NbtTag::String(s) => write_string(buf, s)?,
        NbtTag::List(list) => {
            buf.put_u8(list.kind.id());
            put_count(buf, list.items.len())?;
            for item in &list.items {
                write_tag(buf, item)?;
            }
        }
        NbtTag::Compound(map) => write_compound(buf, map)?,
        NbtTag::IntArray(arr) => {
            put_count(buf, arr.len())?;
            for &v in arr {
                buf.put_i32(v);
            }
        }
        NbtTag::LongArray(arr) => {
            put_count(buf, arr.len())?;
            for &v in arr {
                buf.put_i64(v);
            }
        }
    }
    Ok(())
}

fn write_compound(buf: &mut impl BufMut, map: &NbtCompound) -> Result<(), NbtError> {
    for (name, tag) in map {
        buf.put_u8(tag.kind().id());
        write_string(buf, name)?;
        write_tag(buf, tag)?;
    }
    buf.put_u8(TagKind::End.id());
    Ok(())
}

fn put_count(buf: &mut impl BufMut, len: usize) -> Result<(), NbtError> {
    let count = i32::try_from(len).map_err(|_| ProtoError::ValueTooLong {
        len,
        max: i32::MAX as usize,
    })?;
    buf.put_i32(count);
    Ok(())
}

fn write_string(buf: &mut impl BufMut, s: &str) -> Result<(), NbtError> {
    let len = u16::try_from(s.len()).map_err(|_| ProtoError::ValueTooLong {
        len: s.len(),
        max: u16::MAX as usize,
    })?;
    buf.put_u16(len);
    buf.put_slice(s.as_bytes());
    Ok(())
}

pub(crate) fn root_name_for(version: ProtocolVersion) -> RootName {
    ROOT_NAME.select(version)
}
