//! NBT tag types.

use indexmap::IndexMap;

use crate::error::NbtError;

/// A compound tag: name -> tag, in wire order.
pub type NbtCompound = IndexMap<String, NbtTag>;

/// The one-byte kind that precedes every tag on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub fn from_id(id: u8) -> Result<Self, NbtError> {
        Ok(match id {
            0 => TagKind::End,
            1 => TagKind::Byte,
            2 => TagKind::Short,
            3 => TagKind::Int,
            4 => TagKind::Long,
            5 => TagKind::Float,
            6 => TagKind::Double,
            7 => TagKind::ByteArray,
            8 => TagKind::String,
            9 => TagKind::List,
            10 => TagKind::Compound,
            11 => TagKind::IntArray,
            12 => TagKind::LongArray,
            other => return Err(NbtError::UnknownTagType(other)),
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

/// A list tag. The element kind is kept even when the list is empty so it
/// survives a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtList {
    pub kind: TagKind,
    pub items: Vec<NbtTag>,
}

impl NbtList {
    pub fn empty() -> Self {
        Self {
            kind: TagKind::End,
            items: Vec::new(),
        }
    }

    /// Build a list from homogeneous items; fails if the kinds differ.
    pub fn new(items: Vec<NbtTag>) -> Result<Self, NbtError> {
        let kind = items.first().map_or(TagKind::End, NbtTag::kind);
        if let Some(odd) = items.iter().find(|item| item.kind() != kind) {
            return Err(NbtError::MixedList {
                expected: kind.id(),
                got: odd.kind().id(),
            });
        }
        Ok(Self { kind, items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NbtTag> {
        self.items.iter()
    }
}

/// A named root tag. The root is a compound in practice, but any kind is
/// accepted on read; use [`NbtRoot::compound`] to narrow it. Nameless
/// network roots decode with an empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    pub name: String,
    pub tag: NbtTag,
}

impl NbtRoot {
    pub fn new(name: impl Into<String>, compound: NbtCompound) -> Self {
        Self::with_tag(name, NbtTag::Compound(compound))
    }

    pub fn with_tag(name: impl Into<String>, tag: NbtTag) -> Self {
        Self {
            name: name.into(),
            tag,
        }
    }

    /// The root compound, or `None` when the root is some other kind.
    pub fn compound(&self) -> Option<&NbtCompound> {
        self.tag.as_compound()
    }

    pub fn get(&self, key: &str) -> Option<&NbtTag> {
        self.compound()?.get(key)
    }
}

impl Default for NbtRoot {
    fn default() -> Self {
        Self::new("", NbtCompound::new())
    }
}

/// Represents any NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(NbtList),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    pub fn kind(&self) -> TagKind {
        match self {
            NbtTag::Byte(_) => TagKind::Byte,
            NbtTag::Short(_) => TagKind::Short,
            NbtTag::Int(_) => TagKind::Int,
            NbtTag::Long(_) => TagKind::Long,
            NbtTag::Float(_) => TagKind::Float,
            NbtTag::Double(_) => TagKind::Double,
            NbtTag::ByteArray(_) => TagKind::ByteArray,
            NbtTag::String(_) => TagKind::String,
            NbtTag::List(_) => TagKind::List,
            NbtTag::Compound(_) => TagKind::Compound,
            NbtTag::IntArray(_) => TagKind::IntArray,
            NbtTag::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Look up `key` if this is a compound.
    pub fn get(&self, key: &str) -> Option<&NbtTag> {
        self.as_compound().and_then(|c| c.get(key))
    }
}

macro_rules! copy_accessor {
    ($($name:ident => $variant:ident: $ty:ty),* $(,)?) => {
        impl NbtTag {
            $(
                pub fn $name(&self) -> Option<$ty> {
                    if let NbtTag::$variant(v) = self { Some(*v) } else { None }
                }
            )*
        }
    };
}

macro_rules! ref_accessor {
    ($($name:ident => $variant:ident: $ty:ty),* $(,)?) => {
        impl NbtTag {
            $(
                pub fn $name(&self) -> Option<&$ty> {
                    if let NbtTag::$variant(v) = self { Some(v) } else { None }
                }
            )*
        }
    };
}

copy_accessor! {
    as_byte => Byte: i8,
    as_short => Short: i16,
    as_int => Int: i32,
    as_long => Long: i64,
    as_float => Float: f32,
    as_double => Double: f64,
}

ref_accessor! {
    as_string => String: str,
    as_compound => Compound: NbtCompound,
    as_list => List: NbtList,
    as_byte_array => ByteArray: [i8],
    as_int_array => IntArray: [i32],
    as_long_array => LongArray: [i64],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_kinds() {
        assert_eq!(NbtTag::Byte(0).kind(), TagKind::Byte);
        assert_eq!(NbtTag::Short(0).kind().id(), 2);
        assert_eq!(NbtTag::List(NbtList::empty()).kind().id(), 9);
        assert_eq!(NbtTag::Compound(NbtCompound::new()).kind().id(), 10);
        assert_eq!(NbtTag::LongArray(vec![]).kind().id(), 12);
        for id in 0..=12 {
            assert_eq!(TagKind::from_id(id).unwrap().id(), id);
        }
        assert!(matches!(
            TagKind::from_id(13),
            Err(NbtError::UnknownTagType(13))
        ));
    }

    #[test]
    fn list_must_be_homogeneous() {
        let list = NbtList::new(vec![NbtTag::Int(1), NbtTag::Int(2)]).unwrap();
        assert_eq!(list.kind, TagKind::Int);
        assert!(NbtList::new(vec![NbtTag::Int(1), NbtTag::Byte(2)]).is_err());
        assert_eq!(NbtList::new(vec![]).unwrap().kind, TagKind::End);
    }

    #[test]
    fn accessors() {
        assert_eq!(NbtTag::Byte(42).as_byte(), Some(42));
        assert_eq!(NbtTag::Int(42).as_byte(), None);
        assert_eq!(NbtTag::String("hello".into()).as_string(), Some("hello"));
        assert_eq!(NbtTag::Int(5).as_string(), None);

        let mut c = NbtCompound::new();
        c.insert("Damage".into(), NbtTag::Int(3));
        let tag = NbtTag::Compound(c);
        assert_eq!(tag.get("Damage").and_then(NbtTag::as_int), Some(3));
        assert!(tag.get("missing").is_none());
    }
}
