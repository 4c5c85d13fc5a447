use bytes::BytesMut;
use mcj_nbt::{read_compressed_nbt, read_nbt, write_compressed_nbt, write_nbt};
use mcj_nbt::{NbtCompound, NbtList, NbtRoot, NbtTag, TagKind};
use mcj_proto::{ByteCursor, ProtocolVersion};
use proptest::prelude::*;

fn leaf_strategy() -> impl Strategy<Value = NbtTag> {
    prop_oneof![
        any::<i8>().prop_map(NbtTag::Byte),
        any::<i16>().prop_map(NbtTag::Short),
        any::<i32>().prop_map(NbtTag::Int),
        any::<i64>().prop_map(NbtTag::Long),
        (-1.0e6f32..1.0e6).prop_map(NbtTag::Float),
        (-1.0e12f64..1.0e12).prop_map(NbtTag::Double),
        "[a-zA-Z0-9 _]{0,16}".prop_map(NbtTag::String),
        prop::collection::vec(any::<i8>(), 0..32).prop_map(NbtTag::ByteArray),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(NbtTag::IntArray),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(NbtTag::LongArray),
    ]
}

fn tag_strategy() -> impl Strategy<Value = NbtTag> {
    leaf_strategy().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(("[a-z]{1,8}", inner.clone()), 0..6).prop_map(|entries| {
                NbtTag::Compound(entries.into_iter().collect::<NbtCompound>())
            }),
            // Homogeneous lists: repeat one generated element.
            (inner, 0usize..4).prop_map(|(item, n)| {
                let kind = if n == 0 { TagKind::End } else { item.kind() };
                NbtTag::List(NbtList {
                    kind,
                    items: vec![item; n],
                })
            }),
        ]
    })
}

fn root_strategy(max_entries: usize) -> impl Strategy<Value = NbtRoot> {
    (
        "[a-z]{0,8}",
        prop::collection::vec(("[a-zA-Z]{1,10}", tag_strategy()), 0..max_entries),
    )
        .prop_map(|(name, entries)| NbtRoot::new(name, entries.into_iter().collect()))
}

proptest! {
    #[test]
    fn prop_raw_roundtrip(root in root_strategy(8)) {
        let version = ProtocolVersion(340);
        let mut buf = BytesMut::new();
        write_nbt(&mut buf, Some(&root), version).unwrap();
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        let decoded = read_nbt(&mut cursor).unwrap().unwrap();
        prop_assert_eq!(decoded, root);
        prop_assert!(cursor.is_empty());
    }

    #[test]
    fn prop_compressed_roundtrip(root in root_strategy(3)) {
        let version = ProtocolVersion(5);
        let mut buf = BytesMut::new();
        write_compressed_nbt(&mut buf, Some(&root)).unwrap();
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        prop_assert_eq!(read_compressed_nbt(&mut cursor).unwrap(), Some(root));
    }

    #[test]
    fn prop_garbage_never_panics(data in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut cursor = ByteCursor::new(data, ProtocolVersion(340));
        let _ = read_nbt(&mut cursor);
    }
}
