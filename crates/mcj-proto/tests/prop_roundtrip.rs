use bytes::{BufMut, BytesMut};
use mcj_proto::codec::{
    put_bool, put_byte_array, put_entity_id, put_packed_position, put_string, put_var_int,
    put_var_long,
};
use mcj_proto::frame::FrameCodec;
use mcj_proto::types::BlockPos;
use mcj_proto::{ByteCursor, ProtocolVersion};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    VarInt(i32),
    VarLong(i64),
    U16(u16),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    EntityId(i32),
    Position(i32, i32, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::VarInt),
        any::<i64>().prop_map(Op::VarLong),
        any::<u16>().prop_map(Op::U16),
        any::<i64>().prop_map(Op::I64),
        any::<f64>()
            .prop_filter("NaN never compares equal", |v| !v.is_nan())
            .prop_map(Op::F64),
        any::<bool>().prop_map(Op::Bool),
        ".{0,64}".prop_map(Op::Str),
        prop::collection::vec(any::<u8>(), 0..256).prop_map(Op::Bytes),
        any::<i32>().prop_map(Op::EntityId),
        (
            -(1 << 25)..(1 << 25),
            -(1 << 11)..(1 << 11),
            -(1 << 25)..(1 << 25)
        )
            .prop_map(|(x, y, z)| Op::Position(x, y, z)),
    ]
}

fn version_strategy() -> impl Strategy<Value = ProtocolVersion> {
    prop_oneof![Just(4), Just(5), Just(47), Just(340), Just(404), Just(498), Just(763), Just(766)]
        .prop_map(ProtocolVersion)
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(
        version in version_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..48),
    ) {
        let mut buf = BytesMut::new();
        for op in &ops {
            match op {
                Op::VarInt(v) => put_var_int(&mut buf, *v),
                Op::VarLong(v) => put_var_long(&mut buf, *v),
                Op::U16(v) => buf.put_u16(*v),
                Op::I64(v) => buf.put_i64(*v),
                Op::F64(v) => buf.put_f64(*v),
                Op::Bool(v) => put_bool(&mut buf, *v),
                Op::Str(v) => put_string(&mut buf, v).unwrap(),
                Op::Bytes(v) => put_byte_array(&mut buf, v, version).unwrap(),
                Op::EntityId(v) => put_entity_id(&mut buf, *v, version),
                Op::Position(x, y, z) => {
                    put_packed_position(&mut buf, BlockPos::new(*x, *y, *z), version)
                }
            }
        }

        let mut cursor = ByteCursor::new(buf.freeze(), version);
        for op in &ops {
            match op {
                Op::VarInt(v) => prop_assert_eq!(cursor.read_var_int().unwrap(), *v),
                Op::VarLong(v) => prop_assert_eq!(cursor.read_var_long().unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(cursor.read_u16().unwrap(), *v),
                Op::I64(v) => prop_assert_eq!(cursor.read_i64().unwrap(), *v),
                Op::F64(v) => prop_assert_eq!(cursor.read_f64().unwrap(), *v),
                Op::Bool(v) => prop_assert_eq!(cursor.read_bool().unwrap(), *v),
                Op::Str(v) => prop_assert_eq!(&cursor.read_string().unwrap(), v),
                Op::Bytes(v) => prop_assert_eq!(&cursor.read_byte_array().unwrap()[..], &v[..]),
                Op::EntityId(v) => prop_assert_eq!(cursor.read_entity_id().unwrap(), *v),
                Op::Position(x, y, z) => {
                    let pos = cursor.read_packed_position().unwrap();
                    prop_assert_eq!(pos.x, *x);
                    prop_assert_eq!(pos.z, *z);
                    // Before 18w43a y is 12 unsigned bits.
                    if version.is_before(440) {
                        prop_assert_eq!(pos.y, *y & 0xFFF);
                    } else {
                        prop_assert_eq!(pos.y, *y);
                    }
                }
            }
        }
        prop_assert!(cursor.is_empty());
    }

    #[test]
    fn prop_var_int_length_matches_encoding(value in any::<i32>()) {
        let mut buf = BytesMut::new();
        put_var_int(&mut buf, value);
        prop_assert!(buf.len() <= 5);
        prop_assert_eq!(buf.len(), mcj_proto::types::VarInt::encoded_len(value));
    }

    #[test]
    fn prop_truncated_reads_never_panic(
        data in prop::collection::vec(any::<u8>(), 0..64),
        version in version_strategy(),
    ) {
        let len = data.len();
        let mut cursor = ByteCursor::new(data, version);
        let _ = cursor.read_string();
        let _ = cursor.read_byte_array();
        let _ = cursor.read_var_long();
        let _ = cursor.read_packed_position();
        prop_assert!(cursor.position() <= len);
        prop_assert_eq!(cursor.position() + cursor.remaining(), len);
    }

    #[test]
    fn prop_frames_survive_compression(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..600), 1..8),
        threshold in prop_oneof![Just(-1), Just(0), Just(64), Just(256)],
    ) {
        let mut codec = FrameCodec::new();
        codec.set_compression_threshold(threshold);
        let mut wire = BytesMut::new();
        for payload in &payloads {
            codec.encode(payload, &mut wire).unwrap();
        }
        for payload in &payloads {
            let decoded = codec.decode(&mut wire).unwrap().unwrap();
            prop_assert_eq!(&decoded[..], &payload[..]);
        }
        prop_assert!(wire.is_empty());
    }
}
