use bytes::{BufMut, BytesMut};
use mcj_command::{CommandError, DeclareCommands, ParserRegistry};
use mcj_proto::codec::{put_string, put_var_int};
use mcj_proto::version::{V_1_13_2, V_1_20};
use mcj_proto::{ByteCursor, ProtocolVersion};
use proptest::prelude::*;

/// Root followed by a chain of literals, each the only child of the last.
fn chain(names: &[String]) -> BytesMut {
    let mut buf = BytesMut::new();
    put_var_int(&mut buf, names.len() as i32 + 1);
    for index in 0..=names.len() {
        buf.put_u8(if index == 0 { 0x00 } else { 0x01 });
        if index < names.len() {
            put_var_int(&mut buf, 1);
            put_var_int(&mut buf, index as i32 + 1);
        } else {
            put_var_int(&mut buf, 0);
        }
        if index > 0 {
            put_string(&mut buf, &names[index - 1]).unwrap();
        }
    }
    put_var_int(&mut buf, 0);
    buf
}

proptest! {
    #[test]
    fn literal_chain_is_walkable(names in prop::collection::vec("[a-z]{1,12}", 1..16)) {
        let version = ProtocolVersion(V_1_13_2);
        let mut cursor = ByteCursor::new(chain(&names).freeze(), version);
        let packet = DeclareCommands::decode(&mut cursor, &ParserRegistry::new()).unwrap();
        let path: Vec<&str> = names.iter().map(String::as_str).collect();
        let leaf = packet.graph.find_path(&path).unwrap();
        prop_assert_eq!(leaf.index(), names.len());
        prop_assert_eq!(leaf.name(), names.last().map(String::as_str));
    }

    #[test]
    fn out_of_range_child_is_rejected(count in 1i32..32, extra in 0i32..8) {
        let version = ProtocolVersion(V_1_20);
        let mut buf = BytesMut::new();
        put_var_int(&mut buf, count);
        for _ in 0..count {
            buf.put_u8(0x00);
            put_var_int(&mut buf, 1);
            put_var_int(&mut buf, count + extra);
        }
        put_var_int(&mut buf, 0);
        let mut cursor = ByteCursor::new(buf.freeze(), version);
        let is_out_of_range = matches!(
            DeclareCommands::decode(&mut cursor, &ParserRegistry::new()),
            Err(CommandError::IndexOutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut cursor = ByteCursor::new(bytes, ProtocolVersion(V_1_20));
        let _ = DeclareCommands::decode(&mut cursor, &ParserRegistry::new());
    }
}
