//! Binary form round trips: tree-level, byte-level, and wire layout.

use crate::common::{empty_document, leaf_document, sample_document};
use kbx_codec::{
    from_slice, to_binary, Document, EncodingType, KbxError, Node, NodeValue, TypeId,
};
use proptest::prelude::*;

#[test]
fn empty_structural_root_exact_bytes() {
    let bytes = to_binary(&empty_document()).unwrap();
    #[rustfmt::skip]
    let expected = vec![
        // header: revision 1, UTF-8, complement, reserved
        0xA0, 0xA0, 0x5F, 0x00,
        // structure stream length
        0x00, 0x00, 0x00, 0x06,
        // structural record for "root", then its terminator
        0x01, 0x04, 0xDB, 0x3C, 0xF8, 0xFF,
        // padding to a 4-byte boundary
        0x00, 0x00,
        // empty data stream
        0x00, 0x00, 0x00, 0x00,
    ];
    assert_eq!(bytes, expected);
}

#[test]
fn s32_leaf_exact_bytes() {
    let doc = leaf_document("count", NodeValue::scalar(TypeId::S32, vec![0, 0, 0, 42]));
    let bytes = to_binary(&doc).unwrap();
    #[rustfmt::skip]
    let expected = vec![
        0xA0, 0xA0, 0x5F, 0x00,
        0x00, 0x00, 0x00, 0x0D,
        // "root" structural record
        0x01, 0x04, 0xDB, 0x3C, 0xF8,
        // "count" s32 record
        0x06, 0x05, 0x9F, 0x3E, 0x72, 0xE0,
        // leaf terminator, root terminator
        0xFF, 0xFF,
        // padding to a 4-byte boundary
        0x00, 0x00, 0x00,
        // data stream: one big-endian s32
        0x00, 0x00, 0x00, 0x04,
        0x00, 0x00, 0x00, 0x2A,
    ];
    assert_eq!(bytes, expected);
}

#[test]
fn sample_tree_round_trips() {
    let doc = sample_document();
    let bytes = to_binary(&doc).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn bytes_round_trip_byte_for_byte() {
    let bytes = to_binary(&sample_document()).unwrap();
    let decoded = from_slice(&bytes).unwrap();
    assert_eq!(to_binary(&decoded).unwrap(), bytes);
}

#[test]
fn one_element_array_stays_an_array() {
    let doc = leaf_document("xs", NodeValue::array(TypeId::U16, 1, vec![0, 7]));
    let decoded = from_slice(&to_binary(&doc).unwrap()).unwrap();
    let value = decoded.root.children[0].value.as_ref().unwrap();
    assert!(value.is_array);
    assert_eq!(value.array_len, 1);
}

#[test]
fn attributes_survive_in_order() {
    let mut root = Node::structural("root");
    root.push_attribute("zeta", "last");
    root.push_attribute("alpha", "first");
    let doc = Document::new(root, EncodingType::Utf8);
    let decoded = from_slice(&to_binary(&doc).unwrap()).unwrap();
    assert_eq!(decoded.root.attributes.len(), 2);
    assert_eq!(decoded.root.attributes[0].name, "zeta");
    assert_eq!(decoded.root.attributes[1].name, "alpha");
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = to_binary(&empty_document()).unwrap();
    bytes.push(0x00);
    assert!(matches!(
        from_slice(&bytes),
        Err(KbxError::TrailingData(_))
    ));
}

#[test]
fn truncated_input_is_rejected() {
    let bytes = to_binary(&sample_document()).unwrap();
    for len in [0, 3, 7, bytes.len() - 1] {
        assert!(matches!(
            from_slice(&bytes[..len]),
            Err(KbxError::TruncatedInput { .. })
        ));
    }
}

#[test]
fn shift_jis_document_round_trips() {
    let mut root = Node::structural("root");
    root.push_attribute("label", "値");
    root.children.push(Node::with_value(
        "name",
        NodeValue::scalar(TypeId::Str, "日本語".as_bytes().to_vec()),
    ));
    let doc = Document::new(root, EncodingType::ShiftJis);
    let bytes = to_binary(&doc).unwrap();
    assert_eq!(bytes[1], 0x80);
    assert_eq!(from_slice(&bytes).unwrap(), doc);
}

fn arb_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9A-Z_a-z]{1,12}").unwrap()
}

fn arb_leaf() -> impl Strategy<Value = Node> {
    (arb_name(), proptest::collection::vec(any::<u32>(), 1..5)).prop_map(|(name, values)| {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        Node::with_value(
            name,
            NodeValue::array(TypeId::U32, values.len() as u32, bytes),
        )
    })
}

fn arb_tree() -> impl Strategy<Value = Node> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        (arb_name(), proptest::collection::vec(inner, 0..4)).prop_map(|(name, children)| {
            let mut node = Node::structural(name);
            node.children = children;
            node
        })
    })
}

proptest! {
    #[test]
    fn random_trees_round_trip(root in arb_tree()) {
        let doc = Document::new(root, EncodingType::Utf8);
        let bytes = to_binary(&doc).unwrap();
        prop_assert_eq!(from_slice(&bytes).unwrap(), doc);
    }
}
