//! Value compression: width-packed numeric payloads.

use crate::common::{leaf_document, sample_document};
use kbx_codec::{
    from_slice, to_binary_with_options, CompressionType, Document, EncodingType, KbxError, Node,
    NodeValue, Options, TypeId,
};

fn compressed_options() -> Options {
    let mut builder = Options::builder();
    builder
        .encoding(EncodingType::Utf8)
        .compression(CompressionType::Compressed);
    builder.build()
}

fn uncompressed_options() -> Options {
    Options::with_encoding(EncodingType::Utf8)
}

#[test]
fn small_u32_values_shrink() {
    let bytes: Vec<u8> = (0u32..64).flat_map(|v| v.to_be_bytes()).collect();
    let doc = leaf_document("xs", NodeValue::array(TypeId::U32, 64, bytes));

    let packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    let plain = to_binary_with_options(uncompressed_options(), &doc).unwrap();
    assert!(packed.len() < plain.len());
    assert_eq!(packed[0], 0xA1);

    let decoded = from_slice(&packed).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn negative_values_sign_extend_on_decode() {
    let values: [i32; 4] = [-1, -128, 127, -32768];
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
    let doc = leaf_document("xs", NodeValue::array(TypeId::S32, 4, bytes));

    let packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    assert_eq!(from_slice(&packed).unwrap(), doc);
}

#[test]
fn full_width_values_keep_the_indicator() {
    let doc = leaf_document(
        "x",
        NodeValue::scalar(TypeId::U32, 0xDEADBEEFu32.to_be_bytes().to_vec()),
    );
    let packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    let plain = to_binary_with_options(uncompressed_options(), &doc).unwrap();
    // One indicator byte, minus the alignment difference.
    assert_ne!(packed, plain);
    assert_eq!(from_slice(&packed).unwrap(), doc);
}

#[test]
fn time_values_are_packed_too() {
    let doc = leaf_document(
        "stamp",
        NodeValue::scalar(TypeId::Time, 86400u32.to_be_bytes().to_vec()),
    );
    let packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    assert_eq!(from_slice(&packed).unwrap(), doc);
}

#[test]
fn floats_and_strings_are_never_packed() {
    let mut root = Node::structural("root");
    root.children.push(Node::with_value(
        "f",
        NodeValue::scalar(TypeId::Float, 1.5f32.to_be_bytes().to_vec()),
    ));
    root.children.push(Node::with_value(
        "s",
        NodeValue::scalar(TypeId::Str, b"text".to_vec()),
    ));
    root.children.push(Node::with_value(
        "b",
        NodeValue::scalar(TypeId::U8, vec![200]),
    ));
    let doc = Document::new(root, EncodingType::Utf8);
    let packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    assert_eq!(from_slice(&packed).unwrap(), doc);
}

#[test]
fn whole_sample_round_trips_compressed() {
    let doc = sample_document();
    let packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    assert_eq!(from_slice(&packed).unwrap(), doc);
}

#[test]
fn bad_width_indicator_is_rejected() {
    let doc = leaf_document("count", NodeValue::scalar(TypeId::U32, vec![0, 0, 0, 42]));
    let mut packed = to_binary_with_options(compressed_options(), &doc).unwrap();
    // Data stream holds the indicator byte first; 5 exceeds the u32 width.
    let data_start = packed.len() - 2;
    assert_eq!(packed[data_start], 0x01);
    packed[data_start] = 0x05;
    assert!(matches!(
        from_slice(&packed),
        Err(KbxError::InvalidPackedWidth(5, _))
    ));
}
