//! Shared tree builders for the format tests.

use kbx_codec::{Document, EncodingType, Node, NodeValue, TypeId};

/// A tree touching every payload shape: structural nodes, attributes,
/// scalars, arrays, vectors, strings, and raw bytes.
pub fn sample_document() -> Document {
    let mut root = Node::structural("profile");
    root.push_attribute("schema", "v2");

    let mut identity = Node::structural("identity");
    identity.push_attribute("role", "primary");
    identity.children.push(Node::with_value(
        "label",
        NodeValue::scalar(TypeId::Str, b"alpha one".to_vec()),
    ));
    identity.children.push(Node::with_value(
        "id",
        NodeValue::scalar(TypeId::U32, vec![0x00, 0x01, 0xE2, 0x40]),
    ));
    root.children.push(identity);

    let mut stats = Node::structural("stats");
    stats.children.push(Node::with_value(
        "scores",
        NodeValue::array(TypeId::S16, 3, vec![0xFF, 0x9C, 0x00, 0x00, 0x00, 0x64]),
    ));
    stats.children.push(Node::with_value(
        "position",
        NodeValue::scalar(
            TypeId::FloatX3,
            [1.5f32, -2.0, 0.25]
                .iter()
                .flat_map(|v| v.to_be_bytes())
                .collect(),
        ),
    ));
    stats.children.push(Node::with_value(
        "flags",
        NodeValue::scalar(TypeId::Bool, vec![1]),
    ));
    root.children.push(stats);

    root.children.push(Node::with_value(
        "blob",
        NodeValue::scalar(TypeId::Bin, vec![0xDE, 0xAD, 0xBE, 0xEF]),
    ));
    root.children.push(Node::with_value(
        "addr",
        NodeValue::scalar(TypeId::Ip4, vec![10, 0, 0, 1]),
    ));

    Document::new(root, EncodingType::Utf8)
}

/// A minimal document: one structural root, no payloads.
pub fn empty_document() -> Document {
    Document::new(Node::structural("root"), EncodingType::Utf8)
}

/// A root with a single typed leaf.
pub fn leaf_document(name: &str, value: NodeValue) -> Document {
    let mut root = Node::structural("root");
    root.children.push(Node::with_value(name, value));
    Document::new(root, EncodingType::Utf8)
}
