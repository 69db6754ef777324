//! Document → markup serialization.

use crate::common::{leaf_document, sample_document};
use insta::assert_snapshot;
use kbx_codec::{to_text_xml, Document, EncodingType, Node, NodeValue, TypeId};

#[test]
fn sample_tree_serializes() {
    let xml = to_text_xml(&sample_document()).unwrap();
    assert_snapshot!(xml, @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <profile schema="v2">
      <identity role="primary">
        <label __type="str">alpha one</label>
        <id __type="u32">123456</id>
      </identity>
      <stats>
        <scores __type="s16" __count="3">-100 0 100</scores>
        <position __type="3f">1.5 -2 0.25</position>
        <flags __type="bool">1</flags>
      </stats>
      <blob __type="bin">deadbeef</blob>
      <addr __type="ip4">10.0.0.1</addr>
    </profile>
    "###);
}

#[test]
fn arrays_carry_count() {
    let doc = leaf_document(
        "xs",
        NodeValue::array(TypeId::U16, 3, vec![0, 1, 0, 2, 0, 3]),
    );
    let xml = to_text_xml(&doc).unwrap();
    assert!(xml.contains("<xs __type=\"u16\" __count=\"3\">1 2 3</xs>"));
}

#[test]
fn scalars_carry_no_count() {
    let doc = leaf_document("x", NodeValue::scalar(TypeId::U16, vec![0, 7]));
    let xml = to_text_xml(&doc).unwrap();
    assert!(xml.contains("<x __type=\"u16\">7</x>"));
    assert!(!xml.contains("__count"));
}

#[test]
fn none_encoding_omits_the_declaration_attribute() {
    let doc = Document::new(Node::structural("root"), EncodingType::None);
    let xml = to_text_xml(&doc).unwrap();
    assert_snapshot!(xml, @r###"
    <?xml version="1.0"?>
    <root/>
    "###);
}

#[test]
fn text_and_attributes_are_escaped() {
    let mut root = Node::structural("root");
    root.push_attribute("label", "a\"b<c");
    root.children.push(Node::with_value(
        "s",
        NodeValue::scalar(TypeId::Str, b"x < y & z".to_vec()),
    ));
    let doc = Document::new(root, EncodingType::Utf8);
    let xml = to_text_xml(&doc).unwrap();
    assert!(xml.contains("label=\"a&quot;b&lt;c\""));
    assert!(xml.contains(">x &lt; y &amp; z<"));
}

#[test]
fn string_nodes_with_children_stay_inline() {
    let mut text = Node::with_value("note", NodeValue::scalar(TypeId::Str, b"head".to_vec()));
    text.children.push(Node::with_value(
        "em",
        NodeValue::scalar(TypeId::Str, b"tail".to_vec()),
    ));
    let mut root = Node::structural("root");
    root.children.push(text);
    let doc = Document::new(root, EncodingType::Utf8);
    let xml = to_text_xml(&doc).unwrap();
    assert!(xml.contains("<note __type=\"str\">head<em __type=\"str\">tail</em></note>"));
}

#[test]
fn empty_string_self_closes() {
    let doc = leaf_document("s", NodeValue::scalar(TypeId::Str, Vec::new()));
    let xml = to_text_xml(&doc).unwrap();
    assert!(xml.contains("<s __type=\"str\"/>"));
}

#[test]
fn non_utf8_str_payload_is_reported() {
    let doc = leaf_document("s", NodeValue::scalar(TypeId::Str, vec![0xFF, 0xFE]));
    assert!(to_text_xml(&doc).is_err());
}
