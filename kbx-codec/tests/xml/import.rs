//! Markup → Document parsing.

use crate::common::sample_document;
use kbx_codec::{from_text_xml, to_text_xml, EncodingType, KbxError, TypeId};

#[test]
fn serialized_sample_parses_back_identically() {
    let doc = sample_document();
    let xml = to_text_xml(&doc).unwrap();
    assert_eq!(from_text_xml(&xml).unwrap(), doc);
}

#[test]
fn canonical_markup_is_stable() {
    let xml = to_text_xml(&sample_document()).unwrap();
    let reparsed = from_text_xml(&xml).unwrap();
    assert_eq!(to_text_xml(&reparsed).unwrap(), xml);
}

#[test]
fn declaration_encoding_names_are_flexible() {
    for name in ["SHIFT_JIS", "Shift-JIS", "shift-jis", "sjis"] {
        let xml = format!("<?xml version=\"1.0\" encoding=\"{name}\"?><root/>");
        let doc = from_text_xml(&xml).unwrap();
        assert_eq!(doc.encoding, EncodingType::ShiftJis, "for {name}");
    }
}

#[test]
fn missing_declaration_means_no_encoding() {
    let doc = from_text_xml("<root/>").unwrap();
    assert_eq!(doc.encoding, EncodingType::None);

    let doc = from_text_xml("<?xml version=\"1.0\"?><root/>").unwrap();
    assert_eq!(doc.encoding, EncodingType::None);
}

#[test]
fn unknown_declaration_encoding_fails() {
    let xml = "<?xml version=\"1.0\" encoding=\"KOI8-R\"?><root/>";
    assert!(matches!(
        from_text_xml(xml),
        Err(KbxError::UnknownEncoding(_))
    ));
}

#[test]
fn unknown_type_name_fails() {
    let xml = "<root><x __type=\"s128\">1</x></root>";
    assert!(matches!(from_text_xml(xml), Err(KbxError::UnknownType(_))));
}

#[test]
fn count_without_type_fails() {
    let xml = "<root><x __count=\"3\"/></root>";
    assert!(matches!(
        from_text_xml(xml),
        Err(KbxError::MalformedMarkup(_))
    ));
}

#[test]
fn count_on_str_fails() {
    let xml = "<root><x __type=\"str\" __count=\"2\">ab</x></root>";
    assert!(matches!(
        from_text_xml(xml),
        Err(KbxError::MalformedMarkup(_))
    ));
}

#[test]
fn token_count_must_match() {
    let xml = "<root><xs __type=\"u16\" __count=\"3\">1 2</xs></root>";
    assert!(matches!(
        from_text_xml(xml),
        Err(KbxError::MalformedMarkup(_))
    ));

    let xml = "<root><v __type=\"3f\">1 2</v></root>";
    assert!(matches!(
        from_text_xml(xml),
        Err(KbxError::MalformedMarkup(_))
    ));
}

#[test]
fn out_of_range_values_fail() {
    for xml in [
        "<root><x __type=\"u8\">256</x></root>",
        "<root><x __type=\"s8\">-129</x></root>",
        "<root><x __type=\"bool\">2</x></root>",
    ] {
        assert!(matches!(
            from_text_xml(xml),
            Err(KbxError::MalformedMarkup(_))
        ));
    }
}

#[test]
fn str_value_is_the_first_text_run() {
    let xml = "<root><s __type=\"str\">first<c/>second</s></root>";
    let doc = from_text_xml(xml).unwrap();
    let node = &doc.root.children[0];
    assert_eq!(node.value.as_ref().unwrap().bytes, b"first");
    assert_eq!(node.children.len(), 1);
    assert_eq!(node.children[0].name, "c");
}

#[test]
fn numeric_arrays_may_wrap_lines() {
    let xml = "<root><xs __type=\"u8\" __count=\"4\">1 2\n      3 4</xs></root>";
    let doc = from_text_xml(xml).unwrap();
    let value = doc.root.children[0].value.as_ref().unwrap();
    assert_eq!(value.bytes, vec![1, 2, 3, 4]);
    assert!(value.is_array);
}

#[test]
fn entities_are_unescaped() {
    let xml = "<root a=\"x&quot;y\"><s __type=\"str\">a &amp; b</s></root>";
    let doc = from_text_xml(xml).unwrap();
    assert_eq!(doc.root.attributes[0].value, "x\"y");
    assert_eq!(doc.root.children[0].value.as_ref().unwrap().bytes, b"a & b");
}

#[test]
fn bin_payloads_parse_from_hex() {
    let xml = "<root><b __type=\"bin\">DeadBeef</b></root>";
    let doc = from_text_xml(xml).unwrap();
    let value = doc.root.children[0].value.as_ref().unwrap();
    assert_eq!(value.type_id, TypeId::Bin);
    assert_eq!(value.bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);

    let xml = "<root><b __type=\"bin\">abc</b></root>";
    assert!(matches!(
        from_text_xml(xml),
        Err(KbxError::MalformedMarkup(_))
    ));
}

#[test]
fn reserved_attributes_never_become_plain_attributes() {
    let xml = "<root><x __type=\"u8\" id=\"k\">7</x></root>";
    let doc = from_text_xml(xml).unwrap();
    let node = &doc.root.children[0];
    assert_eq!(node.attributes.len(), 1);
    assert_eq!(node.attributes[0].name, "id");
}

#[test]
fn malformed_xml_is_reported() {
    assert!(matches!(
        from_text_xml("<root><unclosed></root>"),
        Err(KbxError::MalformedMarkup(_))
    ));
}
