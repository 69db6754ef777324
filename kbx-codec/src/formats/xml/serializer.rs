//! Document → XML markup.
//!
//! Output is pretty-printed with two-space indentation, except for
//! string-valued nodes that also carry children: those are written
//! inline so the value's text run stays exactly the value (the parser
//! reads only the first text run of a `str` node, and indentation after
//! a child element would otherwise bleed into it).

use crate::error::KbxError;
use crate::node::{Document, Node};
use crate::types::{self, TypeClass};

pub fn serialize_document(doc: &Document) -> Result<String, KbxError> {
    let mut out = String::new();
    match doc.encoding.name() {
        Some(name) => {
            out.push_str("<?xml version=\"1.0\" encoding=\"");
            out.push_str(name);
            out.push_str("\"?>\n");
        }
        None => out.push_str("<?xml version=\"1.0\"?>\n"),
    }
    write_node(&mut out, &doc.root, 0)?;
    Ok(out)
}

fn write_node(out: &mut String, node: &Node, depth: usize) -> Result<(), KbxError> {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);

    let inline = node
        .value
        .as_ref()
        .map(|v| v.type_id.descriptor().class == TypeClass::Text)
        .unwrap_or(false)
        && !node.children.is_empty();
    if inline {
        write_node_inline(out, node)?;
        out.push('\n');
        return Ok(());
    }

    let text = open_tag(out, node)?;
    if text.is_empty() && node.children.is_empty() {
        out.push_str("/>\n");
        return Ok(());
    }
    out.push('>');
    out.push_str(&text);
    if node.children.is_empty() {
        out.push_str("</");
        out.push_str(&node.name);
        out.push_str(">\n");
    } else {
        out.push('\n');
        for child in &node.children {
            write_node(out, child, depth + 1)?;
        }
        out.push_str(&indent);
        out.push_str("</");
        out.push_str(&node.name);
        out.push_str(">\n");
    }
    Ok(())
}

fn write_node_inline(out: &mut String, node: &Node) -> Result<(), KbxError> {
    let text = open_tag(out, node)?;
    if text.is_empty() && node.children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }
    out.push('>');
    out.push_str(&text);
    for child in &node.children {
        write_node_inline(out, child)?;
    }
    out.push_str("</");
    out.push_str(&node.name);
    out.push('>');
    Ok(())
}

/// Write `<name` plus attributes (no closing bracket) and return the
/// node's text form.
fn open_tag(out: &mut String, node: &Node) -> Result<String, KbxError> {
    out.push('<');
    out.push_str(&node.name);
    let mut text = String::new();
    if let Some(value) = &node.value {
        let desc = value.type_id.descriptor();
        out.push_str(" __type=\"");
        out.push_str(desc.name);
        out.push('"');
        if value.is_array {
            out.push_str(&format!(" __count=\"{}\"", value.array_len));
        }
        text = match desc.class {
            TypeClass::Text => {
                let raw = std::str::from_utf8(&value.bytes).map_err(|_| {
                    KbxError::InvalidText(format!("non-UTF-8 str payload in <{}>", node.name))
                })?;
                escape_xml(raw)
            }
            TypeClass::Bytes => types::to_hex(&value.bytes),
            _ => types::format_values(&desc, &value.bytes),
        };
    }
    for attribute in &node.attributes {
        out.push(' ');
        out.push_str(&attribute.name);
        out.push_str("=\"");
        out.push_str(&escape_xml(&attribute.value));
        out.push('"');
    }
    Ok(text)
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
