//! XML markup → Document.
//!
//! The XML declaration's encoding attribute names the *binary* text
//! codec, not the encoding of the markup itself (the markup is always
//! UTF-8 in memory), so the declaration is scanned here before the body
//! is handed to roxmltree. A missing declaration or one without an
//! encoding attribute maps to `EncodingType::None`.

use crate::encoding::EncodingType;
use crate::error::KbxError;
use crate::node::{Attribute, Document, Node, NodeValue};
use crate::types::{self, TypeClass, TypeId};
use roxmltree::{Node as XmlNode, NodeType};

pub fn parse_document(source: &str) -> Result<Document, KbxError> {
    let (encoding, body) = split_declaration(source)?;
    let xml = roxmltree::Document::parse(body)
        .map_err(|e| KbxError::MalformedMarkup(format!("XML parsing error: {e}")))?;
    let mut path = Vec::new();
    let root = build_node(xml.root_element(), &mut path)?;
    Ok(Document::new(root, encoding))
}

/// Split off the `<?xml ...?>` declaration, resolving its encoding
/// attribute against the catalog.
fn split_declaration(source: &str) -> Result<(EncodingType, &str), KbxError> {
    let trimmed = source.trim_start();
    if !trimmed.starts_with("<?xml") {
        return Ok((EncodingType::None, source));
    }
    let end = trimmed.find("?>").ok_or_else(|| {
        KbxError::MalformedMarkup("unterminated XML declaration".to_string())
    })?;
    let declaration = &trimmed[..end];
    let body = &trimmed[end + 2..];
    let encoding = match declaration_attribute(declaration, "encoding") {
        None => EncodingType::None,
        Some(name) => EncodingType::parse_name(name)
            .ok_or_else(|| KbxError::UnknownEncoding(format!("declaration '{name}'")))?,
    };
    Ok((encoding, body))
}

fn declaration_attribute<'a>(declaration: &'a str, key: &str) -> Option<&'a str> {
    let start = declaration.find(key)? + key.len();
    let rest = declaration[start..].trim_start().strip_prefix('=')?;
    let rest = rest.trim_start();
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &rest[1..];
    rest.find(quote).map(|end| &rest[..end])
}

fn build_node(el: XmlNode<'_, '_>, path: &mut Vec<String>) -> Result<Node, KbxError> {
    let name = el.tag_name().name().to_string();
    path.push(name.clone());
    let rendered = format!("/{}", path.join("/"));

    let mut attributes = Vec::new();
    let mut type_name = None;
    let mut count_attr = None;
    for attr in el.attributes() {
        match attr.name() {
            "__type" => type_name = Some(attr.value()),
            "__count" => count_attr = Some(attr.value()),
            _ => attributes.push(Attribute {
                name: attr.name().to_string(),
                value: attr.value().to_string(),
            }),
        }
    }

    let value = match type_name {
        None => {
            if count_attr.is_some() {
                return Err(KbxError::MalformedMarkup(format!(
                    "__count without __type at {rendered}"
                )));
            }
            None
        }
        Some(type_name) => Some(parse_value(el, type_name, count_attr, &rendered)?),
    };

    let mut children = Vec::new();
    for child in el.children() {
        if child.node_type() == NodeType::Element {
            children.push(build_node(child, path)?);
        }
    }
    path.pop();

    Ok(Node {
        name,
        value,
        attributes,
        children,
    })
}

fn parse_value(
    el: XmlNode<'_, '_>,
    type_name: &str,
    count_attr: Option<&str>,
    path: &str,
) -> Result<NodeValue, KbxError> {
    let type_id = TypeId::from_name(type_name)?;
    let desc = type_id.descriptor();
    match desc.class {
        TypeClass::Text => {
            if count_attr.is_some() {
                return Err(KbxError::MalformedMarkup(format!(
                    "__count on '{type_name}' at {path}"
                )));
            }
            // Only the first text run belongs to the value; anything after
            // a child element is formatting whitespace.
            let text = first_text(el);
            Ok(NodeValue::scalar(type_id, text.to_string().into_bytes()))
        }
        TypeClass::Bytes => {
            if count_attr.is_some() {
                return Err(KbxError::MalformedMarkup(format!(
                    "__count on '{type_name}' at {path}"
                )));
            }
            let text = joined_text(el);
            Ok(NodeValue::scalar(type_id, types::from_hex(text.trim())?))
        }
        _ => {
            let (is_array, array_len) = match count_attr {
                None => (false, 1u32),
                Some(count) => {
                    if !desc.array {
                        return Err(KbxError::MalformedMarkup(format!(
                            "__count on '{type_name}' at {path}"
                        )));
                    }
                    let parsed: u32 = count.parse().map_err(|_| {
                        KbxError::MalformedMarkup(format!(
                            "invalid __count '{count}' at {path}"
                        ))
                    })?;
                    (true, parsed)
                }
            };
            let text = joined_text(el);
            let tokens: Vec<&str> = text.split_whitespace().collect();
            let expected = desc.count * array_len as usize;
            if tokens.len() != expected {
                return Err(KbxError::MalformedMarkup(format!(
                    "expected {expected} '{type_name}' values at {path}, found {}",
                    tokens.len()
                )));
            }
            let bytes = types::parse_tokens(&desc, &tokens, path)?;
            Ok(NodeValue {
                type_id,
                is_array,
                array_len,
                bytes,
            })
        }
    }
}

fn first_text<'a>(el: XmlNode<'a, '_>) -> &'a str {
    el.children()
        .find(|n| n.node_type() == NodeType::Text)
        .and_then(|n| n.text())
        .unwrap_or("")
}

fn joined_text(el: XmlNode<'_, '_>) -> String {
    let mut parts = Vec::new();
    for child in el.children() {
        if child.node_type() == NodeType::Text {
            if let Some(text) = child.text() {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}
