//! Structure-stream records.
//!
//! Per node, in order: a type byte (low six bits the tag, bit 6 the
//! array flag, bit 7 the attribute flag), the packed name (one-byte
//! character count plus the 6-bit run), a 32-bit element count when the
//! array flag is set, and a length-prefixed attribute block when the
//! attribute flag is set. Children follow depth-first; each node's child
//! list ends with the terminator byte 0xFF, which can never alias a
//! record byte because tag 0x3F is reserved.
//!
//! Attribute block contents, per attribute: packed name (count byte +
//! run), then a 32-bit length-prefixed value in the document encoding.

use crate::encoding::EncodingType;
use crate::error::KbxError;
use crate::node::{Attribute, Node};
use crate::sixbit;
use crate::stream::{ByteReader, ByteWriter};
use crate::types::TypeId;

/// Structural-only marker tag: a node holding children and/or
/// attributes, with no payload.
const NODE_START: u8 = 0x01;
/// End of the current node's children.
const TERMINATOR: u8 = 0xFF;

const ARRAY_FLAG: u8 = 0x40;
const ATTR_FLAG: u8 = 0x80;
const TAG_MASK: u8 = 0x3F;

/// One decoded structure-stream event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StructEvent {
    Open(NodeRecord),
    Close,
}

/// The skeleton of one node, before its payload is read.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeRecord {
    pub name: String,
    /// `None` marks a structural-only node.
    pub type_id: Option<TypeId>,
    pub is_array: bool,
    pub array_len: u32,
    pub attributes: Vec<Attribute>,
}

pub(crate) fn read_event(
    r: &mut ByteReader<'_>,
    encoding: EncodingType,
) -> Result<StructEvent, KbxError> {
    let type_byte = r.read_u8()?;
    if type_byte == TERMINATOR {
        return Ok(StructEvent::Close);
    }
    let tag = type_byte & TAG_MASK;
    let is_array = type_byte & ARRAY_FLAG != 0;
    let has_attributes = type_byte & ATTR_FLAG != 0;

    let type_id = if tag == NODE_START {
        if is_array {
            return Err(KbxError::UnknownType(format!(
                "record byte 0x{type_byte:02X} (array flag on a structural node)"
            )));
        }
        None
    } else {
        let id = TypeId::from_tag(tag)?;
        if is_array && !id.descriptor().array {
            return Err(KbxError::UnknownType(format!(
                "record byte 0x{type_byte:02X} (array flag on '{}')",
                id.descriptor().name
            )));
        }
        Some(id)
    };

    let name = read_name(r)?;
    let array_len = if is_array { r.read_u32()? } else { 1 };
    let attributes = if has_attributes {
        read_attributes(r, encoding)?
    } else {
        Vec::new()
    };

    Ok(StructEvent::Open(NodeRecord {
        name,
        type_id,
        is_array,
        array_len,
        attributes,
    }))
}

pub(crate) fn write_open(
    w: &mut ByteWriter,
    node: &Node,
    encoding: EncodingType,
) -> Result<(), KbxError> {
    let (tag, is_array) = match &node.value {
        None => (NODE_START, false),
        Some(value) => (value.type_id.tag(), value.is_array),
    };
    let mut type_byte = tag;
    if is_array {
        type_byte |= ARRAY_FLAG;
    }
    if !node.attributes.is_empty() {
        type_byte |= ATTR_FLAG;
    }
    w.write_u8(type_byte);
    write_name(w, &node.name)?;
    if is_array {
        // Scalar values never carry the count field.
        w.write_u32(node.value.as_ref().map(|v| v.array_len).unwrap_or(0));
    }
    if !node.attributes.is_empty() {
        write_attributes(w, &node.attributes, encoding)?;
    }
    Ok(())
}

pub(crate) fn write_close(w: &mut ByteWriter) {
    w.write_u8(TERMINATOR);
}

fn read_name(r: &mut ByteReader<'_>) -> Result<String, KbxError> {
    let chars = r.read_u8()? as usize;
    let packed = r.read_bytes(sixbit::packed_len(chars))?;
    sixbit::unpack(chars, packed)
}

fn write_name(w: &mut ByteWriter, name: &str) -> Result<(), KbxError> {
    let packed = sixbit::pack(name)?;
    w.write_u8(name.chars().count() as u8);
    w.write_bytes(&packed);
    Ok(())
}

fn read_attributes(
    r: &mut ByteReader<'_>,
    encoding: EncodingType,
) -> Result<Vec<Attribute>, KbxError> {
    let block = r.read_len_bytes()?;
    let mut sub = ByteReader::new(block);
    let mut attributes = Vec::new();
    while !sub.is_empty() {
        let name = read_name(&mut sub)?;
        let value = encoding.decode_text(sub.read_len_bytes()?)?;
        attributes.push(Attribute { name, value });
    }
    Ok(attributes)
}

fn write_attributes(
    w: &mut ByteWriter,
    attributes: &[Attribute],
    encoding: EncodingType,
) -> Result<(), KbxError> {
    let mut block = ByteWriter::new();
    for attribute in attributes {
        write_name(&mut block, &attribute.name)?;
        block.write_len_bytes(&encoding.encode_text(&attribute.value)?)?;
    }
    w.write_len_bytes(&block.into_inner())
}
