//! Decode direction: rebuild the tree from the two streams.
//!
//! The structure and data cursors advance in lock-step over a single
//! traversal driven by an explicit stack, so arbitrarily deep trees
//! cannot overflow the call stack. Decoding either completes with a
//! fully reconstructed document or fails; a partial tree is never
//! returned.

use super::data::DataReader;
use super::structure::{self, NodeRecord, StructEvent};
use super::Header;
use crate::error::KbxError;
use crate::node::{Document, Node, NodeValue};
use crate::stream::ByteReader;

pub(crate) fn read_document(data: &[u8]) -> Result<Document, KbxError> {
    let mut r = ByteReader::new(data);
    let header = Header::read(&mut r)?;
    let structure_bytes = r.read_len_bytes()?;
    r.realign(4)?;
    let data_bytes = r.read_len_bytes()?;
    if !r.is_empty() {
        return Err(KbxError::TrailingData(r.position()));
    }

    let mut s = ByteReader::new(structure_bytes);
    let mut d = DataReader::new(data_bytes, header.compressed, header.encoding);

    let root_record = match structure::read_event(&mut s, header.encoding)? {
        StructEvent::Open(record) => record,
        StructEvent::Close => {
            return Err(KbxError::TruncatedInput {
                offset: 0,
                needed: 1,
            })
        }
    };

    // Stack of open nodes; `path` mirrors it for error context.
    let mut path: Vec<String> = vec![root_record.name.clone()];
    let mut stack: Vec<Node> = vec![materialize(root_record, &mut d, &path)?];

    loop {
        match structure::read_event(&mut s, header.encoding)? {
            StructEvent::Open(record) => {
                path.push(record.name.clone());
                let node = materialize(record, &mut d, &path)?;
                stack.push(node);
            }
            StructEvent::Close => {
                let node = match stack.pop() {
                    Some(node) => node,
                    None => return Err(KbxError::TrailingData(s.position())),
                };
                path.pop();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => {
                        // Root terminator: both streams must be spent.
                        if !s.is_empty() {
                            return Err(KbxError::TrailingData(s.position()));
                        }
                        if !d.is_empty() {
                            return Err(KbxError::TrailingData(d.position()));
                        }
                        return Ok(Document::new(node, header.encoding));
                    }
                }
            }
        }
    }
}

fn materialize(
    record: NodeRecord,
    d: &mut DataReader<'_>,
    path: &[String],
) -> Result<Node, KbxError> {
    let value = match record.type_id {
        None => None,
        Some(type_id) => {
            let rendered_path = format!("/{}", path.join("/"));
            let bytes = d.read_value(type_id, record.array_len, &rendered_path)?;
            Some(NodeValue {
                type_id,
                is_array: record.is_array,
                array_len: record.array_len,
                bytes,
            })
        }
    };
    Ok(Node {
        name: record.name,
        value,
        attributes: record.attributes,
        children: Vec::new(),
    })
}
