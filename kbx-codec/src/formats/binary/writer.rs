//! Encode direction: flatten the tree into the two streams.
//!
//! A single pre-order traversal (explicit stack, mirroring the decoder)
//! emits each node's structure record and payload, then closes it with
//! the terminator once its children are done. The finished streams are
//! then framed with the header and length prefixes.

use super::data::DataWriter;
use super::{compression_allowed, is_compressed, structure, Header};
use crate::error::KbxError;
use crate::node::{Document, Node};
use crate::options::Options;
use crate::stream::ByteWriter;

pub(crate) fn write_document(doc: &Document, options: &Options) -> Result<Vec<u8>, KbxError> {
    let compressed = is_compressed(options);
    if compressed && !compression_allowed(options.version) {
        return Err(KbxError::UnsupportedCompression);
    }
    let encoding = options
        .encoding
        .unwrap_or(crate::encoding::EncodingType::Utf8);

    let mut s = ByteWriter::new();
    let mut d = DataWriter::new(compressed, encoding);

    enum Task<'a> {
        Open(&'a Node),
        Close,
    }

    let mut path: Vec<&str> = Vec::new();
    let mut stack = vec![Task::Open(&doc.root)];
    while let Some(task) = stack.pop() {
        match task {
            Task::Open(node) => {
                structure::write_open(&mut s, node, encoding)?;
                path.push(&node.name);
                if let Some(value) = &node.value {
                    let rendered_path = format!("/{}", path.join("/"));
                    d.write_value(value, &rendered_path)?;
                }
                stack.push(Task::Close);
                for child in node.children.iter().rev() {
                    stack.push(Task::Open(child));
                }
            }
            Task::Close => {
                structure::write_close(&mut s);
                path.pop();
            }
        }
    }

    let mut out = ByteWriter::new();
    let header = Header {
        version: options.version,
        compressed,
        encoding,
    };
    header.write(&mut out);
    out.write_len_bytes(&s.into_inner())?;
    out.realign(4);
    out.write_len_bytes(&d.into_inner())?;
    Ok(out.into_inner())
}
