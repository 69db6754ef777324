//! Core data structures for the document tree.
//!
//! The tree is the common representation both formats convert through:
//! the binary reader and the markup parser each build one, the binary
//! writer and the markup serializer each consume one. Parents own their
//! children exclusively; there are no back-pointers, so error reporting
//! threads an explicit path through traversals instead.

use crate::encoding::EncodingType;
use crate::types::TypeId;

/// One element of the tree.
///
/// A node with `value: None` is structural-only: it exists to hold
/// children and/or attributes and contributes nothing to the data stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Tag name, restricted to the 64-symbol packable alphabet.
    pub name: String,
    /// Typed payload, or `None` for structural-only nodes.
    pub value: Option<NodeValue>,
    /// Ordered name/value attribute pairs.
    pub attributes: Vec<Attribute>,
    /// Ordered children, exclusively owned.
    pub children: Vec<Node>,
}

/// A typed scalar or array payload.
///
/// `bytes` holds the canonical big-endian payload, exactly
/// `size × count × array_len` bytes for fixed-width types. `Str` payloads
/// are kept as UTF-8 here and transcoded to the document encoding only at
/// the binary boundary, so the same tree can be re-encoded under a
/// different encoding. `is_array` is kept separate from `array_len` so a
/// one-element array survives round trips byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeValue {
    pub type_id: TypeId,
    pub is_array: bool,
    pub array_len: u32,
    pub bytes: Vec<u8>,
}

/// A single attribute: free-form text metadata attached to a node.
///
/// Attribute names share the tag-name alphabet (they are 6-bit packed on
/// the wire); values are arbitrary text in the document encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A complete document: the root node plus the text-payload encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
    pub encoding: EncodingType,
}

impl Node {
    /// Create a structural-only node with no payload.
    pub fn structural(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a value-bearing leaf node.
    pub fn with_value(name: impl Into<String>, value: NodeValue) -> Self {
        Node {
            name: name.into(),
            value: Some(value),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute, preserving order.
    pub fn push_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }
}

impl NodeValue {
    /// A scalar value of the given type.
    pub fn scalar(type_id: TypeId, bytes: Vec<u8>) -> Self {
        NodeValue {
            type_id,
            is_array: false,
            array_len: 1,
            bytes,
        }
    }

    /// An array value of the given type.
    pub fn array(type_id: TypeId, array_len: u32, bytes: Vec<u8>) -> Self {
        NodeValue {
            type_id,
            is_array: true,
            array_len,
            bytes,
        }
    }

    /// Expected payload byte length for fixed-width types.
    ///
    /// Dynamic types (`bin`, `str`) have no expected length; their payload
    /// is whatever the length prefix says.
    pub fn expected_len(&self) -> Option<usize> {
        let desc = self.type_id.descriptor();
        if desc.count == 0 {
            None
        } else {
            Some(desc.size * desc.count * self.array_len as usize)
        }
    }
}

impl Document {
    pub fn new(root: Node, encoding: EncodingType) -> Self {
        Document { root, encoding }
    }
}
