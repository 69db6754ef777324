//! Lossless conversion between the kbx binary tree format and its XML markup form
//!
//!     This crate converts bidirectionally between a compact binary tree
//!     serialization ("binary form") and a textual tree representation
//!     ("markup form"), preserving tag names, attributes, typed
//!     scalar/array values, and the text encoding choice.
//!
//! Architecture
//!
//!     Both formats convert through a single owned tree (see ./node.rs):
//!     the binary reader and the markup parser each build one, the
//!     binary writer and the markup serializer each consume one. The
//!     heavy lifting lives in the binary format: two interleaved wire
//!     streams (the structure stream holds the tree skeleton, the data
//!     stream the raw payloads) advanced in lock-step by one traversal.
//!
//!     This is a pure lib: it powers the kbx CLI but is shell agnostic —
//!     no printing, no env vars, no file I/O. Every conversion call is a
//!     synchronous computation over exclusively owned input; the only
//!     shared state is the immutable catalogs, so calls may run
//!     concurrently with no coordination.
//!
//!     The file structure:
//!     .
//!     ├── error.rs                # KbxError taxonomy
//!     ├── node.rs                 # The document tree
//!     ├── encoding.rs             # Encoding catalog + text transcoding
//!     ├── types.rs                # Value-type catalog + text forms
//!     ├── sixbit.rs               # 6-bit name packing
//!     ├── stream.rs               # Byte cursors (big-endian, aligned)
//!     ├── options.rs              # Encode options
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery
//!     ├── formats
//!     │   ├── binary              # Wire reader/writer, two streams
//!     │   └── xml                 # roxmltree parser + serializer
//!     └── lib.rs
//!
//! Library Choices
//!
//!     XML parsing is offloaded to roxmltree; only the tree mapping is
//!     ours. Legacy CJK text codecs come from encoding_rs. The binary
//!     wire format has no third-party equivalent and is implemented
//!     here in full.

pub mod encoding;
pub mod error;
pub mod format;
pub mod formats;
pub mod node;
pub mod options;
pub mod registry;
pub mod sixbit;
pub mod stream;
pub mod types;

pub use encoding::EncodingType;
pub use error::KbxError;
pub use format::Format;
pub use formats::binary::{binary_info, BinaryFormat, BinaryInfo};
pub use formats::xml::XmlFormat;
pub use node::{Attribute, Document, Node, NodeValue};
pub use options::{CompressionType, FormatVersion, Options};
pub use registry::FormatRegistry;
pub use types::{TypeDescriptor, TypeId};

/// Parse the binary form into a document.
pub fn from_slice(data: &[u8]) -> Result<Document, KbxError> {
    BinaryFormat.decode(data)
}

/// Parse markup text into a document. The declaration's encoding
/// attribute (if any) becomes the document encoding.
pub fn from_text_xml(source: &str) -> Result<Document, KbxError> {
    formats::xml::parser::parse_document(source)
}

/// Serialize a document to the binary form with default options,
/// keeping the document's own encoding.
pub fn to_binary(doc: &Document) -> Result<Vec<u8>, KbxError> {
    to_binary_with_options(Options::with_encoding(doc.encoding), doc)
}

/// Serialize a document to the binary form.
pub fn to_binary_with_options(options: Options, doc: &Document) -> Result<Vec<u8>, KbxError> {
    BinaryFormat.encode(doc, &options)
}

/// Serialize a document to markup text.
pub fn to_text_xml(doc: &Document) -> Result<String, KbxError> {
    formats::xml::serializer::serialize_document(doc)
}

/// Binary form → markup text plus the document's encoding.
pub fn decode(data: &[u8]) -> Result<(String, EncodingType), KbxError> {
    let doc = from_slice(data)?;
    Ok((to_text_xml(&doc)?, doc.encoding))
}

/// Markup text → binary form. An explicit hint overrides the
/// declaration's encoding.
pub fn encode(source: &str, encoding: Option<EncodingType>) -> Result<Vec<u8>, KbxError> {
    let mut doc = from_text_xml(source)?;
    if let Some(encoding) = encoding {
        doc.encoding = encoding;
    }
    to_binary(&doc)
}
