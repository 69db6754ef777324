//! Format trait definition
//!
//! Both concrete formats (the binary form and the XML markup form)
//! implement this trait, giving callers and the CLI a uniform
//! decode/encode seam. Input and output are byte slices because one side
//! of the pair is binary; the markup format treats its bytes as UTF-8.

use crate::error::KbxError;
use crate::node::Document;
use crate::options::Options;

/// Trait for document formats
///
/// Implementors provide bidirectional conversion between a serialized
/// byte form and the [`Document`] tree.
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "binary", "xml")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading
    /// dot. Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether `data` looks like this format. Used as a fallback when
    /// extension detection fails; must be cheap and must not allocate.
    fn sniff(&self, _data: &[u8]) -> bool {
        false
    }

    /// Decode serialized bytes into a Document
    fn decode(&self, data: &[u8]) -> Result<Document, KbxError>;

    /// Encode a Document into serialized bytes
    fn encode(&self, doc: &Document, options: &Options) -> Result<Vec<u8>, KbxError>;
}
