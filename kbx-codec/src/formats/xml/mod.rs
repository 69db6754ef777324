//! The XML markup form.
//!
//! Value nodes carry `__type` (and `__count` for arrays); structural
//! nodes carry neither. All other XML attributes map to the node's
//! attribute pairs. The declaration's encoding attribute records the
//! binary form's text-payload codec.

pub mod parser;
pub mod serializer;

use crate::error::KbxError;
use crate::format::Format;
use crate::node::Document;
use crate::options::Options;

/// The markup form as a [`Format`].
pub struct XmlFormat;

impl Format for XmlFormat {
    fn name(&self) -> &str {
        "xml"
    }

    fn description(&self) -> &str {
        "Textual tree markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn sniff(&self, data: &[u8]) -> bool {
        let head: &[u8] = match data.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(start) => &data[start..],
            None => return false,
        };
        head.starts_with(b"<?xml") || head.starts_with(b"<")
    }

    fn decode(&self, data: &[u8]) -> Result<Document, KbxError> {
        let source = std::str::from_utf8(data)
            .map_err(|_| KbxError::MalformedMarkup("markup is not valid UTF-8".to_string()))?;
        parser::parse_document(source)
    }

    fn encode(&self, doc: &Document, options: &Options) -> Result<Vec<u8>, KbxError> {
        // An explicit option overrides the document's declared encoding.
        let doc = match options.encoding {
            Some(encoding) if encoding != doc.encoding => Document {
                root: doc.root.clone(),
                encoding,
            },
            _ => return Ok(serializer::serialize_document(doc)?.into_bytes()),
        };
        Ok(serializer::serialize_document(&doc)?.into_bytes())
    }
}
