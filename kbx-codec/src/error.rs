//! Error types for codec operations

use std::fmt;

/// Errors that can occur while converting between the binary and markup forms.
///
/// Every failure is terminal for the call that produced it: the codec never
/// retries and never returns a partially built tree. Variants carry either a
/// byte offset (stream-level failures) or a node path such as
/// `/root/items/count` (tree-level failures) so callers can diagnose bad input.
#[derive(Debug, Clone, PartialEq)]
pub enum KbxError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Encoding byte or declaration name outside the catalog
    UnknownEncoding(String),
    /// Type tag or `__type` name outside the catalog
    UnknownType(String),
    /// Tag or attribute name containing a character outside the 6-bit alphabet
    InvalidNameCharacter(String, char),
    /// A boolean payload byte other than 0 or 1
    InvalidBoolean(u8, String),
    /// The input buffer ended before a read completed
    TruncatedInput { offset: usize, needed: usize },
    /// Bad signature or failed encoding-complement self-check
    HeaderMismatch(String),
    /// A length or count that does not fit its field
    ValueTooLarge(String),
    /// Compression requested under a format revision that predates it
    UnsupportedCompression,
    /// A bytes-per-element indicator of zero or wider than the element
    InvalidPackedWidth(u8, String),
    /// Bytes left over past the advertised streams
    TrailingData(usize),
    /// Text that cannot be represented in the chosen encoding
    InvalidText(String),
    /// Error from the markup-form parser boundary
    MalformedMarkup(String),
}

impl fmt::Display for KbxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KbxError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            KbxError::UnknownEncoding(what) => write!(f, "Unknown encoding {what}"),
            KbxError::UnknownType(what) => write!(f, "Unknown value type {what}"),
            KbxError::InvalidNameCharacter(name, ch) => {
                write!(f, "Name '{name}' contains unpackable character {ch:?}")
            }
            KbxError::InvalidBoolean(byte, path) => {
                write!(f, "Invalid boolean byte 0x{byte:02X} at {path}")
            }
            KbxError::TruncatedInput { offset, needed } => {
                write!(f, "Input truncated at offset {offset} ({needed} more bytes needed)")
            }
            KbxError::HeaderMismatch(reason) => write!(f, "Header mismatch: {reason}"),
            KbxError::ValueTooLarge(what) => write!(f, "Value too large: {what}"),
            KbxError::UnsupportedCompression => {
                write!(f, "Value compression is not supported by the selected format revision")
            }
            KbxError::InvalidPackedWidth(width, path) => {
                write!(f, "Invalid packed element width {width} at {path}")
            }
            KbxError::TrailingData(offset) => {
                write!(f, "Trailing data past the advertised streams at offset {offset}")
            }
            KbxError::InvalidText(what) => {
                write!(f, "Text not representable: {what}")
            }
            KbxError::MalformedMarkup(msg) => write!(f, "Malformed markup: {msg}"),
        }
    }
}

impl std::error::Error for KbxError {}
