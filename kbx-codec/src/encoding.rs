//! Encoding catalog: the fixed table of text-payload encodings.
//!
//! Tag and attribute names never pass through here (those are always
//! 6-bit packed); this catalog only governs string payloads and
//! attribute values on the wire. The byte-to-codec mapping below is the
//! classic table (0x40 = ISO-8859-1, 0x60 = EUC-JP, 0x80 = Shift_JIS,
//! 0xA0 = UTF-8); it lives in the two `match` tables here so a future
//! format revision can swap the mapping without touching callers.

use crate::error::KbxError;
use serde::{Deserialize, Serialize};

/// One entry of the encoding catalog.
///
/// `None` is a pass-through: documents tagged with it decode and encode
/// their text as UTF-8, the codec's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingType {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
    #[serde(rename = "euc-jp")]
    EucJp,
    #[serde(rename = "shift-jis")]
    ShiftJis,
    #[serde(rename = "utf-8")]
    Utf8,
}

impl EncodingType {
    /// Resolve an encoding byte from a binary header.
    pub fn from_byte(byte: u8) -> Result<Self, KbxError> {
        match byte {
            0x00 => Ok(EncodingType::None),
            0x20 => Ok(EncodingType::Ascii),
            0x40 => Ok(EncodingType::Iso8859_1),
            0x60 => Ok(EncodingType::EucJp),
            0x80 => Ok(EncodingType::ShiftJis),
            0xA0 => Ok(EncodingType::Utf8),
            other => Err(KbxError::UnknownEncoding(format!("byte 0x{other:02X}"))),
        }
    }

    /// The byte tag written into binary headers.
    pub fn to_byte(self) -> u8 {
        match self {
            EncodingType::None => 0x00,
            EncodingType::Ascii => 0x20,
            EncodingType::Iso8859_1 => 0x40,
            EncodingType::EucJp => 0x60,
            EncodingType::ShiftJis => 0x80,
            EncodingType::Utf8 => 0xA0,
        }
    }

    /// Canonical label used in the XML declaration. `None` has no label;
    /// documents tagged with it omit the declaration's encoding attribute.
    pub fn name(self) -> Option<&'static str> {
        match self {
            EncodingType::None => None,
            EncodingType::Ascii => Some("ASCII"),
            EncodingType::Iso8859_1 => Some("ISO-8859-1"),
            EncodingType::EucJp => Some("EUC-JP"),
            EncodingType::ShiftJis => Some("SHIFT_JIS"),
            EncodingType::Utf8 => Some("UTF-8"),
        }
    }

    /// Resolve a declaration label, case-insensitively, accepting the
    /// usual hyphen/underscore spelling variants.
    pub fn parse_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "none" => Some(EncodingType::None),
            "ascii" | "usascii" => Some(EncodingType::Ascii),
            "iso88591" | "latin1" => Some(EncodingType::Iso8859_1),
            "eucjp" => Some(EncodingType::EucJp),
            "shiftjis" | "sjis" => Some(EncodingType::ShiftJis),
            "utf8" => Some(EncodingType::Utf8),
            _ => None,
        }
    }

    /// Decode wire bytes into text.
    pub fn decode_text(self, bytes: &[u8]) -> Result<String, KbxError> {
        match self {
            EncodingType::None | EncodingType::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|_| KbxError::InvalidText("invalid UTF-8 payload".to_string())),
            EncodingType::Ascii => {
                if let Some(byte) = bytes.iter().find(|b| !b.is_ascii()) {
                    return Err(KbxError::InvalidText(format!(
                        "byte 0x{byte:02X} is not ASCII"
                    )));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            EncodingType::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            EncodingType::EucJp => decode_with(encoding_rs::EUC_JP, bytes),
            EncodingType::ShiftJis => decode_with(encoding_rs::SHIFT_JIS, bytes),
        }
    }

    /// Encode text into wire bytes.
    pub fn encode_text(self, text: &str) -> Result<Vec<u8>, KbxError> {
        match self {
            EncodingType::None | EncodingType::Utf8 => Ok(text.as_bytes().to_vec()),
            EncodingType::Ascii => {
                if let Some(ch) = text.chars().find(|c| !c.is_ascii()) {
                    return Err(KbxError::InvalidText(format!("{ch:?} is not ASCII")));
                }
                Ok(text.as_bytes().to_vec())
            }
            EncodingType::Iso8859_1 => text
                .chars()
                .map(|c| {
                    u8::try_from(c as u32).map_err(|_| {
                        KbxError::InvalidText(format!("{c:?} outside ISO-8859-1"))
                    })
                })
                .collect(),
            EncodingType::EucJp => encode_with(encoding_rs::EUC_JP, text),
            EncodingType::ShiftJis => encode_with(encoding_rs::SHIFT_JIS, text),
        }
    }
}

fn decode_with(codec: &'static encoding_rs::Encoding, bytes: &[u8]) -> Result<String, KbxError> {
    let (text, had_errors) = codec.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(KbxError::InvalidText(format!(
            "undecodable {} payload",
            codec.name()
        )));
    }
    Ok(text.into_owned())
}

fn encode_with(codec: &'static encoding_rs::Encoding, text: &str) -> Result<Vec<u8>, KbxError> {
    let (bytes, _, had_errors) = codec.encode(text);
    if had_errors {
        return Err(KbxError::InvalidText(format!(
            "text not representable in {}",
            codec.name()
        )));
    }
    Ok(bytes.into_owned())
}
