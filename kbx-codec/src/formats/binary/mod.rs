//! The binary form.
//!
//! Layout, offsets from the buffer start:
//!
//! | offset | field                                  | size |
//! |--------|----------------------------------------|------|
//! | 0      | signature (revision + compression)     | 1    |
//! | 1      | encoding byte                          | 1    |
//! | 2      | bitwise complement of the encoding byte| 1    |
//! | 3      | reserved (zero)                        | 1    |
//! | 4      | structure-stream length (big-endian)   | 4    |
//! | 8      | structure stream                       | var  |
//! | —      | zero padding to a 4-byte boundary      | 0–3  |
//! | —      | data-stream length (big-endian)        | 4    |
//! | —      | data stream                            | var  |
//!
//! The structure stream holds the tree skeleton (type tags, packed
//! names, array counts, attribute blocks); the data stream holds raw
//! payload bytes. See `structure` and `data` for the record layouts and
//! `reader`/`writer` for the two synchronized traversals.

mod data;
mod reader;
mod structure;
mod writer;

use crate::encoding::EncodingType;
use crate::error::KbxError;
use crate::format::Format;
use crate::node::Document;
use crate::options::{CompressionType, FormatVersion, Options};
use crate::stream::{ByteReader, ByteWriter};
use serde::Serialize;

/// Revision 0: predates value compression.
const SIG_R0: u8 = 0x90;
/// Revision 1, plain data stream.
const SIG_R1: u8 = 0xA0;
/// Revision 1 with value compression active.
const SIG_R1_COMPRESSED: u8 = 0xA1;

/// Reserved header byte.
const RESERVED: u8 = 0x00;

/// Decoded header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub version: FormatVersion,
    pub compressed: bool,
    pub encoding: EncodingType,
}

impl Header {
    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self, KbxError> {
        let signature = r.read_u8()?;
        let (version, compressed) = match signature {
            SIG_R0 => (FormatVersion::Revision0, false),
            SIG_R1 => (FormatVersion::Revision1, false),
            SIG_R1_COMPRESSED => (FormatVersion::Revision1, true),
            other => {
                return Err(KbxError::HeaderMismatch(format!(
                    "unknown signature 0x{other:02X}"
                )))
            }
        };
        let encoding_byte = r.read_u8()?;
        let complement = r.read_u8()?;
        if complement != !encoding_byte {
            return Err(KbxError::HeaderMismatch(format!(
                "encoding byte 0x{encoding_byte:02X} not matched by complement 0x{complement:02X}"
            )));
        }
        let _reserved = r.read_u8()?;
        let encoding = EncodingType::from_byte(encoding_byte)?;
        Ok(Header {
            version,
            compressed,
            encoding,
        })
    }

    pub(crate) fn write(&self, w: &mut ByteWriter) {
        let signature = match (self.version, self.compressed) {
            (FormatVersion::Revision0, _) => SIG_R0,
            (FormatVersion::Revision1, false) => SIG_R1,
            (FormatVersion::Revision1, true) => SIG_R1_COMPRESSED,
        };
        w.write_u8(signature);
        let encoding_byte = self.encoding.to_byte();
        w.write_u8(encoding_byte);
        w.write_u8(!encoding_byte);
        w.write_u8(RESERVED);
    }
}

/// Header summary of a binary buffer, without decoding the streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinaryInfo {
    pub revision: u8,
    pub compressed: bool,
    pub encoding: EncodingType,
    pub structure_len: u32,
    pub data_len: u32,
}

/// Inspect a binary buffer's header and stream lengths.
pub fn binary_info(data: &[u8]) -> Result<BinaryInfo, KbxError> {
    let mut r = ByteReader::new(data);
    let header = Header::read(&mut r)?;
    let structure_len = r.read_u32()?;
    r.read_bytes(structure_len as usize)?;
    r.realign(4)?;
    let data_len = r.read_u32()?;
    Ok(BinaryInfo {
        revision: match header.version {
            FormatVersion::Revision0 => 0,
            FormatVersion::Revision1 => 1,
        },
        compressed: header.compressed,
        encoding: header.encoding,
        structure_len,
        data_len,
    })
}

/// The binary form as a [`Format`].
pub struct BinaryFormat;

impl Format for BinaryFormat {
    fn name(&self) -> &str {
        "binary"
    }

    fn description(&self) -> &str {
        "Compact binary tree serialization"
    }

    fn file_extensions(&self) -> &[&str] {
        &["kbx", "bin"]
    }

    fn sniff(&self, data: &[u8]) -> bool {
        data.len() >= 4
            && matches!(data[0], SIG_R0 | SIG_R1 | SIG_R1_COMPRESSED)
            && data[2] == !data[1]
    }

    fn decode(&self, data: &[u8]) -> Result<Document, KbxError> {
        reader::read_document(data)
    }

    fn encode(&self, doc: &Document, options: &Options) -> Result<Vec<u8>, KbxError> {
        writer::write_document(doc, options)
    }
}

pub(crate) fn compression_allowed(version: FormatVersion) -> bool {
    version != FormatVersion::Revision0
}

pub(crate) fn is_compressed(options: &Options) -> bool {
    options.compression == CompressionType::Compressed
}
