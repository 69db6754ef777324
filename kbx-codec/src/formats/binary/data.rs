//! Data-stream payloads.
//!
//! Uncompressed, every fixed-width value starts on a multiple of its
//! element width (measured from the data-stream start) and holds raw
//! big-endian bytes. `bin` and `str` are length-prefixed and 4-aligned.
//!
//! With compression active (a whole-document header property), every
//! compressible value is instead written as a one-byte bytes-per-element
//! indicator followed by tightly packed truncated elements, with no
//! alignment padding: the indicator defines the framing. The indicator
//! is present even when no narrowing is possible. Non-compressible
//! types keep the uncompressed layout either way, so eligibility is a
//! pure function of the type descriptor and the decoder needs no
//! per-node flag.

use crate::encoding::EncodingType;
use crate::error::KbxError;
use crate::node::NodeValue;
use crate::stream::{ByteReader, ByteWriter};
use crate::types::{TypeClass, TypeDescriptor, TypeId};

pub(crate) struct DataReader<'a> {
    r: ByteReader<'a>,
    compressed: bool,
    encoding: EncodingType,
}

impl<'a> DataReader<'a> {
    pub(crate) fn new(buf: &'a [u8], compressed: bool, encoding: EncodingType) -> Self {
        DataReader {
            r: ByteReader::new(buf),
            compressed,
            encoding,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub(crate) fn position(&self) -> usize {
        self.r.position()
    }

    /// Read one node's payload, returning canonical bytes (UTF-8 for
    /// `str`, raw big-endian otherwise).
    pub(crate) fn read_value(
        &mut self,
        type_id: TypeId,
        array_len: u32,
        path: &str,
    ) -> Result<Vec<u8>, KbxError> {
        let desc = type_id.descriptor();
        match desc.class {
            TypeClass::Text => {
                self.r.realign(4)?;
                let raw = self.r.read_len_bytes()?;
                Ok(self.encoding.decode_text(raw)?.into_bytes())
            }
            TypeClass::Bytes => {
                self.r.realign(4)?;
                Ok(self.r.read_len_bytes()?.to_vec())
            }
            _ if self.compressed && desc.compressible() => {
                self.read_packed(&desc, array_len, path)
            }
            _ => {
                self.r.realign(desc.size)?;
                let total = desc.size * desc.count * array_len as usize;
                let bytes = self.r.read_bytes(total)?;
                if desc.class == TypeClass::Boolean {
                    if let Some(byte) = bytes.iter().find(|b| **b > 1) {
                        return Err(KbxError::InvalidBoolean(*byte, path.to_string()));
                    }
                }
                Ok(bytes.to_vec())
            }
        }
    }

    fn read_packed(
        &mut self,
        desc: &TypeDescriptor,
        array_len: u32,
        path: &str,
    ) -> Result<Vec<u8>, KbxError> {
        let per_element = self.r.read_u8()? as usize;
        if per_element == 0 || per_element > desc.size {
            return Err(KbxError::InvalidPackedWidth(
                per_element as u8,
                path.to_string(),
            ));
        }
        let elements = desc.count * array_len as usize;
        let packed = self.r.read_bytes(per_element * elements)?;
        let signed = desc.class == TypeClass::Signed;
        let mut out = Vec::with_capacity(desc.size * elements);
        for chunk in packed.chunks(per_element) {
            let fill = if signed && chunk[0] & 0x80 != 0 { 0xFF } else { 0x00 };
            out.resize(out.len() + desc.size - per_element, fill);
            out.extend_from_slice(chunk);
        }
        Ok(out)
    }
}

pub(crate) struct DataWriter {
    w: ByteWriter,
    compressed: bool,
    encoding: EncodingType,
}

impl DataWriter {
    pub(crate) fn new(compressed: bool, encoding: EncodingType) -> Self {
        DataWriter {
            w: ByteWriter::new(),
            compressed,
            encoding,
        }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.w.into_inner()
    }

    pub(crate) fn write_value(&mut self, value: &NodeValue, path: &str) -> Result<(), KbxError> {
        let desc = value.type_id.descriptor();
        if let Some(expected) = value.expected_len() {
            if value.bytes.len() != expected {
                return Err(KbxError::ValueTooLarge(format!(
                    "{} payload at {path} is {} bytes, expected {expected}",
                    desc.name,
                    value.bytes.len()
                )));
            }
        }
        match desc.class {
            TypeClass::Text => {
                let text = std::str::from_utf8(&value.bytes)
                    .map_err(|_| KbxError::InvalidText(format!("non-UTF-8 str at {path}")))?;
                let encoded = self.encoding.encode_text(text)?;
                self.w.realign(4);
                self.w.write_len_bytes(&encoded)
            }
            TypeClass::Bytes => {
                self.w.realign(4);
                self.w.write_len_bytes(&value.bytes)
            }
            _ if self.compressed && desc.compressible() => {
                self.write_packed(&desc, &value.bytes);
                Ok(())
            }
            _ => {
                self.w.realign(desc.size);
                self.w.write_bytes(&value.bytes);
                Ok(())
            }
        }
    }

    fn write_packed(&mut self, desc: &TypeDescriptor, bytes: &[u8]) {
        let signed = desc.class == TypeClass::Signed;
        let per_element = bytes
            .chunks(desc.size)
            .map(|chunk| min_bytes(chunk, signed))
            .max()
            .unwrap_or(1);
        self.w.write_u8(per_element as u8);
        for chunk in bytes.chunks(desc.size) {
            self.w.write_bytes(&chunk[desc.size - per_element..]);
        }
    }
}

/// Fewest trailing bytes of a big-endian element that survive
/// re-extension to the full width.
fn min_bytes(chunk: &[u8], signed: bool) -> usize {
    for keep in 1..chunk.len() {
        let kept_msb = chunk[chunk.len() - keep] & 0x80 != 0;
        let fill = if signed && kept_msb { 0xFF } else { 0x00 };
        if chunk[..chunk.len() - keep].iter().all(|b| *b == fill) {
            return keep;
        }
    }
    chunk.len()
}
