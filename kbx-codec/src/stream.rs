//! Forward-only byte cursors over the two wire streams.
//!
//! All multi-byte integers are big-endian. Length-prefixed fields use a
//! 32-bit length. `realign` pads to the next multiple of a width,
//! measured from the start of the stream the cursor covers, which is
//! how the data stream keeps multi-byte scalars on their natural
//! boundaries.

use crate::error::KbxError;

/// Reading cursor over a borrowed buffer.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], KbxError> {
        if self.remaining() < len {
            return Err(KbxError::TruncatedInput {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, KbxError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, KbxError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, KbxError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, KbxError> {
        let bytes = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buf))
    }

    /// Read a 32-bit length followed by that many bytes.
    pub fn read_len_bytes(&mut self) -> Result<&'a [u8], KbxError> {
        let len = self.read_u32()? as usize;
        self.read_bytes(len)
    }

    /// Advance to the next multiple of `width`, discarding pad bytes.
    pub fn realign(&mut self, width: usize) -> Result<(), KbxError> {
        let rem = self.pos % width;
        if rem != 0 {
            self.read_bytes(width - rem)?;
        }
        Ok(())
    }
}

/// Writing cursor over an owned, growing buffer.
///
/// Writing never fails except on unrepresentable input: a length that
/// does not fit the 32-bit field fails with `ValueTooLarge`.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter::default()
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a 32-bit length prefix followed by the bytes.
    pub fn write_len_bytes(&mut self, bytes: &[u8]) -> Result<(), KbxError> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            KbxError::ValueTooLarge(format!(
                "{} bytes exceed the 32-bit length field",
                bytes.len()
            ))
        })?;
        self.write_u32(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Emit zero bytes up to the next multiple of `width`.
    pub fn realign(&mut self, width: usize) {
        let rem = self.buf.len() % width;
        if rem != 0 {
            self.buf.resize(self.buf.len() + width - rem, 0);
        }
    }
}
