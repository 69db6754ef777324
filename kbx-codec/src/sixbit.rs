//! 6-bit name packing.
//!
//! Tag and attribute names are restricted to a 63-symbol alphabet so
//! four characters fit in three bytes. The alphabet order is fixed and
//! identical in both directions: digits, uppercase letters, underscore
//! at index 36, lowercase letters through index 62. Packing pads the
//! final byte with zero bits; the decoder recovers the true length from
//! the separately stored character count.

use crate::error::KbxError;

const ALPHABET: &[u8; 63] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// Maximum name length: the character count is stored in one byte.
pub const MAX_NAME_LEN: usize = 255;

fn index_of(ch: char) -> Option<u8> {
    match ch {
        '0'..='9' => Some(ch as u8 - b'0'),
        'A'..='Z' => Some(ch as u8 - b'A' + 10),
        '_' => Some(36),
        'a'..='z' => Some(ch as u8 - b'a' + 37),
        _ => None,
    }
}

/// Number of bytes a packed run of `chars` characters occupies.
pub fn packed_len(chars: usize) -> usize {
    (chars * 6 + 7) / 8
}

/// Pack a name into its 6-bit run.
///
/// Fails with `InvalidNameCharacter` for characters outside the alphabet
/// and `ValueTooLarge` for names longer than the one-byte count field
/// can record.
pub fn pack(name: &str) -> Result<Vec<u8>, KbxError> {
    let chars = name.chars().count();
    if chars > MAX_NAME_LEN {
        return Err(KbxError::ValueTooLarge(format!(
            "name of {chars} characters exceeds the {MAX_NAME_LEN}-character limit"
        )));
    }
    let mut out = Vec::with_capacity(packed_len(chars));
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for ch in name.chars() {
        let index = index_of(ch)
            .ok_or_else(|| KbxError::InvalidNameCharacter(name.to_string(), ch))?;
        acc = (acc << 6) | u32::from(index);
        bits += 6;
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    if bits > 0 {
        out.push((acc << (8 - bits)) as u8);
    }
    Ok(out)
}

/// Unpack `chars` characters from a packed run.
///
/// The run must be exactly `packed_len(chars)` bytes. An index past the
/// alphabet (only reachable from corrupt input) fails with
/// `InvalidNameCharacter`.
pub fn unpack(chars: usize, packed: &[u8]) -> Result<String, KbxError> {
    debug_assert_eq!(packed.len(), packed_len(chars));
    let mut out = String::with_capacity(chars);
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    let mut bytes = packed.iter();
    for _ in 0..chars {
        while bits < 6 {
            acc = (acc << 8) | u32::from(*bytes.next().unwrap_or(&0));
            bits += 8;
        }
        bits -= 6;
        let index = ((acc >> bits) & 0x3F) as usize;
        match ALPHABET.get(index) {
            Some(byte) => out.push(*byte as char),
            None => return Err(KbxError::InvalidNameCharacter(out, '?')),
        }
    }
    Ok(out)
}
