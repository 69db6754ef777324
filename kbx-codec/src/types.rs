//! Type catalog: the closed set of value types.
//!
//! Each entry pairs a wire tag with an element byte width, an element
//! count (2/3/4 for the small fixed-size vector variants, 0 for the
//! length-prefixed dynamic types), a classification that selects the
//! decode/encode rule, and an array-capable flag. Tags stay at or below
//! 0x3F: the two high bits of the structure-stream type byte are the
//! array and attribute flags, and 0xFF is the child terminator.
//!
//! The markup text form of each value also lives here, so the XML
//! parser and serializer share one conversion per class.

use crate::error::KbxError;
use std::net::Ipv4Addr;

/// Decode/encode rule selector for a value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Signed,
    Unsigned,
    Float,
    Boolean,
    Ip4,
    Bytes,
    Text,
}

/// Static description of one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Markup name, the `__type` attribute value.
    pub name: &'static str,
    /// Element byte width.
    pub size: usize,
    /// Elements per value: 1 for scalars, 2..=4 for vectors, 0 for the
    /// length-prefixed dynamic types (`bin`, `str`).
    pub count: usize,
    pub class: TypeClass,
    /// Whether the type may carry a dynamic array of whole values.
    pub array: bool,
}

impl TypeDescriptor {
    /// Whether payloads of this type participate in value compression.
    ///
    /// Only integer elements of two bytes or more: truncating floats is
    /// lossy, one-byte elements gain nothing, and the remaining classes
    /// keep their raw layout so the decoder needs no per-node flag.
    pub fn compressible(&self) -> bool {
        self.size >= 2 && matches!(self.class, TypeClass::Signed | TypeClass::Unsigned)
    }
}

/// Value-type identifier.
///
/// The structural-only marker and the terminator are not value types and
/// live in the binary format module, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeId {
    S8 = 0x02,
    U8 = 0x03,
    S16 = 0x04,
    U16 = 0x05,
    S32 = 0x06,
    U32 = 0x07,
    S64 = 0x08,
    U64 = 0x09,
    Bin = 0x0A,
    Str = 0x0B,
    Ip4 = 0x0C,
    Time = 0x0D,
    Float = 0x0E,
    Double = 0x0F,
    S8x2 = 0x10,
    U8x2 = 0x11,
    S16x2 = 0x12,
    U16x2 = 0x13,
    S32x2 = 0x14,
    U32x2 = 0x15,
    S64x2 = 0x16,
    U64x2 = 0x17,
    S8x3 = 0x18,
    U8x3 = 0x19,
    S16x3 = 0x1A,
    U16x3 = 0x1B,
    S32x3 = 0x1C,
    U32x3 = 0x1D,
    S64x3 = 0x1E,
    U64x3 = 0x1F,
    S8x4 = 0x20,
    U8x4 = 0x21,
    S16x4 = 0x22,
    U16x4 = 0x23,
    S32x4 = 0x24,
    U32x4 = 0x25,
    S64x4 = 0x26,
    U64x4 = 0x27,
    FloatX2 = 0x28,
    FloatX3 = 0x29,
    FloatX4 = 0x2A,
    DoubleX2 = 0x2B,
    DoubleX3 = 0x2C,
    DoubleX4 = 0x2D,
    Bool = 0x2E,
    BoolX2 = 0x2F,
    BoolX3 = 0x30,
    BoolX4 = 0x31,
}

/// Every catalog entry, in tag order.
pub const ALL_TYPES: &[TypeId] = &[
    TypeId::S8,
    TypeId::U8,
    TypeId::S16,
    TypeId::U16,
    TypeId::S32,
    TypeId::U32,
    TypeId::S64,
    TypeId::U64,
    TypeId::Bin,
    TypeId::Str,
    TypeId::Ip4,
    TypeId::Time,
    TypeId::Float,
    TypeId::Double,
    TypeId::S8x2,
    TypeId::U8x2,
    TypeId::S16x2,
    TypeId::U16x2,
    TypeId::S32x2,
    TypeId::U32x2,
    TypeId::S64x2,
    TypeId::U64x2,
    TypeId::S8x3,
    TypeId::U8x3,
    TypeId::S16x3,
    TypeId::U16x3,
    TypeId::S32x3,
    TypeId::U32x3,
    TypeId::S64x3,
    TypeId::U64x3,
    TypeId::S8x4,
    TypeId::U8x4,
    TypeId::S16x4,
    TypeId::U16x4,
    TypeId::S32x4,
    TypeId::U32x4,
    TypeId::S64x4,
    TypeId::U64x4,
    TypeId::FloatX2,
    TypeId::FloatX3,
    TypeId::FloatX4,
    TypeId::DoubleX2,
    TypeId::DoubleX3,
    TypeId::DoubleX4,
    TypeId::Bool,
    TypeId::BoolX2,
    TypeId::BoolX3,
    TypeId::BoolX4,
];

const fn desc(
    name: &'static str,
    size: usize,
    count: usize,
    class: TypeClass,
    array: bool,
) -> TypeDescriptor {
    TypeDescriptor {
        name,
        size,
        count,
        class,
        array,
    }
}

impl TypeId {
    /// Look up a wire tag (low six bits of the structure type byte).
    pub fn from_tag(tag: u8) -> Result<Self, KbxError> {
        for id in ALL_TYPES {
            if *id as u8 == tag {
                return Ok(*id);
            }
        }
        Err(KbxError::UnknownType(format!("tag 0x{tag:02X}")))
    }

    /// Look up a markup `__type` name.
    pub fn from_name(name: &str) -> Result<Self, KbxError> {
        for id in ALL_TYPES {
            if id.descriptor().name == name {
                return Ok(*id);
            }
        }
        Err(KbxError::UnknownType(format!("name '{name}'")))
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn descriptor(self) -> TypeDescriptor {
        use TypeClass::*;
        match self {
            TypeId::S8 => desc("s8", 1, 1, Signed, true),
            TypeId::U8 => desc("u8", 1, 1, Unsigned, true),
            TypeId::S16 => desc("s16", 2, 1, Signed, true),
            TypeId::U16 => desc("u16", 2, 1, Unsigned, true),
            TypeId::S32 => desc("s32", 4, 1, Signed, true),
            TypeId::U32 => desc("u32", 4, 1, Unsigned, true),
            TypeId::S64 => desc("s64", 8, 1, Signed, true),
            TypeId::U64 => desc("u64", 8, 1, Unsigned, true),
            TypeId::Bin => desc("bin", 1, 0, Bytes, false),
            TypeId::Str => desc("str", 1, 0, Text, false),
            TypeId::Ip4 => desc("ip4", 4, 1, Ip4, true),
            TypeId::Time => desc("time", 4, 1, Unsigned, true),
            TypeId::Float => desc("float", 4, 1, Float, true),
            TypeId::Double => desc("double", 8, 1, Float, true),
            TypeId::S8x2 => desc("2s8", 1, 2, Signed, true),
            TypeId::U8x2 => desc("2u8", 1, 2, Unsigned, true),
            TypeId::S16x2 => desc("2s16", 2, 2, Signed, true),
            TypeId::U16x2 => desc("2u16", 2, 2, Unsigned, true),
            TypeId::S32x2 => desc("2s32", 4, 2, Signed, true),
            TypeId::U32x2 => desc("2u32", 4, 2, Unsigned, true),
            TypeId::S64x2 => desc("2s64", 8, 2, Signed, true),
            TypeId::U64x2 => desc("2u64", 8, 2, Unsigned, true),
            TypeId::S8x3 => desc("3s8", 1, 3, Signed, true),
            TypeId::U8x3 => desc("3u8", 1, 3, Unsigned, true),
            TypeId::S16x3 => desc("3s16", 2, 3, Signed, true),
            TypeId::U16x3 => desc("3u16", 2, 3, Unsigned, true),
            TypeId::S32x3 => desc("3s32", 4, 3, Signed, true),
            TypeId::U32x3 => desc("3u32", 4, 3, Unsigned, true),
            TypeId::S64x3 => desc("3s64", 8, 3, Signed, true),
            TypeId::U64x3 => desc("3u64", 8, 3, Unsigned, true),
            TypeId::S8x4 => desc("4s8", 1, 4, Signed, true),
            TypeId::U8x4 => desc("4u8", 1, 4, Unsigned, true),
            TypeId::S16x4 => desc("4s16", 2, 4, Signed, true),
            TypeId::U16x4 => desc("4u16", 2, 4, Unsigned, true),
            TypeId::S32x4 => desc("4s32", 4, 4, Signed, true),
            TypeId::U32x4 => desc("4u32", 4, 4, Unsigned, true),
            TypeId::S64x4 => desc("4s64", 8, 4, Signed, true),
            TypeId::U64x4 => desc("4u64", 8, 4, Unsigned, true),
            TypeId::FloatX2 => desc("2f", 4, 2, Float, true),
            TypeId::FloatX3 => desc("3f", 4, 3, Float, true),
            TypeId::FloatX4 => desc("4f", 4, 4, Float, true),
            TypeId::DoubleX2 => desc("2d", 8, 2, Float, true),
            TypeId::DoubleX3 => desc("3d", 8, 3, Float, true),
            TypeId::DoubleX4 => desc("4d", 8, 4, Float, true),
            TypeId::Bool => desc("bool", 1, 1, Boolean, true),
            TypeId::BoolX2 => desc("2b", 1, 2, Boolean, true),
            TypeId::BoolX3 => desc("3b", 1, 3, Boolean, true),
            TypeId::BoolX4 => desc("4b", 1, 4, Boolean, true),
        }
    }
}

/// Parse whitespace-split markup tokens into big-endian payload bytes.
///
/// The caller has already checked the token count against the expected
/// element count; `path` is only used in error messages.
pub fn parse_tokens(
    desc: &TypeDescriptor,
    tokens: &[&str],
    path: &str,
) -> Result<Vec<u8>, KbxError> {
    let mut out = Vec::with_capacity(desc.size * tokens.len());
    for token in tokens {
        parse_element(desc, token, path, &mut out)?;
    }
    Ok(out)
}

fn parse_element(
    desc: &TypeDescriptor,
    token: &str,
    path: &str,
    out: &mut Vec<u8>,
) -> Result<(), KbxError> {
    let bad = || {
        KbxError::MalformedMarkup(format!(
            "invalid {} value '{token}' at {path}",
            desc.name
        ))
    };
    match desc.class {
        TypeClass::Signed => {
            let value: i64 = token.parse().map_err(|_| bad())?;
            if desc.size < 8 {
                let bits = 8 * desc.size as u32;
                let min = -(1i64 << (bits - 1));
                let max = (1i64 << (bits - 1)) - 1;
                if value < min || value > max {
                    return Err(bad());
                }
            }
            out.extend_from_slice(&(value as u64).to_be_bytes()[8 - desc.size..]);
        }
        TypeClass::Unsigned => {
            let value: u64 = token.parse().map_err(|_| bad())?;
            if desc.size < 8 && value >= 1u64 << (8 * desc.size as u32) {
                return Err(bad());
            }
            out.extend_from_slice(&value.to_be_bytes()[8 - desc.size..]);
        }
        TypeClass::Float => {
            if desc.size == 4 {
                let value: f32 = token.parse().map_err(|_| bad())?;
                out.extend_from_slice(&value.to_be_bytes());
            } else {
                let value: f64 = token.parse().map_err(|_| bad())?;
                out.extend_from_slice(&value.to_be_bytes());
            }
        }
        TypeClass::Boolean => match token {
            "0" => out.push(0),
            "1" => out.push(1),
            _ => return Err(bad()),
        },
        TypeClass::Ip4 => {
            let addr: Ipv4Addr = token.parse().map_err(|_| bad())?;
            out.extend_from_slice(&addr.octets());
        }
        TypeClass::Bytes | TypeClass::Text => {
            // Dynamic types never go through the token path.
            return Err(bad());
        }
    }
    Ok(())
}

/// Format a big-endian payload as the space-joined markup text form.
pub fn format_values(desc: &TypeDescriptor, bytes: &[u8]) -> String {
    let mut parts = Vec::with_capacity(bytes.len() / desc.size.max(1));
    for chunk in bytes.chunks(desc.size) {
        parts.push(format_element(desc, chunk));
    }
    parts.join(" ")
}

fn format_element(desc: &TypeDescriptor, chunk: &[u8]) -> String {
    match desc.class {
        TypeClass::Signed => {
            let raw = be_u64(chunk);
            let shift = 64 - 8 * chunk.len() as u32;
            (((raw << shift) as i64) >> shift).to_string()
        }
        TypeClass::Unsigned => be_u64(chunk).to_string(),
        TypeClass::Float => {
            if chunk.len() == 4 {
                f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]).to_string()
            } else {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                f64::from_be_bytes(buf).to_string()
            }
        }
        TypeClass::Boolean => if chunk[0] == 0 { "0" } else { "1" }.to_string(),
        TypeClass::Ip4 => Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3]).to_string(),
        TypeClass::Bytes | TypeClass::Text => String::new(),
    }
}

fn be_u64(chunk: &[u8]) -> u64 {
    let mut value = 0u64;
    for byte in chunk {
        value = (value << 8) | u64::from(*byte);
    }
    value
}

/// Lowercase hex form used for `bin` payloads in markup.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Parse the hex form back into bytes. Accepts both hex cases; requires
/// an even digit count.
pub fn from_hex(text: &str) -> Result<Vec<u8>, KbxError> {
    if text.len() % 2 != 0 {
        return Err(KbxError::MalformedMarkup(format!(
            "odd-length hex string '{text}'"
        )));
    }
    let digits = text.as_bytes();
    let mut out = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let hi = hex_digit(pair[0], text)?;
        let lo = hex_digit(pair[1], text)?;
        out.push(hi << 4 | lo);
    }
    Ok(out)
}

fn hex_digit(digit: u8, text: &str) -> Result<u8, KbxError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(KbxError::MalformedMarkup(format!(
            "invalid hex string '{text}'"
        ))),
    }
}
