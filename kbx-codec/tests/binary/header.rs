//! Header validation and the `binary_info` probe.

use crate::common::{empty_document, sample_document};
use kbx_codec::{
    binary_info, from_slice, to_binary, to_binary_with_options, BinaryFormat, CompressionType,
    EncodingType, Format, FormatVersion, KbxError, Options,
};

#[test]
fn flipped_complement_is_rejected() {
    let mut bytes = to_binary(&empty_document()).unwrap();
    bytes[2] ^= 0x01;
    assert!(matches!(
        from_slice(&bytes),
        Err(KbxError::HeaderMismatch(_))
    ));
}

#[test]
fn unknown_signature_is_rejected() {
    let mut bytes = to_binary(&empty_document()).unwrap();
    bytes[0] = 0x42;
    assert!(matches!(
        from_slice(&bytes),
        Err(KbxError::HeaderMismatch(_))
    ));
}

#[test]
fn unknown_encoding_byte_is_rejected() {
    let mut bytes = to_binary(&empty_document()).unwrap();
    bytes[1] = 0xC0;
    bytes[2] = !0xC0;
    assert!(matches!(
        from_slice(&bytes),
        Err(KbxError::UnknownEncoding(_))
    ));
}

#[test]
fn revision_0_round_trips() {
    let doc = sample_document();
    let mut builder = Options::builder();
    builder
        .encoding(EncodingType::Utf8)
        .version(FormatVersion::Revision0);
    let bytes = to_binary_with_options(builder.build(), &doc).unwrap();
    assert_eq!(bytes[0], 0x90);
    assert_eq!(from_slice(&bytes).unwrap(), doc);
}

#[test]
fn compression_is_refused_under_revision_0() {
    let mut builder = Options::builder();
    builder
        .encoding(EncodingType::Utf8)
        .compression(CompressionType::Compressed)
        .version(FormatVersion::Revision0);
    assert_eq!(
        to_binary_with_options(builder.build(), &sample_document()),
        Err(KbxError::UnsupportedCompression)
    );
}

#[test]
fn info_reports_header_and_stream_lengths() {
    let bytes = to_binary(&empty_document()).unwrap();
    let info = binary_info(&bytes).unwrap();
    assert_eq!(info.revision, 1);
    assert!(!info.compressed);
    assert_eq!(info.encoding, EncodingType::Utf8);
    assert_eq!(info.structure_len, 6);
    assert_eq!(info.data_len, 0);
}

#[test]
fn info_does_not_decode_the_streams() {
    // Garbage structure bytes are fine; only the framing is read.
    let mut bytes = to_binary(&empty_document()).unwrap();
    bytes[8] = 0x3E;
    let info = binary_info(&bytes).unwrap();
    assert_eq!(info.structure_len, 6);
}

#[test]
fn sniff_accepts_only_wellformed_headers() {
    let bytes = to_binary(&empty_document()).unwrap();
    assert!(BinaryFormat.sniff(&bytes));
    assert!(!BinaryFormat.sniff(b"<?xml version=\"1.0\"?>"));
    assert!(!BinaryFormat.sniff(&[0xA0, 0xA0, 0xA0, 0x00]));
    assert!(!BinaryFormat.sniff(&[]));
}

#[test]
fn default_encoding_is_utf8_when_unset() {
    let bytes = to_binary_with_options(Options::default(), &empty_document()).unwrap();
    assert_eq!(bytes[1], 0xA0);
}

#[test]
fn none_encoding_writes_a_zero_byte() {
    let mut doc = empty_document();
    doc.encoding = EncodingType::None;
    let bytes = to_binary(&doc).unwrap();
    assert_eq!(bytes[1], 0x00);
    assert_eq!(bytes[2], 0xFF);
    assert_eq!(from_slice(&bytes).unwrap().encoding, EncodingType::None);
}
