//! Encode-time options.
//!
//! Options are passed explicitly through the encode call rather than
//! held in any global state; a decode call needs none (everything it
//! needs is in the header).

use crate::encoding::EncodingType;
use serde::{Deserialize, Serialize};

/// Whether the data stream uses the value-narrowing scheme.
///
/// This is a whole-document property recorded in the header signature,
/// never a per-node one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    Compressed,
    Uncompressed,
}

/// Binary format revision, selecting the header signature.
///
/// Revision 0 predates value compression; requesting compression under
/// it fails with `UnsupportedCompression`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    Revision0,
    Revision1,
}

/// Options accepted by the binary encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Text-payload encoding; when `None` here, the encoder falls back
    /// to UTF-8 (the documented default).
    pub encoding: Option<EncodingType>,
    pub compression: CompressionType,
    pub version: FormatVersion,
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Defaults plus an explicit encoding.
    pub fn with_encoding(encoding: EncodingType) -> Self {
        Options {
            encoding: Some(encoding),
            ..Options::default()
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            encoding: None,
            compression: CompressionType::Uncompressed,
            version: FormatVersion::Revision1,
        }
    }
}

/// Builder for [`Options`].
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn encoding(&mut self, encoding: EncodingType) -> &mut Self {
        self.options.encoding = Some(encoding);
        self
    }

    pub fn compression(&mut self, compression: CompressionType) -> &mut Self {
        self.options.compression = compression;
        self
    }

    pub fn version(&mut self, version: FormatVersion) -> &mut Self {
        self.options.version = version;
        self
    }

    pub fn build(&self) -> Options {
        self.options
    }
}
