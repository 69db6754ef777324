//! Shared configuration loader for the kbx toolchain.
//!
//! `defaults/kbx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`KbxConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use kbx_codec::{CompressionType, EncodingType, FormatVersion, Options};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/kbx.default.toml");

/// Top-level configuration consumed by kbx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct KbxConfig {
    pub convert: ConvertConfig,
    pub info: InfoConfig,
}

/// Knobs applied when emitting the binary form.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub encoding: EncodingType,
    pub compression: CompressionType,
    pub version: FormatVersion,
}

impl From<&ConvertConfig> for Options {
    fn from(config: &ConvertConfig) -> Self {
        let mut builder = Options::builder();
        builder
            .encoding(config.encoding)
            .compression(config.compression)
            .version(config.version);
        builder.build()
    }
}

impl From<ConvertConfig> for Options {
    fn from(config: ConvertConfig) -> Self {
        Options::from(&config)
    }
}

/// Controls the `info` subcommand output.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoConfig {
    pub pretty: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<KbxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<KbxConfig, ConfigError> {
    Loader::new().build()
}
