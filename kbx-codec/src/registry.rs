//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for the available
//! formats. Formats can be registered and retrieved by name, detected
//! from a filename extension, or sniffed from content.

use crate::error::KbxError;
use crate::format::Format;
use crate::node::Document;
use crate::options::Options;
use std::collections::HashMap;

/// Registry of document formats
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, KbxError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| KbxError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Returns the format name if a matching extension is found, or None otherwise.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;

        for format in self.formats.values() {
            if format.file_extensions().contains(&extension) {
                return Some(format.name().to_string());
            }
        }

        None
    }

    /// Detect format from content, trying each registered sniffer.
    pub fn detect_format_from_content(&self, data: &[u8]) -> Option<String> {
        // Deterministic order regardless of map iteration.
        let mut names: Vec<_> = self.formats.keys().collect();
        names.sort();
        for name in names {
            if self.formats[name].sniff(data) {
                return Some(name.clone());
            }
        }
        None
    }

    /// Decode bytes using the specified format
    pub fn decode(&self, data: &[u8], format: &str) -> Result<Document, KbxError> {
        self.get(format)?.decode(data)
    }

    /// Encode a document using the specified format and options
    pub fn encode(
        &self,
        doc: &Document,
        format: &str,
        options: &Options,
    ) -> Result<Vec<u8>, KbxError> {
        self.get(format)?.encode(doc, options)
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::binary::BinaryFormat);
        registry.register(crate::formats::xml::XmlFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
