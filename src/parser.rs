//! The parsing facade: version detection, validation, and deserialization
//! over any source form.
//!
//! `parse` runs the full pipeline: a namespace pre-pass over the raw bytes
//! resolves the schema version, the deserializer builds the object graph
//! from the same bytes, and the resolved version is stamped onto the result.
//! Version resolution never depends on deserialization succeeding; the two
//! passes are independent reads of the same input.
//!
//! `validate`/`is_valid` are an alternate entry point that reports
//! conformance diagnostics without materializing the object graph.

use crate::error::Result;
use crate::model::Bom;
use crate::namespace::extract_namespace_declarations;
use crate::reader::BomReader;
use crate::schema::{resolve_version, SchemaVersion};
use crate::validation::{validate_bytes, ValidationDiagnostic};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Parses and validates CycloneDX BOM XML documents.
///
/// Stateless; one instance can be shared freely across threads. All entry
/// points come in file, byte-slice, reader, and string forms with identical
/// semantics. Readers supplied by the caller are borrowed, never closed.
#[derive(Debug, Default)]
pub struct XmlParser;

impl XmlParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a BOM from a file path.
    ///
    /// The file handle is opened and released by this call on every exit
    /// path. A missing or unreadable file is an I/O error, distinct from a
    /// parse error.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Bom> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    /// Parses a BOM from raw bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Bom> {
        let declarations = extract_namespace_declarations(bytes)?;
        let version = resolve_version(&declarations);
        let bom = BomReader::from_reader(bytes).read()?;
        Ok(stamp(bom, version))
    }

    /// Parses a BOM from a reader. The input is buffered in full so the
    /// namespace pre-pass and the deserializer see the same bytes; the
    /// reader itself stays owned by the caller.
    pub fn parse_reader<R: Read>(&self, reader: &mut R) -> Result<Bom> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.parse_bytes(&bytes)
    }

    /// Parses a BOM from a string.
    pub fn parse_str(&self, xml: &str) -> Result<Bom> {
        self.parse_bytes(xml.as_bytes())
    }

    /// Validates a file against `version` (latest when `None`).
    ///
    /// Only environment failures (opening or reading the file) are errors;
    /// everything wrong with the document itself comes back as diagnostics.
    pub fn validate_file<P: AsRef<Path>>(
        &self,
        path: P,
        version: Option<SchemaVersion>,
    ) -> Result<Vec<ValidationDiagnostic>> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(validate_bytes(&bytes, version))
    }

    /// Validates raw bytes against `version` (latest when `None`).
    pub fn validate_bytes(
        &self,
        bytes: &[u8],
        version: Option<SchemaVersion>,
    ) -> Vec<ValidationDiagnostic> {
        validate_bytes(bytes, version)
    }

    /// Validates input from a reader against `version` (latest when `None`).
    pub fn validate_reader<R: Read>(
        &self,
        reader: &mut R,
        version: Option<SchemaVersion>,
    ) -> Result<Vec<ValidationDiagnostic>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(validate_bytes(&bytes, version))
    }

    /// Validates a string against `version` (latest when `None`).
    pub fn validate_str(
        &self,
        xml: &str,
        version: Option<SchemaVersion>,
    ) -> Vec<ValidationDiagnostic> {
        crate::validation::validate_str(xml, version)
    }

    /// True when [`XmlParser::validate_file`] reports nothing.
    pub fn is_valid_file<P: AsRef<Path>>(
        &self,
        path: P,
        version: Option<SchemaVersion>,
    ) -> Result<bool> {
        Ok(self.validate_file(path, version)?.is_empty())
    }

    /// True when [`XmlParser::validate_bytes`] reports nothing.
    pub fn is_valid_bytes(&self, bytes: &[u8], version: Option<SchemaVersion>) -> bool {
        self.validate_bytes(bytes, version).is_empty()
    }

    /// True when [`XmlParser::validate_reader`] reports nothing.
    pub fn is_valid_reader<R: Read>(
        &self,
        reader: &mut R,
        version: Option<SchemaVersion>,
    ) -> Result<bool> {
        Ok(self.validate_reader(reader, version)?.is_empty())
    }

    /// True when [`XmlParser::validate_str`] reports nothing.
    pub fn is_valid_str(&self, xml: &str, version: Option<SchemaVersion>) -> bool {
        self.validate_str(xml, version).is_empty()
    }
}

/// Writes the detected schema version onto the BOM's provenance attribute.
///
/// The attribute has no public setter, so this crate-internal path is the
/// only way it gets written. When no version was resolved the attribute is
/// left unset: accepted lenient behavior, logged but never escalated.
fn stamp(mut bom: Bom, version: Option<SchemaVersion>) -> Bom {
    match version {
        Some(version) => bom.set_spec_version(version.version_str().to_string()),
        None => {
            tracing::warn!("no recognized BOM namespace in document; specVersion left unset")
        }
    }
    bom
}

/// Convenience function: parses a BOM from a string with a fresh parser.
pub fn parse(xml: &str) -> Result<Bom> {
    XmlParser::new().parse_str(xml)
}
