//! Error types for the CycloneDX XML library.
//!
//! Two failure classes are kept apart so callers can tell a bad document
//! from a bad environment: [`ParseError`] covers everything wrong with the
//! document itself, while [`Error::Io`] covers I/O failures around it.
//! Schema-conformance problems are not errors at all; they are reported as
//! [`crate::validation::ValidationDiagnostic`] values.

use thiserror::Error;

/// Top-level error type for CycloneDX XML operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The document could not be parsed or mapped to the object model.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Environment failure (reading a file, stream I/O).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal problems with the document content.
///
/// A `ParseError` always aborts parsing; partially mapped documents are
/// never returned.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed XML (unclosed tags, invalid encoding, bad entities).
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute syntax error
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document element is not a recognizable `bom` root.
    #[error("unexpected root element: {0}")]
    UnexpectedRoot(String),

    /// Document ended inside an open element.
    #[error("unexpected end of document")]
    UnexpectedEof,

    /// Invalid timestamp format
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Hash algorithm token not in the known registry
    #[error("unknown hash algorithm: {0}")]
    InvalidHashAlgorithm(String),

    /// An enumeration field carried a token outside its closed value set.
    #[error("invalid value for {field}: {value}")]
    InvalidEnumValue {
        /// The field or attribute that was being converted
        field: &'static str,
        /// The offending token from the document
        value: String,
    },

    /// Attachment payload could not be decoded with its declared encoding.
    #[error("invalid {encoding} attachment payload: {message}")]
    InvalidAttachment {
        /// The declared encoding (e.g. "base64")
        encoding: String,
        /// Description of the decode failure
        message: String,
    },

    /// Missing required field or attribute
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Integer parsing error
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

/// Result type alias for CycloneDX XML operations.
pub type Result<T> = std::result::Result<T, Error>;
