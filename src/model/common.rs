//! Scalar types shared across the BOM object model.
//!
//! These carry the non-trivial wire encodings: algorithm-tagged hashes,
//! ISO-8601 timestamps, and encoded attachment payloads.

use crate::error::ParseError;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Hashes
// ============================================================================

/// Hash algorithms recognized across CycloneDX schema versions.
///
/// The registry is closed: an algorithm token outside this set is a parse
/// failure, never coerced to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HashAlgorithm {
    /// MD5 (128-bit)
    Md5,
    /// SHA-1 (160-bit)
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384 (1.2+)
    Sha3_384,
    /// SHA3-512
    Sha3_512,
    /// BLAKE2b-256 (1.2+)
    Blake2b256,
    /// BLAKE2b-384 (1.2+)
    Blake2b384,
    /// BLAKE2b-512 (1.2+)
    Blake2b512,
    /// BLAKE3 (1.2+)
    Blake3,
}

impl HashAlgorithm {
    /// Returns the wire token for this algorithm (the `alg` attribute value).
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Sha3_256 => "SHA3-256",
            HashAlgorithm::Sha3_384 => "SHA3-384",
            HashAlgorithm::Sha3_512 => "SHA3-512",
            HashAlgorithm::Blake2b256 => "BLAKE2b-256",
            HashAlgorithm::Blake2b384 => "BLAKE2b-384",
            HashAlgorithm::Blake2b512 => "BLAKE2b-512",
            HashAlgorithm::Blake3 => "BLAKE3",
        }
    }

    /// Returns the expected digest length in hexadecimal characters.
    pub fn expected_hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 | HashAlgorithm::Blake2b256 => 64,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha3_384 | HashAlgorithm::Blake2b384 => 96,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 | HashAlgorithm::Blake2b512 => 128,
            // BLAKE3 output is extensible; the schema fixes it at 256 bits
            HashAlgorithm::Blake3 => 64,
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MD5" => Ok(HashAlgorithm::Md5),
            "SHA-1" => Ok(HashAlgorithm::Sha1),
            "SHA-256" => Ok(HashAlgorithm::Sha256),
            "SHA-384" => Ok(HashAlgorithm::Sha384),
            "SHA-512" => Ok(HashAlgorithm::Sha512),
            "SHA3-256" => Ok(HashAlgorithm::Sha3_256),
            "SHA3-384" => Ok(HashAlgorithm::Sha3_384),
            "SHA3-512" => Ok(HashAlgorithm::Sha3_512),
            "BLAKE2b-256" => Ok(HashAlgorithm::Blake2b256),
            "BLAKE2b-384" => Ok(HashAlgorithm::Blake2b384),
            "BLAKE2b-512" => Ok(HashAlgorithm::Blake2b512),
            "BLAKE3" => Ok(HashAlgorithm::Blake3),
            _ => Err(ParseError::InvalidHashAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An algorithm-tagged hash value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hash {
    /// The hash algorithm
    pub algorithm: HashAlgorithm,
    /// The digest as a hexadecimal string
    pub value: String,
}

impl Hash {
    /// Creates a new hash value.
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Parses an ISO 8601 timestamp string.
///
/// Accepts RFC 3339 as well as the common zoneless variants producers emit;
/// zoneless values are taken as UTC.
pub fn parse_timestamp(s: &str) -> std::result::Result<DateTime<FixedOffset>, ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%SZ",
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%:z",
    ];

    for fmt in formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
    }

    Err(ParseError::InvalidTimestamp(s.to_string()))
}

// ============================================================================
// Attachments
// ============================================================================

/// An attachment payload (license text, SWID tag body) with its declared
/// encoding.
///
/// The content is held decoded; the original encoding tag is retained so the
/// provenance of the bytes stays visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachmentText {
    /// MIME type of the content (defaults to text/plain in the schema)
    pub content_type: Option<String>,
    /// The declared wire encoding, if any (e.g. "base64")
    pub encoding: Option<String>,
    /// Decoded content bytes
    pub content: Vec<u8>,
}

impl AttachmentText {
    /// Builds an attachment from its wire form, decoding the payload
    /// according to the declared encoding.
    ///
    /// Only "base64" is a recognized encoding; an absent encoding means the
    /// text is taken verbatim. A declared encoding that cannot be applied is
    /// a parse failure.
    pub fn from_wire(
        content_type: Option<String>,
        encoding: Option<String>,
        text: &str,
    ) -> std::result::Result<Self, ParseError> {
        let content = match encoding.as_deref() {
            Some("base64") => base64::engine::general_purpose::STANDARD
                .decode(text.trim())
                .map_err(|e| ParseError::InvalidAttachment {
                    encoding: "base64".to_string(),
                    message: e.to_string(),
                })?,
            Some(other) => {
                return Err(ParseError::InvalidAttachment {
                    encoding: other.to_string(),
                    message: "unsupported encoding".to_string(),
                })
            }
            None => text.as_bytes().to_vec(),
        };
        Ok(Self {
            content_type,
            encoding,
            content,
        })
    }

    /// Returns the content as UTF-8 text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}
