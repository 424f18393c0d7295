//! CycloneDX bill-of-materials XML reader for Rust.
//!
//! This crate reads CycloneDX BOM documents of unknown provenance and
//! vintage: it detects which schema dialect (1.0, 1.1, 1.2) produced a
//! document from its namespace declarations, optionally validates the
//! document against that dialect's structural rules, and deserializes it
//! into a typed object graph. Deserialization dispatches through a closed
//! table of known element names, so no crafted input can cause an
//! unexpected type to be constructed.
//!
//! # Quick Start
//!
//! ```rust
//! use cyclonedx_xml::XmlParser;
//!
//! let xml = r#"<?xml version="1.0"?>
//! <bom xmlns="http://cyclonedx.org/schema/bom/1.2" version="1">
//!   <components>
//!     <component type="library">
//!       <name>tomcat-catalina</name>
//!       <version>9.0.14</version>
//!     </component>
//!   </components>
//! </bom>"#;
//!
//! let parser = XmlParser::new();
//! let bom = parser.parse_str(xml).unwrap();
//! assert_eq!(bom.spec_version(), Some("1.2"));
//! assert_eq!(bom.components[0].name.as_deref(), Some("tomcat-catalina"));
//! ```
//!
//! # Validation
//!
//! Validation is a separate entry point that reports every structural
//! problem as data instead of failing on the first one:
//!
//! ```rust
//! use cyclonedx_xml::{SchemaVersion, XmlParser};
//!
//! let parser = XmlParser::new();
//! for diagnostic in parser.validate_str("<bom/>", Some(SchemaVersion::V1_2)) {
//!     eprintln!("{}", diagnostic);
//! }
//! ```
//!
//! # Module Structure
//!
//! - [`model`] - The typed BOM object graph
//! - [`parser`] - Parse/validate entry points over files, bytes, readers, strings
//! - [`reader`] - The streaming deserializer
//! - [`validation`] - Structural validation with accumulated diagnostics
//! - [`schema`] - The schema version registry and compiled rule cache
//! - [`namespace`] - Namespace declaration sniffing
//! - [`error`] - Error types
//!
//! # Optional Features
//!
//! - `serde` - Enable serde serialization/deserialization support

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod model;
pub mod namespace;
pub mod parser;
pub mod reader;
pub mod schema;
pub mod validation;

// Re-export commonly used types at the crate root
pub use error::{Error, ParseError, Result};
pub use model::{Bom, Classification, Component, Hash, HashAlgorithm, Metadata, Scope};
pub use parser::{parse, XmlParser};
pub use schema::{resolve_version, SchemaVersion};
pub use validation::{Severity, ValidationDiagnostic};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
