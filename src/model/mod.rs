//! The CycloneDX BOM object model.
//!
//! Typed representation of a bill of materials document:
//!
//! - [`Bom`] - The root aggregate
//! - [`Component`] - A software component, possibly nested
//! - [`Metadata`] - Document provenance (1.2+)
//! - [`Dependency`] - The dependency graph (1.2+)
//!
//! Also provides the scalar types with non-trivial wire encodings:
//! - [`Hash`] and [`HashAlgorithm`] - Algorithm-tagged digests
//! - [`AttachmentText`] - Encoded attachment payloads
//! - Closed enumerations ([`Classification`], [`Scope`],
//!   [`ExternalReferenceType`]) whose `FromStr` impls reject unknown tokens

mod bom;
mod common;
mod component;
mod metadata;

pub use bom::{Bom, Dependency};
pub use common::{parse_timestamp, AttachmentText, Hash, HashAlgorithm};
pub use component::{
    Classification, Commit, Component, ExternalReference, ExternalReferenceType,
    IdentifiableAction, License, LicenseChoice, Pedigree, Scope, Swid,
};
pub use metadata::{Metadata, OrganizationalContact, OrganizationalEntity, Tool};
