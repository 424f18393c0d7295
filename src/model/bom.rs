//! The root BOM aggregate.

use crate::model::component::{Component, ExternalReference};
use crate::model::metadata::Metadata;

/// A dependency graph edge: one component and the refs it depends on. 1.2+.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dependency {
    /// The `bom-ref` of the depending component
    pub dependency_ref: String,
    /// The dependencies of that component
    pub dependencies: Vec<Dependency>,
}

impl Dependency {
    /// Creates a dependency entry for the given ref.
    pub fn new(dependency_ref: impl Into<String>) -> Self {
        Self {
            dependency_ref: dependency_ref.into(),
            dependencies: Vec::new(),
        }
    }
}

/// The root of a CycloneDX bill of materials.
///
/// `spec_version` records which schema dialect the document was detected to
/// carry. It is provenance, not payload: there is deliberately no public way
/// to set it, so a caller cannot fabricate a version claim. The only write
/// path is the crate-internal one used after namespace-based version
/// resolution.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bom {
    /// Document version (the `version` attribute, defaults to 1)
    pub version: i32,
    /// RFC 4122 serial number urn (1.1+)
    pub serial_number: Option<String>,
    /// Detected schema version string; crate-internal write path only
    spec_version: Option<String>,
    /// Document metadata (1.2+)
    pub metadata: Option<Metadata>,
    /// The components the BOM describes
    pub components: Vec<Component>,
    /// Document-level external references (1.1+)
    pub external_references: Vec<ExternalReference>,
    /// The dependency graph (1.2+)
    pub dependencies: Vec<Dependency>,
}

impl Bom {
    /// Creates an empty BOM with document version 1.
    pub fn new() -> Self {
        Self {
            version: 1,
            ..Default::default()
        }
    }

    /// The schema version the document was detected to conform to, if any.
    ///
    /// Unset when no registered namespace was found in the document; absence
    /// is accepted lenient behavior, not an error.
    pub fn spec_version(&self) -> Option<&str> {
        self.spec_version.as_deref()
    }

    /// Records the detected schema version. Only reachable from the version
    /// resolution path inside this crate.
    pub(crate) fn set_spec_version(&mut self, version: String) {
        self.spec_version = Some(version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_version_write_path() {
        let mut bom = Bom::new();
        assert_eq!(bom.spec_version(), None);
        bom.set_spec_version("1.2".to_string());
        assert_eq!(bom.spec_version(), Some("1.2"));
    }

    #[test]
    fn test_new_defaults() {
        let bom = Bom::new();
        assert_eq!(bom.version, 1);
        assert!(bom.components.is_empty());
        assert!(bom.serial_number.is_none());
    }
}
