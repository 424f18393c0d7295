//! The CycloneDX schema version registry.
//!
//! Every supported schema dialect is represented by a [`SchemaVersion`]
//! variant carrying its canonical namespace URI. The registry is closed and
//! ordered; documents declaring no recognized namespace are handled by the
//! caller falling back to [`SchemaVersion::LATEST`].
//!
//! Per-version structural rules are compiled once per process into
//! [`SchemaRules`] tables and served from a shared [`SchemaCache`].

use crate::namespace::NamespaceDeclaration;
use once_cell::sync::OnceCell;
use std::fmt;
use std::str::FromStr;

/// CycloneDX 1.0 namespace
pub const NS_BOM_1_0: &str = "http://cyclonedx.org/schema/bom/1.0";

/// CycloneDX 1.1 namespace
pub const NS_BOM_1_1: &str = "http://cyclonedx.org/schema/bom/1.1";

/// CycloneDX 1.2 namespace
pub const NS_BOM_1_2: &str = "http://cyclonedx.org/schema/bom/1.2";

/// A supported CycloneDX schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaVersion {
    /// CycloneDX 1.0
    V1_0,
    /// CycloneDX 1.1
    V1_1,
    /// CycloneDX 1.2
    V1_2,
}

impl SchemaVersion {
    /// The most recent schema version this library understands.
    pub const LATEST: SchemaVersion = SchemaVersion::V1_2;

    /// All known versions, oldest first.
    pub fn all() -> [SchemaVersion; 3] {
        [SchemaVersion::V1_0, SchemaVersion::V1_1, SchemaVersion::V1_2]
    }

    /// Returns the canonical namespace URI for this version.
    pub fn namespace(&self) -> &'static str {
        match self {
            SchemaVersion::V1_0 => NS_BOM_1_0,
            SchemaVersion::V1_1 => NS_BOM_1_1,
            SchemaVersion::V1_2 => NS_BOM_1_2,
        }
    }

    /// Returns the human-readable version string (e.g. "1.2").
    pub fn version_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1_0 => "1.0",
            SchemaVersion::V1_1 => "1.1",
            SchemaVersion::V1_2 => "1.2",
        }
    }

    /// Looks up the version whose canonical namespace exactly matches `uri`.
    pub fn from_namespace(uri: &str) -> Option<SchemaVersion> {
        SchemaVersion::all().into_iter().find(|v| v.namespace() == uri)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SchemaVersion::all()
            .into_iter()
            .find(|v| v.version_str() == s)
            .ok_or_else(|| crate::error::ParseError::InvalidEnumValue {
                field: "specVersion",
                value: s.to_string(),
            })
    }
}

/// Resolves the schema version from the namespace declarations of a document.
///
/// Declarations are tested in document order against the registry by exact
/// URI match; the first hit wins. Documents routinely carry unrelated
/// namespaces (XML digital signatures, vendor extensions), so first match in
/// document order is the deliberate tie-break; well-formed producers declare
/// the BOM namespace at or near the root.
///
/// Returns `None` when no declaration matches any known URI; callers fall
/// back to [`SchemaVersion::LATEST`].
pub fn resolve_version(declarations: &[NamespaceDeclaration]) -> Option<SchemaVersion> {
    for decl in declarations {
        if let Some(version) = SchemaVersion::from_namespace(&decl.uri) {
            tracing::debug!(version = %version, "resolved schema version from namespace");
            return Some(version);
        }
    }
    None
}

/// Compiled structural rules for one schema version.
///
/// This is the in-process form of a version's schema definition: the closed
/// token sets and required-element tables the validator checks a document
/// against. Instances are built once per version and shared.
#[derive(Debug)]
pub struct SchemaRules {
    /// The version these rules describe
    pub version: SchemaVersion,
    /// Canonical namespace the document element must carry
    pub namespace: &'static str,
    /// Elements allowed directly under `bom`
    pub bom_children: &'static [&'static str],
    /// Whether `components` must be present under `bom`
    pub components_required: bool,
    /// Whether the `serialNumber` attribute is defined for this version
    pub serial_number_allowed: bool,
    /// Valid tokens for the component `type` attribute
    pub component_types: &'static [&'static str],
    /// Elements allowed inside `component`
    pub component_children: &'static [&'static str],
    /// Whether `modified` is a required child of `component`
    pub modified_required: bool,
    /// Valid tokens for the component `scope` element
    pub scopes: &'static [&'static str],
    /// Valid tokens for the hash `alg` attribute
    pub hash_algorithms: &'static [&'static str],
    /// Valid tokens for the external reference `type` attribute
    pub external_reference_types: &'static [&'static str],
}

const SCOPES: &[&str] = &["required", "optional", "excluded"];

const COMPONENT_TYPES_1_0: &[&str] = &[
    "application",
    "framework",
    "library",
    "operating-system",
    "device",
    "file",
];

const COMPONENT_TYPES_1_1: &[&str] = &[
    "application",
    "framework",
    "library",
    "container",
    "operating-system",
    "device",
    "firmware",
    "file",
];

const HASH_ALGS_1_0: &[&str] = &[
    "MD5", "SHA-1", "SHA-256", "SHA-384", "SHA-512", "SHA3-256", "SHA3-512",
];

const HASH_ALGS_1_2: &[&str] = &[
    "MD5",
    "SHA-1",
    "SHA-256",
    "SHA-384",
    "SHA-512",
    "SHA3-256",
    "SHA3-384",
    "SHA3-512",
    "BLAKE2b-256",
    "BLAKE2b-384",
    "BLAKE2b-512",
    "BLAKE3",
];

const EXT_REF_TYPES: &[&str] = &[
    "vcs",
    "issue-tracker",
    "website",
    "advisories",
    "bom",
    "mailing-list",
    "social",
    "chat",
    "documentation",
    "support",
    "distribution",
    "license",
    "build-meta",
    "build-system",
    "other",
];

const COMPONENT_CHILDREN_1_0: &[&str] = &[
    "publisher",
    "group",
    "name",
    "version",
    "description",
    "scope",
    "hashes",
    "licenses",
    "copyright",
    "cpe",
    "purl",
    "modified",
    "components",
];

const COMPONENT_CHILDREN_1_1: &[&str] = &[
    "publisher",
    "group",
    "name",
    "version",
    "description",
    "scope",
    "hashes",
    "licenses",
    "copyright",
    "cpe",
    "purl",
    "modified",
    "components",
    "pedigree",
    "externalReferences",
];

const COMPONENT_CHILDREN_1_2: &[&str] = &[
    "supplier",
    "author",
    "publisher",
    "group",
    "name",
    "version",
    "description",
    "scope",
    "hashes",
    "licenses",
    "copyright",
    "cpe",
    "purl",
    "swid",
    "modified",
    "components",
    "pedigree",
    "externalReferences",
];

fn compile(version: SchemaVersion) -> SchemaRules {
    match version {
        SchemaVersion::V1_0 => SchemaRules {
            version,
            namespace: NS_BOM_1_0,
            bom_children: &["components"],
            components_required: true,
            serial_number_allowed: false,
            component_types: COMPONENT_TYPES_1_0,
            component_children: COMPONENT_CHILDREN_1_0,
            modified_required: true,
            scopes: SCOPES,
            hash_algorithms: HASH_ALGS_1_0,
            external_reference_types: &[],
        },
        SchemaVersion::V1_1 => SchemaRules {
            version,
            namespace: NS_BOM_1_1,
            bom_children: &["components", "externalReferences"],
            components_required: true,
            serial_number_allowed: true,
            component_types: COMPONENT_TYPES_1_1,
            component_children: COMPONENT_CHILDREN_1_1,
            modified_required: false,
            scopes: SCOPES,
            hash_algorithms: HASH_ALGS_1_0,
            external_reference_types: EXT_REF_TYPES,
        },
        SchemaVersion::V1_2 => SchemaRules {
            version,
            namespace: NS_BOM_1_2,
            bom_children: &["metadata", "components", "externalReferences", "dependencies"],
            components_required: false,
            serial_number_allowed: true,
            component_types: COMPONENT_TYPES_1_1,
            component_children: COMPONENT_CHILDREN_1_2,
            modified_required: false,
            scopes: SCOPES,
            hash_algorithms: HASH_ALGS_1_2,
            external_reference_types: EXT_REF_TYPES,
        },
    }
}

/// Process-wide cache of compiled schema rules.
///
/// One slot per registered version, populated lazily on first use. `OnceCell`
/// gives initialize-once-under-lock semantics, so concurrent validators share
/// a single compilation per version and take no lock on the hot path.
pub struct SchemaCache {
    slots: [OnceCell<SchemaRules>; 3],
}

impl SchemaCache {
    const fn new() -> Self {
        Self {
            slots: [OnceCell::new(), OnceCell::new(), OnceCell::new()],
        }
    }

    /// Returns the compiled rules for `version`, compiling them on first use.
    pub fn get(&self, version: SchemaVersion) -> &SchemaRules {
        let idx = match version {
            SchemaVersion::V1_0 => 0,
            SchemaVersion::V1_1 => 1,
            SchemaVersion::V1_2 => 2,
        };
        self.slots[idx].get_or_init(|| compile(version))
    }
}

/// The shared schema rule cache.
pub static SCHEMAS: SchemaCache = SchemaCache::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_lookup() {
        assert_eq!(
            SchemaVersion::from_namespace("http://cyclonedx.org/schema/bom/1.2"),
            Some(SchemaVersion::V1_2)
        );
        assert_eq!(
            SchemaVersion::from_namespace("http://cyclonedx.org/schema/bom/9.9"),
            None
        );
        // Exact match only, no prefix matching
        assert_eq!(
            SchemaVersion::from_namespace("http://cyclonedx.org/schema/bom/1.2/"),
            None
        );
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let decls = vec![
            NamespaceDeclaration {
                uri: "http://www.w3.org/2000/09/xmldsig#".to_string(),
            },
            NamespaceDeclaration {
                uri: NS_BOM_1_1.to_string(),
            },
            NamespaceDeclaration {
                uri: NS_BOM_1_2.to_string(),
            },
        ];
        assert_eq!(resolve_version(&decls), Some(SchemaVersion::V1_1));
    }

    #[test]
    fn test_resolve_unknown() {
        let decls = vec![NamespaceDeclaration {
            uri: "http://example.org/custom".to_string(),
        }];
        assert_eq!(resolve_version(&decls), None);
        assert_eq!(resolve_version(&[]), None);
    }

    #[test]
    fn test_version_string_round_trip() {
        for v in SchemaVersion::all() {
            assert_eq!(v.version_str().parse::<SchemaVersion>().unwrap(), v);
        }
        assert!("2.0".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_cache_returns_same_rules() {
        let a = SCHEMAS.get(SchemaVersion::V1_2);
        let b = SCHEMAS.get(SchemaVersion::V1_2);
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.version, SchemaVersion::V1_2);
    }

    #[test]
    fn test_rules_track_version_features() {
        let v10 = SCHEMAS.get(SchemaVersion::V1_0);
        assert!(!v10.serial_number_allowed);
        assert!(v10.modified_required);
        assert!(!v10.bom_children.contains(&"metadata"));
        assert!(!v10.component_types.contains(&"container"));

        let v12 = SCHEMAS.get(SchemaVersion::V1_2);
        assert!(v12.serial_number_allowed);
        assert!(v12.bom_children.contains(&"dependencies"));
        assert!(v12.hash_algorithms.contains(&"BLAKE3"));
    }
}
