//! Component and the types hanging off it: licenses, pedigree, SWID tags,
//! and external references.

use crate::error::ParseError;
use crate::model::common::{AttachmentText, Hash};
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::str::FromStr;

/// The kind of thing a component is.
///
/// Serialized as a lowercase token in the `type` attribute. The set is
/// closed; unrecognized tokens are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    /// A standalone application
    Application,
    /// A software framework
    Framework,
    /// A software library
    Library,
    /// A packaged container image (1.1+)
    Container,
    /// An operating system
    OperatingSystem,
    /// A hardware device
    Device,
    /// Device firmware (1.1+)
    Firmware,
    /// A single file
    File,
}

impl Classification {
    /// Returns the wire token for this classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Application => "application",
            Classification::Framework => "framework",
            Classification::Library => "library",
            Classification::Container => "container",
            Classification::OperatingSystem => "operating-system",
            Classification::Device => "device",
            Classification::Firmware => "firmware",
            Classification::File => "file",
        }
    }
}

impl FromStr for Classification {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "application" => Ok(Classification::Application),
            "framework" => Ok(Classification::Framework),
            "library" => Ok(Classification::Library),
            "container" => Ok(Classification::Container),
            "operating-system" => Ok(Classification::OperatingSystem),
            "device" => Ok(Classification::Device),
            "firmware" => Ok(Classification::Firmware),
            "file" => Ok(Classification::File),
            _ => Err(ParseError::InvalidEnumValue {
                field: "component type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a component relates to the thing the BOM describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// Required at runtime
    Required,
    /// Optional or conditionally needed
    Optional,
    /// Present in the source but excluded from the deliverable
    Excluded,
}

impl Scope {
    /// Returns the wire token for this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Required => "required",
            Scope::Optional => "optional",
            Scope::Excluded => "excluded",
        }
    }
}

impl FromStr for Scope {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "required" => Ok(Scope::Required),
            "optional" => Ok(Scope::Optional),
            "excluded" => Ok(Scope::Excluded),
            _ => Err(ParseError::InvalidEnumValue {
                field: "scope",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single license, by SPDX id or by name, optionally with the full text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct License {
    /// SPDX license id (e.g. "Apache-2.0")
    pub id: Option<String>,
    /// License name, for licenses without an SPDX id
    pub name: Option<String>,
    /// Full license text as an attachment
    pub text: Option<AttachmentText>,
    /// URL to the license text
    pub url: Option<String>,
}

/// Either a list of licenses or a single SPDX license expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LicenseChoice {
    /// Individual licenses
    pub licenses: Vec<License>,
    /// An SPDX expression such as "(MIT OR Apache-2.0)"
    pub expression: Option<String>,
}

impl LicenseChoice {
    /// Returns true if neither licenses nor an expression are present.
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty() && self.expression.is_none()
    }
}

/// A SWID (ISO/IEC 19770-2) tag attached to a component. 1.2+.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swid {
    /// Unique tag identifier
    pub tag_id: Option<String>,
    /// Software name as recorded in the tag
    pub name: Option<String>,
    /// Software version
    pub version: Option<String>,
    /// Tag revision number
    pub tag_version: Option<i32>,
    /// Whether this tag describes a patch
    pub patch: Option<bool>,
    /// The full tag body
    pub text: Option<AttachmentText>,
    /// URL to the tag
    pub url: Option<String>,
}

/// A person or automated process that acted on a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentifiableAction {
    /// When the action happened
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Name of the actor
    pub name: Option<String>,
    /// Email of the actor
    pub email: Option<String>,
}

/// A source-control commit in a component's pedigree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commit {
    /// Commit identifier (e.g. git SHA)
    pub uid: Option<String>,
    /// URL to the commit
    pub url: Option<String>,
    /// The authoring action
    pub author: Option<IdentifiableAction>,
    /// The committing action
    pub committer: Option<IdentifiableAction>,
    /// Commit message
    pub message: Option<String>,
}

/// Ancestry and change history of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pedigree {
    /// Components this component descends from
    pub ancestors: Vec<Component>,
    /// Components derived from this component
    pub descendants: Vec<Component>,
    /// Variants of this component
    pub variants: Vec<Component>,
    /// Commits that produced this component
    pub commits: Vec<Commit>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// The kind of resource an external reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExternalReferenceType {
    /// Version control system
    Vcs,
    /// Issue or defect tracker
    IssueTracker,
    /// Project website
    Website,
    /// Security advisories
    Advisories,
    /// Another BOM
    Bom,
    /// Mailing list
    MailingList,
    /// Social media
    Social,
    /// Real-time chat
    Chat,
    /// Documentation
    Documentation,
    /// Support resources
    Support,
    /// Distribution point
    Distribution,
    /// License file
    License,
    /// Build metadata
    BuildMeta,
    /// Build system
    BuildSystem,
    /// Anything else
    Other,
}

impl ExternalReferenceType {
    /// Returns the wire token for this reference type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalReferenceType::Vcs => "vcs",
            ExternalReferenceType::IssueTracker => "issue-tracker",
            ExternalReferenceType::Website => "website",
            ExternalReferenceType::Advisories => "advisories",
            ExternalReferenceType::Bom => "bom",
            ExternalReferenceType::MailingList => "mailing-list",
            ExternalReferenceType::Social => "social",
            ExternalReferenceType::Chat => "chat",
            ExternalReferenceType::Documentation => "documentation",
            ExternalReferenceType::Support => "support",
            ExternalReferenceType::Distribution => "distribution",
            ExternalReferenceType::License => "license",
            ExternalReferenceType::BuildMeta => "build-meta",
            ExternalReferenceType::BuildSystem => "build-system",
            ExternalReferenceType::Other => "other",
        }
    }
}

impl FromStr for ExternalReferenceType {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "vcs" => Ok(ExternalReferenceType::Vcs),
            "issue-tracker" => Ok(ExternalReferenceType::IssueTracker),
            "website" => Ok(ExternalReferenceType::Website),
            "advisories" => Ok(ExternalReferenceType::Advisories),
            "bom" => Ok(ExternalReferenceType::Bom),
            "mailing-list" => Ok(ExternalReferenceType::MailingList),
            "social" => Ok(ExternalReferenceType::Social),
            "chat" => Ok(ExternalReferenceType::Chat),
            "documentation" => Ok(ExternalReferenceType::Documentation),
            "support" => Ok(ExternalReferenceType::Support),
            "distribution" => Ok(ExternalReferenceType::Distribution),
            "license" => Ok(ExternalReferenceType::License),
            "build-meta" => Ok(ExternalReferenceType::BuildMeta),
            "build-system" => Ok(ExternalReferenceType::BuildSystem),
            "other" => Ok(ExternalReferenceType::Other),
            _ => Err(ParseError::InvalidEnumValue {
                field: "external reference type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExternalReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed link from a component (or the BOM itself) to an external resource.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalReference {
    /// What the reference points at
    pub reference_type: ExternalReferenceType,
    /// The URL of the resource
    pub url: Option<String>,
    /// Free-form comment
    pub comment: Option<String>,
}

impl ExternalReference {
    /// Creates a new external reference of the given type.
    pub fn new(reference_type: ExternalReferenceType) -> Self {
        Self {
            reference_type,
            url: None,
            comment: None,
        }
    }
}

/// A single software component described by the BOM.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// The component classification (the required `type` attribute)
    pub component_type: Classification,
    /// BOM-internal reference id (`bom-ref` attribute, 1.1+)
    pub bom_ref: Option<String>,
    /// MIME type of the component (1.2+)
    pub mime_type: Option<String>,
    /// The organization that supplied the component (1.2+)
    pub supplier: Option<super::metadata::OrganizationalEntity>,
    /// The component author (1.2+)
    pub author: Option<String>,
    /// The entity that published the component
    pub publisher: Option<String>,
    /// Namespace or group of the component
    pub group: Option<String>,
    /// Component name
    pub name: Option<String>,
    /// Component version
    pub version: Option<String>,
    /// Human-readable description
    pub description: Option<String>,
    /// Usage scope
    pub scope: Option<Scope>,
    /// Cryptographic hashes of the component artifact
    pub hashes: Vec<Hash>,
    /// License information
    pub licenses: Option<LicenseChoice>,
    /// Copyright statement
    pub copyright: Option<String>,
    /// CPE identifier
    pub cpe: Option<String>,
    /// Package URL
    pub purl: Option<String>,
    /// SWID tag (1.2+)
    pub swid: Option<Swid>,
    /// Whether the component was modified from the original (required in 1.0)
    pub modified: Option<bool>,
    /// Ancestry information (1.1+)
    pub pedigree: Option<Pedigree>,
    /// External references
    pub external_references: Vec<ExternalReference>,
    /// Nested subcomponents
    pub components: Vec<Component>,
}

impl Component {
    /// Creates an empty component of the given classification.
    pub fn new(component_type: Classification) -> Self {
        Self {
            component_type,
            bom_ref: None,
            mime_type: None,
            supplier: None,
            author: None,
            publisher: None,
            group: None,
            name: None,
            version: None,
            description: None,
            scope: None,
            hashes: Vec::new(),
            licenses: None,
            copyright: None,
            cpe: None,
            purl: None,
            swid: None,
            modified: None,
            pedigree: None,
            external_references: Vec::new(),
            components: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_tokens() {
        assert_eq!(
            "operating-system".parse::<Classification>().unwrap(),
            Classification::OperatingSystem
        );
        assert!("malware".parse::<Classification>().is_err());
        // Uppercase is not a valid token
        assert!("Library".parse::<Classification>().is_err());
    }

    #[test]
    fn test_scope_tokens() {
        assert_eq!("required".parse::<Scope>().unwrap(), Scope::Required);
        assert!("mandatory".parse::<Scope>().is_err());
    }

    #[test]
    fn test_external_reference_type_tokens() {
        assert_eq!(
            "issue-tracker".parse::<ExternalReferenceType>().unwrap(),
            ExternalReferenceType::IssueTracker
        );
        assert!("homepage".parse::<ExternalReferenceType>().is_err());
    }

    #[test]
    fn test_license_choice_empty() {
        let lc = LicenseChoice::default();
        assert!(lc.is_empty());
        let lc = LicenseChoice {
            expression: Some("MIT".to_string()),
            ..Default::default()
        };
        assert!(!lc.is_empty());
    }
}
