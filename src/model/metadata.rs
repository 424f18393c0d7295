//! BOM metadata: who produced the document, when, and with what. 1.2+.

use crate::model::common::Hash;
use crate::model::component::Component;
use chrono::{DateTime, FixedOffset};

/// A contact at an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrganizationalContact {
    /// Contact name
    pub name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
}

/// An organization, with URLs and contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrganizationalEntity {
    /// Organization name
    pub name: Option<String>,
    /// Organization URLs
    pub urls: Vec<String>,
    /// Contacts at the organization
    pub contacts: Vec<OrganizationalContact>,
}

/// A tool that was used to create the BOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tool {
    /// Tool vendor
    pub vendor: Option<String>,
    /// Tool name
    pub name: Option<String>,
    /// Tool version
    pub version: Option<String>,
    /// Hashes of the tool binary
    pub hashes: Vec<Hash>,
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// When the BOM was created
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Tools used to create the BOM
    pub tools: Vec<Tool>,
    /// People who authored the BOM
    pub authors: Vec<OrganizationalContact>,
    /// The component the BOM describes
    pub component: Option<Component>,
    /// The organization that manufactured the described component
    pub manufacture: Option<OrganizationalEntity>,
    /// The organization that supplied the described component
    pub supplier: Option<OrganizationalEntity>,
}
