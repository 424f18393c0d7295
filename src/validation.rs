//! Structural validation of BOM documents against a schema version.
//!
//! Validation accumulates every problem it finds instead of stopping at the
//! first one, and it never fails for anything the document itself did wrong:
//! document defects come back as [`ValidationDiagnostic`] values. A document
//! that is not even well-formed XML produces a single [`Severity::Fatal`]
//! diagnostic, kept distinct from ordinary conformance errors because
//! well-formedness is a precondition of validation.
//!
//! The rules for each version come from the compiled [`SchemaRules`] tables
//! in [`crate::schema`], served out of the shared cache.

use crate::model::HashAlgorithm;
use crate::schema::{SchemaRules, SchemaVersion, SCHEMAS};
use roxmltree::{Document, Node};
use std::fmt;

/// How bad a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Suspicious but tolerable
    Warning,
    /// A schema constraint violation
    Error,
    /// The document could not be validated at all (not well-formed)
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// A single non-fatal report of the document failing a structural rule.
///
/// Diagnostics are collected, never thrown; an empty collection means the
/// document conforms to the version it was validated against.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationDiagnostic {
    /// Severity of the finding
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// The underlying error text, when one exists
    pub cause: Option<String>,
}

impl ValidationDiagnostic {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            cause: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            cause: None,
        }
    }

    fn fatal(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            severity: Severity::Fatal,
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {} ({})", self.severity, self.message, cause),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Validates a document against the given schema version.
///
/// `None` means "latest"; callers that failed to resolve a version from the
/// document's namespaces fall back the same way. Every diagnostic found is
/// returned; the list is empty exactly when the document conforms.
pub fn validate_str(xml: &str, version: Option<SchemaVersion>) -> Vec<ValidationDiagnostic> {
    let version = version.unwrap_or_else(|| {
        tracing::debug!(
            fallback = %SchemaVersion::LATEST,
            "no target schema version, validating against latest"
        );
        SchemaVersion::LATEST
    });
    let rules = SCHEMAS.get(version);

    let doc = match Document::parse(xml) {
        Ok(doc) => doc,
        Err(e) => {
            return vec![ValidationDiagnostic::fatal(
                "document is not well-formed XML",
                e,
            )]
        }
    };

    let mut validator = Validator {
        rules,
        diagnostics: Vec::new(),
    };
    validator.check_root(doc.root_element());
    validator.diagnostics
}

/// Validates a raw byte buffer. Bytes that are not UTF-8 cannot be validated
/// and produce a single fatal diagnostic, the same class as malformed XML.
pub fn validate_bytes(bytes: &[u8], version: Option<SchemaVersion>) -> Vec<ValidationDiagnostic> {
    match std::str::from_utf8(bytes) {
        Ok(xml) => validate_str(xml, version),
        Err(e) => vec![ValidationDiagnostic::fatal("document is not valid UTF-8", e)],
    }
}

/// Returns true when [`validate_str`] finds nothing to report.
pub fn is_valid_str(xml: &str, version: Option<SchemaVersion>) -> bool {
    validate_str(xml, version).is_empty()
}

struct Validator<'a> {
    rules: &'a SchemaRules,
    diagnostics: Vec<ValidationDiagnostic>,
}

impl<'a> Validator<'a> {
    fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(ValidationDiagnostic::error(message));
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.diagnostics.push(ValidationDiagnostic::warning(message));
    }

    /// True for elements that belong to the BOM vocabulary being checked.
    /// Elements from foreign namespaces (signatures, vendor extensions) are
    /// outside the schema's scope and are not validated.
    fn in_bom_namespace(&self, node: Node<'_, '_>) -> bool {
        match node.tag_name().namespace() {
            Some(ns) => ns == self.rules.namespace,
            None => true,
        }
    }

    fn check_root(&mut self, root: Node<'_, '_>) {
        if root.tag_name().name() != "bom" {
            self.error(format!(
                "document element is '{}', expected 'bom'",
                root.tag_name().name()
            ));
            return;
        }

        match root.tag_name().namespace() {
            Some(ns) if ns == self.rules.namespace => {}
            Some(ns) => self.error(format!(
                "document namespace '{}' does not match schema version {} (expected '{}')",
                ns,
                self.rules.version,
                self.rules.namespace
            )),
            None => self.error(format!(
                "document element carries no namespace (expected '{}')",
                self.rules.namespace
            )),
        }

        if let Some(serial) = root.attribute("serialNumber") {
            if !self.rules.serial_number_allowed {
                self.error(format!(
                    "serialNumber attribute is not defined in schema version {}",
                    self.rules.version
                ));
            } else if !is_urn_uuid(serial) {
                self.error(format!(
                    "serialNumber '{}' is not an RFC 4122 urn:uuid",
                    serial
                ));
            }
        }

        if let Some(version) = root.attribute("version") {
            if version.trim().parse::<i32>().is_err() {
                self.error(format!("version attribute '{}' is not an integer", version));
            }
        }

        let mut saw_components = false;
        for child in root.children().filter(Node::is_element) {
            if !self.in_bom_namespace(child) {
                continue;
            }
            let name = child.tag_name().name();
            if !self.rules.bom_children.contains(&name) {
                self.error(format!(
                    "element '{}' is not allowed under 'bom' in schema version {}",
                    name, self.rules.version
                ));
                continue;
            }
            match name {
                "metadata" => self.check_metadata(child),
                "components" => {
                    saw_components = true;
                    self.check_components(child);
                }
                "externalReferences" => self.check_external_references(child),
                "dependencies" => self.check_dependencies(child),
                _ => {}
            }
        }

        if self.rules.components_required && !saw_components {
            self.error(format!(
                "'components' is required under 'bom' in schema version {}",
                self.rules.version
            ));
        }
    }

    fn check_metadata(&mut self, metadata: Node<'_, '_>) {
        for child in metadata.children().filter(Node::is_element) {
            if !self.in_bom_namespace(child) {
                continue;
            }
            match child.tag_name().name() {
                "timestamp" => {
                    let text = child.text().unwrap_or("").trim();
                    if crate::model::parse_timestamp(text).is_err() {
                        self.error(format!("metadata timestamp '{}' is not ISO-8601", text));
                    }
                }
                "tools" => {
                    for tool in child.children().filter(Node::is_element) {
                        for part in tool.children().filter(Node::is_element) {
                            if part.tag_name().name() == "hashes" {
                                self.check_hashes(part);
                            }
                        }
                    }
                }
                "component" => self.check_component(child),
                _ => {}
            }
        }
    }

    fn check_components(&mut self, components: Node<'_, '_>) {
        for child in components.children().filter(Node::is_element) {
            if !self.in_bom_namespace(child) {
                continue;
            }
            if child.tag_name().name() == "component" {
                self.check_component(child);
            } else {
                self.error(format!(
                    "element '{}' is not allowed under 'components'",
                    child.tag_name().name()
                ));
            }
        }
    }

    fn check_component(&mut self, component: Node<'_, '_>) {
        let label = component
            .children()
            .filter(Node::is_element)
            .find(|c| c.tag_name().name() == "name")
            .and_then(|c| c.text())
            .unwrap_or("(unnamed)")
            .to_string();

        match component.attribute("type") {
            Some(token) if self.rules.component_types.contains(&token) => {}
            Some(token) => self.error(format!(
                "component '{}' has type '{}' which is not valid in schema version {}",
                label, token, self.rules.version
            )),
            None => self.error(format!(
                "component '{}' is missing the required 'type' attribute",
                label
            )),
        }

        let mut has_name = false;
        let mut has_version = false;
        let mut has_modified = false;

        for child in component.children().filter(Node::is_element) {
            if !self.in_bom_namespace(child) {
                continue;
            }
            let name = child.tag_name().name();
            if !self.rules.component_children.contains(&name) {
                self.error(format!(
                    "element '{}' is not allowed under 'component' in schema version {}",
                    name, self.rules.version
                ));
                continue;
            }
            match name {
                "name" => has_name = true,
                "version" => has_version = true,
                "modified" => has_modified = true,
                "scope" => {
                    let token = child.text().unwrap_or("").trim();
                    if !self.rules.scopes.contains(&token) {
                        self.error(format!(
                            "component '{}' has invalid scope '{}'",
                            label, token
                        ));
                    }
                }
                "hashes" => self.check_hashes(child),
                "licenses" => self.check_licenses(child),
                "externalReferences" => self.check_external_references(child),
                "components" => self.check_components(child),
                "pedigree" => self.check_pedigree(child),
                _ => {}
            }
        }

        if !has_name {
            self.error(format!("component '{}' is missing required 'name'", label));
        }
        if !has_version {
            self.error(format!(
                "component '{}' is missing required 'version'",
                label
            ));
        }
        if self.rules.modified_required && !has_modified {
            self.error(format!(
                "component '{}' is missing 'modified', required in schema version {}",
                label, self.rules.version
            ));
        }
    }

    fn check_pedigree(&mut self, pedigree: Node<'_, '_>) {
        for child in pedigree.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "ancestors" | "descendants" | "variants" => self.check_components(child),
                _ => {}
            }
        }
    }

    fn check_hashes(&mut self, hashes: Node<'_, '_>) {
        for hash in hashes.children().filter(Node::is_element) {
            if hash.tag_name().name() != "hash" {
                continue;
            }
            let alg = match hash.attribute("alg") {
                Some(alg) => alg,
                None => {
                    self.error("hash is missing the required 'alg' attribute");
                    continue;
                }
            };
            if !self.rules.hash_algorithms.contains(&alg) {
                self.error(format!(
                    "hash algorithm '{}' is not valid in schema version {}",
                    alg, self.rules.version
                ));
                continue;
            }
            let digest = hash.text().unwrap_or("").trim();
            if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                self.error(format!("hash value '{}' is not a hex digest", digest));
            } else if let Ok(parsed) = alg.parse::<HashAlgorithm>() {
                if digest.len() != parsed.expected_hex_len() {
                    self.warning(format!(
                        "{} digest has {} hex characters, expected {}",
                        alg,
                        digest.len(),
                        parsed.expected_hex_len()
                    ));
                }
            }
        }
    }

    fn check_licenses(&mut self, licenses: Node<'_, '_>) {
        for child in licenses.children().filter(Node::is_element) {
            if child.tag_name().name() != "license" {
                continue;
            }
            let mut has_id = false;
            let mut has_name = false;
            for part in child.children().filter(Node::is_element) {
                match part.tag_name().name() {
                    "id" => has_id = true,
                    "name" => has_name = true,
                    _ => {}
                }
            }
            if !has_id && !has_name {
                self.error("license must carry either an 'id' or a 'name'");
            } else if has_id && has_name {
                self.warning("license carries both 'id' and 'name'; they are alternatives");
            }
        }
    }

    fn check_external_references(&mut self, references: Node<'_, '_>) {
        for reference in references.children().filter(Node::is_element) {
            if reference.tag_name().name() != "reference" {
                continue;
            }
            match reference.attribute("type") {
                Some(token) if self.rules.external_reference_types.contains(&token) => {}
                Some(token) => self.error(format!(
                    "external reference type '{}' is not valid in schema version {}",
                    token, self.rules.version
                )),
                None => self.error("external reference is missing the required 'type' attribute"),
            }
            let has_url = reference
                .children()
                .filter(Node::is_element)
                .any(|c| c.tag_name().name() == "url");
            if !has_url {
                self.error("external reference is missing required 'url'");
            }
        }
    }

    fn check_dependencies(&mut self, dependencies: Node<'_, '_>) {
        for dependency in dependencies.children().filter(Node::is_element) {
            if dependency.tag_name().name() != "dependency" {
                continue;
            }
            if dependency.attribute("ref").is_none() {
                self.error("dependency is missing the required 'ref' attribute");
            }
            self.check_dependencies(dependency);
        }
    }
}

/// Checks the `urn:uuid:xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` shape.
fn is_urn_uuid(s: &str) -> bool {
    let Some(uuid) = s.strip_prefix("urn:uuid:") else {
        return false;
    };
    let bytes = uuid.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    uuid.char_indices().all(|(i, c)| match i {
        8 | 13 | 18 | 23 => c == '-',
        _ => c.is_ascii_hexdigit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALID_1_2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.2" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79" version="1">
  <components>
    <component type="library">
      <name>tomcat-catalina</name>
      <version>9.0.14</version>
      <hashes>
        <hash alg="SHA-256">2fd4e1c67a2d28fced849ee1bb76e7391b93eb12b7a2d28fced849ee1bb76e73</hash>
      </hashes>
    </component>
  </components>
</bom>"#;

    const VALID_1_0: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.0" version="1">
  <components>
    <component type="library">
      <name>acme-lib</name>
      <version>1.0.0</version>
      <modified>false</modified>
    </component>
  </components>
</bom>"#;

    #[test]
    fn test_valid_document_has_no_diagnostics() {
        let diags = validate_str(VALID_1_2, Some(SchemaVersion::V1_2));
        assert_eq!(
            diags
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<_>>(),
            Vec::<String>::new()
        );
        assert!(is_valid_str(VALID_1_2, Some(SchemaVersion::V1_2)));
    }

    #[test]
    fn test_valid_1_0_document() {
        assert!(is_valid_str(VALID_1_0, Some(SchemaVersion::V1_0)));
    }

    #[test]
    fn test_default_version_is_latest() {
        // VALID_1_2 conforms to the latest version, so the unspecified-version
        // path accepts it.
        assert!(is_valid_str(VALID_1_2, None));
        // The 1.0 document does not: wrong namespace, modified not allowed to
        // stand in for the 1.2 layout.
        assert!(!is_valid_str(VALID_1_0, None));
    }

    #[test]
    fn test_is_valid_equals_validate_is_empty() {
        for doc in [VALID_1_0, VALID_1_2, "<bom/>", "<oops>"] {
            for version in [None, Some(SchemaVersion::V1_0), Some(SchemaVersion::V1_2)] {
                assert_eq!(
                    is_valid_str(doc, version),
                    validate_str(doc, version).is_empty()
                );
            }
        }
    }

    #[test]
    fn test_malformed_xml_is_fatal_not_a_panic() {
        let diags = validate_str("<bom><components>", Some(SchemaVersion::V1_2));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Fatal);
        assert!(diags[0].cause.is_some());
    }

    #[test]
    fn test_diagnostics_accumulate() {
        // Multiple independent violations all get reported in one pass.
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2">
          <components>
            <component type="spaceship">
              <scope>sometimes</scope>
            </component>
          </components>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_2));
        // bad type, bad scope, missing name, missing version
        assert!(diags.len() >= 4, "got: {:?}", diags);
        assert!(diags.iter().all(|d| d.severity == Severity::Error));
    }

    #[test]
    fn test_version_mismatch_is_a_diagnostic_not_an_error() {
        let diags = validate_str(VALID_1_0, Some(SchemaVersion::V1_2));
        assert!(!diags.is_empty());
        assert!(diags
            .iter()
            .any(|d| d.message.contains("does not match schema version 1.2")));
    }

    #[test]
    fn test_serial_number_rules() {
        let bad = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2" serialNumber="not-a-urn">
          <components/>
        </bom>"#;
        let diags = validate_str(bad, Some(SchemaVersion::V1_2));
        assert!(diags.iter().any(|d| d.message.contains("urn:uuid")));

        // serialNumber did not exist in 1.0
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.0" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79">
          <components/>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_0));
        assert!(diags
            .iter()
            .any(|d| d.message.contains("not defined in schema version 1.0")));
    }

    #[test]
    fn test_elements_from_later_versions_are_rejected() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.1">
          <metadata/>
          <components/>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_1));
        assert!(diags
            .iter()
            .any(|d| d.message.contains("'metadata' is not allowed")));
    }

    #[test]
    fn test_modified_required_in_1_0() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.0">
          <components>
            <component type="library">
              <name>x</name>
              <version>1</version>
            </component>
          </components>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_0));
        assert!(diags.iter().any(|d| d.message.contains("'modified'")));
    }

    #[test]
    fn test_hash_checks() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2">
          <components>
            <component type="library">
              <name>x</name>
              <version>1</version>
              <hashes>
                <hash alg="BLAKE3">zzzz</hash>
                <hash alg="SHA-256">abc1</hash>
              </hashes>
            </component>
          </components>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_2));
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Error && d.message.contains("hex digest")));
        assert!(diags
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("expected 64")));

        // BLAKE3 was introduced in 1.2
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.1">
          <components>
            <component type="library">
              <name>x</name>
              <version>1</version>
              <hashes><hash alg="BLAKE3">00ff</hash></hashes>
            </component>
          </components>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_1));
        assert!(diags
            .iter()
            .any(|d| d.message.contains("'BLAKE3' is not valid in schema version 1.1")));
    }

    #[test]
    fn test_foreign_namespace_elements_are_ignored() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2"
                          xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
          <components>
            <component type="library">
              <name>x</name>
              <version>1</version>
            </component>
          </components>
          <ds:Signature>anything</ds:Signature>
        </bom>"#;
        assert!(is_valid_str(xml, Some(SchemaVersion::V1_2)));
    }

    #[test]
    fn test_dependency_ref_required() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2">
          <dependencies>
            <dependency/>
          </dependencies>
        </bom>"#;
        let diags = validate_str(xml, Some(SchemaVersion::V1_2));
        assert!(diags.iter().any(|d| d.message.contains("'ref'")));
    }

    #[test]
    fn test_urn_uuid_shape() {
        assert!(is_urn_uuid("urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79"));
        assert!(!is_urn_uuid("urn:uuid:3e671687"));
        assert!(!is_urn_uuid("3e671687-395b-41f5-a30f-a58921a69b79"));
        assert!(!is_urn_uuid("urn:uuid:3e671687-395b-41f5-a30f-a58921a69bzz"));
    }
}
