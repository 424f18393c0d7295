//! Streaming BOM deserializer.
//!
//! Maps untrusted XML onto the typed object model with a fixed dispatch
//! table: every `match` arm below is the allow list. An element name taken
//! from the document can only ever select one of the constructors written
//! here; there is no dynamic type resolution, so no document content can
//! cause a type outside the model to be instantiated.
//!
//! Reading is tolerant: elements and attributes the tables do not know are
//! skipped with balanced-depth scanning, which keeps forward compatibility
//! with extension namespaces and later schema versions. Skipping is
//! namespace-aware: only elements in the document's own vocabulary (the
//! root's namespace, a registered BOM namespace, or no namespace at all)
//! reach the dispatch tables, so content from a foreign namespace such as
//! an enveloped signature can never populate a model field that happens to
//! share its local name. Scalar conversions are not tolerant: an
//! unrecognized enumeration token, a bad timestamp, a bad boolean, or an
//! undecodable attachment payload aborts the parse.

use crate::error::{Error, ParseError, Result};
use crate::model::{
    parse_timestamp, AttachmentText, Bom, Commit, Component, Dependency, ExternalReference,
    Hash, HashAlgorithm, IdentifiableAction, License, LicenseChoice, Metadata,
    OrganizationalContact, OrganizationalEntity, Pedigree, Swid, Tool,
};
use crate::schema::SchemaVersion;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::io::BufRead;
use std::str;

/// An XML event with all data extracted into owned form.
///
/// Self-closing elements never surface as their own variant: the reader
/// emits them as a `Start` followed by a deferred `End`, so every consumer
/// loop sees one uniform shape per element.
enum Node {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End,
    Text(String),
    Eof,
}

/// What `next_node` decided to do with a raw event, computed while the
/// event still borrows the read buffer.
enum Step {
    Emit(Node),
    EmitClosed(Node),
    SkipForeign,
    Nothing,
}

/// A streaming CycloneDX BOM reader.
///
/// Consumes XML events from any `BufRead` source and builds a [`Bom`]. Each
/// document element is matched by local name against the known model tables;
/// the root element must be `bom`.
pub struct BomReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    /// The root element's resolved namespace, captured on the first element.
    /// `None` until the root is seen; `Some(None)` for an unbound root.
    vocabulary: Option<Option<Vec<u8>>>,
    /// A self-closing element was emitted as `Start`; the next node is its
    /// synthesized `End`.
    pending_end: bool,
}

impl<R: BufRead> BomReader<R> {
    /// Creates a reader over a buffered source.
    pub fn from_reader(reader: R) -> Self {
        let mut xml_reader = NsReader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);
        Self {
            reader: xml_reader,
            buf: Vec::with_capacity(4096),
            vocabulary: None,
            pending_end: false,
        }
    }

    /// Reads the document and returns the mapped object graph.
    ///
    /// Fails with a parse error on malformed XML, a root element other than
    /// `bom`, or any scalar the model cannot represent.
    pub fn read(mut self) -> Result<Bom> {
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => {
                    if name != "bom" {
                        return Err(ParseError::UnexpectedRoot(name).into());
                    }
                    return self.read_bom(&attrs);
                }
                Node::Text(_) => {}
                Node::End => return Err(ParseError::UnexpectedEof.into()),
                Node::Eof => {
                    return Err(ParseError::MissingField("bom root element".to_string()).into())
                }
            }
        }
    }

    /// Pulls the next in-vocabulary event and converts it to owned data.
    ///
    /// Elements bound to a namespace outside the document's vocabulary are
    /// consumed here, subtree and all, and never reach the callers.
    fn next_node(&mut self) -> Result<Node> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(Node::End);
        }
        loop {
            self.buf.clear();
            let step = {
                let (resolution, event) = self
                    .reader
                    .read_resolved_event_into(&mut self.buf)
                    .map_err(ParseError::from)?;
                match event {
                    XmlEvent::Start(ref e) => {
                        if in_vocabulary(&mut self.vocabulary, &resolution) {
                            Step::Emit(Node::Start {
                                name: local_name(e)?,
                                attrs: extract_attrs(e)?,
                            })
                        } else {
                            Step::SkipForeign
                        }
                    }
                    XmlEvent::Empty(ref e) => {
                        if in_vocabulary(&mut self.vocabulary, &resolution) {
                            Step::EmitClosed(Node::Start {
                                name: local_name(e)?,
                                attrs: extract_attrs(e)?,
                            })
                        } else {
                            Step::Nothing
                        }
                    }
                    XmlEvent::End(_) => Step::Emit(Node::End),
                    XmlEvent::Text(ref e) => {
                        let text = e.unescape().map_err(ParseError::from)?.to_string();
                        Step::Emit(Node::Text(text))
                    }
                    XmlEvent::CData(ref e) => {
                        let text = str::from_utf8(e.as_ref())
                            .map_err(ParseError::from)?
                            .to_string();
                        Step::Emit(Node::Text(text))
                    }
                    XmlEvent::Eof => Step::Emit(Node::Eof),
                    _ => Step::Nothing,
                }
            };
            match step {
                Step::Emit(node) => return Ok(node),
                Step::EmitClosed(node) => {
                    self.pending_end = true;
                    return Ok(node);
                }
                Step::SkipForeign => self.skip_foreign()?,
                Step::Nothing => {}
            }
        }
    }

    /// Consumes a foreign element's entire subtree with raw events.
    fn skip_foreign(&mut self) -> Result<()> {
        let mut depth = 1usize;
        loop {
            self.buf.clear();
            match self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(ParseError::from)?
            {
                XmlEvent::Start(_) => depth += 1,
                XmlEvent::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                XmlEvent::Eof => return Err(ParseError::UnexpectedEof.into()),
                _ => {}
            }
        }
    }

    /// Reads text content until the current element closes. Nested elements
    /// are skipped, not appended.
    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.next_node()? {
                Node::Text(t) => text.push_str(&t),
                Node::Start { .. } => self.skip_element()?,
                Node::End => return Ok(text.trim().to_string()),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    /// Consumes events until the current element closes, balancing depth.
    fn skip_element(&mut self) -> Result<()> {
        let mut depth = 1usize;
        loop {
            match self.next_node()? {
                Node::Start { .. } => depth += 1,
                Node::End => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
                _ => {}
            }
        }
    }

    fn apply_bom_attrs(bom: &mut Bom, attrs: &[(String, String)]) -> Result<()> {
        if let Some(v) = attr(attrs, "version") {
            bom.version = v.trim().parse().map_err(ParseError::from)?;
        }
        if let Some(sn) = attr(attrs, "serialNumber") {
            bom.serial_number = Some(sn.to_string());
        }
        Ok(())
    }

    fn read_bom(&mut self, attrs: &[(String, String)]) -> Result<Bom> {
        let mut bom = Bom::new();
        Self::apply_bom_attrs(&mut bom, attrs)?;
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "metadata" => bom.metadata = Some(self.read_metadata()?),
                    "components" => bom.components = self.read_components()?,
                    "externalReferences" => {
                        bom.external_references = self.read_external_references()?
                    }
                    "dependencies" => bom.dependencies = self.read_dependencies()?,
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(bom),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_metadata(&mut self) -> Result<Metadata> {
        let mut metadata = Metadata::default();
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => match name.as_str() {
                    "timestamp" => {
                        let text = self.read_text()?;
                        metadata.timestamp = Some(parse_timestamp(&text).map_err(Error::from)?);
                    }
                    "tools" => metadata.tools = self.read_tools()?,
                    "authors" => metadata.authors = self.read_contact_list("author")?,
                    "component" => metadata.component = Some(self.read_component(&attrs)?),
                    "manufacture" => metadata.manufacture = Some(self.read_org_entity()?),
                    "supplier" => metadata.supplier = Some(self.read_org_entity()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(metadata),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_tools(&mut self) -> Result<Vec<Tool>> {
        let mut tools = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => {
                    if name == "tool" {
                        tools.push(self.read_tool()?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(tools),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_tool(&mut self) -> Result<Tool> {
        let mut tool = Tool::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "vendor" => tool.vendor = Some(self.read_text()?),
                    "name" => tool.name = Some(self.read_text()?),
                    "version" => tool.version = Some(self.read_text()?),
                    "hashes" => tool.hashes = self.read_hashes()?,
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(tool),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_contact_list(&mut self, item: &str) -> Result<Vec<OrganizationalContact>> {
        let mut contacts = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => {
                    if name == item {
                        contacts.push(self.read_org_contact()?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(contacts),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_org_contact(&mut self) -> Result<OrganizationalContact> {
        let mut contact = OrganizationalContact::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "name" => contact.name = Some(self.read_text()?),
                    "email" => contact.email = Some(self.read_text()?),
                    "phone" => contact.phone = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(contact),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_org_entity(&mut self) -> Result<OrganizationalEntity> {
        let mut entity = OrganizationalEntity::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "name" => entity.name = Some(self.read_text()?),
                    "url" => entity.urls.push(self.read_text()?),
                    "contact" => entity.contacts.push(self.read_org_contact()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(entity),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_components(&mut self) -> Result<Vec<Component>> {
        let mut components = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => {
                    if name == "component" {
                        components.push(self.read_component(&attrs)?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(components),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_component(&mut self, attrs: &[(String, String)]) -> Result<Component> {
        let type_token = attr(attrs, "type")
            .ok_or_else(|| ParseError::MissingField("component type attribute".to_string()))?;
        let mut component = Component::new(type_token.parse().map_err(Error::from)?);
        component.bom_ref = attr(attrs, "bom-ref").map(str::to_string);
        component.mime_type = attr(attrs, "mime-type").map(str::to_string);

        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => match name.as_str() {
                    "supplier" => component.supplier = Some(self.read_org_entity()?),
                    "author" => component.author = Some(self.read_text()?),
                    "publisher" => component.publisher = Some(self.read_text()?),
                    "group" => component.group = Some(self.read_text()?),
                    "name" => component.name = Some(self.read_text()?),
                    "version" => component.version = Some(self.read_text()?),
                    "description" => component.description = Some(self.read_text()?),
                    "scope" => {
                        let text = self.read_text()?;
                        component.scope = Some(text.parse().map_err(Error::from)?);
                    }
                    "hashes" => component.hashes = self.read_hashes()?,
                    "licenses" => component.licenses = Some(self.read_license_choice()?),
                    "copyright" => component.copyright = Some(self.read_text()?),
                    "cpe" => component.cpe = Some(self.read_text()?),
                    "purl" => component.purl = Some(self.read_text()?),
                    "swid" => component.swid = Some(self.read_swid(&attrs)?),
                    "modified" => {
                        let text = self.read_text()?;
                        component.modified = Some(parse_bool("modified", &text)?);
                    }
                    "pedigree" => component.pedigree = Some(self.read_pedigree()?),
                    "externalReferences" => {
                        component.external_references = self.read_external_references()?
                    }
                    "components" => component.components = self.read_components()?,
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(component),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_hashes(&mut self) -> Result<Vec<Hash>> {
        let mut hashes = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => {
                    if name == "hash" {
                        let alg = Self::hash_algorithm(&attrs)?;
                        let value = self.read_text()?;
                        hashes.push(Hash::new(alg, value));
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(hashes),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn hash_algorithm(attrs: &[(String, String)]) -> Result<HashAlgorithm> {
        let token = attr(attrs, "alg")
            .ok_or_else(|| ParseError::MissingField("hash alg attribute".to_string()))?;
        Ok(token.parse().map_err(Error::from)?)
    }

    fn read_license_choice(&mut self) -> Result<LicenseChoice> {
        let mut choice = LicenseChoice::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "license" => choice.licenses.push(self.read_license()?),
                    "expression" => choice.expression = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(choice),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_license(&mut self) -> Result<License> {
        let mut license = License::default();
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => match name.as_str() {
                    "id" => license.id = Some(self.read_text()?),
                    "name" => license.name = Some(self.read_text()?),
                    "text" => license.text = Some(self.read_attachment(&attrs)?),
                    "url" => license.url = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(license),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_attachment(&mut self, attrs: &[(String, String)]) -> Result<AttachmentText> {
        let content_type = attr(attrs, "content-type").map(str::to_string);
        let encoding = attr(attrs, "encoding").map(str::to_string);
        let text = self.read_text()?;
        Ok(AttachmentText::from_wire(content_type, encoding, &text).map_err(Error::from)?)
    }

    fn read_swid(&mut self, attrs: &[(String, String)]) -> Result<Swid> {
        let mut swid = Swid::default();
        swid.tag_id = attr(attrs, "tagId").map(str::to_string);
        swid.name = attr(attrs, "name").map(str::to_string);
        swid.version = attr(attrs, "version").map(str::to_string);
        if let Some(tv) = attr(attrs, "tagVersion") {
            swid.tag_version = Some(tv.trim().parse().map_err(ParseError::from)?);
        }
        if let Some(token) = attr(attrs, "patch") {
            swid.patch = Some(parse_bool("patch", token)?);
        }
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => match name.as_str() {
                    "text" => swid.text = Some(self.read_attachment(&attrs)?),
                    "url" => swid.url = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(swid),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_pedigree(&mut self) -> Result<Pedigree> {
        let mut pedigree = Pedigree::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "ancestors" => pedigree.ancestors = self.read_components()?,
                    "descendants" => pedigree.descendants = self.read_components()?,
                    "variants" => pedigree.variants = self.read_components()?,
                    "commits" => pedigree.commits = self.read_commits()?,
                    "notes" => pedigree.notes = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(pedigree),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_commits(&mut self) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => {
                    if name == "commit" {
                        commits.push(self.read_commit()?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(commits),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_commit(&mut self) -> Result<Commit> {
        let mut commit = Commit::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "uid" => commit.uid = Some(self.read_text()?),
                    "url" => commit.url = Some(self.read_text()?),
                    "author" => commit.author = Some(self.read_identifiable_action()?),
                    "committer" => commit.committer = Some(self.read_identifiable_action()?),
                    "message" => commit.message = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(commit),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_identifiable_action(&mut self) -> Result<IdentifiableAction> {
        let mut action = IdentifiableAction::default();
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "timestamp" => {
                        let text = self.read_text()?;
                        action.timestamp = Some(parse_timestamp(&text).map_err(Error::from)?);
                    }
                    "name" => action.name = Some(self.read_text()?),
                    "email" => action.email = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(action),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_external_references(&mut self) -> Result<Vec<ExternalReference>> {
        let mut references = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => {
                    if name == "reference" {
                        references.push(self.read_external_reference(&attrs)?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(references),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_external_reference(&mut self, attrs: &[(String, String)]) -> Result<ExternalReference> {
        let type_token = attr(attrs, "type")
            .ok_or_else(|| ParseError::MissingField("reference type attribute".to_string()))?;
        let mut reference = ExternalReference::new(type_token.parse().map_err(Error::from)?);
        loop {
            match self.next_node()? {
                Node::Start { name, .. } => match name.as_str() {
                    "url" => reference.url = Some(self.read_text()?),
                    "comment" => reference.comment = Some(self.read_text()?),
                    _ => self.skip_element()?,
                },
                Node::Text(_) => {}
                Node::End => return Ok(reference),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_dependencies(&mut self) -> Result<Vec<Dependency>> {
        let mut dependencies = Vec::new();
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => {
                    if name == "dependency" {
                        dependencies.push(self.read_dependency(&attrs)?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(dependencies),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn read_dependency(&mut self, attrs: &[(String, String)]) -> Result<Dependency> {
        let mut dependency = Dependency::new(Self::dependency_ref(attrs)?);
        loop {
            match self.next_node()? {
                Node::Start { name, attrs } => {
                    if name == "dependency" {
                        dependency.dependencies.push(self.read_dependency(&attrs)?);
                    } else {
                        self.skip_element()?;
                    }
                }
                Node::Text(_) => {}
                Node::End => return Ok(dependency),
                Node::Eof => return Err(ParseError::UnexpectedEof.into()),
            }
        }
    }

    fn dependency_ref(attrs: &[(String, String)]) -> Result<String> {
        attr(attrs, "ref")
            .map(str::to_string)
            .ok_or_else(|| ParseError::MissingField("dependency ref attribute".to_string()).into())
    }
}

/// Extracts unprefixed attributes as owned (name, value) pairs.
///
/// Namespace declarations and prefixed attributes are dropped so a foreign
/// attribute can never alias a model attribute by local name.
fn extract_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(ParseError::from)?;
        if attr.key.as_ref().starts_with(b"xmlns") || attr.key.prefix().is_some() {
            continue;
        }
        let key = str::from_utf8(attr.key.local_name().as_ref())
            .map_err(ParseError::from)?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(ParseError::from)?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

fn local_name(e: &BytesStart<'_>) -> Result<String> {
    let local = e.local_name();
    Ok(str::from_utf8(local.as_ref())
        .map_err(ParseError::from)?
        .to_string())
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Decides whether an element belongs to the document's vocabulary.
///
/// The first element seen is the root and defines the vocabulary. After
/// that, an element is in scope when it has no namespace, carries a
/// registered BOM namespace, or matches the root's namespace. Anything else
/// is foreign content and gets skipped rather than dispatched.
fn in_vocabulary(
    vocabulary: &mut Option<Option<Vec<u8>>>,
    resolution: &ResolveResult<'_>,
) -> bool {
    let ns: Option<&[u8]> = match resolution {
        ResolveResult::Unbound => None,
        ResolveResult::Bound(ns) => Some(ns.as_ref()),
        ResolveResult::Unknown(_) => return false,
    };
    if vocabulary.is_none() {
        *vocabulary = Some(ns.map(<[u8]>::to_vec));
        return true;
    }
    match ns {
        None => true,
        Some(uri) => {
            let registered = str::from_utf8(uri)
                .ok()
                .and_then(SchemaVersion::from_namespace)
                .is_some();
            registered || matches!(vocabulary, Some(Some(root)) if root.as_slice() == uri)
        }
    }
}

/// Parses an xs:boolean token. The lexical space is closed, so anything
/// other than "true"/"false"/"1"/"0" is rejected like any other
/// enumeration token.
fn parse_bool(field: &'static str, s: &str) -> std::result::Result<bool, ParseError> {
    match s.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(ParseError::InvalidEnumValue {
            field,
            value: other.to_string(),
        }),
    }
}

/// Convenience function to read a BOM from a string.
pub fn read_str(xml: &str) -> Result<Bom> {
    BomReader::from_reader(xml.as_bytes()).read()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, ExternalReferenceType, Scope};

    const BOM_1_2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.2" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79" version="1">
  <metadata>
    <timestamp>2020-04-13T20:20:39+00:00</timestamp>
    <tools>
      <tool>
        <vendor>Awesome Vendor</vendor>
        <name>Awesome Tool</name>
        <version>9.1.2</version>
        <hashes>
          <hash alg="SHA-1">25ed8e31b995bb927966616df2a42b979a2717f0</hash>
        </hashes>
      </tool>
    </tools>
    <authors>
      <author>
        <name>Samantha Wright</name>
        <email>samantha.wright@example.com</email>
      </author>
    </authors>
  </metadata>
  <components>
    <component type="library" bom-ref="pkg:npm/acme/component@1.0.0">
      <publisher>Acme Inc</publisher>
      <group>com.acme</group>
      <name>tomcat-catalina</name>
      <version>9.0.14</version>
      <scope>required</scope>
      <hashes>
        <hash alg="SHA-256">abc123</hash>
      </hashes>
      <licenses>
        <license>
          <id>Apache-2.0</id>
          <text content-type="text/plain" encoding="base64">TGljZW5zZSB0ZXh0</text>
        </license>
      </licenses>
      <purl>pkg:maven/com.acme/tomcat-catalina@9.0.14</purl>
      <externalReferences>
        <reference type="website">
          <url>https://example.com</url>
        </reference>
      </externalReferences>
    </component>
  </components>
  <dependencies>
    <dependency ref="pkg:npm/acme/component@1.0.0">
      <dependency ref="pkg:npm/acme/other@2.0.0"/>
    </dependency>
  </dependencies>
</bom>"#;

    #[test]
    fn test_read_full_document() {
        let bom = read_str(BOM_1_2).unwrap();
        assert_eq!(bom.version, 1);
        assert_eq!(
            bom.serial_number.as_deref(),
            Some("urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79")
        );

        let metadata = bom.metadata.as_ref().unwrap();
        assert_eq!(metadata.timestamp.unwrap().timestamp(), 1586809239);
        assert_eq!(metadata.tools.len(), 1);
        assert_eq!(metadata.tools[0].name.as_deref(), Some("Awesome Tool"));
        assert_eq!(metadata.tools[0].hashes.len(), 1);
        assert_eq!(metadata.authors[0].name.as_deref(), Some("Samantha Wright"));

        assert_eq!(bom.components.len(), 1);
        let c = &bom.components[0];
        assert_eq!(c.component_type, Classification::Library);
        assert_eq!(c.bom_ref.as_deref(), Some("pkg:npm/acme/component@1.0.0"));
        assert_eq!(c.name.as_deref(), Some("tomcat-catalina"));
        assert_eq!(c.version.as_deref(), Some("9.0.14"));
        assert_eq!(c.scope, Some(Scope::Required));

        assert_eq!(c.hashes.len(), 1);
        assert_eq!(c.hashes[0].algorithm, HashAlgorithm::Sha256);
        assert_eq!(c.hashes[0].value, "abc123");

        let licenses = c.licenses.as_ref().unwrap();
        assert_eq!(licenses.licenses[0].id.as_deref(), Some("Apache-2.0"));
        let text = licenses.licenses[0].text.as_ref().unwrap();
        assert_eq!(text.as_text(), Some("License text"));
        assert_eq!(text.encoding.as_deref(), Some("base64"));

        assert_eq!(c.external_references.len(), 1);
        assert_eq!(
            c.external_references[0].reference_type,
            ExternalReferenceType::Website
        );

        assert_eq!(bom.dependencies.len(), 1);
        assert_eq!(bom.dependencies[0].dependencies.len(), 1);
        assert_eq!(
            bom.dependencies[0].dependencies[0].dependency_ref,
            "pkg:npm/acme/other@2.0.0"
        );
    }

    #[test]
    fn test_unexpected_root_fails() {
        let err = read_str("<notbom/>").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::UnexpectedRoot(ref name)) if name == "notbom"
        ));
    }

    #[test]
    fn test_unclosed_tag_fails() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2"><components>"#;
        assert!(read_str(xml).is_err());
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<bom>
            <somethingNew><deeply><nested>stuff</nested></deeply></somethingNew>
            <components>
                <component type="library">
                    <name>a</name>
                    <version>1</version>
                    <futureField>ignored</futureField>
                </component>
            </components>
        </bom>"#;
        let bom = read_str(xml).unwrap();
        assert_eq!(bom.components.len(), 1);
        assert_eq!(bom.components[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_unknown_enum_token_is_a_failure() {
        let xml = r#"<bom><components><component type="spaceship"/></components></bom>"#;
        let err = read_str(xml).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidEnumValue { field: "component type", .. })
        ));

        let xml = r#"<bom><components><component type="library">
            <scope>sometimes</scope>
        </component></components></bom>"#;
        assert!(read_str(xml).is_err());
    }

    #[test]
    fn test_self_closing_elements_are_kept() {
        let xml = r#"<bom>
          <components>
            <component type="library"/>
            <component type="application">
              <name>app</name>
              <version>1</version>
            </component>
          </components>
          <dependencies>
            <dependency ref="pkg:npm/a@1"/>
          </dependencies>
        </bom>"#;
        let bom = read_str(xml).unwrap();
        assert_eq!(bom.components.len(), 2);
        assert_eq!(bom.components[0].component_type, Classification::Library);
        assert!(bom.components[0].name.is_none());
        assert_eq!(bom.components[1].name.as_deref(), Some("app"));
        assert_eq!(bom.dependencies.len(), 1);
        assert_eq!(bom.dependencies[0].dependency_ref, "pkg:npm/a@1");
    }

    #[test]
    fn test_self_closing_root() {
        let bom = read_str(r#"<bom version="3"/>"#).unwrap();
        assert_eq!(bom.version, 3);
        assert!(bom.components.is_empty());
    }

    #[test]
    fn test_foreign_namespace_content_is_not_mapped() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2"
                          xmlns:ds="http://www.w3.org/2000/09/xmldsig#" version="1">
          <components>
            <component type="library">
              <ds:name>shadow</ds:name>
              <name>real</name>
              <version>1</version>
            </component>
          </components>
          <ds:Signature><ds:SignedInfo/></ds:Signature>
        </bom>"#;
        let bom = read_str(xml).unwrap();
        assert_eq!(bom.components.len(), 1);
        assert_eq!(bom.components[0].name.as_deref(), Some("real"));
    }

    #[test]
    fn test_foreign_namespace_element_leaves_field_unset() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2">
          <components>
            <component type="library" xmlns:x="urn:elsewhere">
              <x:name>shadow</x:name>
              <version>1</version>
            </component>
          </components>
        </bom>"#;
        let bom = read_str(xml).unwrap();
        assert!(bom.components[0].name.is_none());
        assert_eq!(bom.components[0].version.as_deref(), Some("1"));
    }

    #[test]
    fn test_invalid_boolean_token_fails() {
        let xml = r#"<bom><components><component type="library">
            <name>x</name>
            <version>1</version>
            <modified>maybe</modified>
        </component></components></bom>"#;
        let err = read_str(xml).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidEnumValue { field: "modified", .. })
        ));

        let xml = r#"<bom><components><component type="library">
            <swid tagId="t" patch="yes"/>
        </component></components></bom>"#;
        assert!(read_str(xml).is_err());

        let xml = r#"<bom><components><component type="library">
            <modified>true</modified>
        </component></components></bom>"#;
        assert_eq!(read_str(xml).unwrap().components[0].modified, Some(true));
    }

    #[test]
    fn test_unknown_hash_algorithm_fails() {
        let xml = r#"<bom><components><component type="library">
            <hashes><hash alg="CRC32">deadbeef</hash></hashes>
        </component></components></bom>"#;
        let err = read_str(xml).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::InvalidHashAlgorithm(_))
        ));
    }

    #[test]
    fn test_missing_component_type_fails() {
        let xml = r#"<bom><components><component><name>x</name></component></components></bom>"#;
        assert!(read_str(xml).is_err());
    }

    #[test]
    fn test_pedigree_and_swid() {
        let xml = r#"<bom>
          <components>
            <component type="library">
              <name>lib</name>
              <version>2.0</version>
              <swid tagId="swidgen-1" name="Acme App" version="2.0" tagVersion="1" patch="false">
                <text content-type="text/xml" encoding="base64">PHRhZy8+</text>
              </swid>
              <pedigree>
                <ancestors>
                  <component type="library">
                    <name>lib-core</name>
                    <version>1.0</version>
                  </component>
                </ancestors>
                <commits>
                  <commit>
                    <uid>7638417db6d59f3c431d3e1f261cc637155684cd</uid>
                    <author>
                      <timestamp>2018-11-07T22:01:45Z</timestamp>
                      <name>Jane Doe</name>
                    </author>
                  </commit>
                </commits>
                <notes>rebuilt from source</notes>
              </pedigree>
            </component>
          </components>
        </bom>"#;
        let bom = read_str(xml).unwrap();
        let c = &bom.components[0];

        let swid = c.swid.as_ref().unwrap();
        assert_eq!(swid.tag_id.as_deref(), Some("swidgen-1"));
        assert_eq!(swid.tag_version, Some(1));
        assert_eq!(swid.patch, Some(false));
        assert_eq!(swid.text.as_ref().unwrap().as_text(), Some("<tag/>"));

        let pedigree = c.pedigree.as_ref().unwrap();
        assert_eq!(pedigree.ancestors.len(), 1);
        assert_eq!(pedigree.ancestors[0].name.as_deref(), Some("lib-core"));
        assert_eq!(pedigree.commits.len(), 1);
        let author = pedigree.commits[0].author.as_ref().unwrap();
        assert_eq!(author.name.as_deref(), Some("Jane Doe"));
        assert!(author.timestamp.is_some());
        assert_eq!(pedigree.notes.as_deref(), Some("rebuilt from source"));
    }

    #[test]
    fn test_nested_components() {
        let xml = r#"<bom><components>
          <component type="framework">
            <name>outer</name>
            <version>1</version>
            <components>
              <component type="library">
                <name>inner</name>
                <version>2</version>
              </component>
            </components>
          </component>
        </components></bom>"#;
        let bom = read_str(xml).unwrap();
        assert_eq!(bom.components[0].components.len(), 1);
        assert_eq!(
            bom.components[0].components[0].name.as_deref(),
            Some("inner")
        );
    }

    #[test]
    fn test_spec_version_not_set_by_reader() {
        // The reader alone never stamps provenance; that happens in the
        // parser after namespace resolution.
        let bom = read_str(BOM_1_2).unwrap();
        assert_eq!(bom.spec_version(), None);
    }
}
