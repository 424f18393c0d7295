//! Namespace declaration sniffing.
//!
//! Producers are inconsistent about where they declare the BOM namespace, so
//! version detection has to look at every `xmlns` binding in the tree, not
//! just the document element. This module runs a single linear pass over the
//! raw XML events and collects declarations in document order. It never
//! builds a typed object graph, which keeps the sniffing pass cheap even for
//! oversized or hostile documents; the deserializer makes its own pass.

use crate::error::{ParseError, Result};
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use std::io::BufRead;

/// A single `xmlns[:prefix]="uri"` binding found in a document.
///
/// Ephemeral, only used while resolving the schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    /// The bound namespace URI
    pub uri: String,
}

/// Extracts every namespace declaration from an XML document, at any depth,
/// in document order.
///
/// Fails with a parse error if the input is not well-formed XML; malformed
/// input is a hard failure here, not a diagnostic.
pub fn extract_namespace_declarations<R: BufRead>(
    reader: R,
) -> Result<Vec<NamespaceDeclaration>> {
    let mut xml_reader = Reader::from_reader(reader);
    let mut buf = Vec::with_capacity(4096);
    let mut declarations = Vec::new();
    let mut depth = 0usize;

    loop {
        buf.clear();
        match xml_reader.read_event_into(&mut buf).map_err(ParseError::from)? {
            XmlEvent::Start(ref e) => {
                depth += 1;
                collect_xmlns_attrs(e, &mut declarations)?;
            }
            XmlEvent::Empty(ref e) => {
                collect_xmlns_attrs(e, &mut declarations)?;
            }
            XmlEvent::End(_) => {
                depth = depth.checked_sub(1).ok_or(ParseError::UnexpectedEof)?;
            }
            XmlEvent::Eof => {
                if depth != 0 {
                    return Err(ParseError::UnexpectedEof.into());
                }
                break;
            }
            _ => {}
        }
    }

    Ok(declarations)
}

fn collect_xmlns_attrs(e: &BytesStart<'_>, out: &mut Vec<NamespaceDeclaration>) -> Result<()> {
    for attr in e.attributes() {
        let attr = attr.map_err(ParseError::from)?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            let uri = attr
                .unescape_value()
                .map_err(ParseError::from)?
                .into_owned();
            out.push(NamespaceDeclaration { uri });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_root_declaration() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2"/>"#;
        let decls = extract_namespace_declarations(xml.as_bytes()).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].uri, "http://cyclonedx.org/schema/bom/1.2");
    }

    #[test]
    fn test_extract_nested_declarations_in_document_order() {
        let xml = r#"<root xmlns:a="urn:first">
            <child xmlns="urn:second">
                <grandchild xmlns:b="urn:third"/>
            </child>
        </root>"#;
        let decls = extract_namespace_declarations(xml.as_bytes()).unwrap();
        let uris: Vec<&str> = decls.iter().map(|d| d.uri.as_str()).collect();
        assert_eq!(uris, vec!["urn:first", "urn:second", "urn:third"]);
    }

    #[test]
    fn test_extract_no_declarations() {
        let xml = "<bom><components/></bom>";
        let decls = extract_namespace_declarations(xml.as_bytes()).unwrap();
        assert!(decls.is_empty());
    }

    #[test]
    fn test_malformed_xml_is_a_hard_failure() {
        let xml = r#"<bom xmlns="http://cyclonedx.org/schema/bom/1.2"><components>"#;
        assert!(extract_namespace_declarations(xml.as_bytes()).is_err());
    }

    #[test]
    fn test_prefixed_declarations_are_collected() {
        let xml = r#"<bom xmlns:ds="http://www.w3.org/2000/09/xmldsig#"
                          xmlns="http://cyclonedx.org/schema/bom/1.1"/>"#;
        let decls = extract_namespace_declarations(xml.as_bytes()).unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].uri, "http://www.w3.org/2000/09/xmldsig#");
    }
}
