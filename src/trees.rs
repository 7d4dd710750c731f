//! Tree helpers for schema construction
//!
//! Thin wrappers over [`Document`] for the handful of tree operations the
//! schema builder performs: creating schema documents, appending top-level
//! components, serializing nodes for diagnostics and asking where a node
//! sits.

use crate::documents::{Document, NodeId};
use crate::error::{Error, Result};
use crate::names;
use crate::namespaces::XSD_NAMESPACE;

/// Prefix used for the XSD namespace in generated documents
pub const XSD_PREFIX: &str = "xs";

/// Create an empty document
pub fn new_document() -> Document {
    Document::new()
}

/// Create a document whose root is an `xs:schema` element
///
/// The root declares `xmlns:xs` and carries `targetNamespace` when one is
/// given.
pub fn new_schema_document(target_namespace: Option<&str>) -> Result<(Document, NodeId)> {
    let mut document = Document::new();
    let root = document.append_element(None, &format!("{}:schema", XSD_PREFIX))?;
    document.declare_namespace(root, Some(XSD_PREFIX), XSD_NAMESPACE)?;
    if let Some(ns) = target_namespace {
        document.set_attribute(root, "targetNamespace", ns)?;
    }
    Ok((document, root))
}

/// Append `<xs:{kind} name="{name}"/>` to the document's root element
pub fn append_component(document: &mut Document, kind: &str, name: &str) -> Result<NodeId> {
    if !names::is_valid_ncname(kind) {
        return Err(Error::Value(format!("'{}' is not a valid component kind", kind)));
    }
    let root = document
        .root_element()
        .ok_or_else(|| Error::Value("document has no root element".to_string()))?;
    let id = document.append_element(Some(root), &format!("{}:{}", XSD_PREFIX, kind))?;
    document.set_attribute(id, "name", name)?;
    Ok(id)
}

/// Text of a node for use in messages
///
/// See [`Document::to_xml_string`].
pub fn node_to_string(document: &Document, node: NodeId) -> Result<String> {
    document.to_xml_string(node)
}

/// Whether the document's root element is the immediate parent of `node`
pub fn is_top_level(document: &Document, node: NodeId) -> bool {
    document.root_element().is_some() && document.parent(node) == document.root_element()
}

/// Namespace URI of an element, or the empty string when it has none
pub fn namespace_uri(document: &Document, node: NodeId) -> &str {
    document
        .element(node)
        .and_then(|element| element.namespace.as_deref())
        .unwrap_or_default()
}

/// Namespace for diagnostics: quoted, or `null` when absent
pub fn quote_namespace(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("\"{}\"", ns),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::AttributeNode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_schema_document() {
        let (doc, root) = new_schema_document(Some("urn:books")).unwrap();
        assert_eq!(doc.root_element(), Some(root));
        assert_eq!(namespace_uri(&doc, root), XSD_NAMESPACE);
        assert_eq!(doc.element(root).unwrap().local_name(), "schema");
        assert_eq!(doc.attribute(root, "targetNamespace").unwrap().value(), "urn:books");
        assert_eq!(
            node_to_string(&doc, root).unwrap(),
            concat!(
                r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" "#,
                r#"targetNamespace="urn:books"/>"#
            )
        );

        let (doc, root) = new_schema_document(None).unwrap();
        assert!(doc.attribute(root, "targetNamespace").is_none());
    }

    #[test]
    fn test_append_component() {
        let (mut doc, root) = new_schema_document(Some("urn:books")).unwrap();
        let book = append_component(&mut doc, "element", "book").unwrap();
        let kind = append_component(&mut doc, "complexType", "bookType").unwrap();

        assert_eq!(doc.child_elements(root).collect::<Vec<_>>(), vec![book, kind]);
        assert!(is_top_level(&doc, book));
        assert!(!is_top_level(&doc, root));
        assert_eq!(namespace_uri(&doc, book), XSD_NAMESPACE);

        let attr = doc.attribute(book, "name").unwrap();
        assert_eq!(attr.value(), "book");
        assert_eq!(attr.document().root_element(), Some(root));

        assert_eq!(
            node_to_string(&doc, book).unwrap(),
            r#"<xs:element xmlns:xs="http://www.w3.org/2001/XMLSchema" name="book"/>"#
        );
    }

    #[test]
    fn test_append_component_errors() {
        let mut doc = new_document();
        assert!(append_component(&mut doc, "element", "a").is_err());

        let (mut doc, _) = new_schema_document(None).unwrap();
        assert!(append_component(&mut doc, "not a kind", "a").is_err());
    }

    #[test]
    fn test_namespace_uri_without_namespace() {
        let doc = Document::from_string("<root><child/></root>").unwrap();
        let root = doc.root_element().unwrap();
        let child = doc.child_elements(root).next().unwrap();
        assert_eq!(namespace_uri(&doc, child), "");
        assert!(is_top_level(&doc, child));
    }

    #[test]
    fn test_leaf_node_to_string() {
        let doc = Document::from_string("<a><!--note-->text</a>").unwrap();
        let root = doc.root_element().unwrap();
        let texts: Vec<_> = doc
            .children(root)
            .iter()
            .map(|id| node_to_string(&doc, *id).unwrap())
            .collect();
        assert_eq!(texts, vec!["note", "text"]);
    }

    #[test]
    fn test_namespace_declared_after_children() {
        let mut doc = new_document();
        let root = doc.append_element(None, "xs:schema").unwrap();
        let child = doc.append_element(Some(root), "xs:element").unwrap();
        assert_eq!(namespace_uri(&doc, child), "");

        doc.declare_namespace(root, Some(XSD_PREFIX), XSD_NAMESPACE).unwrap();
        assert_eq!(namespace_uri(&doc, root), XSD_NAMESPACE);
        assert_eq!(namespace_uri(&doc, child), XSD_NAMESPACE);
    }

    #[test]
    fn test_quote_namespace() {
        assert_eq!(quote_namespace(Some("urn:books")), "\"urn:books\"");
        assert_eq!(quote_namespace(Some("")), "\"\"");
        assert_eq!(quote_namespace(None), "null");
    }
}
