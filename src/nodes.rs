//! Attribute handles consumed by the validators
//!
//! Validators never walk a tree themselves. They receive an [`AttributeNode`],
//! which exposes the raw value, the namespace bindings in scope at the
//! attribute and an identity for error reports. The crate's own
//! [`documents`](crate::documents) tree implements it, and so does
//! [`RoxAttr`] for read-only `roxmltree` documents.

use crate::error::NodeRef;
use crate::namespaces::NamespaceBindings;

/// A single attribute occurrence in a document tree
///
/// The namespace bindings are those in scope at the attribute's owning
/// element.
pub trait AttributeNode: NamespaceBindings {
    /// Raw attribute text, exactly as stored in the tree
    fn value(&self) -> &str;

    /// Identity of the attribute for error reporting
    fn node_ref(&self) -> NodeRef;
}

/// Attribute of a `roxmltree` element
#[derive(Debug, Clone, Copy)]
pub struct RoxAttr<'a, 'input> {
    element: roxmltree::Node<'a, 'input>,
    attribute: roxmltree::Attribute<'a, 'input>,
}

impl<'a, 'input> RoxAttr<'a, 'input> {
    /// Find the unqualified attribute `name` on `element`
    pub fn new(element: roxmltree::Node<'a, 'input>, name: &str) -> Option<Self> {
        element
            .attributes()
            .find(|attr| attr.namespace().is_none() && attr.name() == name)
            .map(|attribute| Self { element, attribute })
    }

    /// Wrap an attribute already taken from `element`
    pub fn from_parts(
        element: roxmltree::Node<'a, 'input>,
        attribute: roxmltree::Attribute<'a, 'input>,
    ) -> Self {
        Self { element, attribute }
    }

    /// Every attribute of `element`
    pub fn all(element: roxmltree::Node<'a, 'input>) -> impl Iterator<Item = Self> + 'a
    where
        'input: 'a,
    {
        element
            .attributes()
            .map(move |attribute| Self { element, attribute })
    }

    /// Owning element
    pub fn element(&self) -> roxmltree::Node<'a, 'input> {
        self.element
    }

    /// Local name of the attribute
    pub fn name(&self) -> &'a str {
        self.attribute.name()
    }
}

impl NamespaceBindings for RoxAttr<'_, '_> {
    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<&str> {
        self.element.lookup_namespace_uri(prefix)
    }
}

impl AttributeNode for RoxAttr<'_, '_> {
    fn value(&self) -> &str {
        self.attribute.value()
    }

    fn node_ref(&self) -> NodeRef {
        let element = written_name(self.element);
        NodeRef::attribute(self.element.id().get_usize(), element, self.attribute.name())
            .with_position(self.element.range().start)
    }
}

/// Element name as written in the source, prefix included
fn written_name<'a>(element: roxmltree::Node<'a, '_>) -> &'a str {
    let markup = rox_node_to_string(element);
    let name = markup.strip_prefix('<').unwrap_or(markup);
    let end = name
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(name.len());
    match &name[..end] {
        "" => element.tag_name().name(),
        written => written,
    }
}

/// Whether the document's root element is the immediate parent of `node`
pub fn is_top_level_node(node: roxmltree::Node<'_, '_>) -> bool {
    node.parent() == Some(node.document().root_element())
}

/// Source text of a `roxmltree` node
///
/// Attribute-like leaf nodes (text, comments) yield their content, elements
/// yield the markup exactly as it appears in the parsed input.
pub fn rox_node_to_string<'a>(node: roxmltree::Node<'a, '_>) -> &'a str {
    if node.is_element() {
        &node.document().input_text()[node.range()]
    } else {
        node.text().unwrap_or_default()
    }
}
