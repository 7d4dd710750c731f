//! XML document trees
//!
//! A small arena-backed tree: enough to read schema documents, look up the
//! namespace bindings in scope at any attribute, build schema-shaped
//! documents programmatically and serialize nodes back to text. Documents are
//! parsed with `quick-xml`; DTDs are skipped, not processed.

use crate::error::{Error, NodeRef, Result};
use crate::namespaces::{NamespaceBindings, NamespaceContext};
use crate::nodes::AttributeNode;
use indexmap::IndexMap;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

/// Index of a node within its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the document arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Attribute stored on an element (namespace declarations excluded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written, possibly prefixed
    pub name: String,
    /// Attribute value with entities expanded
    pub value: String,
}

/// XML element
#[derive(Debug, Clone)]
pub struct Element {
    /// Element name as written, possibly prefixed
    pub name: String,
    /// Namespace URI the element's prefix resolved to
    pub namespace: Option<String>,
    /// Element attributes, in document order
    pub attributes: Vec<Attribute>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element with no attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Local part of the element name
    pub fn local_name(&self) -> &str {
        crate::names::split_qname(&self.name).1
    }

    /// Prefix of the element name
    pub fn prefix(&self) -> Option<&str> {
        crate::names::split_qname(&self.name).0
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// Content of a node
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Element node
    Element(Element),
    /// Character data
    Text(String),
    /// CDATA section
    CData(String),
    /// Comment
    Comment(String),
    /// Processing instruction, target and data as one string
    ProcessingInstruction(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Option<usize>,
}

/// XML Document representation
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Read and parse an XML document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut doc = Document::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let id = doc.parse_element(&e, stack.last().copied(), position)?;
                    stack.push(id);
                }
                Ok(Event::Empty(e)) => {
                    doc.parse_element(&e, stack.last().copied(), position)?;
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(e)) => {
                    if let Some(&parent) = stack.last() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?
                            .into_owned();
                        doc.push_node(NodeKind::Text(text), Some(parent), Some(position));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(&parent) = stack.last() {
                        let text = utf8(&e)?;
                        doc.push_node(NodeKind::CData(text), Some(parent), Some(position));
                    }
                }
                Ok(Event::Comment(e)) => {
                    if let Some(&parent) = stack.last() {
                        let text = utf8(&e)?;
                        doc.push_node(NodeKind::Comment(text), Some(parent), Some(position));
                    }
                }
                Ok(Event::PI(e)) => {
                    if let Some(&parent) = stack.last() {
                        let text = utf8(&e)?;
                        doc.push_node(
                            NodeKind::ProcessingInstruction(text),
                            Some(parent),
                            Some(position),
                        );
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // XML declaration and DOCTYPE carry nothing for the tree
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::Xml("Unexpected end of document: unclosed element".to_string()));
        }
        if doc.root.is_none() {
            return Err(Error::Xml("Document has no root element".to_string()));
        }
        Ok(doc)
    }

    fn parse_element(
        &mut self,
        start: &BytesStart,
        parent: Option<NodeId>,
        position: usize,
    ) -> Result<NodeId> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        if parent.is_none() && self.root.is_some() {
            return Err(Error::Xml(format!(
                "Element <{}> follows the root element at position {}",
                name, position
            )));
        }

        let mut element = Element::new(name);
        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?;

            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| Error::Xml(format!("Invalid attribute value: {}", e)))?;
            let attr_value = unescape(&normalize_attribute_value(raw))
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .into_owned();

            if attr_name == "xmlns" {
                element.namespaces.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                element.namespaces.add_prefix(prefix, attr_value);
            } else {
                element.attributes.push(Attribute {
                    name: attr_name.to_string(),
                    value: attr_value,
                });
            }
        }

        let id = self.push_node(NodeKind::Element(element), parent, Some(position));
        self.resolve_element_namespace(id);
        Ok(id)
    }

    fn push_node(
        &mut self,
        kind: NodeKind,
        parent: Option<NodeId>,
        position: Option<usize>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
            position,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    /// Re-resolve the namespace of `id` and every element below it
    fn resolve_subtree_namespaces(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(node) = pending.pop() {
            self.resolve_element_namespace(node);
            pending.extend(self.child_elements(node));
        }
    }

    fn resolve_element_namespace(&mut self, id: NodeId) {
        let prefix = match self.element(id) {
            Some(element) => element.prefix().map(str::to_string),
            None => return,
        };
        let namespace = self
            .lookup_namespace_uri(id, prefix.as_deref())
            .filter(|ns| !ns.is_empty())
            .map(str::to_string);
        if let Some(element) = self.element_mut(id) {
            element.namespace = namespace;
        }
    }

    /// Get the root element
    pub fn root_element(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content of a node
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|node| &node.kind)
    }

    /// Element data, if the node is an element
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Children of a node, in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// Child elements of a node, in document order
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.element(*child).is_some())
    }

    /// Byte offset of the node in the parsed source, if it was parsed
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id.0).and_then(|node| node.position)
    }

    /// Append a new element under `parent`, or as the root when `parent` is None
    ///
    /// The element's namespace is resolved from its prefix once its own
    /// declarations are made, see [`Document::declare_namespace`].
    pub fn append_element(&mut self, parent: Option<NodeId>, name: &str) -> Result<NodeId> {
        match parent {
            Some(parent) if self.element(parent).is_none() => {
                return Err(Error::Value(format!("node {} is not an element", parent.0)));
            }
            None if self.root.is_some() => {
                return Err(Error::Value("document already has a root element".to_string()));
            }
            _ => {}
        }
        let id = self.push_node(NodeKind::Element(Element::new(name)), parent, None);
        self.resolve_element_namespace(id);
        Ok(id)
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        if self.element(parent).is_none() {
            return Err(Error::Value(format!("node {} is not an element", parent.0)));
        }
        Ok(self.push_node(NodeKind::Text(text.into()), Some(parent), None))
    }

    /// Set (or replace) an attribute on an element
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::Value(format!("node {} is not an element", id.0)))?;
        let value = value.into();
        match element.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => element.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
        Ok(())
    }

    /// Declare a namespace prefix (or the default namespace) on an element
    pub fn declare_namespace(
        &mut self,
        id: NodeId,
        prefix: Option<&str>,
        namespace: impl Into<String>,
    ) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::Value(format!("node {} is not an element", id.0)))?;
        element.namespaces.declare(prefix, namespace);
        self.resolve_subtree_namespaces(id);
        Ok(())
    }

    /// Get an attribute handle by name
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<Attr<'_>> {
        let element = self.element(id)?;
        let index = element.attributes.iter().position(|attr| attr.name == name)?;
        Some(Attr {
            document: self,
            element: id,
            index,
        })
    }

    /// Handles to every attribute of an element
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = Attr<'_>> + '_ {
        let count = self.element(id).map_or(0, |element| element.attributes.len());
        (0..count).map(move |index| Attr {
            document: self,
            element: id,
            index,
        })
    }

    /// Look up the namespace URI bound to `prefix` in scope at `id`
    ///
    /// The nearest declaration wins. `xmlns=""` is returned as an empty
    /// string.
    pub fn lookup_namespace_uri(&self, id: NodeId, prefix: Option<&str>) -> Option<&str> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(element) = self.element(node) {
                if let Some(uri) = element.namespaces.lookup_namespace_uri(prefix) {
                    return Some(uri);
                }
            }
            current = self.parent(node);
        }
        None
    }

    /// Every binding in scope at `id`, nearest declarations first
    pub fn in_scope_namespaces(&self, id: NodeId) -> IndexMap<Option<&str>, &str> {
        let mut scope = IndexMap::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(element) = self.element(node) {
                for (prefix, uri) in element.namespaces.declarations() {
                    scope.entry(prefix).or_insert(uri);
                }
            }
            current = self.parent(node);
        }
        scope
    }

    /// Serialize a node to text, without an XML declaration
    ///
    /// Leaf nodes yield their content. An element is written with every
    /// namespace binding it relies on, including those inherited from
    /// ancestors.
    pub fn to_xml_string(&self, id: NodeId) -> Result<String> {
        let kind = self
            .kind(id)
            .ok_or_else(|| Error::Value(format!("no node {} in document", id.0)))?;
        match kind {
            NodeKind::Element(_) => {
                let mut writer = Writer::new(Vec::new());
                self.write_element(&mut writer, id, true)?;
                String::from_utf8(writer.into_inner())
                    .map_err(|e| Error::Xml(format!("Serialized output is not UTF-8: {}", e)))
            }
            NodeKind::Text(text)
            | NodeKind::CData(text)
            | NodeKind::Comment(text)
            | NodeKind::ProcessingInstruction(text) => Ok(text.clone()),
        }
    }

    fn write_element(
        &self,
        writer: &mut Writer<Vec<u8>>,
        id: NodeId,
        outermost: bool,
    ) -> Result<()> {
        let Some(element) = self.element(id) else {
            return Ok(());
        };

        let mut start = BytesStart::new(element.name.as_str());
        if outermost {
            for (prefix, uri) in self.in_scope_namespaces(id) {
                let declared_here = element.namespaces.lookup_namespace_uri(prefix).is_some();
                if uri.is_empty() && !declared_here {
                    continue;
                }
                start.push_attribute((xmlns_attribute(prefix).as_str(), uri));
            }
        } else {
            for (prefix, uri) in element.namespaces.declarations() {
                start.push_attribute((xmlns_attribute(prefix).as_str(), uri));
            }
        }
        for attr in &element.attributes {
            start.push_attribute((attr.name.as_str(), attr.value.as_str()));
        }

        let children = self.children(id);
        if children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for &child in children {
            match self.kind(child) {
                Some(NodeKind::Element(_)) => self.write_element(writer, child, false)?,
                Some(NodeKind::Text(text)) => {
                    write_event(writer, Event::Text(BytesText::new(text)))?
                }
                Some(NodeKind::CData(text)) => {
                    write_event(writer, Event::CData(BytesCData::new(text.as_str())))?
                }
                Some(NodeKind::Comment(text)) => {
                    write_event(writer, Event::Comment(BytesText::from_escaped(text.as_str())))?
                }
                Some(NodeKind::ProcessingInstruction(text)) => {
                    write_event(writer, Event::PI(BytesText::from_escaped(text.as_str())))?
                }
                None => {}
            }
        }
        write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Xml(format!("Failed to serialize node: {}", e)))
}

/// Attribute-value normalization of literal white space
///
/// Each literal TAB, LF and CR becomes a space, with CR LF counting as one
/// line break. Character references are expanded afterwards, so `&#9;` still
/// yields a TAB.
fn normalize_attribute_value(raw: &str) -> String {
    raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " ")
}

fn xmlns_attribute(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("xmlns:{}", prefix),
        None => "xmlns".to_string(),
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::Xml(format!("Invalid UTF-8 in document: {}", e)))
}

/// Handle to one attribute of an element in a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Attr<'a> {
    document: &'a Document,
    element: NodeId,
    index: usize,
}

impl<'a> Attr<'a> {
    fn data(&self) -> Option<&'a Attribute> {
        self.document
            .element(self.element)
            .and_then(|element| element.attributes.get(self.index))
    }

    /// Attribute name as written
    pub fn name(&self) -> &'a str {
        self.data().map_or("", |attr| attr.name.as_str())
    }

    /// Owning element
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Document the attribute belongs to
    pub fn document(&self) -> &'a Document {
        self.document
    }
}

impl NamespaceBindings for Attr<'_> {
    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<&str> {
        self.document.lookup_namespace_uri(self.element, prefix)
    }
}

impl AttributeNode for Attr<'_> {
    fn value(&self) -> &str {
        self.data().map_or("", |attr| attr.value.as_str())
    }

    fn node_ref(&self) -> NodeRef {
        let element = self
            .document
            .element(self.element)
            .map_or("", |element| element.name.as_str());
        let node = NodeRef::attribute(self.element.index(), element, self.name());
        match self.document.position(self.element) {
            Some(position) => node.with_position(position),
            None => node,
        }
    }
}
