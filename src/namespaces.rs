//! XML namespace handling
//!
//! This module provides qualified names, per-element namespace declarations
//! and the [`NamespaceBindings`] view used to resolve prefixes.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace, permanently bound to the `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// The reserved `xml` prefix
pub const XML_PREFIX: &str = "xml";

/// Read-only mapping from prefixes to the namespace URIs in scope
///
/// `None` asks for the default namespace. Implementations return the URI as
/// declared; an empty string (`xmlns=""`) is passed through and callers treat
/// it the same as no binding.
pub trait NamespaceBindings {
    /// Look up the namespace URI bound to `prefix`
    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<&str>;
}

/// Qualified name: namespace URI, local name and the prefix it was written with
///
/// The prefix is kept for diagnostics and serialization only. Like XML
/// namespace semantics, two names are equal when namespace and local name
/// match, whatever prefixes they were written with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
    /// Prefix (None for the default prefix)
    pub prefix: Option<Prefix>,
}

impl QualifiedName {
    /// Create a new qualified name
    ///
    /// Empty namespace and prefix strings are normalized to `None`.
    pub fn new(
        namespace: Option<impl Into<String>>,
        local_name: impl Into<String>,
        prefix: Option<impl Into<String>>,
    ) -> Self {
        Self {
            namespace: namespace.map(Into::<String>::into).filter(|ns| !ns.is_empty()),
            local_name: local_name.into(),
            prefix: prefix.map(Into::<String>::into).filter(|p| !p.is_empty()),
        }
    }

    /// Create a name without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
            prefix: None,
        }
    }

    /// Create a name in a namespace, without a prefix
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self::new(Some(namespace), local_name, None::<String>)
    }

    /// Namespace URI, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Check whether this name identifies the component `name` declared in
    /// `target_namespace`
    ///
    /// An absent target namespace and an empty one are the same thing.
    pub fn matches(&self, name: &str, target_namespace: Option<&str>) -> bool {
        self.local_name == name && self.namespace() == target_namespace.filter(|ns| !ns.is_empty())
    }

    /// Name as written, `prefix:local` or `local`
    pub fn prefixed_name(&self) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

impl PartialEq for QualifiedName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

impl Eq for QualifiedName {}

impl Hash for QualifiedName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local_name.hash(state);
    }
}

impl fmt::Display for QualifiedName {
    /// Clark notation: `{namespace}local`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ref ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace declarations made on a single element
///
/// Declarations keep their document order so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix); `Some("")` undeclares it
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Declare `prefix` (or the default namespace when `None`)
    pub fn declare(&mut self, prefix: Option<&str>, namespace: impl Into<String>) {
        match prefix {
            Some(prefix) => self.add_prefix(prefix, namespace),
            None => self.set_default_namespace(namespace),
        }
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }

    /// Declarations in document order, the default namespace first
    pub fn declarations(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.default_namespace
            .iter()
            .map(|ns| (None, ns.as_str()))
            .chain(self.prefixes.iter().map(|(p, ns)| (Some(p.as_str()), ns.as_str())))
    }
}

impl NamespaceBindings for NamespaceContext {
    fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<&str> {
        match prefix {
            Some(prefix) => self.get_namespace(prefix),
            None => self.get_default_namespace(),
        }
    }
}
