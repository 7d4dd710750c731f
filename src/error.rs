//! Error types for xmlschema-lexical
//!
//! This module defines the error values produced by the lexical layer:
//! the crate-level [`Error`], the structured [`LexicalError`] that validators
//! hand to the diagnostics factory, and [`ConfigurationError`] for wiring
//! mistakes in the diagnostics registration.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for document handling and default diagnostics
#[derive(Error, Debug)]
pub enum Error {
    /// A value failed lexical validation or QName resolution
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),

    /// Diagnostics factory wired incorrectly
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Value error (invalid argument such as an unknown facet keyword)
    #[error("value error: {0}")]
    Value(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(String),
}

/// Identity of a node, captured for error reporting only
///
/// A `NodeRef` is an owned snapshot: it never borrows the tree it came from,
/// so errors can outlive the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    /// Index of the owning element within its document
    pub id: usize,
    /// Qualified name of the owning element as written in the source
    pub element: String,
    /// Attribute name, when the node is an attribute
    pub attribute: Option<String>,
    /// Byte offset of the owning element's start tag, when known
    pub position: Option<usize>,
}

impl NodeRef {
    /// Create a reference to an element
    pub fn element(id: usize, element: impl Into<String>) -> Self {
        Self {
            id,
            element: element.into(),
            attribute: None,
            position: None,
        }
    }

    /// Create a reference to an attribute of an element
    pub fn attribute(id: usize, element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            id,
            element: element.into(),
            attribute: Some(attribute.into()),
            position: None,
        }
    }

    /// Set the source position
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attribute {
            Some(ref attribute) => write!(f, "attribute '{}' of <{}>", attribute, self.element)?,
            None => write!(f, "<{}>", self.element)?,
        }
        if let Some(position) = self.position {
            write!(f, " at byte {}", position)?;
        }
        Ok(())
    }
}

/// Category of a [`LexicalError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorKind {
    /// Text does not match the grammar of the lexical space
    Grammar,
    /// Text is a name, but its prefix cannot be resolved
    Resolution,
    /// Text exceeds a configured [`Limits`](crate::limits::Limits) bound
    Limit,
}

/// Structured description of a failed conversion
#[derive(Debug, Clone)]
pub struct LexicalError {
    /// Offending node
    pub node: NodeRef,
    /// Literal text that failed
    pub value: String,
    /// XSD name of the target lexical space
    pub lexical_space: &'static str,
    /// What went wrong
    pub kind: LexicalErrorKind,
    /// Human-readable message
    pub message: String,
}

impl LexicalError {
    /// Create a new lexical error
    pub fn new(
        kind: LexicalErrorKind,
        node: NodeRef,
        value: impl Into<String>,
        lexical_space: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            node,
            value: value.into(),
            lexical_space,
            kind,
            message: message.into(),
        }
    }

    /// Grammar mismatch, with the uniform facet message
    pub fn grammar(node: NodeRef, value: impl Into<String>, lexical_space: &'static str) -> Self {
        let value = value.into();
        let message = facet_message(&value, lexical_space);
        Self::new(LexicalErrorKind::Grammar, node, value, lexical_space, message)
    }

    /// Unresolvable or illegally bound prefix
    pub fn resolution(
        node: NodeRef,
        value: impl Into<String>,
        lexical_space: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(LexicalErrorKind::Resolution, node, value, lexical_space, message)
    }

    /// Value exceeded a configured limit
    pub fn limit(
        node: NodeRef,
        value: impl Into<String>,
        lexical_space: &'static str,
        reason: impl fmt::Display,
    ) -> Self {
        let value = value.into();
        let message = format!("{} ({})", facet_message(&value, lexical_space), reason);
        Self::new(LexicalErrorKind::Limit, node, value, lexical_space, message)
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        write!(f, "\n\nNode: {}", self.node)
    }
}

impl std::error::Error for LexicalError {}

/// Format the message reported for a value outside a lexical space
///
/// The shape is fixed: `'<value>' is not a valid value for '<name>'`.
pub fn facet_message(value: &str, lexical_space: &str) -> String {
    format!("'{}' is not a valid value for '{}'", value, lexical_space)
}

/// Wiring errors of the diagnostics registration
///
/// These indicate a bug in the code that sets up the lexical layer and are
/// never caused by document content.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A parse error factory was registered a second time
    #[error("parse error factory already registered")]
    AlreadyRegistered,

    /// Diagnostics were requested before any factory was registered
    #[error("parse error factory used before registration")]
    NotRegistered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_message_shape() {
        assert_eq!(
            facet_message("maybe", "boolean"),
            "'maybe' is not a valid value for 'boolean'"
        );
    }

    #[test]
    fn test_lexical_error_display() {
        let node = NodeRef::attribute(3, "xs:element", "nillable").with_position(120);
        let err = LexicalError::grammar(node, "True", "boolean");

        let msg = format!("{}", err);
        assert!(msg.contains("'True' is not a valid value for 'boolean'"));
        assert!(msg.contains("Node: attribute 'nillable' of <xs:element> at byte 120"));
        assert_eq!(err.kind, LexicalErrorKind::Grammar);
    }

    #[test]
    fn test_limit_error_keeps_facet_prefix() {
        let node = NodeRef::element(0, "xs:schema");
        let err = LexicalError::limit(node, "1234", "positiveInteger", "4 digits");
        assert!(err.message.starts_with("'1234' is not a valid value for 'positiveInteger'"));
        assert!(err.message.ends_with("(4 digits)"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = LexicalError::grammar(NodeRef::element(0, "a"), "x", "NCName").into();
        assert!(matches!(err, Error::Lexical(_)));

        let err: Error = ConfigurationError::AlreadyRegistered.into();
        assert!(matches!(err, Error::Configuration(ConfigurationError::AlreadyRegistered)));
    }
}
