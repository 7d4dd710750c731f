//! # xmlschema-lexical
//!
//! Lexical validation and QName resolution for the attributes of XML Schema
//! documents.
//!
//! Schema construction reads dozens of attributes (`minOccurs`, `type`,
//! `targetNamespace`, `substitutionGroup`, ...) whose text must belong to an
//! XSD built-in lexical space. This crate provides:
//!
//! - White space normalization (`preserve`, `replace`, `collapse`)
//! - Validators for `boolean`, `language`, `NCName`, `QName` (and lists of
//!   them), `positiveInteger`, `nonNegativeInteger`, `anyURI`, `token` and
//!   `string`
//! - QName resolution against the namespace bindings in scope
//! - An injected error factory, so failures come back as the caller's own
//!   error type
//! - A small document tree and helpers for building schema documents
//!
//! ## Example
//!
//! ```rust
//! use xmlschema_lexical::documents::Document;
//! use xmlschema_lexical::validators::{LexicalContext, LexicalSpace, TypedValue};
//! use xmlschema_lexical::{Error, QualifiedName, XSD_NAMESPACE};
//!
//! let doc = Document::from_string(
//!     r#"<xs:element xmlns:xs="http://www.w3.org/2001/XMLSchema" name="a" type="xs:int"/>"#,
//! )?;
//! let ctx = LexicalContext::new(Error::Lexical);
//!
//! let attr = doc.attribute(doc.root_element().unwrap(), "type").unwrap();
//! let value = LexicalSpace::QName.convert(&ctx, &attr)?;
//! assert_eq!(value, TypedValue::QName(QualifiedName::namespaced(XSD_NAMESPACE, "int")));
//! # Ok::<(), Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and namespaces
pub mod names;
pub mod namespaces;

// Trees
pub mod documents;
pub mod nodes;
pub mod trees;

// Validators
pub mod validators;

// Re-exports for convenience
pub use error::{ConfigurationError, Error, LexicalError, LexicalErrorKind, NodeRef, Result};
pub use limits::Limits;
pub use namespaces::{
    NamespaceBindings, QualifiedName, XMLNS_NAMESPACE, XML_NAMESPACE, XSD_NAMESPACE,
};
pub use nodes::AttributeNode;

/// Version of the xmlschema-lexical library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
