//! Lexical validators
//!
//! This module checks raw attribute text against the XSD built-in lexical
//! spaces a schema document uses, resolves QNames against namespace
//! bindings and reports failures through a caller-supplied error factory.

pub mod builtins;
pub mod context;
pub mod exceptions;
pub mod facets;
pub mod helpers;
pub mod qnames;

// Re-exports
pub use builtins::{LexicalSpace, TypedValue};
pub use context::LexicalContext;
pub use exceptions::{Diagnostics, DiagnosticsSlot, ParseErrorFactory};
pub use facets::{collapse_whitespace, WhiteSpace};
pub use helpers::{
    is_valid_uri_reference, parse_any_uri, parse_any_uri_value, parse_boolean, parse_language,
    parse_ncname, parse_non_negative_integer, parse_non_negative_integer_value,
    parse_positive_integer, parse_qname, parse_qname_value, parse_qnames, parse_string,
    parse_token, require_non_empty_target_namespace, LIST_SEPARATOR,
};
pub use qnames::resolve_qname;
