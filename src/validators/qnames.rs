//! QName resolution
//!
//! Turns the prefix of a lexical QName into a namespace URI using the
//! bindings in scope at the attribute. The cases are checked in a fixed
//! order, and the reserved `xml` prefix is handled before the generic
//! unbound-prefix check:
//!
//! 1. `xml` always maps to the XML namespace; binding it to anything else is
//!    an error.
//! 2. Any other prefix must be bound.
//! 3. Without a prefix the default namespace applies, and its absence simply
//!    means "no namespace".
//!
//! Empty namespace URIs (`xmlns=""`) count as absent throughout.

use crate::namespaces::{QualifiedName, XML_NAMESPACE, XML_PREFIX};
use crate::nodes::AttributeNode;
use crate::validators::builtins::XSD_QNAME;
use crate::validators::context::LexicalContext;
use crate::validators::exceptions::ParseErrorFactory;

/// Resolve an already-split QName against the bindings in scope at `attr`
///
/// `value` is the lexical form the prefix and local name were taken from;
/// it is only used in error messages.
pub fn resolve_qname<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
    value: &str,
    prefix: Option<&str>,
    local_name: &str,
) -> Result<QualifiedName, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let prefix = prefix.filter(|p| !p.is_empty());
    let bound = attr
        .lookup_namespace_uri(prefix)
        .filter(|uri| !uri.is_empty());

    let namespace = match (prefix, bound) {
        (Some(XML_PREFIX), Some(uri)) if uri != XML_NAMESPACE => {
            return Err(ctx.diagnostics().resolution_error(
                attr.node_ref(),
                value,
                XSD_QNAME,
                format!(
                    "'xml' prefix must be bound to its usual namespace, '{}', but was bound to '{}'",
                    XML_NAMESPACE, uri
                ),
            ));
        }
        (Some(XML_PREFIX), _) => Some(XML_NAMESPACE),
        (Some(prefix), None) => {
            return Err(ctx.diagnostics().resolution_error(
                attr.node_ref(),
                value,
                XSD_QNAME,
                format!(
                    "'{}' does not name a valid namespace URI for prefix '{}'",
                    value, prefix
                ),
            ));
        }
        (_, bound) => bound,
    };

    tracing::trace!(value, namespace, "resolved QName");
    Ok(QualifiedName::new(namespace, local_name, prefix))
}
