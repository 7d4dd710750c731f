//! Lexical-space validators
//!
//! One function per lexical space. Each takes the attribute (for its raw
//! value, its namespace bindings and its identity in error reports) and
//! either returns the converted value or an error built by the context's
//! factory. The `*_value` variants accept text the caller has already
//! normalized, e.g. one member of a list.

use crate::error::{LexicalError, LexicalErrorKind};
use crate::names;
use crate::namespaces::QualifiedName;
use crate::nodes::AttributeNode;
use crate::validators::builtins::{
    XSD_ANY_URI, XSD_BOOLEAN, XSD_LANGUAGE, XSD_NCNAME, XSD_NON_NEGATIVE_INTEGER,
    XSD_POSITIVE_INTEGER, XSD_QNAME,
};
use crate::validators::context::LexicalContext;
use crate::validators::exceptions::ParseErrorFactory;
use crate::validators::facets::collapse_whitespace;
use crate::validators::qnames::resolve_qname;
use num_bigint::BigUint;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Host;

/// Separator between members of a list value, after collapsing
pub const LIST_SEPARATOR: &str = " ";

static LANGUAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{1,8}(?:-[a-zA-Z0-9]{1,8})*$").unwrap());

static POSITIVE_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?0*[1-9][0-9]*$").unwrap());

static NON_NEGATIVE_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:-0+|\+?[0-9]+)$").unwrap());

// RFC 3986 URI-reference. Non-ASCII characters other than controls and
// spaces are admitted in every component, as IRIs do.
static URI_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    let other = r"[^\x00-\x7F\p{Cc}\p{Z}]";
    let pct = r"%[0-9A-Fa-f]{2}";
    let pchar = format!(r"(?:[A-Za-z0-9\-._~!$&'()*+,;=:@]|{pct}|{other})");
    let pchar_nc = format!(r"(?:[A-Za-z0-9\-._~!$&'()*+,;=@]|{pct}|{other})");
    let userinfo = format!(r"(?:[A-Za-z0-9\-._~!$&'()*+,;=:]|{pct}|{other})*");
    let ip_literal = r"\[[0-9A-Za-z\-._~!$&'()*+,;=:]+\]";
    let reg_name = format!(r"(?:[A-Za-z0-9\-._~!$&'()*+,;=]|{pct}|{other})*");
    let authority = format!(r"(?:{userinfo}@)?(?:{ip_literal}|{reg_name})(?::[0-9]*)?");
    let segment = format!("{pchar}*");
    let segment_nz = format!("{pchar}+");
    let path_abempty = format!("(?:/{segment})*");
    let path_absolute = format!("/(?:{segment_nz}(?:/{segment})*)?");
    let path_rootless = format!("{segment_nz}(?:/{segment})*");
    let path_noscheme = format!("{pchar_nc}+(?:/{segment})*");
    let query = format!(r"(?:{pchar}|[/?])*");
    let tail = format!(r"(?:\?{query})?(?:#{query})?");
    let absolute = format!(
        "[A-Za-z][A-Za-z0-9+.\\-]*:(?://{authority}{path_abempty}|{path_absolute}|{path_rootless}){tail}"
    );
    let relative =
        format!("(?://{authority}{path_abempty}|{path_absolute}|{path_noscheme}|){tail}");
    Regex::new(&format!("^(?:{absolute}|{relative})$")).unwrap()
});

static AUTHORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Za-z][A-Za-z0-9+.\-]*:)?//([^/?#]*)").unwrap());

/// Check whether `value` is a syntactically valid URI reference
///
/// Absolute and relative references are accepted, percent-encoding is
/// checked for shape only. An absolute reference needs something after the
/// scheme: `http:` alone is rejected. Authorities are checked the same way
/// for every scheme: ports must fit in 16 bits and IP literals must parse.
/// Registered names are not checked against DNS or IPv4 rules.
pub fn is_valid_uri_reference(value: &str) -> bool {
    if !URI_REFERENCE.is_match(value) {
        return false;
    }
    match AUTHORITY.captures(value).and_then(|caps| caps.get(1)) {
        Some(authority) => is_valid_authority(authority.as_str()),
        None => true,
    }
}

// The grammar has already been matched, so only ports and IP literals are
// left to check.
fn is_valid_authority(authority: &str) -> bool {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, rest)| rest);
    let (host, port) = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => (&host_port[..=end], host_port[end + 1..].strip_prefix(':')),
            None => return false,
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };
    if let Some(port) = port.filter(|port| !port.is_empty()) {
        if port.parse::<u16>().is_err() {
            return false;
        }
    }
    match host.strip_prefix('[') {
        // IPvFuture
        Some(literal) if literal.starts_with(['v', 'V']) => true,
        Some(_) => Host::parse(host).is_ok(),
        None => true,
    }
}

/// Convert an attribute to `xs:boolean`
pub fn parse_boolean<F, A>(ctx: &LexicalContext<F>, attr: &A) -> Result<bool, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    match value.as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ctx.diagnostics().facet_error(attr.node_ref(), value, XSD_BOOLEAN)),
    }
}

/// Convert an attribute to `xs:language`
pub fn parse_language<F, A>(ctx: &LexicalContext<F>, attr: &A) -> Result<String, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    ctx.check_length(|| attr.node_ref(), &value, XSD_LANGUAGE)?;
    if LANGUAGE.is_match(&value) {
        Ok(value)
    } else {
        Err(ctx.diagnostics().facet_error(attr.node_ref(), value, XSD_LANGUAGE))
    }
}

/// Convert an attribute to `xs:NCName`
pub fn parse_ncname<F, A>(ctx: &LexicalContext<F>, attr: &A) -> Result<String, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    ctx.check_length(|| attr.node_ref(), &value, XSD_NCNAME)?;
    if names::is_valid_ncname(&value) {
        Ok(value)
    } else {
        Err(ctx.diagnostics().facet_error(attr.node_ref(), value, XSD_NCNAME))
    }
}

/// Convert an attribute to a resolved `xs:QName`
pub fn parse_qname<F, A>(ctx: &LexicalContext<F>, attr: &A) -> Result<QualifiedName, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    parse_qname_value(ctx, attr, &value)
}

/// Resolve an already-normalized QName in the scope of `attr`
pub fn parse_qname_value<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
    value: &str,
) -> Result<QualifiedName, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    ctx.check_length(|| attr.node_ref(), value, XSD_QNAME)?;
    match names::parse_qname(value) {
        Some((prefix, local_name)) => resolve_qname(ctx, attr, value, prefix, local_name),
        None => Err(ctx.diagnostics().facet_error(attr.node_ref(), value, XSD_QNAME)),
    }
}

/// Convert an attribute to a list of resolved QNames
///
/// Order and duplicates are kept. The first member that fails makes the
/// whole conversion fail.
pub fn parse_qnames<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
) -> Result<Vec<QualifiedName>, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    let count = value.split(LIST_SEPARATOR).count();
    if let Err(e) = ctx.limits().check_list_items(count) {
        return Err(ctx.diagnostics().limit_error(attr.node_ref(), value, XSD_QNAME, e));
    }
    value
        .split(LIST_SEPARATOR)
        .map(|name| parse_qname_value(ctx, attr, name))
        .collect()
}

/// Convert an attribute to `xs:positiveInteger`
pub fn parse_positive_integer<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
) -> Result<BigUint, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    ctx.check_length(|| attr.node_ref(), &value, XSD_POSITIVE_INTEGER)?;
    if !POSITIVE_INTEGER.is_match(&value) {
        let node = attr.node_ref();
        return Err(ctx.diagnostics().facet_error(node, value, XSD_POSITIVE_INTEGER));
    }
    to_integer(ctx, attr, &value, value.trim_start_matches('+'), XSD_POSITIVE_INTEGER)
}

/// Convert an attribute to `xs:nonNegativeInteger`
pub fn parse_non_negative_integer<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
) -> Result<BigUint, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    parse_non_negative_integer_value(ctx, attr, &value)
}

/// Convert already-normalized text to `xs:nonNegativeInteger`
///
/// Besides unsigned and `+`-signed digits, `-0`, `-00`, ... are accepted as
/// zero. No other negative form is.
pub fn parse_non_negative_integer_value<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
    value: &str,
) -> Result<BigUint, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    ctx.check_length(|| attr.node_ref(), value, XSD_NON_NEGATIVE_INTEGER)?;
    if !NON_NEGATIVE_INTEGER.is_match(value) {
        let node = attr.node_ref();
        return Err(ctx.diagnostics().facet_error(node, value, XSD_NON_NEGATIVE_INTEGER));
    }
    let digits = value.trim_start_matches(['+', '-']);
    to_integer(ctx, attr, value, digits, XSD_NON_NEGATIVE_INTEGER)
}

fn to_integer<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
    value: &str,
    digits: &str,
    lexical_space: &'static str,
) -> Result<BigUint, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let significant = digits.trim_start_matches('0');
    if let Err(e) = ctx.limits().check_integer_digits(significant.len()) {
        return Err(ctx.diagnostics().limit_error(attr.node_ref(), value, lexical_space, e));
    }
    if significant.is_empty() {
        return Ok(BigUint::default());
    }
    BigUint::parse_bytes(significant.as_bytes(), 10)
        .ok_or_else(|| ctx.diagnostics().facet_error(attr.node_ref(), value, lexical_space))
}

/// Convert an attribute to `xs:anyURI`
pub fn parse_any_uri<F, A>(ctx: &LexicalContext<F>, attr: &A) -> Result<String, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = collapse_whitespace(attr.value());
    parse_any_uri_value(ctx, attr, &value)
}

/// Check already-normalized text against `xs:anyURI`
pub fn parse_any_uri_value<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
    value: &str,
) -> Result<String, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    ctx.check_length(|| attr.node_ref(), value, XSD_ANY_URI)?;
    if is_valid_uri_reference(value) {
        Ok(value.to_string())
    } else {
        Err(ctx.diagnostics().facet_error(attr.node_ref(), value, XSD_ANY_URI))
    }
}

/// Convert an attribute to `xs:token`: the collapsed value, never fails
pub fn parse_token<A: AttributeNode + ?Sized>(attr: &A) -> String {
    collapse_whitespace(attr.value())
}

/// Convert an attribute to `xs:string`: the raw value, never fails
pub fn parse_string<A: AttributeNode + ?Sized>(attr: &A) -> String {
    attr.value().to_string()
}

/// Read a `targetNamespace` attribute
///
/// The attribute may be absent, but when present it must be a non-empty
/// URI: `targetNamespace=""` is an error, not a way to say "no namespace".
pub fn require_non_empty_target_namespace<F, A>(
    ctx: &LexicalContext<F>,
    attr: &A,
) -> Result<String, F::Error>
where
    F: ParseErrorFactory,
    A: AttributeNode + ?Sized,
{
    let value = parse_any_uri(ctx, attr)?;
    if value.is_empty() {
        return Err(ctx.diagnostics().report(LexicalError::new(
            LexicalErrorKind::Grammar,
            attr.node_ref(),
            value,
            XSD_ANY_URI,
            "targetNamespace must either be absent or a non-empty string",
        )));
    }
    Ok(value)
}
