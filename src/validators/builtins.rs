//! XSD built-in lexical spaces
//!
//! The closed set of lexical spaces schema attributes are read in, and the
//! typed values they convert to. Conversion is dispatched explicitly on
//! [`LexicalSpace`]; there is no per-type trait object.

use crate::namespaces::QualifiedName;
use crate::nodes::AttributeNode;
use crate::validators::context::LexicalContext;
use crate::validators::exceptions::ParseErrorFactory;
use crate::validators::facets::WhiteSpace;
use crate::validators::helpers;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::fmt;

// =============================================================================
// Type names
// =============================================================================

/// XSD string type name
pub const XSD_STRING: &str = "string";
/// XSD token type name
pub const XSD_TOKEN: &str = "token";
/// XSD language type name
pub const XSD_LANGUAGE: &str = "language";
/// XSD NCName type name
pub const XSD_NCNAME: &str = "NCName";
/// XSD boolean type name
pub const XSD_BOOLEAN: &str = "boolean";
/// XSD nonNegativeInteger type name
pub const XSD_NON_NEGATIVE_INTEGER: &str = "nonNegativeInteger";
/// XSD positiveInteger type name
pub const XSD_POSITIVE_INTEGER: &str = "positiveInteger";
/// XSD anyURI type name
pub const XSD_ANY_URI: &str = "anyURI";
/// XSD QName type name
pub const XSD_QNAME: &str = "QName";

// =============================================================================
// Lexical spaces
// =============================================================================

/// Lexical space an attribute value is read in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalSpace {
    /// `xs:boolean`
    Boolean,
    /// `xs:language`
    Language,
    /// `xs:NCName`
    NcName,
    /// `xs:QName`, resolved
    QName,
    /// Space-separated list of `xs:QName`, resolved
    QNameList,
    /// `xs:positiveInteger`
    PositiveInteger,
    /// `xs:nonNegativeInteger`
    NonNegativeInteger,
    /// `xs:anyURI`
    AnyUri,
    /// `xs:token`
    Token,
    /// `xs:string`
    String,
}

impl LexicalSpace {
    /// Every lexical space
    pub const ALL: [LexicalSpace; 10] = [
        LexicalSpace::Boolean,
        LexicalSpace::Language,
        LexicalSpace::NcName,
        LexicalSpace::QName,
        LexicalSpace::QNameList,
        LexicalSpace::PositiveInteger,
        LexicalSpace::NonNegativeInteger,
        LexicalSpace::AnyUri,
        LexicalSpace::Token,
        LexicalSpace::String,
    ];

    /// XSD type name used in error messages
    ///
    /// A QName list reports its failing member, so it shares `QName`.
    pub fn name(&self) -> &'static str {
        match self {
            LexicalSpace::Boolean => XSD_BOOLEAN,
            LexicalSpace::Language => XSD_LANGUAGE,
            LexicalSpace::NcName => XSD_NCNAME,
            LexicalSpace::QName | LexicalSpace::QNameList => XSD_QNAME,
            LexicalSpace::PositiveInteger => XSD_POSITIVE_INTEGER,
            LexicalSpace::NonNegativeInteger => XSD_NON_NEGATIVE_INTEGER,
            LexicalSpace::AnyUri => XSD_ANY_URI,
            LexicalSpace::Token => XSD_TOKEN,
            LexicalSpace::String => XSD_STRING,
        }
    }

    /// Look up a single-valued lexical space by XSD type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            XSD_BOOLEAN => Some(LexicalSpace::Boolean),
            XSD_LANGUAGE => Some(LexicalSpace::Language),
            XSD_NCNAME => Some(LexicalSpace::NcName),
            XSD_QNAME => Some(LexicalSpace::QName),
            XSD_POSITIVE_INTEGER => Some(LexicalSpace::PositiveInteger),
            XSD_NON_NEGATIVE_INTEGER => Some(LexicalSpace::NonNegativeInteger),
            XSD_ANY_URI => Some(LexicalSpace::AnyUri),
            XSD_TOKEN => Some(LexicalSpace::Token),
            XSD_STRING => Some(LexicalSpace::String),
            _ => None,
        }
    }

    /// White space policy applied before validation
    pub fn white_space(&self) -> WhiteSpace {
        match self {
            LexicalSpace::String => WhiteSpace::Preserve,
            _ => WhiteSpace::Collapse,
        }
    }

    /// Whether names in this space are resolved against namespace bindings
    pub fn is_qualified(&self) -> bool {
        matches!(self, LexicalSpace::QName | LexicalSpace::QNameList)
    }

    /// Convert the value of `attr` in this lexical space
    pub fn convert<F, A>(&self, ctx: &LexicalContext<F>, attr: &A) -> Result<TypedValue, F::Error>
    where
        F: ParseErrorFactory,
        A: AttributeNode + ?Sized,
    {
        Ok(match self {
            LexicalSpace::Boolean => TypedValue::Boolean(helpers::parse_boolean(ctx, attr)?),
            LexicalSpace::Language => TypedValue::Language(helpers::parse_language(ctx, attr)?),
            LexicalSpace::NcName => TypedValue::NcName(helpers::parse_ncname(ctx, attr)?),
            LexicalSpace::QName => TypedValue::QName(helpers::parse_qname(ctx, attr)?),
            LexicalSpace::QNameList => TypedValue::QNames(helpers::parse_qnames(ctx, attr)?),
            LexicalSpace::PositiveInteger => {
                TypedValue::PositiveInteger(helpers::parse_positive_integer(ctx, attr)?)
            }
            LexicalSpace::NonNegativeInteger => {
                TypedValue::NonNegativeInteger(helpers::parse_non_negative_integer(ctx, attr)?)
            }
            LexicalSpace::AnyUri => TypedValue::AnyUri(helpers::parse_any_uri(ctx, attr)?),
            LexicalSpace::Token => TypedValue::Token(helpers::parse_token(attr)),
            LexicalSpace::String => TypedValue::String(helpers::parse_string(attr)),
        })
    }
}

impl fmt::Display for LexicalSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalSpace::QNameList => write!(f, "list of {}", XSD_QNAME),
            other => f.write_str(other.name()),
        }
    }
}

// =============================================================================
// Typed values
// =============================================================================

/// Value converted from an attribute
///
/// Serializes as `{"type": <xsd name>, "value": ...}`; integers are written as
/// decimal strings so no precision is lost.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum TypedValue {
    /// `xs:boolean`
    #[serde(rename = "boolean")]
    Boolean(bool),
    /// `xs:language`
    #[serde(rename = "language")]
    Language(String),
    /// `xs:NCName`
    #[serde(rename = "NCName")]
    NcName(String),
    /// `xs:QName`
    #[serde(rename = "QName")]
    QName(QualifiedName),
    /// List of `xs:QName`
    #[serde(rename = "QNames")]
    QNames(Vec<QualifiedName>),
    /// `xs:positiveInteger`
    #[serde(rename = "positiveInteger")]
    PositiveInteger(#[serde(serialize_with = "serialize_integer")] BigUint),
    /// `xs:nonNegativeInteger`
    #[serde(rename = "nonNegativeInteger")]
    NonNegativeInteger(#[serde(serialize_with = "serialize_integer")] BigUint),
    /// `xs:anyURI`
    #[serde(rename = "anyURI")]
    AnyUri(String),
    /// `xs:token`
    #[serde(rename = "token")]
    Token(String),
    /// `xs:string`
    #[serde(rename = "string")]
    String(String),
}

fn serialize_integer<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl TypedValue {
    /// Lexical space the value belongs to
    pub fn lexical_space(&self) -> LexicalSpace {
        match self {
            TypedValue::Boolean(_) => LexicalSpace::Boolean,
            TypedValue::Language(_) => LexicalSpace::Language,
            TypedValue::NcName(_) => LexicalSpace::NcName,
            TypedValue::QName(_) => LexicalSpace::QName,
            TypedValue::QNames(_) => LexicalSpace::QNameList,
            TypedValue::PositiveInteger(_) => LexicalSpace::PositiveInteger,
            TypedValue::NonNegativeInteger(_) => LexicalSpace::NonNegativeInteger,
            TypedValue::AnyUri(_) => LexicalSpace::AnyUri,
            TypedValue::Token(_) => LexicalSpace::Token,
            TypedValue::String(_) => LexicalSpace::String,
        }
    }

    /// Boolean value, if this is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Text value of the string-like spaces
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Language(s)
            | TypedValue::NcName(s)
            | TypedValue::AnyUri(s)
            | TypedValue::Token(s)
            | TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value of the integer spaces
    pub fn as_integer(&self) -> Option<&BigUint> {
        match self {
            TypedValue::PositiveInteger(n) | TypedValue::NonNegativeInteger(n) => Some(n),
            _ => None,
        }
    }

    /// Resolved names: one for a QName, all members for a list
    pub fn as_qnames(&self) -> Option<&[QualifiedName]> {
        match self {
            TypedValue::QName(q) => Some(std::slice::from_ref(q)),
            TypedValue::QNames(qs) => Some(qs),
            _ => None,
        }
    }

    /// Convert to a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::XSD_NAMESPACE;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_names_round_trip() {
        for space in LexicalSpace::ALL {
            if space == LexicalSpace::QNameList {
                continue;
            }
            assert_eq!(LexicalSpace::from_name(space.name()), Some(space));
        }
        assert_eq!(LexicalSpace::from_name("decimal"), None);
        assert_eq!(LexicalSpace::QNameList.name(), "QName");
        assert_eq!(LexicalSpace::QNameList.to_string(), "list of QName");
    }

    #[test]
    fn test_white_space_policy() {
        assert_eq!(LexicalSpace::String.white_space(), WhiteSpace::Preserve);
        assert_eq!(LexicalSpace::Token.white_space(), WhiteSpace::Collapse);
        assert!(LexicalSpace::QNameList.is_qualified());
        assert!(!LexicalSpace::NcName.is_qualified());
    }

    #[test]
    fn test_typed_value_json() {
        let value = TypedValue::PositiveInteger(BigUint::from(12345678901234567890u64) * 10u32);
        assert_eq!(
            value.to_json(),
            json!({"type": "positiveInteger", "value": "123456789012345678900"})
        );

        let value = TypedValue::QNames(vec![QualifiedName::new(
            Some(XSD_NAMESPACE),
            "int",
            Some("xs"),
        )]);
        assert_eq!(
            value.to_json(),
            json!({
                "type": "QNames",
                "value": [{"namespace": XSD_NAMESPACE, "localName": "int", "prefix": "xs"}]
            })
        );

        assert_eq!(TypedValue::Boolean(true).to_json(), json!({"type": "boolean", "value": true}));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(TypedValue::Boolean(false).as_bool(), Some(false));
        assert_eq!(TypedValue::Token("a b".into()).as_str(), Some("a b"));
        assert_eq!(TypedValue::Token("a".into()).lexical_space(), LexicalSpace::Token);
        assert_eq!(
            TypedValue::NonNegativeInteger(BigUint::from(7u32)).as_integer(),
            Some(&BigUint::from(7u32))
        );
        let q = QualifiedName::local("a");
        assert_eq!(TypedValue::QName(q.clone()).as_qnames(), Some(&[q][..]));
        assert_eq!(TypedValue::Boolean(true).as_qnames(), None);
    }
}
