//! White space normalization
//!
//! Implements the three `whiteSpace` facet policies. Lexical validation of
//! schema attributes always uses [`WhiteSpace::Collapse`], except for
//! `xs:string` values which are taken as they are.

use crate::error::{Error, Result};

/// White space handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    /// Preserve all white space
    Preserve,
    /// Replace tabs and newlines with spaces
    Replace,
    /// Replace and collapse multiple spaces, trimming both ends
    Collapse,
}

impl WhiteSpace {
    /// Parse from string value
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "preserve" => Ok(WhiteSpace::Preserve),
            "replace" => Ok(WhiteSpace::Replace),
            "collapse" => Ok(WhiteSpace::Collapse),
            _ => Err(Error::Value(format!(
                "Invalid whiteSpace value: '{}'. Must be 'preserve', 'replace', or 'collapse'",
                s
            ))),
        }
    }

    /// Facet keyword for this policy
    pub fn as_str(&self) -> &'static str {
        match self {
            WhiteSpace::Preserve => "preserve",
            WhiteSpace::Replace => "replace",
            WhiteSpace::Collapse => "collapse",
        }
    }

    /// Normalize a string according to this white space mode
    pub fn normalize(&self, s: &str) -> String {
        match self {
            WhiteSpace::Preserve => s.to_string(),
            WhiteSpace::Replace => s.replace(['\t', '\n', '\r'], " "),
            WhiteSpace::Collapse => collapse_whitespace(s),
        }
    }

    /// Whether `value` is already normalized under this mode
    pub fn is_normalized(&self, value: &str) -> bool {
        match self {
            WhiteSpace::Preserve => true,
            WhiteSpace::Replace => !value.contains(['\t', '\n', '\r']),
            WhiteSpace::Collapse => {
                !value.contains(['\t', '\n', '\r'])
                    && !value.contains("  ")
                    && !value.starts_with(' ')
                    && !value.ends_with(' ')
            }
        }
    }
}

fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n' | '\t')
}

/// Apply the `collapse` policy
///
/// Each run of space, CR, LF and TAB becomes a single space; runs at either
/// end are dropped. Only those four characters count as white space, so
/// other Unicode spaces (NBSP, ideographic space) are kept as content.
pub fn collapse_whitespace(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for word in value.split(is_xml_whitespace).filter(|word| !word.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapse() {
        assert_eq!(collapse_whitespace("  a \t\r\n b  "), "a b");
        assert_eq!(collapse_whitespace("a"), "a");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace(" \n\t "), "");
        assert_eq!(collapse_whitespace("xs:string   xs:int"), "xs:string xs:int");
    }

    #[test]
    fn test_collapse_keeps_other_spaces() {
        assert_eq!(collapse_whitespace("\u{A0}a\u{3000}"), "\u{A0}a\u{3000}");
        // Multi-byte characters around whitespace survive intact
        assert_eq!(collapse_whitespace(" \u{1F600}\t\u{4E2D} "), "\u{1F600} \u{4E2D}");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(WhiteSpace::from_str("collapse").unwrap(), WhiteSpace::Collapse);
        assert_eq!(WhiteSpace::from_str("replace").unwrap().as_str(), "replace");
        assert!(WhiteSpace::from_str("Collapse").is_err());
    }

    #[test]
    fn test_replace_and_preserve() {
        assert_eq!(WhiteSpace::Replace.normalize("a\tb\r\nc"), "a b  c");
        assert_eq!(WhiteSpace::Preserve.normalize(" a\t"), " a\t");
        assert!(WhiteSpace::Replace.is_normalized("a  b"));
        assert!(!WhiteSpace::Collapse.is_normalized("a  b"));
        assert!(!WhiteSpace::Collapse.is_normalized(" a"));
    }

    proptest! {
        #[test]
        fn collapse_is_idempotent(s in "\\PC*|[ \t\r\na-z]*") {
            let once = collapse_whitespace(&s);
            prop_assert_eq!(collapse_whitespace(&once), once.clone());
        }

        #[test]
        fn collapsed_values_are_normalized(s in "[ \t\r\n\u{A0}a-z\u{4E2D}]*") {
            let collapsed = WhiteSpace::Collapse.normalize(&s);
            prop_assert!(WhiteSpace::Collapse.is_normalized(&collapsed));
        }

        #[test]
        fn collapse_keeps_non_whitespace(s in "\\PC*") {
            let kept: String = s.chars().filter(|c| !is_xml_whitespace(*c)).collect();
            let collapsed: String = collapse_whitespace(&s).chars().filter(|c| *c != ' ').collect();
            prop_assert_eq!(kept, collapsed);
        }
    }
}
