//! XML name grammars
//!
//! Character classes follow the `NameStartChar` and `NameChar` productions of
//! XML 1.0 Fifth Edition, restricted to the Basic Multilingual Plane and with
//! `:` removed so that the classes describe NCNames.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that may start an NCName
pub const NAME_START_CHARS: &str = concat!(
    r"A-Z_a-z",
    r"\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}",
    r"\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}",
    r"\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}",
);

/// Characters that may continue an NCName
pub const NAME_CHARS: &str = concat!(
    r"\-.0-9A-Z_a-z\u{B7}",
    r"\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{37D}\u{37F}-\u{1FFF}",
    r"\u{200C}-\u{200D}\u{203F}\u{2040}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}",
    r"\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}",
);

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[{}][{}]*$", NAME_START_CHARS, NAME_CHARS)).unwrap()
});

static QNAME: Lazy<Regex> = Lazy::new(|| {
    let ncname = format!("[{}][{}]*", NAME_START_CHARS, NAME_CHARS);
    Regex::new(&format!("^(?:({}):)?({})$", ncname, ncname)).unwrap()
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid QName (`prefix:local` or `local`)
pub fn is_valid_qname(name: &str) -> bool {
    QNAME.is_match(name)
}

/// Split a lexical QName into its prefix and local part
///
/// Returns `None` when `name` is not a valid QName.
pub fn parse_qname(name: &str) -> Option<(Option<&str>, &str)> {
    let caps = QNAME.captures(name)?;
    let prefix = caps.get(1).map(|m| m.as_str());
    let local = caps.get(2)?.as_str();
    Some((prefix, local))
}

/// Split a QName into prefix and local name without validating it
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("element"));
        assert!(is_valid_ncname("my-element"));
        assert!(is_valid_ncname("my_element"));
        assert!(is_valid_ncname("element123"));
        assert!(is_valid_ncname("_element"));
        assert!(is_valid_ncname("a.b-c"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("123element"));
        assert!(!is_valid_ncname("-element"));
        assert!(!is_valid_ncname(".element"));
        assert!(!is_valid_ncname("prefix:element"));
        assert!(!is_valid_ncname("with space"));
    }

    #[test]
    fn test_name_start_ranges() {
        // Greek and CJK letters are name-start characters
        assert!(is_valid_ncname("\u{3B1}beta"));
        assert!(is_valid_ncname("\u{4E2D}\u{6587}"));
        // Combining marks and the middle dot may only continue a name
        assert!(!is_valid_ncname("\u{300}a"));
        assert!(is_valid_ncname("a\u{300}"));
        assert!(!is_valid_ncname("\u{B7}a"));
        assert!(is_valid_ncname("a\u{B7}b"));
        // Undertie and character tie continue names
        assert!(is_valid_ncname("a\u{203F}\u{2040}"));
        assert!(!is_valid_ncname("\u{203F}a"));
    }

    #[test]
    fn test_excluded_letters() {
        // Multiplication and division signs sit inside Latin-1 letter blocks
        assert!(!is_valid_ncname("a\u{D7}b"));
        assert!(!is_valid_ncname("a\u{F7}b"));
        // Greek question mark is carved out of the Greek block
        assert!(!is_valid_ncname("a\u{37E}"));
        // Letters outside the BMP are not admitted
        assert!(!is_valid_ncname("\u{10400}"));
        // Alphabetic per Unicode, but outside the XML ranges
        assert!(!is_valid_ncname("\u{AA}"));
        assert!(!is_valid_ncname("a\u{2000}"));
    }

    #[test]
    fn test_is_valid_qname() {
        assert!(is_valid_qname("element"));
        assert!(is_valid_qname("prefix:element"));
        assert!(is_valid_qname("xs:schema"));

        assert!(!is_valid_qname(""));
        assert!(!is_valid_qname(":element"));
        assert!(!is_valid_qname("element:"));
        assert!(!is_valid_qname("a:b:c"));
        assert!(!is_valid_qname("1a:b"));
    }

    #[test]
    fn test_parse_qname() {
        assert_eq!(parse_qname("xs:string"), Some((Some("xs"), "string")));
        assert_eq!(parse_qname("string"), Some((None, "string")));
        assert_eq!(parse_qname("xs:"), None);
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("element"), (None, "element"));
        assert_eq!(split_qname("xs:element"), (Some("xs"), "element"));
    }
}
