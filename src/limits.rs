//! Limits and constraints for lexical processing
//!
//! Attribute values in schema documents are small in practice; these bounds
//! keep hostile inputs (megabyte-long names, lists with millions of members,
//! integers with millions of digits) from turning validation into a resource
//! sink. Limits only apply to lexical spaces that have a grammar: `token` and
//! `string` values are accepted regardless of size.

use crate::error::{Error, Result};

/// Lexical limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum length of a collapsed value, in characters
    pub max_value_length: usize,

    /// Maximum number of members in a QName list
    pub max_list_items: usize,

    /// Maximum number of digits in a positiveInteger/nonNegativeInteger
    pub max_integer_digits: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_value_length: 64 * 1024,
            max_list_items: 10_000,
            max_integer_digits: 10_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_value_length: 4096,
            max_list_items: 256,
            max_integer_digits: 40,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_value_length: 16 * 1024 * 1024,
            max_list_items: 1_000_000,
            max_integer_digits: 1_000_000,
        }
    }

    /// Check if a value length is within limits
    pub fn check_value_length(&self, length: usize) -> Result<()> {
        if length > self.max_value_length {
            Err(Error::LimitExceeded(format!(
                "value length {} exceeds maximum {}",
                length, self.max_value_length
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a list size is within limits
    pub fn check_list_items(&self, count: usize) -> Result<()> {
        if count > self.max_list_items {
            Err(Error::LimitExceeded(format!(
                "list of {} items exceeds maximum {}",
                count, self.max_list_items
            )))
        } else {
            Ok(())
        }
    }

    /// Check if an integer's digit count is within limits
    pub fn check_integer_digits(&self, digits: usize) -> Result<()> {
        if digits > self.max_integer_digits {
            Err(Error::LimitExceeded(format!(
                "{} digits exceeds maximum {}",
                digits, self.max_integer_digits
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_value_length, 64 * 1024);
        assert!(limits.check_value_length(500).is_ok());
        assert!(limits.check_value_length(100 * 1024).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_list_items < Limits::default().max_list_items);
        assert!(limits.check_integer_digits(41).is_err());
        assert!(limits.check_integer_digits(40).is_ok());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_value_length > Limits::default().max_value_length);
        assert!(limits.check_list_items(500_000).is_ok());
    }

    #[test]
    fn test_limit_message() {
        let err = Limits::strict().check_list_items(300).unwrap_err();
        assert_eq!(err.to_string(), "limit exceeded: list of 300 items exceeds maximum 256");
    }
}
