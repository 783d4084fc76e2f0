//! Column specifier parsing.
//!
//! A column is addressed as `family:qualifier`. The specifier is split on
//! the first `:` only, so qualifiers may themselves contain colons.
//!
//! | Input | Family | Qualifier |
//! |-------|--------|-----------|
//! | `f` | `f` | absent (whole family) |
//! | `f:` | `f` | absent (whole family) |
//! | `f:q` | `f` | `q` |
//! | `f:a:b` | `f` | `a:b` |
//! | `""`, `:q` | error | |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bytes::to_string_binary;
use crate::error::{Error, Result};

/// A parsed column specifier.
///
/// Invariant: `family` is never empty. A `None` qualifier addresses every
/// column of the family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpec {
    family: Vec<u8>,
    qualifier: Option<Vec<u8>>,
}

impl ColumnSpec {
    /// Parse a column specifier from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `MalformedColumnSpecifier` when the family portion is empty.
    pub fn parse(spec: &[u8]) -> Result<Self> {
        let (family, qualifier) = match spec.iter().position(|&b| b == b':') {
            Some(idx) => (&spec[..idx], Some(&spec[idx + 1..])),
            None => (spec, None),
        };

        if family.is_empty() {
            return Err(Error::MalformedColumnSpecifier {
                spec: to_string_binary(spec),
            });
        }

        // A trailing colon means the same thing as a bare family.
        let qualifier = qualifier.filter(|q| !q.is_empty()).map(|q| q.to_vec());

        Ok(Self {
            family: family.to_vec(),
            qualifier,
        })
    }

    /// Parse a column specifier from a string.
    pub fn parse_str(spec: &str) -> Result<Self> {
        Self::parse(spec.as_bytes())
    }

    /// Specifier for a whole family.
    pub fn family_only(family: impl Into<Vec<u8>>) -> Result<Self> {
        let family = family.into();
        if family.is_empty() {
            return Err(Error::MalformedColumnSpecifier {
                spec: String::new(),
            });
        }
        Ok(Self {
            family,
            qualifier: None,
        })
    }

    /// Column family bytes.
    pub fn family(&self) -> &[u8] {
        &self.family
    }

    /// Qualifier bytes, `None` for the whole family.
    pub fn qualifier(&self) -> Option<&[u8]> {
        self.qualifier.as_deref()
    }

    /// Whether the specifier addresses every column of the family.
    pub fn is_family_only(&self) -> bool {
        self.qualifier.is_none()
    }

    /// Qualifier for operations that need one concrete cell.
    ///
    /// A whole-family specifier addresses the empty qualifier, i.e. the
    /// `family:` column itself.
    pub fn cell_qualifier(&self) -> &[u8] {
        self.qualifier.as_deref().unwrap_or(&[])
    }

    /// Split into `(family, qualifier)`.
    pub fn into_parts(self) -> (Vec<u8>, Option<Vec<u8>>) {
        (self.family, self.qualifier)
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            to_string_binary(&self.family),
            to_string_binary(self.cell_qualifier())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bare_family() {
        let spec = ColumnSpec::parse_str("info").unwrap();
        assert_eq!(spec.family(), b"info");
        assert_eq!(spec.qualifier(), None);
        assert!(spec.is_family_only());
    }

    #[test]
    fn test_family_and_qualifier() {
        let spec = ColumnSpec::parse_str("x:a").unwrap();
        assert_eq!(spec.family(), b"x");
        assert_eq!(spec.qualifier(), Some(&b"a"[..]));
    }

    #[test]
    fn test_trailing_colon_is_whole_family() {
        assert_eq!(
            ColumnSpec::parse_str("f:").unwrap(),
            ColumnSpec::parse_str("f").unwrap()
        );
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let spec = ColumnSpec::parse_str("f:a:b:c").unwrap();
        assert_eq!(spec.family(), b"f");
        assert_eq!(spec.qualifier(), Some(&b"a:b:c"[..]));
    }

    #[test]
    fn test_empty_family_is_malformed() {
        assert!(matches!(
            ColumnSpec::parse_str(""),
            Err(Error::MalformedColumnSpecifier { .. })
        ));
        assert!(matches!(
            ColumnSpec::parse_str(":q"),
            Err(Error::MalformedColumnSpecifier { .. })
        ));
        assert!(ColumnSpec::family_only(Vec::new()).is_err());
    }

    #[test]
    fn test_binary_bytes() {
        let spec = ColumnSpec::parse(&[b'f', b':', 0xef, 0xff]).unwrap();
        assert_eq!(spec.qualifier(), Some(&[0xef, 0xff][..]));
        assert_eq!(spec.to_string(), "f:\\xEF\\xFF");
    }

    #[test]
    fn test_display() {
        assert_eq!(ColumnSpec::parse_str("x:a").unwrap().to_string(), "x:a");
        assert_eq!(ColumnSpec::parse_str("x").unwrap().to_string(), "x:");
    }

    proptest! {
        #[test]
        fn prop_no_colon_is_family_only(s in "[^:]{1,24}") {
            let spec = ColumnSpec::parse_str(&s).unwrap();
            prop_assert_eq!(spec.family(), s.as_bytes());
            prop_assert!(spec.qualifier().is_none());
        }

        #[test]
        fn prop_family_qualifier_split(f in "[^:]{1,16}", q in "[^:]{1,16}") {
            let spec = ColumnSpec::parse_str(&format!("{}:{}", f, q)).unwrap();
            prop_assert_eq!(spec.family(), f.as_bytes());
            prop_assert_eq!(spec.qualifier(), Some(q.as_bytes()));
        }

        #[test]
        fn prop_trailing_colon_equals_bare(f in "[^:]{1,16}") {
            prop_assert_eq!(
                ColumnSpec::parse_str(&format!("{}:", f)).unwrap(),
                ColumnSpec::parse_str(&f).unwrap()
            );
        }
    }
}
