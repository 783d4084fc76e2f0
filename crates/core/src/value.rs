//! Loosely typed shell arguments.
//!
//! Every argument typed at the prompt is parsed into an [`Arg`] before any
//! command sees it. Commands then validate and convert arguments into typed
//! structures once, at the boundary.
//!
//! ## Conversions
//!
//! - Strings and bytes are interchangeable wherever raw bytes are expected
//!   (row keys, values, column specifiers).
//! - Numeric and boolean options also accept their string spelling
//!   (`'134217728'`, `'true'`), matching how schema attributes are usually
//!   quoted at the prompt.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bytes::to_string_binary;

/// Option dictionary: `{KEY => value, ...}`. Keys are case-sensitive.
pub type OptionMap = BTreeMap<String, Arg>;

/// A single shell argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arg {
    /// `nil`
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// UTF-8 string literal
    Str(String),
    /// String literal whose escapes produced non UTF-8 bytes
    Bytes(Vec<u8>),
    /// `[a, b, ...]`
    List(Vec<Arg>),
    /// `{K => v, ...}`
    Dict(OptionMap),
}

impl Arg {
    /// Build a dictionary argument from key/value pairs.
    pub fn dict<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Arg)>,
    {
        Arg::Dict(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Human readable type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Arg::Nil => "Nil",
            Arg::Bool(_) => "Bool",
            Arg::Int(_) => "Int",
            Arg::Str(_) | Arg::Bytes(_) => "String",
            Arg::List(_) => "Array",
            Arg::Dict(_) => "Dictionary",
        }
    }

    /// Raw bytes of a string argument.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Arg::Str(s) => Some(s.as_bytes()),
            Arg::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// String argument as `&str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            Arg::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Integer value, accepting numeric strings.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(i) => Some(*i),
            Arg::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean value, accepting `"true"` / `"false"` in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(b) => Some(*b),
            Arg::Str(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Arg::Str(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Dictionary contents.
    pub fn as_dict(&self) -> Option<&OptionMap> {
        match self {
            Arg::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this is `nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Arg::Nil)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(s) => Arg::Str(s),
            Err(e) => Arg::Bytes(e.into_bytes()),
        }
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Int(i)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }
}

impl From<OptionMap> for Arg {
    fn from(map: OptionMap) -> Self {
        Arg::Dict(map)
    }
}

/// Renders the argument the way it would be typed at the prompt.
impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Nil => write!(f, "nil"),
            Arg::Bool(b) => write!(f, "{}", b),
            Arg::Int(i) => write!(f, "{}", i),
            Arg::Str(s) => write!(f, "'{}'", s),
            Arg::Bytes(b) => write!(f, "\"{}\"", to_string_binary(b)),
            Arg::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Arg::Dict(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversions() {
        let arg = Arg::from("x:a");
        assert_eq!(arg.as_bytes(), Some(&b"x:a"[..]));
        assert_eq!(arg.as_str(), Some("x:a"));
        assert_eq!(arg.as_int(), None);
    }

    #[test]
    fn test_non_utf8_bytes_stay_bytes() {
        let arg = Arg::from(vec![b'k', 0xff]);
        assert!(matches!(arg, Arg::Bytes(_)));
        assert_eq!(arg.as_bytes(), Some(&[b'k', 0xff][..]));
        assert_eq!(arg.as_str(), None);
        assert_eq!(arg.type_name(), "String");
    }

    #[test]
    fn test_numeric_and_boolean_strings() {
        assert_eq!(Arg::from("134217728").as_int(), Some(134217728));
        assert_eq!(Arg::from("TRUE").as_bool(), Some(true));
        assert_eq!(Arg::Int(5).as_bool(), None);
    }

    #[test]
    fn test_display_round_trips_prompt_syntax() {
        let arg = Arg::dict([
            ("COLUMNS", Arg::List(vec!["x:a".into(), "y".into()])),
            ("LIMIT", Arg::Int(10)),
        ]);
        assert_eq!(arg.to_string(), "{COLUMNS => ['x:a', 'y'], LIMIT => 10}");
    }
}
