//! Error types for shell command execution.
//!
//! All failures raised while validating arguments or talking to the store
//! are represented by the [`Error`] enum. Errors are:
//! - **Structured**: each variant carries typed fields
//! - **Serializable**: they can be rendered as JSON by the output layer
//! - **Classified**: [`Error::is_user_error`] separates expected input
//!   mistakes from failures of the store or of the shell itself

use serde::{Deserialize, Serialize};

/// Result type for colshell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shell errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Parsing | `MalformedColumnSpecifier`, `InvalidArgumentType`, `AmbiguousArguments`, `WrongArgumentCount` | Bad command input |
/// | Schema | `MissingColumnFamily`, `FamilyNotFound` | Invalid schema requests |
/// | Dispatch | `UnknownCommand` | No such command |
/// | Table state | `TableNotFound`, `TableExists`, `TableStillEnabled`, `TableDisabled` | Lifecycle violations |
/// | Region | `RegionNotFound` | Unknown region |
/// | System | `Client`, `Io`, `Internal` | Store or shell failures |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Parsing ====================
    /// Column specifier has an empty family
    #[error("malformed column specifier '{spec}': family must not be empty")]
    MalformedColumnSpecifier { spec: String },

    /// Argument has the wrong type
    #[error("{argument} must be {expected}, got {actual}")]
    InvalidArgumentType {
        argument: String,
        expected: String,
        actual: String,
    },

    /// Options do not determine an operation
    #[error("ambiguous arguments: {reason}")]
    AmbiguousArguments { reason: String },

    /// Wrong number of positional arguments
    #[error("wrong number of arguments for '{command}': expected {expected}, got {actual}")]
    WrongArgumentCount {
        command: String,
        expected: String,
        actual: usize,
    },

    // ==================== Schema ====================
    /// Table creation without any column family
    #[error("table '{table}' must have at least one column family")]
    MissingColumnFamily { table: String },

    /// Column family not present in the table schema
    #[error("column family '{family}' not found in table '{table}'")]
    FamilyNotFound { table: String, family: String },

    // ==================== Dispatch ====================
    /// No command registered under this name
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    // ==================== Table state ====================
    /// Table does not exist
    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    /// Table already exists
    #[error("table '{table}' already exists")]
    TableExists { table: String },

    /// Table must be disabled first
    #[error("table '{table}' is enabled, disable it first")]
    TableStillEnabled { table: String },

    /// Table is disabled and cannot serve data requests
    #[error("table '{table}' is disabled")]
    TableDisabled { table: String },

    // ==================== Region ====================
    /// Region or table-or-region target does not exist
    #[error("region '{region}' not found")]
    RegionNotFound { region: String },

    // ==================== System ====================
    /// Failure reported by the store client
    #[error("client error: {reason}")]
    Client { reason: String },

    /// I/O error
    #[error("I/O error: {reason}")]
    Io { reason: String },

    /// Internal error (bug or invariant violation)
    #[error("internal error: {reason}")]
    Internal { reason: String },
}

impl Error {
    /// Build an `InvalidArgumentType` error.
    pub fn invalid_type(
        argument: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Error::InvalidArgumentType {
            argument: argument.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Build an `AmbiguousArguments` error.
    pub fn ambiguous(reason: impl Into<String>) -> Self {
        Error::AmbiguousArguments {
            reason: reason.into(),
        }
    }

    /// Build a `Client` error.
    pub fn client(reason: impl Into<String>) -> Self {
        Error::Client {
            reason: reason.into(),
        }
    }

    /// Build an `Internal` error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }

    /// Whether this error belongs to the expected user-facing taxonomy.
    ///
    /// User errors are reported together with the help text of the command
    /// that raised them. `Client`, `Io` and `Internal` are not user errors.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Error::Client { .. } | Error::Io { .. } | Error::Internal { .. }
        )
    }

    /// Short stable name of the variant, used in JSON output and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedColumnSpecifier { .. } => "MalformedColumnSpecifier",
            Error::InvalidArgumentType { .. } => "InvalidArgumentType",
            Error::AmbiguousArguments { .. } => "AmbiguousArguments",
            Error::WrongArgumentCount { .. } => "WrongArgumentCount",
            Error::MissingColumnFamily { .. } => "MissingColumnFamily",
            Error::FamilyNotFound { .. } => "FamilyNotFound",
            Error::UnknownCommand { .. } => "UnknownCommand",
            Error::TableNotFound { .. } => "TableNotFound",
            Error::TableExists { .. } => "TableExists",
            Error::TableStillEnabled { .. } => "TableStillEnabled",
            Error::TableDisabled { .. } => "TableDisabled",
            Error::RegionNotFound { .. } => "RegionNotFound",
            Error::Client { .. } => "Client",
            Error::Io { .. } => "Io",
            Error::Internal { .. } => "Internal",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(Error::TableNotFound { table: "t".into() }.is_user_error());
        assert!(Error::UnknownCommand { name: "x".into() }.is_user_error());
        assert!(Error::ambiguous("no columns").is_user_error());
        assert!(!Error::client("connection refused").is_user_error());
        assert!(!Error::internal("bug").is_user_error());
        assert!(!Error::Io { reason: "eof".into() }.is_user_error());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::TableStillEnabled { table: "t1".into() };
        assert_eq!(err.to_string(), "table 't1' is enabled, disable it first");

        let err = Error::invalid_type("COLUMNS", "a String or an Array", "Int");
        assert_eq!(err.to_string(), "COLUMNS must be a String or an Array, got Int");
    }

    #[test]
    fn test_error_serializes_to_json() {
        let err = Error::RegionNotFound {
            region: "t1,,1".into(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: Error = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
        assert_eq!(back.kind(), "RegionNotFound");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io { .. }));
    }
}
