//! Requests sent to the store client.
//!
//! These are the typed forms of the data-plane operations. The executor
//! builds them from validated shell options; the store only ever sees
//! well-formed requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bytes::to_string_binary;
use crate::column::ColumnSpec;
use crate::types::LATEST_TIMESTAMP;

/// Read one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequest {
    /// Row key
    pub row: Vec<u8>,
    /// Columns to fetch; empty means every column of the row
    pub columns: Vec<ColumnSpec>,
    /// Maximum versions returned per column
    pub max_versions: u32,
    /// Only return versions at or before this timestamp
    pub max_timestamp: Option<u64>,
}

impl GetRequest {
    /// Latest version of every column of `row`.
    pub fn row(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            columns: Vec::new(),
            max_versions: 1,
            max_timestamp: None,
        }
    }
}

/// Server-side row/cell filter applied during scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// Rows whose key starts with the prefix
    Prefix(Vec<u8>),
    /// Only the first cell of each row
    FirstKeyOnly,
    /// Cells without their values
    KeyOnly,
    /// Cells whose qualifier starts with the prefix
    ColumnPrefix(Vec<u8>),
    /// Cells whose value equals the operand
    ValueEquals(Vec<u8>),
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Prefix(p) => write!(f, "PrefixFilter('{}')", to_string_binary(p)),
            Filter::FirstKeyOnly => write!(f, "FirstKeyOnlyFilter()"),
            Filter::KeyOnly => write!(f, "KeyOnlyFilter()"),
            Filter::ColumnPrefix(p) => write!(f, "ColumnPrefixFilter('{}')", to_string_binary(p)),
            Filter::ValueEquals(v) => write!(f, "ValueFilter('{}')", to_string_binary(v)),
        }
    }
}

/// Range scan over `[start_row, stop_row)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Inclusive start key; empty is the table start
    pub start_row: Vec<u8>,
    /// Exclusive stop key; `None` scans to the table end
    pub stop_row: Option<Vec<u8>>,
    /// Columns to fetch; empty means every column
    pub columns: Vec<ColumnSpec>,
    /// Optional filter
    pub filter: Option<Filter>,
    /// Only return versions at or before this timestamp
    pub max_timestamp: Option<u64>,
    /// Maximum versions returned per column
    pub max_versions: u32,
    /// Populate the block cache while scanning
    pub cache_blocks: bool,
    /// Rows fetched per round trip
    pub caching: Option<u32>,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            start_row: Vec::new(),
            stop_row: None,
            columns: Vec::new(),
            filter: None,
            max_timestamp: None,
            max_versions: 1,
            cache_blocks: true,
            caching: None,
        }
    }
}

/// Write one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutRequest {
    /// Row key
    pub row: Vec<u8>,
    /// Column family
    pub family: Vec<u8>,
    /// Column qualifier (may be empty)
    pub qualifier: Vec<u8>,
    /// Explicit version timestamp; `None` lets the store assign one
    pub timestamp: Option<u64>,
    /// Cell contents
    pub value: Vec<u8>,
}

/// Which cells a delete removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteScope {
    /// Every column of the row, versions at or before `up_to`
    Row {
        /// Timestamp ceiling
        up_to: u64,
    },
    /// Every column of one family, versions at or before `up_to`
    Family {
        /// Column family
        family: Vec<u8>,
        /// Timestamp ceiling
        up_to: u64,
    },
    /// All versions of one column at or before `up_to`
    Columns {
        /// Column family
        family: Vec<u8>,
        /// Column qualifier
        qualifier: Vec<u8>,
        /// Timestamp ceiling
        up_to: u64,
    },
    /// Exactly one version of one column; `LATEST_TIMESTAMP` is the newest
    Version {
        /// Column family
        family: Vec<u8>,
        /// Column qualifier
        qualifier: Vec<u8>,
        /// Version to remove
        timestamp: u64,
    },
}

/// Remove cells of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Row key
    pub row: Vec<u8>,
    /// Cells affected
    pub scope: DeleteScope,
}

impl DeleteRequest {
    /// Delete the whole row.
    pub fn row(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            scope: DeleteScope::Row {
                up_to: LATEST_TIMESTAMP,
            },
        }
    }
}

/// Atomically add to a counter cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementRequest {
    /// Row key
    pub row: Vec<u8>,
    /// Column family
    pub family: Vec<u8>,
    /// Column qualifier (may be empty)
    pub qualifier: Vec<u8>,
    /// Amount added; may be negative
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let scan = ScanRequest::default();
        assert!(scan.start_row.is_empty());
        assert_eq!(scan.max_versions, 1);
        assert!(scan.cache_blocks);
        assert!(scan.columns.is_empty());
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(
            Filter::Prefix(b"row".to_vec()).to_string(),
            "PrefixFilter('row')"
        );
        assert_eq!(Filter::FirstKeyOnly.to_string(), "FirstKeyOnlyFilter()");
    }
}
