//! Schema and data types exchanged with the store client.
//!
//! - `TableDescriptor` / `FamilyDescriptor`: table schema
//! - `TableAttributes`: table-scope settings changed via `table_att`
//! - `Cell` / `RowResult`: data returned by get and scan
//! - `RegionInfo`: a contiguous shard of a table's row-key space

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bytes::to_string_binary;

/// Timestamp meaning "newest version" in delete requests.
pub const LATEST_TIMESTAMP: u64 = i64::MAX as u64;

/// Catalog table describing region-to-server assignment.
pub const META_TABLE_NAME: &str = ".META.";

/// Root catalog table locating the `.META.` regions.
pub const ROOT_TABLE_NAME: &str = "-ROOT-";

// =============================================================================
// Column families
// =============================================================================

/// Block compression codec of a column family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Compression {
    /// No compression
    #[default]
    None,
    /// Gzip
    Gz,
    /// LZO
    Lzo,
}

impl Compression {
    /// Parse a codec name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "NONE" => Some(Compression::None),
            "GZ" => Some(Compression::Gz),
            "LZO" => Some(Compression::Lzo),
            _ => None,
        }
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "NONE",
            Compression::Gz => "GZ",
            Compression::Lzo => "LZO",
        }
    }
}

/// Schema of one column family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyDescriptor {
    /// Family name (no trailing colon)
    pub name: String,
    /// Maximum number of cell versions kept
    pub versions: u32,
    /// Block compression
    pub compression: Compression,
    /// Keep blocks in memory with priority
    pub in_memory: bool,
    /// Use the block cache for reads
    pub block_cache: bool,
    /// Block size in bytes
    pub block_size: u32,
    /// Time to live of cells, in seconds
    pub ttl: u32,
    /// Maintain a bloom filter over row keys
    pub bloom_filter: bool,
    /// Replication scope (0 = local only)
    pub replication_scope: u32,
}

impl FamilyDescriptor {
    /// Default number of versions kept per cell.
    pub const DEFAULT_VERSIONS: u32 = 3;
    /// Default block size.
    pub const DEFAULT_BLOCKSIZE: u32 = 64 * 1024;
    /// Default TTL: forever.
    pub const DEFAULT_TTL: u32 = i32::MAX as u32;

    /// Family with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: Self::DEFAULT_VERSIONS,
            compression: Compression::None,
            in_memory: false,
            block_cache: true,
            block_size: Self::DEFAULT_BLOCKSIZE,
            ttl: Self::DEFAULT_TTL,
            bloom_filter: false,
            replication_scope: 0,
        }
    }

    /// Builder-style setter for the number of versions.
    pub fn with_versions(mut self, versions: u32) -> Self {
        self.versions = versions;
        self
    }
}

impl fmt::Display for FamilyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{NAME => '{}', COMPRESSION => '{}', VERSIONS => '{}', TTL => '{}', \
             BLOCKSIZE => '{}', IN_MEMORY => '{}', BLOCKCACHE => '{}', \
             BLOOMFILTER => '{}', REPLICATION_SCOPE => '{}'}}",
            self.name,
            self.compression.as_str(),
            self.versions,
            self.ttl,
            self.block_size,
            self.in_memory,
            self.block_cache,
            self.bloom_filter,
            self.replication_scope
        )
    }
}

// =============================================================================
// Tables
// =============================================================================

/// Table-scope attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAttributes {
    /// Region size that triggers a split, in bytes
    pub max_file_size: u64,
    /// Reject writes
    pub read_only: bool,
    /// Memstore size that triggers a flush, in bytes
    pub memstore_flush_size: u64,
    /// Sync the write-ahead log lazily
    pub deferred_log_flush: bool,
}

impl Default for TableAttributes {
    fn default() -> Self {
        Self {
            max_file_size: 256 * 1024 * 1024,
            read_only: false,
            memstore_flush_size: 64 * 1024 * 1024,
            deferred_log_flush: false,
        }
    }
}

/// Schema of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name
    pub name: String,
    /// Column families, kept sorted by name
    families: Vec<FamilyDescriptor>,
    /// Table-scope attributes
    pub attributes: TableAttributes,
}

impl TableDescriptor {
    /// Empty descriptor with default attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            families: Vec::new(),
            attributes: TableAttributes::default(),
        }
    }

    /// Add or replace a family.
    pub fn put_family(&mut self, family: FamilyDescriptor) {
        match self
            .families
            .binary_search_by(|f| f.name.as_str().cmp(family.name.as_str()))
        {
            Ok(idx) => self.families[idx] = family,
            Err(idx) => self.families.insert(idx, family),
        }
    }

    /// Remove a family, returning it if it existed.
    pub fn remove_family(&mut self, name: &str) -> Option<FamilyDescriptor> {
        let idx = self.families.iter().position(|f| f.name == name)?;
        Some(self.families.remove(idx))
    }

    /// Look up a family by name.
    pub fn family(&self, name: &str) -> Option<&FamilyDescriptor> {
        self.families.iter().find(|f| f.name == name)
    }

    /// Look up a family by raw bytes.
    pub fn family_bytes(&self, name: &[u8]) -> Option<&FamilyDescriptor> {
        self.families.iter().find(|f| f.name.as_bytes() == name)
    }

    /// Whether the family exists.
    pub fn has_family(&self, name: &str) -> bool {
        self.family(name).is_some()
    }

    /// All families, sorted by name.
    pub fn families(&self) -> &[FamilyDescriptor] {
        &self.families
    }

    /// Whether this is one of the catalog tables.
    pub fn is_catalog(&self) -> bool {
        self.name == META_TABLE_NAME || self.name == ROOT_TABLE_NAME
    }
}

impl fmt::Display for TableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{NAME => '{}'", self.name)?;
        let defaults = TableAttributes::default();
        if self.attributes.max_file_size != defaults.max_file_size {
            write!(f, ", MAX_FILESIZE => '{}'", self.attributes.max_file_size)?;
        }
        if self.attributes.read_only {
            write!(f, ", READONLY => 'true'")?;
        }
        if self.attributes.memstore_flush_size != defaults.memstore_flush_size {
            write!(
                f,
                ", MEMSTORE_FLUSHSIZE => '{}'",
                self.attributes.memstore_flush_size
            )?;
        }
        if self.attributes.deferred_log_flush {
            write!(f, ", DEFERRED_LOG_FLUSH => 'true'")?;
        }
        write!(f, ", FAMILIES => [")?;
        for (i, family) in self.families.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", family)?;
        }
        write!(f, "]}}")
    }
}

// =============================================================================
// Data
// =============================================================================

/// One version of one column of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Row key
    pub row: Vec<u8>,
    /// Column family
    pub family: Vec<u8>,
    /// Column qualifier (may be empty)
    pub qualifier: Vec<u8>,
    /// Version timestamp in milliseconds
    pub timestamp: u64,
    /// Cell contents
    pub value: Vec<u8>,
}

impl Cell {
    /// Column rendered as `family:qualifier`.
    pub fn column(&self) -> String {
        format!(
            "{}:{}",
            String::from_utf8_lossy(&self.family),
            to_string_binary(&self.qualifier)
        )
    }
}

/// All cells returned for one row, ordered by column then newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowResult {
    /// Row key
    pub row: Vec<u8>,
    /// Cells of the row
    pub cells: Vec<Cell>,
}

impl RowResult {
    /// Whether no cell was found.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// =============================================================================
// Regions
// =============================================================================

/// A contiguous, ordered shard of a table's row-key space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Owning table
    pub table: String,
    /// Inclusive start key (empty = table start)
    pub start_key: Vec<u8>,
    /// Exclusive end key (empty = table end)
    pub end_key: Vec<u8>,
    /// Region id (creation time)
    pub id: u64,
    /// Offline regions are not served
    pub offline: bool,
}

impl RegionInfo {
    /// Region name: `table,startkey,id`.
    pub fn name(&self) -> String {
        format!(
            "{},{},{}",
            self.table,
            to_string_binary(&self.start_key),
            self.id
        )
    }

    /// Whether the row key falls inside this region.
    pub fn contains(&self, row: &[u8]) -> bool {
        row >= self.start_key.as_slice() && (self.end_key.is_empty() || row < self.end_key.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_kept_sorted_and_replaced() {
        let mut htd = TableDescriptor::new("t1");
        htd.put_family(FamilyDescriptor::new("y"));
        htd.put_family(FamilyDescriptor::new("x").with_versions(5));
        htd.put_family(FamilyDescriptor::new("y").with_versions(1));

        let names: Vec<&str> = htd.families().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(htd.family("y").unwrap().versions, 1);
        assert!(htd.remove_family("x").is_some());
        assert!(!htd.has_family("x"));
    }

    #[test]
    fn test_descriptor_display() {
        let mut htd = TableDescriptor::new("t1");
        htd.put_family(FamilyDescriptor::new("x"));
        let s = htd.to_string();
        assert!(s.starts_with("{NAME => 't1', FAMILIES => [{NAME => 'x'"));
        assert!(s.contains("VERSIONS => '3'"));
    }

    #[test]
    fn test_region_contains() {
        let region = RegionInfo {
            table: "t".into(),
            start_key: b"b".to_vec(),
            end_key: b"d".to_vec(),
            id: 1,
            offline: false,
        };
        assert!(!region.contains(b"a"));
        assert!(region.contains(b"b"));
        assert!(region.contains(b"c"));
        assert!(!region.contains(b"d"));
        assert_eq!(region.name(), "t,b,1");
    }

    #[test]
    fn test_cell_column_rendering() {
        let cell = Cell {
            row: b"r1".to_vec(),
            family: b"x".to_vec(),
            qualifier: vec![0x01],
            timestamp: 1,
            value: b"v".to_vec(),
        };
        assert_eq!(cell.column(), "x:\\x01");
    }

    #[test]
    fn test_compression_parse() {
        assert_eq!(Compression::parse("gz"), Some(Compression::Gz));
        assert_eq!(Compression::parse("snappy"), None);
    }
}
