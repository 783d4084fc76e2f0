//! Option dictionary normalization.
//!
//! Commands receive loosely typed `{KEY => value}` dictionaries. This module
//! validates them once, applies defaults, and produces one typed structure
//! per operation kind:
//!
//! | Operation | Structure | Keys |
//! |-----------|-----------|------|
//! | get | [`GetOptions`] | COLUMN(S), TIMESTAMP, VERSIONS, MAXLENGTH |
//! | scan | [`ScanOptions`] | COLUMNS, STARTROW, STOPROW/ENDROW, TIMESTAMP, VERSIONS, LIMIT, CACHE_BLOCKS, FILTER, MAXLENGTH |
//! | create | [`CreateOptions`] | family names or `{NAME => ..}` dictionaries |
//! | alter | [`AlterOptions`] | METHOD, NAME, family or table attributes |
//!
//! When both COLUMN and COLUMNS are given, COLUMNS wins.

use tracing::warn;

use colshell_core::{
    Arg, ColumnSpec, Compression, Error, FamilyDescriptor, Filter, OptionMap, Result,
    ScanRequest, TableAttributes,
};

/// Option keys.
pub mod keys {
    #![allow(missing_docs)]
    pub const COLUMN: &str = "COLUMN";
    pub const COLUMNS: &str = "COLUMNS";
    pub const TIMESTAMP: &str = "TIMESTAMP";
    pub const VERSIONS: &str = "VERSIONS";
    pub const LIMIT: &str = "LIMIT";
    pub const STARTROW: &str = "STARTROW";
    pub const STOPROW: &str = "STOPROW";
    pub const ENDROW: &str = "ENDROW";
    pub const MAXLENGTH: &str = "MAXLENGTH";
    pub const CACHE_BLOCKS: &str = "CACHE_BLOCKS";
    pub const FILTER: &str = "FILTER";
    pub const METHOD: &str = "METHOD";
    pub const NAME: &str = "NAME";
    pub const INTERVAL: &str = "INTERVAL";
    pub const COMPRESSION: &str = "COMPRESSION";
    pub const IN_MEMORY: &str = "IN_MEMORY";
    pub const BLOCKCACHE: &str = "BLOCKCACHE";
    pub const BLOCKSIZE: &str = "BLOCKSIZE";
    pub const TTL: &str = "TTL";
    pub const BLOOMFILTER: &str = "BLOOMFILTER";
    pub const REPLICATION_SCOPE: &str = "REPLICATION_SCOPE";
    pub const MAX_FILESIZE: &str = "MAX_FILESIZE";
    pub const READONLY: &str = "READONLY";
    pub const MEMSTORE_FLUSHSIZE: &str = "MEMSTORE_FLUSHSIZE";
    pub const DEFERRED_LOG_FLUSH: &str = "DEFERRED_LOG_FLUSH";
}

use keys::*;

// =============================================================================
// Value helpers
// =============================================================================

fn int_option(map: &OptionMap, key: &str, min: i64) -> Result<Option<i64>> {
    match map.get(key) {
        None | Some(Arg::Nil) => Ok(None),
        Some(arg) => match arg.as_int() {
            Some(i) if i >= min => Ok(Some(i)),
            _ => Err(Error::invalid_type(
                key,
                format!("an integer >= {}", min),
                arg.to_string(),
            )),
        },
    }
}

fn u32_option(map: &OptionMap, key: &str, min: u32) -> Result<Option<u32>> {
    match int_option(map, key, min as i64)? {
        Some(i) => u32::try_from(i)
            .map(Some)
            .map_err(|_| Error::invalid_type(key, "a 32-bit integer", i.to_string())),
        None => Ok(None),
    }
}

fn bool_option(map: &OptionMap, key: &str) -> Result<Option<bool>> {
    match map.get(key) {
        None | Some(Arg::Nil) => Ok(None),
        Some(arg) => arg
            .as_bool()
            .map(Some)
            .ok_or_else(|| Error::invalid_type(key, "true or false", arg.to_string())),
    }
}

fn bytes_option(map: &OptionMap, key: &str) -> Result<Option<Vec<u8>>> {
    match map.get(key) {
        None | Some(Arg::Nil) => Ok(None),
        Some(arg) => arg
            .as_bytes()
            .map(|b| Some(b.to_vec()))
            .ok_or_else(|| Error::invalid_type(key, "String", arg.type_name())),
    }
}

fn string_option(map: &OptionMap, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Arg::Nil) => Ok(None),
        Some(arg) => arg
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| Error::invalid_type(key, "String", arg.type_name())),
    }
}

/// Resolve COLUMNS or COLUMN into column specifiers.
///
/// Returns `None` when neither key is present.
pub fn column_list(map: &OptionMap) -> Result<Option<Vec<ColumnSpec>>> {
    let (key, arg) = match (map.get(COLUMNS), map.get(COLUMN)) {
        (Some(columns), Some(_)) => {
            warn!(target: "colshell::options", "Both COLUMN and COLUMNS given; using COLUMNS");
            (COLUMNS, columns)
        }
        (Some(columns), None) => (COLUMNS, columns),
        (None, Some(column)) => (COLUMN, column),
        (None, None) => return Ok(None),
    };
    match arg {
        Arg::Str(_) | Arg::Bytes(_) => {
            let spec = arg.as_bytes().unwrap_or_default();
            Ok(Some(vec![ColumnSpec::parse(spec)?]))
        }
        Arg::List(items) => items
            .iter()
            .map(|item| match item.as_bytes() {
                Some(spec) => ColumnSpec::parse(spec),
                None => Err(Error::invalid_type(
                    format!("{} element", key),
                    "String",
                    item.type_name(),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        other => Err(Error::invalid_type(
            key,
            "a String or an Array of Strings",
            other.type_name(),
        )),
    }
}

fn max_length(map: &OptionMap) -> Result<Option<usize>> {
    Ok(int_option(map, MAXLENGTH, 0)?.map(|n| n as usize))
}

fn timestamp(map: &OptionMap) -> Result<Option<u64>> {
    Ok(int_option(map, TIMESTAMP, 0)?.map(|ts| ts as u64))
}

// =============================================================================
// Get
// =============================================================================

/// Validated options of `get`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetOptions {
    /// Columns to fetch; empty means every column
    pub columns: Vec<ColumnSpec>,
    /// Only versions at or before this timestamp
    pub timestamp: Option<u64>,
    /// Versions per column (default 1)
    pub versions: u32,
    /// Truncate rendered cells to this many characters
    pub max_length: Option<usize>,
}

impl GetOptions {
    /// Latest version of every column.
    pub fn all_columns() -> Self {
        Self {
            versions: 1,
            ..Default::default()
        }
    }

    /// Normalize the optional dictionary passed to `get`.
    ///
    /// No options, or MAXLENGTH alone, fetch the latest version of every
    /// column. Anything else must name columns or a TIMESTAMP.
    ///
    /// # Errors
    ///
    /// `AmbiguousArguments` when neither columns nor TIMESTAMP are given;
    /// `InvalidArgumentType` or `MalformedColumnSpecifier` for bad values.
    pub fn from_options(options: Option<&OptionMap>) -> Result<Self> {
        let map = match options {
            None => return Ok(Self::all_columns()),
            Some(map) if map.is_empty() => return Ok(Self::all_columns()),
            Some(map) => map,
        };
        let max_length = max_length(map)?;
        if map.len() == 1 && max_length.is_some() {
            return Ok(Self {
                max_length,
                ..Self::all_columns()
            });
        }

        let columns = column_list(map)?;
        let timestamp = timestamp(map)?;
        if columns.is_none() && timestamp.is_none() {
            return Err(Error::ambiguous(format!(
                "get needs COLUMN, COLUMNS or TIMESTAMP, got {}",
                Arg::Dict(map.clone())
            )));
        }
        Ok(Self {
            columns: columns.unwrap_or_default(),
            timestamp,
            versions: u32_option(map, VERSIONS, 1)?.unwrap_or(1),
            max_length,
        })
    }
}

// =============================================================================
// Scan
// =============================================================================

/// Validated options of `scan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Inclusive start row (default: table start)
    pub start_row: Vec<u8>,
    /// Exclusive stop row
    pub stop_row: Option<Vec<u8>>,
    /// Columns to fetch; empty means every family
    pub columns: Vec<ColumnSpec>,
    /// Only versions at or before this timestamp
    pub timestamp: Option<u64>,
    /// Versions per column (default 1)
    pub versions: u32,
    /// Stop after this many rows have been emitted
    pub limit: Option<usize>,
    /// Populate the block cache (default true)
    pub cache_blocks: bool,
    /// Server-side filter
    pub filter: Option<Filter>,
    /// Truncate rendered cells to this many characters
    pub max_length: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            start_row: Vec::new(),
            stop_row: None,
            columns: Vec::new(),
            timestamp: None,
            versions: 1,
            limit: None,
            cache_blocks: true,
            filter: None,
            max_length: None,
        }
    }
}

impl ScanOptions {
    /// Normalize the optional dictionary passed to `scan`.
    pub fn from_options(options: Option<&OptionMap>) -> Result<Self> {
        let Some(map) = options else {
            return Ok(Self::default());
        };
        let stop_row = match bytes_option(map, STOPROW)? {
            Some(stop) => Some(stop),
            None => bytes_option(map, ENDROW)?,
        };
        let filter = match map.get(FILTER) {
            None | Some(Arg::Nil) => None,
            Some(arg) => {
                let expr = arg
                    .as_str()
                    .ok_or_else(|| Error::invalid_type(FILTER, "String", arg.type_name()))?;
                Some(parse_filter(expr)?)
            }
        };
        Ok(Self {
            start_row: bytes_option(map, STARTROW)?.unwrap_or_default(),
            stop_row,
            columns: column_list(map)?.unwrap_or_default(),
            timestamp: timestamp(map)?,
            versions: u32_option(map, VERSIONS, 1)?.unwrap_or(1),
            limit: int_option(map, LIMIT, 0)?.map(|n| n as usize),
            cache_blocks: bool_option(map, CACHE_BLOCKS)?.unwrap_or(true),
            filter,
            max_length: max_length(map)?,
        })
    }

    /// Request sent to the store.
    pub fn to_request(&self) -> ScanRequest {
        ScanRequest {
            start_row: self.start_row.clone(),
            stop_row: self.stop_row.clone(),
            columns: self.columns.clone(),
            filter: self.filter.clone(),
            max_timestamp: self.timestamp,
            max_versions: self.versions,
            cache_blocks: self.cache_blocks,
            caching: None,
        }
    }
}

/// Parse a filter expression such as `PrefixFilter('row1')`.
///
/// Supported: `PrefixFilter`, `FirstKeyOnlyFilter`, `KeyOnlyFilter`,
/// `ColumnPrefixFilter`, `ValueFilter` (value equality).
pub fn parse_filter(expr: &str) -> Result<Filter> {
    let invalid = || {
        Error::invalid_type(
            FILTER,
            "a filter expression such as PrefixFilter('row')",
            format!("'{}'", expr),
        )
    };
    let expr = expr.trim();
    let open = expr.find('(').ok_or_else(invalid)?;
    if !expr.ends_with(')') {
        return Err(invalid());
    }
    let name = expr[..open].trim();
    let inner = expr[open + 1..expr.len() - 1].trim();
    let operand = if inner.is_empty() {
        None
    } else if inner.len() >= 2 && inner.starts_with('\'') && inner.ends_with('\'') {
        Some(inner[1..inner.len() - 1].as_bytes().to_vec())
    } else {
        return Err(invalid());
    };

    match (name, operand) {
        ("FirstKeyOnlyFilter", None) => Ok(Filter::FirstKeyOnly),
        ("KeyOnlyFilter", None) => Ok(Filter::KeyOnly),
        ("PrefixFilter", Some(p)) => Ok(Filter::Prefix(p)),
        ("ColumnPrefixFilter", Some(p)) => Ok(Filter::ColumnPrefix(p)),
        ("ValueFilter", Some(v)) => Ok(Filter::ValueEquals(v)),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Column families
// =============================================================================

const FAMILY_KEYS: &[&str] = &[
    NAME,
    VERSIONS,
    COMPRESSION,
    IN_MEMORY,
    BLOCKCACHE,
    BLOCKSIZE,
    TTL,
    BLOOMFILTER,
    REPLICATION_SCOPE,
];

/// Validated column family settings. Unset fields keep the value of the
/// descriptor they are applied to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FamilySettings {
    /// Family name, without a trailing colon
    pub name: String,
    /// VERSIONS
    pub versions: Option<u32>,
    /// COMPRESSION
    pub compression: Option<Compression>,
    /// IN_MEMORY
    pub in_memory: Option<bool>,
    /// BLOCKCACHE
    pub block_cache: Option<bool>,
    /// BLOCKSIZE
    pub block_size: Option<u32>,
    /// TTL, in seconds
    pub ttl: Option<u32>,
    /// BLOOMFILTER
    pub bloom_filter: Option<bool>,
    /// REPLICATION_SCOPE
    pub replication_scope: Option<u32>,
}

fn family_name(raw: &str) -> Result<String> {
    let name = raw.strip_suffix(':').unwrap_or(raw);
    if name.is_empty() || name.contains(':') {
        return Err(Error::invalid_type(
            "column family name",
            "a non-empty name without ':'",
            format!("'{}'", raw),
        ));
    }
    Ok(name.to_string())
}

impl FamilySettings {
    /// Family with default settings.
    pub fn named(name: &str) -> Result<Self> {
        Ok(Self {
            name: family_name(name)?,
            ..Default::default()
        })
    }

    /// Parse a `{NAME => 'f', VERSIONS => 5, ...}` dictionary.
    ///
    /// # Errors
    ///
    /// `InvalidArgumentType` if NAME is missing, a key is unknown, or a value
    /// has the wrong type.
    pub fn from_dict(map: &OptionMap) -> Result<Self> {
        if let Some(unknown) = map.keys().find(|k| !FAMILY_KEYS.contains(&k.as_str())) {
            return Err(Error::invalid_type(
                format!("column family attribute {}", unknown),
                format!("one of {}", FAMILY_KEYS.join(", ")),
                unknown.clone(),
            ));
        }
        let name = string_option(map, NAME)?.ok_or_else(|| {
            Error::invalid_type(
                "column family dictionary",
                "a dictionary with a NAME",
                Arg::Dict(map.clone()).to_string(),
            )
        })?;
        let compression = match string_option(map, COMPRESSION)? {
            Some(codec) => Some(Compression::parse(&codec).ok_or_else(|| {
                Error::invalid_type(COMPRESSION, "NONE, GZ or LZO", codec.clone())
            })?),
            None => None,
        };
        Ok(Self {
            name: family_name(&name)?,
            versions: u32_option(map, VERSIONS, 1)?,
            compression,
            in_memory: bool_option(map, IN_MEMORY)?,
            block_cache: bool_option(map, BLOCKCACHE)?,
            block_size: u32_option(map, BLOCKSIZE, 1)?,
            ttl: u32_option(map, TTL, 1)?,
            bloom_filter: bool_option(map, BLOOMFILTER)?,
            replication_scope: u32_option(map, REPLICATION_SCOPE, 0)?,
        })
    }

    /// Descriptor with defaults for every unset field. Used for both add
    /// and modify, so a modified family does not inherit its old settings.
    pub fn to_descriptor(&self) -> FamilyDescriptor {
        let mut family = FamilyDescriptor::new(self.name.clone());
        if let Some(v) = self.versions {
            family.versions = v;
        }
        if let Some(c) = self.compression {
            family.compression = c;
        }
        if let Some(b) = self.in_memory {
            family.in_memory = b;
        }
        if let Some(b) = self.block_cache {
            family.block_cache = b;
        }
        if let Some(n) = self.block_size {
            family.block_size = n;
        }
        if let Some(n) = self.ttl {
            family.ttl = n;
        }
        if let Some(b) = self.bloom_filter {
            family.bloom_filter = b;
        }
        if let Some(n) = self.replication_scope {
            family.replication_scope = n;
        }
        family
    }
}

// =============================================================================
// Create
// =============================================================================

/// Validated column families of `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Families in the order given
    pub families: Vec<FamilySettings>,
}

impl CreateOptions {
    /// Normalize the arguments following the table name.
    ///
    /// Each argument is a family name, a family dictionary, or a list of
    /// either.
    ///
    /// # Errors
    ///
    /// `MissingColumnFamily` when no family is given; `InvalidArgumentType`
    /// for any other kind of argument.
    pub fn from_args(table: &str, args: &[Arg]) -> Result<Self> {
        let mut families = Vec::new();
        collect_families(args, &mut families)?;
        if families.is_empty() {
            return Err(Error::MissingColumnFamily {
                table: table.to_string(),
            });
        }
        Ok(Self { families })
    }
}

fn collect_families(args: &[Arg], out: &mut Vec<FamilySettings>) -> Result<()> {
    for arg in args {
        match arg {
            Arg::Str(name) => out.push(FamilySettings::named(name)?),
            Arg::Dict(map) => out.push(FamilySettings::from_dict(map)?),
            Arg::List(items) => collect_families(items, out)?,
            other => {
                return Err(Error::invalid_type(
                    "column family",
                    "a String or a Dictionary with a NAME",
                    other.type_name(),
                ))
            }
        }
    }
    Ok(())
}

// =============================================================================
// Alter
// =============================================================================

/// Table-scope attribute changes of `alter ..., {METHOD => 'table_att'}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableAttributeChanges {
    /// MAX_FILESIZE
    pub max_file_size: Option<u64>,
    /// READONLY
    pub read_only: Option<bool>,
    /// MEMSTORE_FLUSHSIZE
    pub memstore_flush_size: Option<u64>,
    /// DEFERRED_LOG_FLUSH
    pub deferred_log_flush: Option<bool>,
}

impl TableAttributeChanges {
    /// Overlay the changes on current attributes.
    pub fn apply(&self, attributes: &mut TableAttributes) {
        if let Some(n) = self.max_file_size {
            attributes.max_file_size = n;
        }
        if let Some(b) = self.read_only {
            attributes.read_only = b;
        }
        if let Some(n) = self.memstore_flush_size {
            attributes.memstore_flush_size = n;
        }
        if let Some(b) = self.deferred_log_flush {
            attributes.deferred_log_flush = b;
        }
    }
}

/// Validated `alter` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterOptions {
    /// `{METHOD => 'delete', NAME => 'f'}`
    DeleteFamily(String),
    /// `{METHOD => 'table_att', ...}`
    TableAttributes(TableAttributeChanges),
    /// Add the family, or modify it if it already exists
    UpsertFamily(FamilySettings),
}

const TABLE_ATT_KEYS: &[&str] = &[MAX_FILESIZE, READONLY, MEMSTORE_FLUSHSIZE, DEFERRED_LOG_FLUSH];

impl AlterOptions {
    /// Normalize the dictionary passed to `alter`. METHOD is extracted
    /// first and decides how the rest is read.
    pub fn from_dict(map: &OptionMap) -> Result<Self> {
        let mut map = map.clone();
        let method = match map.remove(METHOD) {
            None | Some(Arg::Nil) => None,
            Some(arg) => Some(
                arg.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::invalid_type(METHOD, "String", arg.type_name()))?,
            ),
        };

        match method.as_deref() {
            Some("delete") => {
                let name = string_option(&map, NAME)?.ok_or_else(|| {
                    Error::invalid_type(NAME, "the family to delete", "nothing")
                })?;
                Ok(AlterOptions::DeleteFamily(family_name(&name)?))
            }
            Some("table_att") => {
                if let Some(unknown) = map
                    .keys()
                    .find(|k| !TABLE_ATT_KEYS.contains(&k.as_str()))
                {
                    return Err(Error::invalid_type(
                        format!("table attribute {}", unknown),
                        format!("one of {}", TABLE_ATT_KEYS.join(", ")),
                        unknown.clone(),
                    ));
                }
                Ok(AlterOptions::TableAttributes(TableAttributeChanges {
                    max_file_size: int_option(&map, MAX_FILESIZE, 1)?.map(|n| n as u64),
                    read_only: bool_option(&map, READONLY)?,
                    memstore_flush_size: int_option(&map, MEMSTORE_FLUSHSIZE, 1)?
                        .map(|n| n as u64),
                    deferred_log_flush: bool_option(&map, DEFERRED_LOG_FLUSH)?,
                }))
            }
            Some(other) => Err(Error::invalid_type(
                METHOD,
                "'delete' or 'table_att'",
                format!("'{}'", other),
            )),
            None => Ok(AlterOptions::UpsertFamily(FamilySettings::from_dict(&map)?)),
        }
    }
}
