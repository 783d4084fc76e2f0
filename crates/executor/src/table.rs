//! Data-plane facade over one table.
//!
//! A [`Table`] is opened per command: it resolves the table schema once and
//! then turns validated options into store requests. It never prints; rows
//! and cells are handed back to the caller, which decides how to render them.
//!
//! # Design Notes
//!
//! - `scan` checks LIMIT before pulling the next row, so exactly `limit`
//!   rows are fetched and emitted.
//! - `count` is a scan with block caching off, a caching hint of 10 rows and
//!   a first-key-only filter; only row keys travel back.
//! - Whole-family specifiers mean "every column of the family" for reads
//!   and deletes. Writes address the empty qualifier.

use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use colshell_core::{
    to_string_binary, truncate_chars, Cell, ColumnSpec, DeleteRequest, DeleteScope, Filter,
    GetRequest, IncrementRequest, PutRequest, Result, RowResult, ScanRequest, StoreClient,
    TableDescriptor, LATEST_TIMESTAMP,
};

use crate::options::{GetOptions, ScanOptions};

/// Rows scanned by `count` between two progress reports.
pub const DEFAULT_COUNT_INTERVAL: u64 = 1000;

const COUNT_CACHING: u32 = 10;

/// Handle on one table of the store.
pub struct Table {
    client: Arc<dyn StoreClient>,
    descriptor: TableDescriptor,
}

impl Table {
    /// Open a table, reading its schema.
    ///
    /// # Errors
    ///
    /// `TableNotFound` if the table does not exist.
    pub fn open(client: Arc<dyn StoreClient>, name: &str) -> Result<Self> {
        let descriptor = client.table_descriptor(name)?;
        debug!(target: "colshell::table", table = name, "Opened table");
        Ok(Self { client, descriptor })
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Schema captured when the table was opened.
    pub fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    /// Family specifiers, one per family: `["a:", "b:"]`.
    pub fn families(&self) -> Vec<String> {
        self.descriptor
            .families()
            .iter()
            .map(|f| format!("{}:", f.name))
            .collect()
    }

    // ==================== Reads ====================

    /// Read one row.
    pub fn get(&self, row: &[u8], options: &GetOptions) -> Result<Vec<Cell>> {
        let request = GetRequest {
            row: row.to_vec(),
            columns: options.columns.clone(),
            max_versions: options.versions,
            max_timestamp: options.timestamp,
        };
        Ok(self.client.get(self.name(), &request)?.cells)
    }

    /// Scan rows, handing each one to `emit`. Returns the number of rows
    /// emitted.
    pub fn scan_each<F>(&self, options: &ScanOptions, mut emit: F) -> Result<u64>
    where
        F: FnMut(&RowResult) -> Result<()>,
    {
        let mut scanner = self.client.scan(self.name(), options.to_request())?;
        let mut emitted: u64 = 0;
        loop {
            if options.limit.is_some_and(|limit| emitted >= limit as u64) {
                break;
            }
            let Some(row) = scanner.next() else { break };
            emit(&row?)?;
            emitted += 1;
        }
        debug!(target: "colshell::table", table = self.name(), rows = emitted, "Scan complete");
        Ok(emitted)
    }

    /// Scan rows into memory.
    pub fn scan(&self, options: &ScanOptions) -> Result<Vec<RowResult>> {
        let mut rows = Vec::new();
        self.scan_each(options, |row| {
            rows.push(row.clone());
            Ok(())
        })?;
        Ok(rows)
    }

    /// Count rows, calling `progress(count, row)` every `interval` rows.
    pub fn count<F>(&self, interval: u64, mut progress: F) -> Result<u64>
    where
        F: FnMut(u64, &[u8]),
    {
        let request = ScanRequest {
            filter: Some(Filter::FirstKeyOnly),
            cache_blocks: false,
            caching: Some(COUNT_CACHING),
            ..Default::default()
        };
        let interval = interval.max(1);
        let mut count = 0;
        for row in self.client.scan(self.name(), request)? {
            let row = row?;
            count += 1;
            if count % interval == 0 {
                progress(count, &row.row);
            }
        }
        Ok(count)
    }

    // ==================== Writes ====================

    /// Write one cell.
    pub fn put(
        &self,
        row: &[u8],
        column: &ColumnSpec,
        value: Vec<u8>,
        timestamp: Option<u64>,
    ) -> Result<()> {
        self.client.put(
            self.name(),
            PutRequest {
                row: row.to_vec(),
                family: column.family().to_vec(),
                qualifier: column.cell_qualifier().to_vec(),
                timestamp,
                value,
            },
        )
    }

    /// Delete one version of a cell (the newest by default), or every
    /// column of a family when `column` names the whole family.
    pub fn delete(&self, row: &[u8], column: &ColumnSpec, timestamp: Option<u64>) -> Result<()> {
        let scope = match column.qualifier() {
            Some(qualifier) => DeleteScope::Version {
                family: column.family().to_vec(),
                qualifier: qualifier.to_vec(),
                timestamp: timestamp.unwrap_or(LATEST_TIMESTAMP),
            },
            None => DeleteScope::Family {
                family: column.family().to_vec(),
                up_to: timestamp.unwrap_or(LATEST_TIMESTAMP),
            },
        };
        self.client.delete(
            self.name(),
            DeleteRequest {
                row: row.to_vec(),
                scope,
            },
        )
    }

    /// Delete all versions at or before `timestamp` of a column, a family,
    /// or the whole row.
    pub fn deleteall(
        &self,
        row: &[u8],
        column: Option<&ColumnSpec>,
        timestamp: Option<u64>,
    ) -> Result<()> {
        let up_to = timestamp.unwrap_or(LATEST_TIMESTAMP);
        let scope = match column {
            Some(spec) => match spec.qualifier() {
                Some(qualifier) => DeleteScope::Columns {
                    family: spec.family().to_vec(),
                    qualifier: qualifier.to_vec(),
                    up_to,
                },
                None => DeleteScope::Family {
                    family: spec.family().to_vec(),
                    up_to,
                },
            },
            None => DeleteScope::Row { up_to },
        };
        self.client.delete(
            self.name(),
            DeleteRequest {
                row: row.to_vec(),
                scope,
            },
        )
    }

    /// Add `delta` to a counter cell; returns the new value.
    pub fn incr(&self, row: &[u8], column: &ColumnSpec, delta: i64) -> Result<i64> {
        self.client.increment(
            self.name(),
            IncrementRequest {
                row: row.to_vec(),
                family: column.family().to_vec(),
                qualifier: column.cell_qualifier().to_vec(),
                amount: delta,
            },
        )
    }

    // ==================== Rendering ====================

    /// Render a cell as `timestamp=T, value=V`, truncated to `max_length`
    /// characters.
    ///
    /// Server start codes in the catalog tables are decoded to integers and
    /// never truncated.
    pub fn render_cell(&self, cell: &Cell, max_length: Option<usize>) -> String {
        render_cell(self.descriptor.is_catalog(), cell, max_length)
    }
}

pub(crate) fn render_cell(catalog: bool, cell: &Cell, max_length: Option<usize>) -> String {
    if catalog && cell.column() == "info:serverstartcode" && cell.value.len() == 8 {
        return format!(
            "timestamp={}, value={}",
            cell.timestamp,
            BigEndian::read_u64(&cell.value)
        );
    }
    let rendered = format!(
        "timestamp={}, value={}",
        cell.timestamp,
        to_string_binary(&cell.value)
    );
    match max_length {
        Some(max) => truncate_chars(&rendered, max),
        None => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(column: &str, value: &[u8]) -> Cell {
        let spec = ColumnSpec::parse_str(column).unwrap();
        Cell {
            row: b"r".to_vec(),
            family: spec.family().to_vec(),
            qualifier: spec.cell_qualifier().to_vec(),
            timestamp: 1234,
            value: value.to_vec(),
        }
    }

    #[test]
    fn cells_render_with_binary_escapes() {
        let c = cell("x:a", &[b'v', 0x00]);
        assert_eq!(render_cell(false, &c, None), "timestamp=1234, value=v\\x00");
        assert_eq!(render_cell(false, &c, Some(9)), "timestamp");
    }

    #[test]
    fn catalog_start_codes_are_decoded() {
        let c = cell("info:serverstartcode", &[0, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(render_cell(true, &c, Some(3)), "timestamp=1234, value=256");
        assert!(render_cell(false, &c, None).contains("\\x01"));
    }
}
