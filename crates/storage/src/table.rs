//! In-memory tables and regions.
//!
//! A table holds its rows in one ordered map; regions only partition the
//! key space for assignment, load reporting, flushing and splitting.
//!
//! # Row layout
//!
//! ```text
//! rows: row key -> (family, qualifier) -> VersionChain (newest first)
//! ```
//!
//! Cells come back ordered by family, then qualifier, then newest version
//! first, which is the order both get and scan render them in.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use colshell_core::{
    Cell, ColumnSpec, Error, FamilyDescriptor, Filter, RegionInfo, Result, TableDescriptor,
};

use crate::version_chain::VersionChain;

/// `(family, qualifier)`
pub(crate) type ColumnKey = (Vec<u8>, Vec<u8>);

/// All columns of one row.
pub(crate) type RowData = BTreeMap<ColumnKey, VersionChain>;

/// A region and its bookkeeping.
#[derive(Debug)]
pub(crate) struct MemRegion {
    pub info: RegionInfo,
    /// Index into the cluster layout's servers; `None` when closed
    pub server: Option<usize>,
    pub storefiles: u32,
    pub storefile_bytes: u64,
    pub memstore_bytes: u64,
    pub requests: AtomicU64,
}

impl MemRegion {
    pub fn new(info: RegionInfo, server: Option<usize>) -> Self {
        Self {
            info,
            server,
            storefiles: 0,
            storefile_bytes: 0,
            memstore_bytes: 0,
            requests: AtomicU64::new(0),
        }
    }

    /// Served by a live server and not marked offline.
    pub fn is_online(&self) -> bool {
        self.server.is_some() && !self.info.offline
    }

    pub fn count_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Move the memstore into a new store file. Returns whether anything
    /// was flushed.
    pub fn flush(&mut self) -> bool {
        if self.memstore_bytes == 0 {
            return false;
        }
        self.storefiles += 1;
        self.storefile_bytes += self.memstore_bytes;
        self.memstore_bytes = 0;
        true
    }
}

/// Selection applied while reading one row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReadSpec<'a> {
    pub columns: &'a [ColumnSpec],
    pub max_versions: u32,
    pub max_timestamp: u64,
    pub filter: Option<&'a Filter>,
    /// Current time, for TTL expiry
    pub now: u64,
}

impl ReadSpec<'_> {
    fn selects(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.columns.is_empty()
            || self.columns.iter().any(|spec| {
                spec.family() == family && spec.qualifier().map_or(true, |q| q == qualifier)
            })
    }
}

/// Oldest timestamp still visible under the family's TTL.
pub(crate) fn ttl_floor(family: &FamilyDescriptor, now: u64) -> u64 {
    if family.ttl >= FamilyDescriptor::DEFAULT_TTL {
        0
    } else {
        now.saturating_sub(family.ttl as u64 * 1000)
    }
}

/// A table with its rows and regions.
#[derive(Debug)]
pub(crate) struct MemTable {
    pub descriptor: TableDescriptor,
    pub enabled: bool,
    pub rows: BTreeMap<Vec<u8>, RowData>,
    /// Sorted by start key; together they cover the whole key space
    pub regions: Vec<MemRegion>,
}

impl MemTable {
    pub fn new(descriptor: TableDescriptor, region: MemRegion) -> Self {
        Self {
            descriptor,
            enabled: true,
            rows: BTreeMap::new(),
            regions: vec![region],
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Fail with `FamilyNotFound` for columns outside the schema.
    pub fn check_columns(&self, columns: &[ColumnSpec]) -> Result<()> {
        for spec in columns {
            self.check_family(spec.family())?;
        }
        Ok(())
    }

    pub fn check_family(&self, family: &[u8]) -> Result<&FamilyDescriptor> {
        self.descriptor
            .family_bytes(family)
            .ok_or_else(|| Error::FamilyNotFound {
                table: self.name().to_string(),
                family: String::from_utf8_lossy(family).into_owned(),
            })
    }

    /// Index of the region holding `row`.
    pub fn region_index(&self, row: &[u8]) -> Option<usize> {
        self.regions.iter().position(|r| r.info.contains(row))
    }

    /// Index of the online region holding `row`.
    pub fn serving_region(&self, row: &[u8]) -> Result<usize> {
        let idx = self
            .region_index(row)
            .ok_or_else(|| Error::internal(format!("no region of '{}' holds row", self.name())))?;
        let region = &self.regions[idx];
        if !region.is_online() {
            return Err(Error::client(format!(
                "region '{}' is not online",
                region.info.name()
            )));
        }
        Ok(idx)
    }

    /// Visible cells of one row.
    pub fn read_row(&self, row: &[u8], data: &RowData, spec: &ReadSpec<'_>) -> Vec<Cell> {
        let mut cells = Vec::new();
        if let Some(Filter::Prefix(prefix)) = spec.filter {
            if !row.starts_with(prefix) {
                return cells;
            }
        }

        for ((family, qualifier), chain) in data {
            let Some(schema) = self.descriptor.family_bytes(family) else {
                continue;
            };
            if !spec.selects(family, qualifier) {
                continue;
            }
            if let Some(Filter::ColumnPrefix(prefix)) = spec.filter {
                if !qualifier.starts_with(prefix) {
                    continue;
                }
            }

            let floor = ttl_floor(schema, spec.now);
            let limit = spec.max_versions.min(schema.versions).max(1) as usize;
            let visible = chain
                .at_or_before(spec.max_timestamp)
                .filter(|v| v.timestamp >= floor)
                .take(limit);

            for version in visible {
                if let Some(Filter::ValueEquals(expected)) = spec.filter {
                    if &version.value != expected {
                        continue;
                    }
                }
                let value = match spec.filter {
                    Some(Filter::KeyOnly) => Vec::new(),
                    _ => version.value.clone(),
                };
                cells.push(Cell {
                    row: row.to_vec(),
                    family: family.clone(),
                    qualifier: qualifier.clone(),
                    timestamp: version.timestamp,
                    value,
                });
                if matches!(spec.filter, Some(Filter::FirstKeyOnly)) {
                    return cells;
                }
            }
        }
        cells
    }

    /// Drop empty chains and rows left behind by deletes.
    pub fn prune_row(&mut self, row: &[u8]) {
        if let Some(data) = self.rows.get_mut(row) {
            data.retain(|_, chain| !chain.is_empty());
            if data.is_empty() {
                self.rows.remove(row);
            }
        }
    }

    /// Remove every cell of a family.
    pub fn purge_family(&mut self, family: &[u8]) {
        for data in self.rows.values_mut() {
            data.retain(|(f, _), _| f.as_slice() != family);
        }
        self.rows.retain(|_, data| !data.is_empty());
    }

    /// Physically drop versions beyond the schema or past their TTL, for
    /// the rows of one region. Returns the bytes still stored there.
    pub fn purge_region(&mut self, region_idx: usize, now: u64) -> u64 {
        let info = self.regions[region_idx].info.clone();
        let descriptor = &self.descriptor;
        let mut bytes = 0;
        for (row, data) in self.rows.iter_mut() {
            if !info.contains(row) {
                continue;
            }
            data.retain(|(family, _), chain| match descriptor.family_bytes(family) {
                Some(schema) => {
                    chain.expire_before(ttl_floor(schema, now));
                    chain.trim(schema.versions);
                    !chain.is_empty()
                }
                None => false,
            });
            bytes += data.values().map(VersionChain::byte_size).sum::<u64>();
        }
        self.rows.retain(|_, data| !data.is_empty());
        bytes
    }

    /// Row keys stored in one region, in order.
    pub fn region_rows(&self, region_idx: usize) -> Vec<Vec<u8>> {
        let info = &self.regions[region_idx].info;
        self.rows
            .keys()
            .filter(|row| info.contains(row))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MemTable {
        let mut descriptor = TableDescriptor::new("t1");
        descriptor.put_family(FamilyDescriptor::new("x").with_versions(2));
        descriptor.put_family(FamilyDescriptor::new("y"));
        let region = MemRegion::new(
            RegionInfo {
                table: "t1".into(),
                start_key: Vec::new(),
                end_key: Vec::new(),
                id: 1,
                offline: false,
            },
            Some(0),
        );
        let mut table = MemTable::new(descriptor, region);
        let mut data = RowData::new();
        let mut chain = VersionChain::new();
        chain.put(10, b"old".to_vec(), 3);
        chain.put(20, b"mid".to_vec(), 3);
        chain.put(30, b"new".to_vec(), 3);
        data.insert((b"x".to_vec(), b"a".to_vec()), chain);
        let mut chain = VersionChain::new();
        chain.put(15, b"other".to_vec(), 3);
        data.insert((b"y".to_vec(), b"b".to_vec()), chain);
        table.rows.insert(b"r1".to_vec(), data);
        table
    }

    fn read(table: &MemTable, columns: &[ColumnSpec], versions: u32, filter: Option<&Filter>) -> Vec<Cell> {
        let data = &table.rows[b"r1".as_slice()];
        table.read_row(
            b"r1",
            data,
            &ReadSpec {
                columns,
                max_versions: versions,
                max_timestamp: u64::MAX,
                filter,
                now: 100,
            },
        )
    }

    #[test]
    fn test_versions_capped_by_schema() {
        let table = table();
        let cells = read(&table, &[ColumnSpec::parse_str("x:a").unwrap()], 5, None);
        let stamps: Vec<u64> = cells.iter().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![30, 20]);
    }

    #[test]
    fn test_family_only_selects_all_qualifiers() {
        let table = table();
        let cells = read(&table, &[ColumnSpec::parse_str("y").unwrap()], 1, None);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].column(), "y:b");
    }

    #[test]
    fn test_filters() {
        let table = table();
        let cells = read(&table, &[], 1, Some(&Filter::FirstKeyOnly));
        assert_eq!(cells.len(), 1);

        let cells = read(&table, &[], 1, Some(&Filter::KeyOnly));
        assert!(cells.iter().all(|c| c.value.is_empty()));

        let cells = read(&table, &[], 1, Some(&Filter::ValueEquals(b"other".to_vec())));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].family, b"y".to_vec());

        let cells = read(&table, &[], 1, Some(&Filter::Prefix(b"r2".to_vec())));
        assert!(cells.is_empty());
    }

    #[test]
    fn test_unknown_family_rejected() {
        let table = table();
        let err = table
            .check_columns(&[ColumnSpec::parse_str("z:q").unwrap()])
            .unwrap_err();
        assert!(matches!(err, Error::FamilyNotFound { .. }));
    }

    #[test]
    fn test_purge_region_trims_to_schema() {
        let mut table = table();
        table.purge_region(0, 100);
        let data = &table.rows[b"r1".as_slice()];
        assert_eq!(data[&(b"x".to_vec(), b"a".to_vec())].len(), 2);
    }
}
