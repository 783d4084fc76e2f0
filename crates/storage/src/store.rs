//! MemStore: an in-process column-family store
//!
//! Implements [`StoreClient`] over:
//! - `BTreeMap<String, MemTable>` of tables behind a `parking_lot::RwLock`
//! - per-column [`VersionChain`](crate::VersionChain)s capped by the family schema
//! - a strictly increasing millisecond [`Clock`] for cell timestamps
//! - simulated region servers from a [`ClusterLayout`]
//!
//! # Design Notes
//!
//! - **Catalog tables**: `.META.` and `-ROOT-` exist from construction and
//!   are rewritten whenever a table's regions change.
//! - **Regions are bookkeeping**: rows live in one map per table; regions
//!   only decide which server a row is served by and carry load figures.
//! - **Logical TTL expiry**: expired versions are hidden at read time and
//!   removed by major compaction.
//! - **Call journal**: every client call is recorded before it executes, so
//!   tests can assert on the exact calls a command made.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use byteorder::{BigEndian, ByteOrder};
use parking_lot::RwLock;
use tracing::{debug, info};

use colshell_core::client::RowScanner;
use colshell_core::{
    ClientConfig, ClusterStatus, DeleteRequest, DeleteScope, Error, FamilyDescriptor, Filter,
    GetRequest, IncrementRequest, PutRequest, RegionInfo, RegionLoad, RegionState, Result,
    RowResult, ScanRequest, ServerInfo, ServerLoad, StoreClient, TableDescriptor,
    LATEST_TIMESTAMP, META_TABLE_NAME, ROOT_TABLE_NAME,
};

use crate::catalog::{self, CATALOG_FAMILY};
use crate::clock::Clock;
use crate::cluster::ClusterLayout;
use crate::journal::CallJournal;
use crate::scanner::MemScanner;
use crate::table::{MemRegion, MemTable, ReadSpec};

type Tables = BTreeMap<String, MemTable>;

const MB: u64 = 1024 * 1024;

/// In-process implementation of [`StoreClient`].
///
/// Thread-safe: tables are guarded by one `RwLock`; reads share it and
/// every mutation takes it exclusively.
#[derive(Debug)]
pub struct MemStore {
    tables: RwLock<Tables>,
    layout: ClusterLayout,
    start_codes: Vec<u64>,
    next_server: AtomicUsize,
    clock: Clock,
    journal: CallJournal,
    available: AtomicBool,
    config: ClientConfig,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    /// Store running on a single `localhost` server.
    pub fn new() -> Self {
        Self::with_layout(ClusterLayout::single())
    }

    /// Store running on the given servers.
    pub fn with_layout(layout: ClusterLayout) -> Self {
        Self::build(layout, ClientConfig::default())
    }

    /// Store configured from the shell's client settings.
    pub fn connect(config: &ClientConfig) -> Self {
        info!(
            target: "colshell::store",
            retries = config.retries,
            ipc_connect_max_retries = config.ipc_connect_max_retries,
            "Starting in-process store"
        );
        Self::build(ClusterLayout::single(), config.clone())
    }

    fn build(layout: ClusterLayout, config: ClientConfig) -> Self {
        let clock = Clock::new();
        let start_codes = layout.servers.iter().map(|_| clock.tick()).collect();
        let store = Self {
            tables: RwLock::new(BTreeMap::new()),
            layout,
            start_codes,
            next_server: AtomicUsize::new(0),
            clock,
            journal: CallJournal::new(),
            available: AtomicBool::new(true),
            config,
        };
        {
            let mut tables = store.tables.write();
            for (id, name) in [ROOT_TABLE_NAME, META_TABLE_NAME].into_iter().enumerate() {
                let region = store.new_region(name, Vec::new(), Vec::new(), id as u64);
                tables.insert(
                    name.to_string(),
                    MemTable::new(catalog::catalog_descriptor(name), region),
                );
            }
            store.sync_catalog(&mut tables, META_TABLE_NAME);
        }
        store
    }

    /// Calls made so far.
    pub fn journal(&self) -> &CallJournal {
        &self.journal
    }

    /// Simulate the master going away (`false`) or coming back.
    ///
    /// While unavailable every call fails with a `Client` error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    /// Servers this store pretends to run on.
    pub fn layout(&self) -> &ClusterLayout {
        &self.layout
    }

    // ==================== Internals ====================

    fn call(&self, op: &str, target: &str) -> Result<()> {
        self.journal.record(op, target);
        if self.available.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(Error::client(format!(
                "master is not running; gave up after {} retries",
                self.config.retries
            )))
        }
    }

    fn assign(&self) -> Option<usize> {
        if self.layout.servers.is_empty() {
            return None;
        }
        Some(self.next_server.fetch_add(1, Ordering::Relaxed) % self.layout.servers.len())
    }

    fn new_region(&self, table: &str, start_key: Vec<u8>, end_key: Vec<u8>, id: u64) -> MemRegion {
        MemRegion::new(
            RegionInfo {
                table: table.to_string(),
                start_key,
                end_key,
                id,
                offline: false,
            },
            self.assign(),
        )
    }

    fn server_identity(&self, server: Option<usize>) -> Option<(String, u64)> {
        let idx = server?;
        let spec = self.layout.servers.get(idx)?;
        Some((spec.address(), *self.start_codes.get(idx)?))
    }

    fn table<'a>(tables: &'a Tables, name: &str) -> Result<&'a MemTable> {
        tables.get(name).ok_or_else(|| Error::TableNotFound {
            table: name.to_string(),
        })
    }

    fn table_mut<'a>(tables: &'a mut Tables, name: &str) -> Result<&'a mut MemTable> {
        tables.get_mut(name).ok_or_else(|| Error::TableNotFound {
            table: name.to_string(),
        })
    }

    fn check_readable(table: &MemTable) -> Result<()> {
        if table.enabled {
            Ok(())
        } else {
            Err(Error::TableDisabled {
                table: table.name().to_string(),
            })
        }
    }

    fn check_writable(table: &MemTable) -> Result<()> {
        Self::check_readable(table)?;
        if table.descriptor.attributes.read_only {
            return Err(Error::client(format!(
                "table '{}' is read-only",
                table.name()
            )));
        }
        Ok(())
    }

    fn locate_region(tables: &Tables, region: &str) -> Result<(String, usize)> {
        for table in tables.values() {
            if let Some(idx) = table.regions.iter().position(|r| r.info.name() == region) {
                return Ok((table.name().to_string(), idx));
            }
        }
        Err(Error::RegionNotFound {
            region: region.to_string(),
        })
    }

    /// Resolve a table name or a region name to the table and the region
    /// indices it covers.
    fn resolve(tables: &Tables, target: &str) -> Result<(String, Vec<usize>)> {
        if let Some(table) = tables.get(target) {
            return Ok((target.to_string(), (0..table.regions.len()).collect()));
        }
        match Self::locate_region(tables, target) {
            Ok((table, idx)) => Ok((table, vec![idx])),
            Err(e) if target.contains(',') => Err(e),
            Err(_) => Err(Error::TableNotFound {
                table: target.to_string(),
            }),
        }
    }

    fn note_write(table: &mut MemTable, region_idx: usize, bytes: u64) {
        let flush_size = table.descriptor.attributes.memstore_flush_size;
        let region = &mut table.regions[region_idx];
        region.count_request();
        region.memstore_bytes += bytes;
        if region.memstore_bytes >= flush_size {
            debug!(target: "colshell::store", region = %region.info.name(), "Memstore full, flushing");
            region.flush();
        }
    }

    /// Rewrite the catalog rows describing `table`'s regions.
    fn sync_catalog(&self, tables: &mut Tables, table: &str) {
        let Some(catalog_name) = catalog::catalog_for(table) else {
            return;
        };
        let rows: Vec<(Vec<u8>, Vec<(Vec<u8>, Vec<u8>)>)> = tables
            .get(table)
            .map(|t| {
                t.regions
                    .iter()
                    .map(|r| {
                        (
                            r.info.name().into_bytes(),
                            catalog::region_cells(r, &t.descriptor, self.server_identity(r.server)),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        let Some(catalog) = tables.get_mut(catalog_name) else {
            return;
        };
        let prefix = format!("{},", table);
        catalog
            .rows
            .retain(|row, _| !row.starts_with(prefix.as_bytes()));

        let versions = catalog
            .descriptor
            .family(CATALOG_FAMILY)
            .map_or(1, |f| f.versions);
        for (row, cells) in rows {
            let timestamp = self.clock.tick();
            let mut bytes = 0;
            let data = catalog.rows.entry(row.clone()).or_default();
            for (qualifier, value) in cells {
                bytes += (qualifier.len() + value.len()) as u64 + 8;
                data.entry((CATALOG_FAMILY.as_bytes().to_vec(), qualifier))
                    .or_default()
                    .put(timestamp, value, versions);
            }
            if let Some(idx) = catalog.region_index(&row) {
                catalog.regions[idx].memstore_bytes += bytes;
            }
        }
    }

    fn set_enabled(&self, table: &str, enabled: bool) -> Result<()> {
        let op = if enabled { "enable_table" } else { "disable_table" };
        self.call(op, table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        if t.descriptor.is_catalog() && !enabled {
            return Err(Error::client("catalog tables cannot be disabled"));
        }
        if t.enabled == enabled {
            return Err(Error::client(format!(
                "table '{}' is already {}",
                table,
                if enabled { "enabled" } else { "disabled" }
            )));
        }
        t.enabled = enabled;
        info!(target: "colshell::store", table, enabled, "Table state changed");
        Ok(())
    }

    /// Next non-empty row after `cursor`, or `None` at the end of the range.
    pub(crate) fn next_scan_row(
        &self,
        table: &str,
        request: &ScanRequest,
        cursor: &Bound<Vec<u8>>,
    ) -> Result<Option<RowResult>> {
        let tables = self.tables.read();
        let t = Self::table(&tables, table)?;
        Self::check_readable(t)?;

        let stop = request.stop_row.as_ref().filter(|s| !s.is_empty());
        if let (Some(stop), Bound::Included(key) | Bound::Excluded(key)) = (stop, cursor) {
            if key >= stop {
                return Ok(None);
            }
        }
        let upper = match stop {
            Some(stop) => Bound::Excluded(stop.clone()),
            None => Bound::Unbounded,
        };

        let spec = ReadSpec {
            columns: &request.columns,
            max_versions: request.max_versions,
            max_timestamp: request.max_timestamp.unwrap_or(LATEST_TIMESTAMP),
            filter: request.filter.as_ref(),
            now: Clock::now_millis(),
        };
        for (row, data) in t.rows.range::<Vec<u8>, _>((cursor.clone(), upper)) {
            if let Some(Filter::Prefix(prefix)) = &request.filter {
                if row.as_slice() > prefix.as_slice() && !row.starts_with(prefix) {
                    return Ok(None);
                }
            }
            let idx = t.serving_region(row)?;
            t.regions[idx].count_request();
            let cells = t.read_row(row, data, &spec);
            if !cells.is_empty() {
                self.journal.record("next_row", table);
                return Ok(Some(RowResult {
                    row: row.clone(),
                    cells,
                }));
            }
        }
        Ok(None)
    }
}

/// Legal names use word characters, `-` and `.`, and do not start with
/// `.` or `-` (reserved for catalog tables).
fn is_legal_table_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl StoreClient for MemStore {
    // ==================== Connection ====================

    fn version(&self) -> String {
        format!("{}-memstore", env!("CARGO_PKG_VERSION"))
    }

    fn check_master(&self) -> Result<()> {
        self.call("check_master", "")
    }

    // ==================== Table lifecycle ====================

    fn list_tables(&self) -> Result<Vec<TableDescriptor>> {
        self.call("list_tables", "")?;
        let tables = self.tables.read();
        Ok(tables
            .values()
            .filter(|t| !t.descriptor.is_catalog())
            .map(|t| t.descriptor.clone())
            .collect())
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        self.call("table_exists", table)?;
        Ok(self.tables.read().contains_key(table))
    }

    fn is_table_enabled(&self, table: &str) -> Result<bool> {
        self.call("is_table_enabled", table)?;
        let tables = self.tables.read();
        Ok(Self::table(&tables, table)?.enabled)
    }

    fn table_descriptor(&self, table: &str) -> Result<TableDescriptor> {
        self.call("table_descriptor", table)?;
        let tables = self.tables.read();
        Ok(Self::table(&tables, table)?.descriptor.clone())
    }

    fn create_table(&self, descriptor: TableDescriptor) -> Result<()> {
        self.call("create_table", &descriptor.name)?;
        let mut tables = self.tables.write();
        if tables.contains_key(&descriptor.name) {
            return Err(Error::TableExists {
                table: descriptor.name,
            });
        }
        if !is_legal_table_name(&descriptor.name) {
            return Err(Error::invalid_type(
                "table name",
                "word characters, '-' or '.', not starting with '.' or '-'",
                format!("'{}'", descriptor.name),
            ));
        }
        if descriptor.families().is_empty() {
            return Err(Error::MissingColumnFamily {
                table: descriptor.name,
            });
        }

        let name = descriptor.name.clone();
        let region = self.new_region(&name, Vec::new(), Vec::new(), self.clock.tick());
        tables.insert(name.clone(), MemTable::new(descriptor, region));
        self.sync_catalog(&mut tables, &name);
        info!(target: "colshell::store", table = %name, "Created table");
        Ok(())
    }

    fn delete_table(&self, table: &str) -> Result<()> {
        self.call("delete_table", table)?;
        let mut tables = self.tables.write();
        let t = Self::table(&tables, table)?;
        if t.descriptor.is_catalog() {
            return Err(Error::client("catalog tables cannot be deleted"));
        }
        if t.enabled {
            return Err(Error::TableStillEnabled {
                table: table.to_string(),
            });
        }
        tables.remove(table);
        self.sync_catalog(&mut tables, table);
        info!(target: "colshell::store", table, "Deleted table");
        Ok(())
    }

    fn enable_table(&self, table: &str) -> Result<()> {
        self.set_enabled(table, true)
    }

    fn disable_table(&self, table: &str) -> Result<()> {
        self.set_enabled(table, false)
    }

    fn modify_table(&self, table: &str, descriptor: TableDescriptor) -> Result<()> {
        self.call("modify_table", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        if descriptor.name != table {
            return Err(Error::client(format!(
                "descriptor of '{}' cannot modify table '{}'",
                descriptor.name, table
            )));
        }
        if descriptor.families().is_empty() {
            return Err(Error::MissingColumnFamily {
                table: table.to_string(),
            });
        }
        let dropped: Vec<String> = t
            .descriptor
            .families()
            .iter()
            .filter(|f| !descriptor.has_family(&f.name))
            .map(|f| f.name.clone())
            .collect();
        for family in dropped {
            t.purge_family(family.as_bytes());
        }
        t.descriptor = descriptor;
        self.sync_catalog(&mut tables, table);
        info!(target: "colshell::store", table, "Modified table");
        Ok(())
    }

    fn add_column(&self, table: &str, family: FamilyDescriptor) -> Result<()> {
        self.call("add_column", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        if t.descriptor.has_family(&family.name) {
            return Err(Error::client(format!(
                "column family '{}' already exists in '{}'",
                family.name, table
            )));
        }
        info!(target: "colshell::store", table, family = %family.name, "Adding column family");
        t.descriptor.put_family(family);
        self.sync_catalog(&mut tables, table);
        Ok(())
    }

    fn modify_column(&self, table: &str, family: FamilyDescriptor) -> Result<()> {
        self.call("modify_column", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        t.check_family(family.name.as_bytes())?;
        for data in t.rows.values_mut() {
            for ((f, _), chain) in data.iter_mut() {
                if f.as_slice() == family.name.as_bytes() {
                    chain.trim(family.versions);
                }
            }
        }
        info!(target: "colshell::store", table, family = %family.name, "Modifying column family");
        t.descriptor.put_family(family);
        self.sync_catalog(&mut tables, table);
        Ok(())
    }

    fn delete_column(&self, table: &str, family: &str) -> Result<()> {
        self.call("delete_column", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        t.check_family(family.as_bytes())?;
        if t.descriptor.families().len() == 1 {
            return Err(Error::MissingColumnFamily {
                table: table.to_string(),
            });
        }
        t.descriptor.remove_family(family);
        t.purge_family(family.as_bytes());
        info!(target: "colshell::store", table, family, "Deleted column family");
        self.sync_catalog(&mut tables, table);
        Ok(())
    }

    // ==================== Regions ====================

    fn flush(&self, table_or_region: &str) -> Result<()> {
        self.call("flush", table_or_region)?;
        let mut tables = self.tables.write();
        let (name, regions) = Self::resolve(&tables, table_or_region)?;
        let t = Self::table_mut(&mut tables, &name)?;
        let flushed = regions
            .into_iter()
            .filter(|&idx| t.regions[idx].flush())
            .count();
        debug!(target: "colshell::store", table = %name, flushed, "Flushed memstores");
        Ok(())
    }

    fn compact(&self, table_or_region: &str) -> Result<()> {
        self.call("compact", table_or_region)?;
        let mut tables = self.tables.write();
        let (name, regions) = Self::resolve(&tables, table_or_region)?;
        let t = Self::table_mut(&mut tables, &name)?;
        for idx in regions {
            let region = &mut t.regions[idx];
            if region.storefiles > 1 {
                region.storefiles = 1;
            }
        }
        debug!(target: "colshell::store", table = %name, "Compacted");
        Ok(())
    }

    fn major_compact(&self, table_or_region: &str) -> Result<()> {
        self.call("major_compact", table_or_region)?;
        let mut tables = self.tables.write();
        let (name, regions) = Self::resolve(&tables, table_or_region)?;
        let t = Self::table_mut(&mut tables, &name)?;
        let now = Clock::now_millis();
        for idx in regions {
            let bytes = t.purge_region(idx, now);
            let region = &mut t.regions[idx];
            if region.storefiles > 0 {
                region.storefiles = 1;
                region.storefile_bytes = bytes.saturating_sub(region.memstore_bytes);
            }
        }
        debug!(target: "colshell::store", table = %name, "Major compacted");
        Ok(())
    }

    fn split(&self, table_or_region: &str) -> Result<()> {
        self.call("split", table_or_region)?;
        let mut tables = self.tables.write();
        let (name, regions) = Self::resolve(&tables, table_or_region)?;
        let t = Self::table_mut(&mut tables, &name)?;

        // Highest index first so earlier indices stay valid.
        for idx in regions.into_iter().rev() {
            if !t.regions[idx].is_online() {
                debug!(target: "colshell::store", region = %t.regions[idx].info.name(), "Region offline, not splitting");
                continue;
            }
            let rows = t.region_rows(idx);
            if rows.len() < 2 {
                debug!(target: "colshell::store", region = %t.regions[idx].info.name(), "Region too small to split");
                continue;
            }
            let mid = rows[rows.len() / 2].clone();
            let parent = t.regions.remove(idx);

            let mut daughters = [
                (parent.info.start_key.clone(), mid.clone()),
                (mid, parent.info.end_key.clone()),
            ]
            .map(|(start_key, end_key)| {
                let mut region = MemRegion::new(
                    RegionInfo {
                        table: name.clone(),
                        start_key,
                        end_key,
                        id: self.clock.tick(),
                        offline: false,
                    },
                    parent.server,
                );
                region.storefiles = parent.storefiles;
                region
            });
            daughters[0].storefile_bytes = parent.storefile_bytes / 2;
            daughters[1].storefile_bytes = parent.storefile_bytes - parent.storefile_bytes / 2;
            daughters[0].memstore_bytes = parent.memstore_bytes / 2;
            daughters[1].memstore_bytes = parent.memstore_bytes - parent.memstore_bytes / 2;

            info!(target: "colshell::store", region = %parent.info.name(), "Split region");
            let [left, right] = daughters;
            t.regions.insert(idx, right);
            t.regions.insert(idx, left);
        }
        self.sync_catalog(&mut tables, &name);
        Ok(())
    }

    fn close_region(&self, region: &str, server: Option<&str>) -> Result<()> {
        self.call("close_region", region)?;
        let mut tables = self.tables.write();
        let (name, idx) = Self::locate_region(&tables, region)?;
        {
            let t = Self::table_mut(&mut tables, &name)?;
            let r = &mut t.regions[idx];
            if let Some(address) = server {
                let wanted = self
                    .layout
                    .find(address)
                    .ok_or_else(|| Error::client(format!("unknown region server '{}'", address)))?;
                if r.server != Some(wanted) {
                    return Err(Error::client(format!(
                        "region '{}' is not served by '{}'",
                        region, address
                    )));
                }
            }
            r.server = None;
        }
        self.sync_catalog(&mut tables, &name);
        info!(target: "colshell::store", region, "Closed region");
        Ok(())
    }

    fn set_region_online(&self, region: &str, online: bool) -> Result<()> {
        let op = if online { "enable_region" } else { "disable_region" };
        self.call(op, region)?;
        let mut tables = self.tables.write();
        let (name, idx) = Self::locate_region(&tables, region)?;
        {
            let t = Self::table_mut(&mut tables, &name)?;
            let r = &mut t.regions[idx];
            r.info.offline = !online;
            if online && r.server.is_none() {
                r.server = self.assign();
            }
        }
        self.sync_catalog(&mut tables, &name);
        info!(target: "colshell::store", region, online, "Region state changed");
        Ok(())
    }

    fn cluster_status(&self) -> Result<ClusterStatus> {
        self.call("cluster_status", "")?;
        let tables = self.tables.read();

        let mut servers: Vec<ServerInfo> = self
            .layout
            .servers
            .iter()
            .zip(&self.start_codes)
            .map(|(spec, &start_code)| ServerInfo {
                hostname: spec.hostname.clone(),
                port: spec.port,
                start_code,
                load: ServerLoad {
                    requests: 0,
                    used_heap_mb: 0,
                    max_heap_mb: spec.max_heap_mb,
                    regions: Vec::new(),
                },
            })
            .collect();
        let mut regions_in_transition = Vec::new();
        let mut memstore_bytes = vec![0u64; servers.len()];

        for table in tables.values() {
            for region in &table.regions {
                let state = match region.server {
                    _ if region.info.offline => "OFFLINE",
                    None => "CLOSED",
                    Some(idx) => {
                        let load = &mut servers[idx].load;
                        load.requests += region.requests.load(Ordering::Relaxed);
                        load.regions.push(RegionLoad {
                            name: region.info.name(),
                            stores: table.descriptor.families().len() as u32,
                            storefiles: region.storefiles,
                            storefile_size_mb: (region.storefile_bytes / MB) as u32,
                            memstore_size_mb: (region.memstore_bytes / MB) as u32,
                        });
                        memstore_bytes[idx] += region.memstore_bytes;
                        continue;
                    }
                };
                regions_in_transition.push(RegionState {
                    region: region.info.name(),
                    state: state.to_string(),
                });
            }
        }
        for (server, bytes) in servers.iter_mut().zip(memstore_bytes) {
            let used = 8 + (bytes / MB) as u32;
            server.load.used_heap_mb = used.min(server.load.max_heap_mb);
        }

        Ok(ClusterStatus {
            version: self.version(),
            servers,
            dead_servers: self.layout.dead_servers.clone(),
            regions_in_transition,
        })
    }

    // ==================== Data ====================

    fn get(&self, table: &str, request: &GetRequest) -> Result<RowResult> {
        self.call("get", table)?;
        let tables = self.tables.read();
        let t = Self::table(&tables, table)?;
        Self::check_readable(t)?;
        t.check_columns(&request.columns)?;
        let idx = t.serving_region(&request.row)?;
        t.regions[idx].count_request();

        let spec = ReadSpec {
            columns: &request.columns,
            max_versions: request.max_versions,
            max_timestamp: request.max_timestamp.unwrap_or(LATEST_TIMESTAMP),
            filter: None,
            now: Clock::now_millis(),
        };
        let cells = t
            .rows
            .get(&request.row)
            .map(|data| t.read_row(&request.row, data, &spec))
            .unwrap_or_default();
        Ok(RowResult {
            row: request.row.clone(),
            cells,
        })
    }

    fn put(&self, table: &str, request: PutRequest) -> Result<()> {
        self.call("put", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        Self::check_writable(t)?;
        let versions = t.check_family(&request.family)?.versions;
        let idx = t.serving_region(&request.row)?;

        let timestamp = request.timestamp.unwrap_or_else(|| self.clock.tick());
        let size = (request.row.len()
            + request.family.len()
            + request.qualifier.len()
            + request.value.len()
            + 8) as u64;
        t.rows
            .entry(request.row)
            .or_default()
            .entry((request.family, request.qualifier))
            .or_default()
            .put(timestamp, request.value, versions);
        Self::note_write(t, idx, size);
        Ok(())
    }

    fn delete(&self, table: &str, request: DeleteRequest) -> Result<()> {
        self.call("delete", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        Self::check_writable(t)?;
        match &request.scope {
            DeleteScope::Row { .. } => {}
            DeleteScope::Family { family, .. }
            | DeleteScope::Columns { family, .. }
            | DeleteScope::Version { family, .. } => {
                t.check_family(family)?;
            }
        }
        let idx = t.serving_region(&request.row)?;

        if let Some(data) = t.rows.get_mut(&request.row) {
            match request.scope {
                DeleteScope::Row { up_to } => {
                    for chain in data.values_mut() {
                        chain.remove_up_to(up_to);
                    }
                }
                DeleteScope::Family { family, up_to } => {
                    for ((f, _), chain) in data.iter_mut() {
                        if *f == family {
                            chain.remove_up_to(up_to);
                        }
                    }
                }
                DeleteScope::Columns {
                    family,
                    qualifier,
                    up_to,
                } => {
                    if let Some(chain) = data.get_mut(&(family, qualifier)) {
                        chain.remove_up_to(up_to);
                    }
                }
                DeleteScope::Version {
                    family,
                    qualifier,
                    timestamp,
                } => {
                    if let Some(chain) = data.get_mut(&(family, qualifier)) {
                        if timestamp == LATEST_TIMESTAMP {
                            chain.remove_latest();
                        } else {
                            chain.remove_version(timestamp);
                        }
                    }
                }
            }
        }
        t.prune_row(&request.row);
        Self::note_write(t, idx, request.row.len() as u64 + 8);
        Ok(())
    }

    fn scan<'a>(&'a self, table: &str, request: ScanRequest) -> Result<RowScanner<'a>> {
        self.call("scan", table)?;
        {
            let tables = self.tables.read();
            let t = Self::table(&tables, table)?;
            Self::check_readable(t)?;
            t.check_columns(&request.columns)?;
        }
        debug!(
            target: "colshell::store",
            table,
            caching = ?request.caching,
            cache_blocks = request.cache_blocks,
            "Opening scanner"
        );
        Ok(Box::new(MemScanner::new(self, table, request)))
    }

    fn increment(&self, table: &str, request: IncrementRequest) -> Result<i64> {
        self.call("increment", table)?;
        let mut tables = self.tables.write();
        let t = Self::table_mut(&mut tables, table)?;
        Self::check_writable(t)?;
        let versions = t.check_family(&request.family)?.versions;
        let idx = t.serving_region(&request.row)?;

        let column = (request.family, request.qualifier);
        let current = match t
            .rows
            .get(&request.row)
            .and_then(|data| data.get(&column))
            .and_then(|chain| chain.latest())
        {
            Some(v) if v.value.len() == 8 => BigEndian::read_i64(&v.value),
            Some(v) => {
                return Err(Error::client(format!(
                    "attempted to increment field that isn't 64 bits wide ({} bytes)",
                    v.value.len()
                )))
            }
            None => 0,
        };
        let next = current
            .checked_add(request.amount)
            .ok_or_else(|| Error::client("increment overflows a 64-bit counter"))?;

        let mut encoded = [0u8; 8];
        BigEndian::write_i64(&mut encoded, next);
        let timestamp = self.clock.tick();
        t.rows
            .entry(request.row)
            .or_default()
            .entry(column)
            .or_default()
            .put(timestamp, encoded.to_vec(), versions);
        Self::note_write(t, idx, 16);
        Ok(next)
    }
}
