//! The store client contract.
//!
//! The shell never implements storage itself: every administrative and
//! data operation is a single call on a [`StoreClient`]. This trait is the
//! seam that lets the shell run against a real cluster connection or the
//! in-process store used by tests.

use crate::error::Result;
use crate::request::{DeleteRequest, GetRequest, IncrementRequest, PutRequest, ScanRequest};
use crate::status::ClusterStatus;
use crate::types::{FamilyDescriptor, RowResult, TableDescriptor};

/// Iterator over scan results, one row at a time.
///
/// Rows are produced lazily; consumers that stop early never fetch the
/// remaining rows.
pub type RowScanner<'a> = Box<dyn Iterator<Item = Result<RowResult>> + 'a>;

/// Client of the external column-family store.
///
/// Thread safety: implementations must be `Send + Sync` so a client can be
/// shared behind an `Arc` by the admin and table facades.
///
/// Table and region arguments that do not resolve report `TableNotFound`
/// or `RegionNotFound` respectively.
pub trait StoreClient: Send + Sync {
    // ==================== Connection ====================

    /// Version string of the store.
    fn version(&self) -> String;

    /// Verify the master is reachable.
    ///
    /// # Errors
    ///
    /// Returns a `Client` error if the master cannot be contacted.
    fn check_master(&self) -> Result<()>;

    // ==================== Table lifecycle ====================

    /// Descriptors of all user tables (catalog tables excluded).
    fn list_tables(&self) -> Result<Vec<TableDescriptor>>;

    /// Whether the table exists.
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// Whether the table is enabled.
    fn is_table_enabled(&self, table: &str) -> Result<bool>;

    /// Current schema of a table, catalog tables included.
    fn table_descriptor(&self, table: &str) -> Result<TableDescriptor>;

    /// Create a table, enabled.
    ///
    /// # Errors
    ///
    /// Returns `TableExists` if a table with the same name exists.
    fn create_table(&self, descriptor: TableDescriptor) -> Result<()>;

    /// Delete a disabled table and all its data.
    ///
    /// # Errors
    ///
    /// Returns `TableStillEnabled` if the table is enabled.
    fn delete_table(&self, table: &str) -> Result<()>;

    /// Enable a table.
    fn enable_table(&self, table: &str) -> Result<()>;

    /// Disable a table.
    fn disable_table(&self, table: &str) -> Result<()>;

    /// Replace table-scope attributes and families.
    fn modify_table(&self, table: &str, descriptor: TableDescriptor) -> Result<()>;

    /// Add a column family.
    fn add_column(&self, table: &str, family: FamilyDescriptor) -> Result<()>;

    /// Replace the schema of an existing column family.
    fn modify_column(&self, table: &str, family: FamilyDescriptor) -> Result<()>;

    /// Remove a column family and its data.
    fn delete_column(&self, table: &str, family: &str) -> Result<()>;

    // ==================== Regions ====================

    /// Flush the memstores of a table or of one region.
    fn flush(&self, table_or_region: &str) -> Result<()>;

    /// Minor compaction of a table or of one region.
    fn compact(&self, table_or_region: &str) -> Result<()>;

    /// Major compaction of a table or of one region.
    fn major_compact(&self, table_or_region: &str) -> Result<()>;

    /// Split a table's regions or one region.
    fn split(&self, table_or_region: &str) -> Result<()>;

    /// Close a region, optionally on a specific server (`host:port`).
    fn close_region(&self, region: &str, server: Option<&str>) -> Result<()>;

    /// Mark a region online or offline in the catalog.
    fn set_region_online(&self, region: &str, online: bool) -> Result<()>;

    /// Snapshot of servers, load and regions in transition.
    fn cluster_status(&self) -> Result<ClusterStatus>;

    // ==================== Data ====================

    /// Read one row.
    fn get(&self, table: &str, request: &GetRequest) -> Result<RowResult>;

    /// Write one cell.
    fn put(&self, table: &str, request: PutRequest) -> Result<()>;

    /// Delete cells of one row.
    fn delete(&self, table: &str, request: DeleteRequest) -> Result<()>;

    /// Open a scanner over a row range.
    fn scan<'a>(&'a self, table: &str, request: ScanRequest) -> Result<RowScanner<'a>>;

    /// Atomically add to a counter; returns the new value.
    fn increment(&self, table: &str, request: IncrementRequest) -> Result<i64>;
}
