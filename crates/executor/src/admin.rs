//! Admin facade: table lifecycle, schema changes, region tools and
//! cluster status.
//!
//! An [`Admin`] is built once per session, after the master has answered a
//! health check. Every operation is a blocking call on the store client.
//!
//! # Design Notes
//!
//! - `enable` and `disable` look at the current state first and make no
//!   state-changing call when the table is already there.
//! - `drop` flushes and major-compacts the `.META.` catalog afterwards to
//!   reclaim the space of the deleted region rows.
//! - `truncate` is disable, drop, recreate. It is not atomic: a failure
//!   after the drop leaves the table gone.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use colshell_core::{
    ClusterStatus, Error, Result, StoreClient, TableDescriptor, META_TABLE_NAME,
};

use crate::options::{AlterOptions, CreateOptions};

/// Detail level of the `status` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    /// One line of aggregate counts
    #[default]
    Summary,
    /// One entry per server plus aggregate load
    Simple,
    /// Regions in transition and per-region load
    Detailed,
}

impl StatusLevel {
    /// Parse `summary`, `simple` or `detailed`.
    ///
    /// # Errors
    ///
    /// `InvalidArgumentType` for any other level.
    pub fn parse(level: &str) -> Result<Self> {
        match level {
            "summary" => Ok(StatusLevel::Summary),
            "simple" => Ok(StatusLevel::Simple),
            "detailed" => Ok(StatusLevel::Detailed),
            other => Err(Error::invalid_type(
                "status level",
                "'summary', 'simple' or 'detailed'",
                format!("'{}'", other),
            )),
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusLevel::Summary => "summary",
            StatusLevel::Simple => "simple",
            StatusLevel::Detailed => "detailed",
        };
        f.write_str(name)
    }
}

/// Administrative handle on the store.
pub struct Admin {
    client: Arc<dyn StoreClient>,
}

impl Admin {
    /// Connect, verifying the master is reachable.
    ///
    /// # Errors
    ///
    /// Returns the client error if the master does not answer.
    pub fn connect(client: Arc<dyn StoreClient>) -> Result<Self> {
        client.check_master()?;
        info!(target: "colshell::admin", version = %client.version(), "Connected to master");
        Ok(Self { client })
    }

    /// Store client version.
    pub fn version(&self) -> String {
        self.client.version()
    }

    // ==================== Tables ====================

    /// Names of all user tables.
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .client
            .list_tables()?
            .into_iter()
            .map(|t| t.name)
            .collect())
    }

    /// Whether the table exists.
    pub fn exists(&self, table: &str) -> Result<bool> {
        self.client.table_exists(table)
    }

    /// Whether the table is enabled.
    pub fn enabled(&self, table: &str) -> Result<bool> {
        self.client.is_table_enabled(table)
    }

    /// Schema and enabled flag of a table, catalog tables included.
    pub fn describe(&self, table: &str) -> Result<(TableDescriptor, bool)> {
        let descriptor = self.client.table_descriptor(table)?;
        let enabled = self.client.is_table_enabled(table)?;
        Ok((descriptor, enabled))
    }

    /// Create a table with the given families.
    pub fn create(&self, table: &str, options: &CreateOptions) -> Result<()> {
        let mut descriptor = TableDescriptor::new(table);
        for family in &options.families {
            descriptor.put_family(family.to_descriptor());
        }
        self.client.create_table(descriptor)?;
        info!(target: "colshell::admin", table, families = options.families.len(), "Created table");
        Ok(())
    }

    /// Drop a disabled table, then compact the catalog.
    ///
    /// # Errors
    ///
    /// `TableNotFound` if the table does not exist, `TableStillEnabled` if
    /// it has not been disabled.
    pub fn drop(&self, table: &str) -> Result<()> {
        if !self.client.table_exists(table)? {
            return Err(Error::TableNotFound {
                table: table.to_string(),
            });
        }
        if self.client.is_table_enabled(table)? {
            return Err(Error::TableStillEnabled {
                table: table.to_string(),
            });
        }
        self.client.delete_table(table)?;
        self.client.flush(META_TABLE_NAME)?;
        self.client.major_compact(META_TABLE_NAME)?;
        info!(target: "colshell::admin", table, "Dropped table");
        Ok(())
    }

    /// Recreate a table empty, keeping its schema. `progress` receives one
    /// message per step.
    pub fn truncate<F>(&self, table: &str, mut progress: F) -> Result<()>
    where
        F: FnMut(&str),
    {
        let descriptor = self.client.table_descriptor(table)?;
        progress(&format!(
            "Truncating '{}' table (it may take a while):",
            table
        ));
        progress(" - Disabling table...");
        self.disable(table)?;
        progress(" - Dropping table...");
        self.drop(table)?;
        progress(" - Creating table...");
        self.client.create_table(descriptor)?;
        info!(target: "colshell::admin", table, "Truncated table");
        Ok(())
    }

    /// Change the schema of a table.
    pub fn alter(&self, table: &str, options: &AlterOptions) -> Result<()> {
        match options {
            AlterOptions::DeleteFamily(family) => {
                self.client.delete_column(table, family)?;
                info!(target: "colshell::admin", table, family = %family, "Deleted column family");
            }
            AlterOptions::TableAttributes(changes) => {
                let mut descriptor = self.client.table_descriptor(table)?;
                changes.apply(&mut descriptor.attributes);
                self.client.modify_table(table, descriptor)?;
                info!(target: "colshell::admin", table, "Modified table attributes");
            }
            AlterOptions::UpsertFamily(settings) => {
                let descriptor = self.client.table_descriptor(table)?;
                let family = settings.to_descriptor();
                if descriptor.family(&settings.name).is_some() {
                    self.client.modify_column(table, family)?;
                    info!(target: "colshell::admin", table, family = %settings.name, "Modified column family");
                } else {
                    self.client.add_column(table, family)?;
                    info!(target: "colshell::admin", table, family = %settings.name, "Added column family");
                }
            }
        }
        Ok(())
    }

    /// Enable a table. Returns `false` when it already was.
    pub fn enable(&self, table: &str) -> Result<bool> {
        if self.client.is_table_enabled(table)? {
            debug!(target: "colshell::admin", table, "Table already enabled");
            return Ok(false);
        }
        self.client.enable_table(table)?;
        info!(target: "colshell::admin", table, "Enabled table");
        Ok(true)
    }

    /// Disable a table. Returns `false` when it already was.
    pub fn disable(&self, table: &str) -> Result<bool> {
        if !self.client.is_table_enabled(table)? {
            debug!(target: "colshell::admin", table, "Table already disabled");
            return Ok(false);
        }
        self.client.disable_table(table)?;
        info!(target: "colshell::admin", table, "Disabled table");
        Ok(true)
    }

    // ==================== Regions ====================

    /// Flush a table or region.
    pub fn flush(&self, target: &str) -> Result<()> {
        self.client.flush(target)
    }

    /// Minor-compact a table or region.
    pub fn compact(&self, target: &str) -> Result<()> {
        self.client.compact(target)
    }

    /// Major-compact a table or region.
    pub fn major_compact(&self, target: &str) -> Result<()> {
        self.client.major_compact(target)
    }

    /// Split a table or region.
    pub fn split(&self, target: &str) -> Result<()> {
        self.client.split(target)
    }

    /// Close a region, optionally naming the server expected to host it.
    pub fn close_region(&self, region: &str, server: Option<&str>) -> Result<()> {
        self.client.close_region(region, server)?;
        info!(target: "colshell::admin", region, "Closed region");
        Ok(())
    }

    /// Bring an offline region back online.
    pub fn enable_region(&self, region: &str) -> Result<()> {
        self.client.set_region_online(region, true)
    }

    /// Take a region offline.
    pub fn disable_region(&self, region: &str) -> Result<()> {
        self.client.set_region_online(region, false)
    }

    // ==================== Status ====================

    /// Cluster status report, one line per entry.
    pub fn status(&self, level: StatusLevel) -> Result<Vec<String>> {
        let status = self.client.cluster_status()?;
        Ok(format_status(&status, level))
    }
}

/// Render a status snapshot at the given level.
pub fn format_status(status: &ClusterStatus, level: StatusLevel) -> Vec<String> {
    let mut lines = Vec::new();
    match level {
        StatusLevel::Summary => lines.push(format!(
            "{} servers, {} dead, {:.4} average load",
            status.servers.len(),
            status.dead_servers.len(),
            status.average_load()
        )),
        StatusLevel::Simple => {
            lines.push(format!("{} live servers", status.servers.len()));
            for server in &status.servers {
                lines.push(format!("    {} {}", server.address(), server.start_code));
                lines.push(format!("        {}", server.load));
            }
            push_dead_servers(status, &mut lines);
            lines.push(format!(
                "Aggregate load: {}, regions: {}",
                status.request_count(),
                status.region_count()
            ));
        }
        StatusLevel::Detailed => {
            lines.push(format!("version {}", status.version));
            lines.push(format!(
                "{} regionsInTransition",
                status.regions_in_transition.len()
            ));
            for region in &status.regions_in_transition {
                lines.push(format!("    {}", region));
            }
            lines.push(format!("{} live servers", status.servers.len()));
            for server in &status.servers {
                lines.push(format!("    {} {}", server.address(), server.start_code));
                lines.push(format!("        {}", server.load));
                for region in &server.load.regions {
                    lines.push(format!("        {}", region.name));
                    lines.push(format!("            {}", region));
                }
            }
            push_dead_servers(status, &mut lines);
        }
    }
    lines
}

fn push_dead_servers(status: &ClusterStatus, lines: &mut Vec<String>) {
    lines.push(format!("{} dead servers", status.dead_servers.len()));
    for name in &status.dead_servers {
        lines.push(format!("    {}", name));
    }
}
