//! Cluster status snapshot returned by the store client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Load report of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLoad {
    /// Region name
    pub name: String,
    /// Number of stores (one per family)
    pub stores: u32,
    /// Number of store files on disk
    pub storefiles: u32,
    /// Size of the store files, in MB
    pub storefile_size_mb: u32,
    /// Size of the memstore, in MB
    pub memstore_size_mb: u32,
}

impl fmt::Display for RegionLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stores={}, storefiles={}, storefileSizeMB={}, memstoreSizeMB={}",
            self.stores, self.storefiles, self.storefile_size_mb, self.memstore_size_mb
        )
    }
}

/// Load report of one region server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerLoad {
    /// Requests served since the last report
    pub requests: u64,
    /// Heap in use, in MB
    pub used_heap_mb: u32,
    /// Maximum heap, in MB
    pub max_heap_mb: u32,
    /// Per-region breakdown
    pub regions: Vec<RegionLoad>,
}

impl ServerLoad {
    /// Number of regions served.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl fmt::Display for ServerLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "requests={}, regions={}, usedHeap={}, maxHeap={}",
            self.requests,
            self.region_count(),
            self.used_heap_mb,
            self.max_heap_mb
        )
    }
}

/// A live region server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Host name
    pub hostname: String,
    /// RPC port
    pub port: u16,
    /// Start code distinguishing restarts of the same address
    pub start_code: u64,
    /// Current load
    pub load: ServerLoad,
}

impl ServerInfo {
    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// A region that is moving between servers or states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionState {
    /// Region name
    pub region: String,
    /// State label, e.g. `OFFLINE`, `PENDING_OPEN`
    pub state: String,
}

impl fmt::Display for RegionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} state={}", self.region, self.state)
    }
}

/// Snapshot of the whole cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    /// Store version string
    pub version: String,
    /// Live servers
    pub servers: Vec<ServerInfo>,
    /// Names of dead servers
    pub dead_servers: Vec<String>,
    /// Regions in transition
    pub regions_in_transition: Vec<RegionState>,
}

impl ClusterStatus {
    /// Total regions served by live servers.
    pub fn region_count(&self) -> usize {
        self.servers.iter().map(|s| s.load.region_count()).sum()
    }

    /// Total requests across live servers.
    pub fn request_count(&self) -> u64 {
        self.servers.iter().map(|s| s.load.requests).sum()
    }

    /// Average regions per live server; `0.0` for an empty cluster.
    pub fn average_load(&self) -> f64 {
        if self.servers.is_empty() {
            return 0.0;
        }
        self.region_count() as f64 / self.servers.len() as f64
    }
}
