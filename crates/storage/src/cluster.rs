//! Simulated region servers.

use serde::{Deserialize, Serialize};

/// Default region server RPC port.
pub const DEFAULT_REGIONSERVER_PORT: u16 = 60020;

/// One simulated region server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    /// Host name
    pub hostname: String,
    /// RPC port
    pub port: u16,
    /// Heap ceiling reported in status, in MB
    pub max_heap_mb: u32,
}

impl ServerSpec {
    /// Server with a default heap.
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            max_heap_mb: 1000,
        }
    }

    /// `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// Servers a [`MemStore`](crate::MemStore) pretends to run on.
///
/// Regions are assigned round-robin over the live servers. With no live
/// servers, regions stay unassigned and data operations fail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClusterLayout {
    /// Live servers
    pub servers: Vec<ServerSpec>,
    /// Names of dead servers, reported as-is
    pub dead_servers: Vec<String>,
}

impl ClusterLayout {
    /// One server on `localhost`.
    pub fn single() -> Self {
        Self {
            servers: vec![ServerSpec::new("localhost", DEFAULT_REGIONSERVER_PORT)],
            dead_servers: Vec::new(),
        }
    }

    /// `n` servers named `rs1`..`rsN`.
    pub fn with_servers(n: usize) -> Self {
        Self {
            servers: (1..=n)
                .map(|i| ServerSpec::new(format!("rs{}", i), DEFAULT_REGIONSERVER_PORT))
                .collect(),
            dead_servers: Vec::new(),
        }
    }

    /// No servers at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style: add a dead server.
    pub fn with_dead_server(mut self, name: impl Into<String>) -> Self {
        self.dead_servers.push(name.into());
        self
    }

    /// Index of the server at `host:port`.
    pub fn find(&self, address: &str) -> Option<usize> {
        self.servers.iter().position(|s| s.address() == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts() {
        assert_eq!(ClusterLayout::single().servers[0].address(), "localhost:60020");
        assert!(ClusterLayout::empty().servers.is_empty());

        let layout = ClusterLayout::with_servers(3).with_dead_server("rs9:60020");
        assert_eq!(layout.servers.len(), 3);
        assert_eq!(layout.find("rs2:60020"), Some(1));
        assert_eq!(layout.find("rs9:60020"), None);
        assert_eq!(layout.dead_servers, vec!["rs9:60020"]);
    }
}
