//! Multi-version cell storage.
//!
//! Each column of each row keeps a chain of `(timestamp, value)` versions,
//! newest first. Writes with an explicit timestamp may land anywhere in the
//! chain; a write at an existing timestamp replaces that version.

use std::collections::VecDeque;

/// One stored version of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVersion {
    /// Version timestamp in milliseconds
    pub timestamp: u64,
    /// Cell contents
    pub value: Vec<u8>,
}

/// Versions of one column, newest first.
#[derive(Debug, Clone, Default)]
pub struct VersionChain {
    versions: VecDeque<CellVersion>,
}

impl VersionChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            versions: VecDeque::with_capacity(4),
        }
    }

    /// Insert a version and keep at most `max_versions` of them.
    pub fn put(&mut self, timestamp: u64, value: Vec<u8>, max_versions: u32) {
        match self
            .versions
            .iter()
            .position(|v| v.timestamp <= timestamp)
        {
            Some(idx) if self.versions[idx].timestamp == timestamp => {
                self.versions[idx].value = value;
            }
            Some(idx) => self.versions.insert(idx, CellVersion { timestamp, value }),
            None => self.versions.push_back(CellVersion { timestamp, value }),
        }
        self.trim(max_versions);
    }

    /// Drop the oldest versions beyond `max_versions`.
    pub fn trim(&mut self, max_versions: u32) {
        let keep = max_versions.max(1) as usize;
        while self.versions.len() > keep {
            self.versions.pop_back();
        }
    }

    /// Newest version.
    #[inline]
    pub fn latest(&self) -> Option<&CellVersion> {
        self.versions.front()
    }

    /// Versions at or before `max_timestamp`, newest first.
    pub fn at_or_before(&self, max_timestamp: u64) -> impl Iterator<Item = &CellVersion> {
        self.versions
            .iter()
            .filter(move |v| v.timestamp <= max_timestamp)
    }

    /// Remove every version at or before `up_to`.
    pub fn remove_up_to(&mut self, up_to: u64) {
        self.versions.retain(|v| v.timestamp > up_to);
    }

    /// Remove exactly one version. Returns whether it existed.
    pub fn remove_version(&mut self, timestamp: u64) -> bool {
        match self.versions.iter().position(|v| v.timestamp == timestamp) {
            Some(idx) => {
                self.versions.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove the newest version. Returns whether one existed.
    pub fn remove_latest(&mut self) -> bool {
        self.versions.pop_front().is_some()
    }

    /// Remove versions older than `min_timestamp`.
    pub fn expire_before(&mut self, min_timestamp: u64) {
        self.versions.retain(|v| v.timestamp >= min_timestamp);
    }

    /// Number of versions stored
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Bytes held by all versions.
    pub fn byte_size(&self) -> u64 {
        self.versions.iter().map(|v| v.value.len() as u64 + 8).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamps(chain: &VersionChain) -> Vec<u64> {
        chain.at_or_before(u64::MAX).map(|v| v.timestamp).collect()
    }

    #[test]
    fn test_newest_first_and_trimmed() {
        let mut chain = VersionChain::new();
        for ts in 1..=5 {
            chain.put(ts, vec![ts as u8], 3);
        }
        assert_eq!(timestamps(&chain), vec![5, 4, 3]);
        assert_eq!(chain.latest().unwrap().value, vec![5]);
    }

    #[test]
    fn test_out_of_order_put() {
        let mut chain = VersionChain::new();
        chain.put(10, b"a".to_vec(), 5);
        chain.put(30, b"c".to_vec(), 5);
        chain.put(20, b"b".to_vec(), 5);
        assert_eq!(timestamps(&chain), vec![30, 20, 10]);
    }

    #[test]
    fn test_same_timestamp_replaces() {
        let mut chain = VersionChain::new();
        chain.put(10, b"a".to_vec(), 5);
        chain.put(10, b"b".to_vec(), 5);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.latest().unwrap().value, b"b".to_vec());
    }

    #[test]
    fn test_at_or_before() {
        let mut chain = VersionChain::new();
        for ts in [10, 20, 30] {
            chain.put(ts, vec![], 5);
        }
        let seen: Vec<u64> = chain.at_or_before(25).map(|v| v.timestamp).collect();
        assert_eq!(seen, vec![20, 10]);
    }

    #[test]
    fn test_removals() {
        let mut chain = VersionChain::new();
        for ts in [10, 20, 30, 40] {
            chain.put(ts, vec![], 5);
        }
        assert!(chain.remove_version(20));
        assert!(!chain.remove_version(20));
        assert!(chain.remove_latest());
        assert_eq!(timestamps(&chain), vec![30, 10]);
        chain.remove_up_to(30);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_expire_before() {
        let mut chain = VersionChain::new();
        for ts in [10, 20, 30] {
            chain.put(ts, vec![], 5);
        }
        chain.expire_before(20);
        assert_eq!(timestamps(&chain), vec![30, 20]);
    }
}
