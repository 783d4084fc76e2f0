//! Integration tests for MemStore
//!
//! These tests drive MemStore only through the `StoreClient` trait:
//! - Concurrent writers and readers
//! - Scans against a reference model
//! - TTL expiry and major compaction
//! - Catalog consistency across table lifecycle

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use colshell_core::client::RowScanner;
use colshell_core::{
    ColumnSpec, FamilyDescriptor, GetRequest, PutRequest, ScanRequest, StoreClient,
    TableDescriptor, META_TABLE_NAME,
};
use colshell_storage::{ClusterLayout, MemStore};
use proptest::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

fn create(store: &dyn StoreClient, table: &str, families: &[FamilyDescriptor]) {
    let mut descriptor = TableDescriptor::new(table);
    for family in families {
        descriptor.put_family(family.clone());
    }
    store.create_table(descriptor).unwrap();
}

fn put(store: &dyn StoreClient, table: &str, row: &[u8], column: &str, value: &[u8]) {
    let spec = ColumnSpec::parse_str(column).unwrap();
    store
        .put(
            table,
            PutRequest {
                row: row.to_vec(),
                family: spec.family().to_vec(),
                qualifier: spec.cell_qualifier().to_vec(),
                timestamp: None,
                value: value.to_vec(),
            },
        )
        .unwrap();
}

fn rows(scanner: RowScanner<'_>) -> Vec<Vec<u8>> {
    scanner.map(|r| r.unwrap().row).collect()
}

// ============================================================================
// Concurrency
// ============================================================================

mod concurrency {
    use super::*;

    #[test]
    fn test_concurrent_writers_all_land() {
        let store = Arc::new(MemStore::new());
        create(store.as_ref(), "t1", &[FamilyDescriptor::new("x")]);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        let row = format!("row-{:02}-{:03}", t, i);
                        put(store.as_ref(), "t1", row.as_bytes(), "x:q", b"v");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let scanned = rows(store.scan("t1", ScanRequest::default()).unwrap());
        assert_eq!(scanned.len(), 400);
    }

    #[test]
    fn test_concurrent_puts_to_one_cell_keep_distinct_versions() {
        let store = Arc::new(MemStore::new());
        create(
            store.as_ref(),
            "t1",
            &[FamilyDescriptor::new("x").with_versions(100)],
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..10 {
                        put(store.as_ref(), "t1", b"r", "x:q", b"v");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut request = GetRequest::row(b"r".to_vec());
        request.max_versions = 100;
        let result = store.get("t1", &request).unwrap();
        assert_eq!(result.cells.len(), 40);
    }

    #[test]
    fn test_scan_survives_concurrent_writes() {
        let store = Arc::new(MemStore::new());
        create(store.as_ref(), "t1", &[FamilyDescriptor::new("x")]);
        for i in 0..100 {
            put(store.as_ref(), "t1", format!("r{:03}", i).as_bytes(), "x:q", b"v");
        }

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 100..200 {
                    put(store.as_ref(), "t1", format!("r{:03}", i).as_bytes(), "x:q", b"v");
                }
            })
        };
        let scanned = rows(store.scan("t1", ScanRequest::default()).unwrap());
        writer.join().unwrap();

        assert!(scanned.len() >= 100);
        assert!(scanned.windows(2).all(|w| w[0] < w[1]));
    }
}

// ============================================================================
// Expiry
// ============================================================================

mod expiry {
    use super::*;

    #[test]
    fn test_expired_cells_hidden_and_compacted_away() {
        let store = MemStore::new();
        let mut short = FamilyDescriptor::new("s");
        short.ttl = 1;
        create(&store, "t1", &[short, FamilyDescriptor::new("x")]);

        // Far in the past relative to a one second TTL
        store
            .put(
                "t1",
                PutRequest {
                    row: b"r1".to_vec(),
                    family: b"s".to_vec(),
                    qualifier: b"q".to_vec(),
                    timestamp: Some(1_000),
                    value: b"old".to_vec(),
                },
            )
            .unwrap();
        put(&store, "t1", b"r1", "x:q", b"kept");

        let result = store.get("t1", &GetRequest::row(b"r1".to_vec())).unwrap();
        assert_eq!(result.cells.len(), 1);
        assert_eq!(result.cells[0].family, b"x".to_vec());

        store.flush("t1").unwrap();
        store.major_compact("t1").unwrap();
        let result = store.get("t1", &GetRequest::row(b"r1".to_vec())).unwrap();
        assert_eq!(result.cells.len(), 1);
    }
}

// ============================================================================
// Catalog
// ============================================================================

mod catalog {
    use super::*;

    #[test]
    fn test_meta_tracks_tables() {
        let store = MemStore::new();
        create(&store, "a", &[FamilyDescriptor::new("x")]);
        create(&store, "b", &[FamilyDescriptor::new("x")]);

        let meta = rows(store.scan(META_TABLE_NAME, ScanRequest::default()).unwrap());
        assert_eq!(meta.len(), 2);

        store.disable_table("a").unwrap();
        store.delete_table("a").unwrap();
        let meta = rows(store.scan(META_TABLE_NAME, ScanRequest::default()).unwrap());
        assert_eq!(meta.len(), 1);
        assert!(meta[0].starts_with(b"b,"));
    }

    #[test]
    fn test_regions_spread_over_servers() {
        let store = MemStore::with_layout(ClusterLayout::with_servers(2));
        create(&store, "t1", &[FamilyDescriptor::new("x")]);
        create(&store, "t2", &[FamilyDescriptor::new("x")]);

        let status = store.cluster_status().unwrap();
        assert_eq!(status.servers.len(), 2);
        assert_eq!(status.region_count(), 4);
        assert_eq!(status.average_load(), 2.0);
    }
}

// ============================================================================
// Reference model
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn scan_matches_ordered_model(
        keys in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..6), 0..40),
        start in prop::collection::vec(any::<u8>(), 0..3),
        limit in 0usize..50,
    ) {
        let store = MemStore::new();
        create(&store, "t", &[FamilyDescriptor::new("f")]);
        let mut model = BTreeMap::new();
        for key in &keys {
            put(&store, "t", key, "f:q", b"v");
            model.insert(key.clone(), ());
        }

        let expected: Vec<Vec<u8>> = model
            .range(start.clone()..)
            .map(|(k, _)| k.clone())
            .take(limit)
            .collect();
        let request = ScanRequest {
            start_row: start,
            ..Default::default()
        };
        let scanned: Vec<Vec<u8>> = store
            .scan("t", request)
            .unwrap()
            .take(limit)
            .map(|r| r.unwrap().row)
            .collect();
        prop_assert_eq!(scanned, expected);
    }
}
