//! In-process column-family store for colshell
//!
//! This crate implements the store client contract without a cluster:
//! - MemStore: tables, regions and catalog tables behind a `parking_lot::RwLock`
//! - VersionChain: newest-first cell versions capped by the family schema
//! - Clock: strictly increasing millisecond timestamps
//! - ClusterLayout: simulated region servers reported by `status`
//! - CallJournal: record of client calls, used by tests as a spy
//!
//! The shell binary runs against a `MemStore`; so do the executor and
//! integration tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod clock;
pub mod cluster;
pub mod journal;
pub mod scanner;
pub mod store;
pub mod version_chain;

mod table;

pub use clock::Clock;
pub use cluster::{ClusterLayout, ServerSpec, DEFAULT_REGIONSERVER_PORT};
pub use journal::{CallJournal, ClientCall};
pub use scanner::MemScanner;
pub use store::MemStore;
pub use version_chain::{CellVersion, VersionChain};
