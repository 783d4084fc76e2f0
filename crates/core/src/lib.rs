//! Core types and traits for colshell
//!
//! This crate defines the vocabulary shared by every layer of the shell:
//! - Error: the error taxonomy reported by commands
//! - ColumnSpec: `family[:qualifier]` column specifiers
//! - Arg / OptionMap: loosely typed arguments as typed at the prompt
//! - Descriptors: table and column family schema
//! - Requests: get/put/delete/scan/increment requests sent to the store
//! - Status: cluster status snapshot (servers, regions, load)
//! - StoreClient: the contract of the external data-store client
//! - ShellConfig: configuration loaded from `colshell.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bytes;
pub mod client;
pub mod column;
pub mod config;
pub mod error;
pub mod request;
pub mod status;
pub mod types;
pub mod value;

pub use bytes::{to_string_binary, truncate_chars};
pub use client::StoreClient;
pub use column::ColumnSpec;
pub use config::{ClientConfig, ShellConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use request::{
    DeleteRequest, DeleteScope, Filter, GetRequest, IncrementRequest, PutRequest, ScanRequest,
};
pub use status::{ClusterStatus, RegionLoad, RegionState, ServerInfo, ServerLoad};
pub use types::{
    Cell, Compression, FamilyDescriptor, RegionInfo, RowResult, TableAttributes, TableDescriptor,
    LATEST_TIMESTAMP, META_TABLE_NAME, ROOT_TABLE_NAME,
};
pub use value::{Arg, OptionMap};
