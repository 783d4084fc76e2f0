//! colshell - interactive admin shell for column-family data stores
//!
//! The shell wraps a store client behind two facades, an admin facade for
//! table and region lifecycle and a per-table data facade, and dispatches
//! commands typed at a prompt to them.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use colshell::{CaptureFormatter, Dispatcher, SessionState, ShellConfig};
//! use colshell_storage::MemStore;
//!
//! let session = SessionState::new(Arc::new(MemStore::new()), ShellConfig::default());
//! let mut shell = Dispatcher::new(session);
//! let mut out = CaptureFormatter::new();
//!
//! shell.execute("create", &["t1".into(), "x".into()], &mut out);
//! shell.execute("put", &["t1".into(), "r1".into(), "x:a".into(), "v1".into()], &mut out);
//! ```
//!
//! # Architecture
//!
//! Every command goes through the [`Dispatcher`], which looks it up in the
//! [`CommandRegistry`], runs it against the [`SessionState`] and renders the
//! result through a [`Formatter`]. Only the executor API is re-exported.

pub use colshell_executor::*;
