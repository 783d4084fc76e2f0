//! # colshell executor
//!
//! The command layer of the colshell admin shell. It turns command names
//! and loosely typed arguments into calls on a [`StoreClient`] and renders
//! the results.
//!
//! - [`Dispatcher`]: looks commands up, runs them and reports failures
//! - [`CommandRegistry`] / [`ShellCommand`]: the named command set
//! - [`Admin`] / [`Table`]: admin and data-plane facades
//! - [`SessionState`]: client, configuration and the lazily built admin
//! - [`Output`] / [`Formatter`]: typed results and the output contract
//! - Option normalizers: [`GetOptions`], [`ScanOptions`],
//!   [`CreateOptions`], [`AlterOptions`]
//!
//! ## Quick Start
//!
//! ```text
//! use std::sync::Arc;
//! use colshell_executor::{CaptureFormatter, Dispatcher, SessionState};
//!
//! let session = SessionState::new(Arc::new(client), ShellConfig::default());
//! let mut shell = Dispatcher::new(session);
//! let mut out = CaptureFormatter::new();
//!
//! shell.execute("create", &["t1".into(), "x".into()], &mut out);
//! shell.execute("put", &["t1".into(), "r1".into(), "x:a".into(), "v1".into()], &mut out);
//! shell.execute("scan", &["t1".into()], &mut out);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod admin;
mod command;
mod dispatcher;
mod format;
mod handlers;
mod options;
mod output;
mod registry;
mod session;
mod table;

#[cfg(test)]
mod tests;

pub use admin::{format_status, Admin, StatusLevel};
pub use command::{Args, CommandContext, CommandGroup, ShellCommand};
pub use dispatcher::{Dispatcher, Outcome};
pub use format::{CaptureFormatter, FormatEvent, Formatter};
pub use options::{
    column_list, keys, parse_filter, AlterOptions, CreateOptions, FamilySettings, GetOptions,
    ScanOptions, TableAttributeChanges,
};
pub use output::Output;
pub use registry::CommandRegistry;
pub use session::SessionState;
pub use table::{Table, DEFAULT_COUNT_INTERVAL};

pub use colshell_core::{
    Arg, ColumnSpec, Error, OptionMap, Result, ShellConfig, StoreClient,
};
