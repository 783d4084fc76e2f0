//! End-to-end shell tests
//!
//! Commands are run through the public dispatcher against the in-process
//! store, the way the binary runs them.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test shell
//! cargo test --test shell lifecycle::
//! ```

mod common;

mod column_spec;
mod data_plane;
mod lifecycle;
mod status;
