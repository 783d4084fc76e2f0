//! Session tests: lazy admin handle and per-command table handles.

use std::sync::Arc;

use colshell_core::{Error, ShellConfig, StoreClient};
use colshell_storage::MemStore;

use super::{s, Harness};
use crate::{Outcome, SessionState};

#[test]
fn test_admin_connects_once() {
    let mut h = Harness::new();
    assert!(!h.shell.session().has_admin());

    h.ok("create", vec![s("t1"), s("x")]);
    h.ok("list", vec![]);
    h.ok("describe", vec![s("t1")]);
    assert!(h.shell.session().has_admin());
    assert_eq!(h.store.journal().count("check_master"), 1);
}

#[test]
fn test_data_commands_do_not_build_admin() {
    let mut h = Harness::new();
    h.ok("create", vec![s("t1"), s("x")]);

    let store = h.store.clone();
    let mut session = SessionState::new(store.clone(), ShellConfig::default());
    let table = session.table("t1").unwrap();
    assert_eq!(table.name(), "t1");
    assert!(!session.has_admin());

    session.admin().unwrap();
    session.admin().unwrap();
    assert_eq!(store.journal().count("check_master"), 2);
}

#[test]
fn test_failed_connect_is_not_cached() {
    let mut h = Harness::new();
    h.store.set_available(false);
    let outcome = h.run("list", vec![]);
    assert!(matches!(outcome, Outcome::InternalError(Error::Client { .. })));
    assert!(!h.shell.session().has_admin());

    h.store.set_available(true);
    h.ok("list", vec![]);
    assert!(h.shell.session().has_admin());
}

#[test]
fn test_session_shares_client() {
    let store = Arc::new(MemStore::new());
    let session = SessionState::new(store.clone(), ShellConfig::default());
    assert_eq!(session.client().version(), store.version());
    assert!(!session.config().debug);
}
