//! Table lifecycle through the admin commands.

use std::sync::Arc;

use colshell::{Arg, Error, Outcome, StoreClient, Table};

use crate::common::{dict, s, TestShell};

fn user_error(outcome: Outcome) -> Error {
    match outcome {
        Outcome::UserError(err) => err,
        other => panic!("expected a user error, got {:?}", other),
    }
}

#[test]
fn created_families_are_listed_with_trailing_colons() {
    let mut t = TestShell::new();
    t.ok("create", &[s("t"), s("a"), dict([("NAME", s("b"))])]);

    let client: Arc<dyn StoreClient> = t.store.clone();
    let table = Table::open(client, "t").unwrap();
    assert_eq!(table.families(), vec!["a:", "b:"]);
}

#[test]
fn drop_needs_an_existing_disabled_table() {
    let mut t = TestShell::new();
    assert!(matches!(
        user_error(t.run("drop", &[s("nope")])),
        Error::TableNotFound { .. }
    ));

    t.ok("create", &[s("t1"), s("x")]);
    assert!(matches!(
        user_error(t.run("drop", &[s("t1")])),
        Error::TableStillEnabled { .. }
    ));

    t.ok("disable", &[s("t1")]);
    t.ok("drop", &[s("t1")]);
    t.ok("exists", &[s("t1")]);
    assert_eq!(t.rows(), vec![vec!["false".to_string()]]);
}

#[test]
fn enabling_an_enabled_table_is_a_no_op() {
    let mut t = TestShell::new();
    t.ok("create", &[s("t1"), s("x")]);
    t.store.journal().clear();

    t.ok("enable", &[s("t1")]);
    assert_eq!(t.store.journal().count("enable_table"), 0);
}

#[test]
fn create_validates_families_before_calling_the_store() {
    let mut t = TestShell::new();
    assert!(matches!(
        user_error(t.run("create", &[s("t1")])),
        Error::MissingColumnFamily { .. }
    ));
    assert!(matches!(
        user_error(t.run("create", &[s("t1"), dict([("VERSIONS", Arg::Int(1))])])),
        Error::InvalidArgumentType { .. }
    ));
    assert_eq!(t.store.journal().count("create_table"), 0);
}

#[test]
fn unknown_commands_keep_the_session_alive() {
    let mut t = TestShell::new();
    assert!(matches!(
        user_error(t.run("frobnicate", &[])),
        Error::UnknownCommand { .. }
    ));
    t.ok("create", &[s("t1"), s("x")]);
    t.ok("list", &[]);
    assert_eq!(t.rows(), vec![vec!["t1".to_string()]]);
}
