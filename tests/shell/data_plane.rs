//! Data-plane scenarios: put, get, scan limits, deletes.

use colshell::{Arg, Error, Outcome};

use crate::common::{dict, s, TestShell};

fn shell_with_t1() -> TestShell {
    let mut t = TestShell::new();
    t.ok(
        "create",
        &[s("t1"), dict([("NAME", s("x")), ("VERSIONS", Arg::Int(5))]), s("y")],
    );
    t
}

#[test]
fn put_then_get_one_column() {
    let mut t = shell_with_t1();
    t.ok("put", &[s("t1"), s("r1"), s("x:a"), s("v1")]);
    t.ok("get", &[s("t1"), s("r1"), dict([("COLUMN", s("x:a"))])]);

    let rows = t.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "x:a");
    assert!(rows[0][1].ends_with(", value=v1"));
}

#[test]
fn scan_limit_returns_exactly_limit_rows() {
    let mut t = shell_with_t1();
    for i in 0..10 {
        t.ok("put", &[s("t1"), s(&format!("r{}", i)), s("x:a"), s("v")]);
    }
    t.ok("scan", &[s("t1"), dict([("LIMIT", Arg::Int(4))])]);
    assert_eq!(t.rows().len(), 4);
    assert_eq!(t.out.last_footer(), Some(4));

    t.ok("scan", &[s("t1")]);
    assert_eq!(t.out.last_footer(), Some(10));
}

#[test]
fn versions_are_kept_per_family() {
    let mut t = shell_with_t1();
    for ts in 1..=6 {
        t.ok(
            "put",
            &[s("t1"), s("r1"), s("x:a"), s(&format!("v{}", ts)), Arg::Int(ts)],
        );
        t.ok(
            "put",
            &[s("t1"), s("r1"), s("y:a"), s(&format!("v{}", ts)), Arg::Int(ts)],
        );
    }
    t.ok(
        "get",
        &[s("t1"), s("r1"), dict([("COLUMN", s("x:a")), ("VERSIONS", Arg::Int(10))])],
    );
    assert_eq!(t.rows().len(), 5);
    t.ok(
        "get",
        &[s("t1"), s("r1"), dict([("COLUMN", s("y:a")), ("VERSIONS", Arg::Int(10))])],
    );
    assert_eq!(t.rows().len(), 3);
}

#[test]
fn bare_and_trailing_colon_families_read_the_same() {
    let mut t = shell_with_t1();
    t.ok("put", &[s("t1"), s("r1"), s("x:a"), s("1")]);
    t.ok("put", &[s("t1"), s("r1"), s("x:b"), s("2")]);
    t.ok("get", &[s("t1"), s("r1"), dict([("COLUMN", s("x"))])]);
    let bare = t.rows();
    t.ok("get", &[s("t1"), s("r1"), dict([("COLUMN", s("x:"))])]);
    assert_eq!(t.rows(), bare);
    assert_eq!(bare.len(), 2);
}

#[test]
fn get_without_columns_or_timestamp_is_ambiguous() {
    let mut t = shell_with_t1();
    let outcome = t.run(
        "get",
        &[s("t1"), s("r1"), dict([("VERSIONS", Arg::Int(3))])],
    );
    assert!(matches!(
        outcome,
        Outcome::UserError(Error::AmbiguousArguments { .. })
    ));
}

#[test]
fn binary_row_keys_round_trip_through_display() {
    let mut t = shell_with_t1();
    t.ok(
        "put",
        &[s("t1"), Arg::Bytes(vec![0x00, 0xff, b'k']), s("x:a"), s("v")],
    );
    t.ok("scan", &[s("t1")]);
    assert_eq!(t.rows()[0][0], "\\x00\\xFFk");
}
