//! Option normalization seen through commands.

use colshell_core::{Arg, Error};

use super::{s, Harness};
use crate::{FormatEvent, Outcome};

fn seeded() -> Harness {
    let mut h = Harness::new();
    h.ok("create", vec![s("t1"), s("x"), s("y")]);
    h.ok("put", vec![s("t1"), s("r1"), s("x:a"), s("1")]);
    h.ok("put", vec![s("t1"), s("r1"), s("y:b"), s("2")]);
    h
}

#[test]
fn test_columns_wins_over_column() {
    let mut h = seeded();
    h.ok(
        "get",
        vec![
            s("t1"),
            s("r1"),
            Arg::dict([("COLUMN", s("x")), ("COLUMNS", s("y"))]),
        ],
    );
    let rows = h.out.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "y:b");
}

#[test]
fn test_column_list_accepts_arrays() {
    let mut h = seeded();
    h.ok(
        "get",
        vec![
            s("t1"),
            s("r1"),
            Arg::dict([("COLUMN", Arg::List(vec![s("x:a"), s("y")]))]),
        ],
    );
    assert_eq!(h.out.rows().len(), 2);

    let outcome = h.run(
        "get",
        vec![
            s("t1"),
            s("r1"),
            Arg::dict([("COLUMN", Arg::List(vec![s("x"), Arg::Int(1)]))]),
        ],
    );
    assert!(matches!(
        outcome,
        Outcome::UserError(Error::InvalidArgumentType { .. })
    ));
}

#[test]
fn test_numeric_strings_are_accepted() {
    let mut h = seeded();
    h.ok(
        "scan",
        vec![s("t1"), Arg::dict([("LIMIT", s("1")), ("CACHE_BLOCKS", s("false"))])],
    );
    assert_eq!(h.out.last_footer(), Some(1));

    let outcome = h.run("scan", vec![s("t1"), Arg::dict([("LIMIT", s("many"))])]);
    match outcome {
        Outcome::UserError(Error::InvalidArgumentType { argument, .. }) => {
            assert_eq!(argument, "LIMIT")
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_bad_filter_reports_expression() {
    let mut h = seeded();
    let outcome = h.run(
        "scan",
        vec![s("t1"), Arg::dict([("FILTER", s("RowFilter(=, 'r')"))])],
    );
    assert!(matches!(
        outcome,
        Outcome::UserError(Error::InvalidArgumentType { .. })
    ));
    match &h.out.events()[0] {
        FormatEvent::Error { message, .. } => assert!(message.contains("RowFilter")),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_family_dictionary_validation() {
    let mut h = Harness::new();
    let outcome = h.run(
        "create",
        vec![s("t1"), Arg::dict([("VERSIONS", Arg::Int(2))])],
    );
    assert!(matches!(
        outcome,
        Outcome::UserError(Error::InvalidArgumentType { .. })
    ));

    let outcome = h.run(
        "create",
        vec![s("t1"), Arg::dict([("NAME", s("x")), ("COLOUR", s("red"))])],
    );
    assert!(matches!(
        outcome,
        Outcome::UserError(Error::InvalidArgumentType { .. })
    ));

    let outcome = h.run(
        "create",
        vec![s("t1"), Arg::dict([("NAME", s("x")), ("COMPRESSION", s("SNAPPY"))])],
    );
    assert!(outcome.is_failure());

    h.ok(
        "create",
        vec![
            s("t1"),
            Arg::List(vec![s("x:"), Arg::dict([("NAME", s("y")), ("IN_MEMORY", s("true"))])]),
        ],
    );
    h.ok("describe", vec![s("t1")]);
    let description = &h.out.rows()[0][0];
    assert!(description.contains("NAME => 'x'"));
    assert!(description.contains("IN_MEMORY => 'true'"));
}

mod normalization {
    use colshell_core::{Arg, OptionMap};
    use proptest::prelude::*;

    use crate::GetOptions;

    fn map(pairs: Vec<(&str, Arg)>) -> OptionMap {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    proptest! {
        #[test]
        fn columns_keep_order_and_family(
            families in proptest::collection::vec("[a-z][a-z0-9_]{0,8}", 1..6),
            qualified in any::<bool>(),
        ) {
            let specs: Vec<Arg> = families
                .iter()
                .map(|f| Arg::from(if qualified { format!("{}:q", f) } else { f.clone() }))
                .collect();
            let options =
                GetOptions::from_options(Some(&map(vec![("COLUMNS", Arg::List(specs))]))).unwrap();
            prop_assert_eq!(options.columns.len(), families.len());
            for (spec, family) in options.columns.iter().zip(&families) {
                prop_assert_eq!(spec.family(), family.as_bytes());
                prop_assert_eq!(spec.qualifier().is_some(), qualified);
            }
            prop_assert_eq!(options.versions, 1);
        }

        #[test]
        fn versions_and_timestamp_pass_through(versions in 1i64..1000, ts in 0i64..i64::MAX) {
            let options = GetOptions::from_options(Some(&map(vec![
                ("TIMESTAMP", Arg::Int(ts)),
                ("VERSIONS", Arg::Int(versions)),
            ])))
            .unwrap();
            prop_assert!(options.columns.is_empty());
            prop_assert_eq!(options.timestamp, Some(ts as u64));
            prop_assert_eq!(options.versions as i64, versions);
        }

        #[test]
        fn non_positive_versions_are_rejected(versions in i64::MIN..1) {
            let result = GetOptions::from_options(Some(&map(vec![
                ("COLUMN", Arg::from("x")),
                ("VERSIONS", Arg::Int(versions)),
            ])));
            prop_assert!(result.is_err());
        }
    }
}
