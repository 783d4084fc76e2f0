//! Column specifier properties.

use colshell::{ColumnSpec, Error};
use proptest::prelude::*;

proptest! {
    #[test]
    fn bare_family_has_no_qualifier(family in "[a-zA-Z0-9_\\-\\.]{1,16}") {
        let spec = ColumnSpec::parse_str(&family).unwrap();
        prop_assert_eq!(spec.family(), family.as_bytes());
        prop_assert!(spec.qualifier().is_none());
    }

    #[test]
    fn family_and_qualifier_split_on_first_colon(
        family in "[a-z0-9_]{1,12}",
        qualifier in "[a-z0-9_:]{1,12}",
    ) {
        let spec = ColumnSpec::parse_str(&format!("{}:{}", family, qualifier)).unwrap();
        prop_assert_eq!(spec.family(), family.as_bytes());
        prop_assert_eq!(spec.qualifier(), Some(qualifier.as_bytes()));
    }

    #[test]
    fn trailing_colon_is_bare_family(family in "[a-z0-9_]{1,12}") {
        prop_assert_eq!(
            ColumnSpec::parse_str(&format!("{}:", family)).unwrap(),
            ColumnSpec::parse_str(&family).unwrap()
        );
    }

    #[test]
    fn binary_specifiers_parse(family in proptest::collection::vec(any::<u8>().prop_filter("no colon", |b| *b != b':'), 1..8)) {
        let spec = ColumnSpec::parse(&family).unwrap();
        prop_assert_eq!(spec.family(), &family[..]);
    }
}

#[test]
fn empty_specifier_is_malformed() {
    assert!(matches!(
        ColumnSpec::parse_str(""),
        Err(Error::MalformedColumnSpecifier { .. })
    ));
    assert!(matches!(
        ColumnSpec::parse_str(":q"),
        Err(Error::MalformedColumnSpecifier { .. })
    ));
}
