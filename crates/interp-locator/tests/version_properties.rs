use interp_locator::{compare_versions, sort_versions};
use proptest::prelude::*;
use std::cmp::Ordering;

/// Loosely formatted version strings: numeric, alphanumeric and empty
/// segments joined by dots.
fn version() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[0-9]{1,4}",
            "0[0-9]{1,2}",
            "[0-9]{1,2}[a-z]{1,3}[0-9]?",
            "[a-z]{1,4}",
            Just(String::new()),
        ],
        1..5,
    )
    .prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn test_antisymmetric(a in version(), b in version()) {
        prop_assert_eq!(compare_versions(&a, &b), compare_versions(&b, &a).reverse());
    }

    #[test]
    fn test_transitive(a in version(), b in version(), c in version()) {
        let ab = compare_versions(&a, &b);
        let bc = compare_versions(&b, &c);
        if ab != Ordering::Greater && bc != Ordering::Greater {
            prop_assert_ne!(compare_versions(&a, &c), Ordering::Greater);
        }
        if ab == Ordering::Equal && bc == Ordering::Equal {
            prop_assert_eq!(compare_versions(&a, &c), Ordering::Equal);
        }
    }

    #[test]
    fn test_equal_only_for_identical_strings(a in version(), b in version()) {
        prop_assert_eq!(compare_versions(&a, &b) == Ordering::Equal, a == b);
    }

    #[test]
    fn test_reflexive(a in version()) {
        prop_assert_eq!(compare_versions(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_numeric_segments_compare_by_value(x in 0u32..100_000, y in 0u32..100_000) {
        let a = format!("4.{x}.0");
        let b = format!("4.{y}.0");
        prop_assert_eq!(compare_versions(&a, &b), x.cmp(&y));
    }

    #[test]
    fn test_sort_is_deterministic(versions in prop::collection::vec(version(), 0..12)) {
        let mut versions = versions;
        let mut reversed: Vec<String> = versions.iter().rev().cloned().collect();
        sort_versions(&mut versions);
        sort_versions(&mut reversed);
        prop_assert_eq!(&versions, &reversed);
        for pair in versions.windows(2) {
            prop_assert_ne!(compare_versions(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn test_malformed_input_never_panics(a in "\\PC*", b in "\\PC*") {
        let _ = compare_versions(&a, &b);
    }
}
