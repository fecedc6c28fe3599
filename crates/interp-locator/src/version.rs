//! Version string ordering
//!
//! Versions are compared segment by segment on `.` boundaries. This is not a
//! semantic-version parser: it only needs to order the loosely formatted
//! version strings that installers write into the registry.
//!
//! Each segment is ranked as follows:
//!
//! - an empty segment sorts first;
//! - segments starting with digits come next, ordered by the numeric value
//!   of the leading digits (`9 < 10`), then by the remaining text
//!   (`0 < 0rc1`);
//! - segments not starting with a digit sort last, lexicographically.
//!
//! A version that runs out of segments is lower (`4.1 < 4.1.0`). Texts that
//! only differ in leading zeros (`01` vs `1`) are ordered by their raw text,
//! so two versions compare equal exactly when they are the same string.
//! The result is a total order and sorting is deterministic.

use std::cmp::Ordering;

/// Compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match compare_segments(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Sort version strings ascending.
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by(|a, b| compare_versions(a.as_ref(), b.as_ref()));
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment<'a> {
    Empty,
    Numeric {
        /// Leading digits with leading zeros removed
        digits: &'a str,
        suffix: &'a str,
    },
    Text,
}

fn classify(segment: &str) -> Segment<'_> {
    if segment.is_empty() {
        return Segment::Empty;
    }
    let digit_len = segment
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digit_len == 0 {
        return Segment::Text;
    }
    let (digits, suffix) = segment.split_at(digit_len);
    Segment::Numeric {
        digits: digits.trim_start_matches('0'),
        suffix,
    }
}

fn compare_segments(a: &str, b: &str) -> Ordering {
    match (classify(a), classify(b)) {
        (
            Segment::Numeric {
                digits: da,
                suffix: sa,
            },
            Segment::Numeric {
                digits: db,
                suffix: sb,
            },
        ) => da
            .len()
            .cmp(&db.len())
            .then_with(|| da.cmp(db))
            .then_with(|| sa.cmp(sb))
            .then_with(|| a.cmp(b)),
        (ca, cb) => ca.cmp(&cb).then_with(|| a.cmp(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("4.10.0", "4.9.0", Ordering::Greater)]
    #[case("4.10.1", "4.9.2", Ordering::Greater)]
    #[case("4.5.0", "4.6.1", Ordering::Less)]
    #[case("3.6.5", "3.6.5", Ordering::Equal)]
    #[case("4.1", "4.1.0", Ordering::Less)]
    #[case("4.1.0", "4.1", Ordering::Greater)]
    #[case("4.1.0rc1", "4.1.0", Ordering::Greater)]
    #[case("4.1.a", "4.1.1", Ordering::Greater)]
    #[case("4.1.b", "4.1.a", Ordering::Greater)]
    #[case("", "0", Ordering::Less)]
    #[case("1..2", "1.0.2", Ordering::Less)]
    #[case("01", "1", Ordering::Less)]
    #[case("3.6.99999999999999999999999", "3.6.100000000000000000000000", Ordering::Less)]
    fn test_compare(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_versions(a, b), expected);
        assert_eq!(compare_versions(b, a), expected.reverse());
    }

    #[test]
    fn test_sort_versions_numeric_not_lexicographic() {
        let mut versions = vec!["4.10.0", "4.9.0", "4.2.1", "4.9.10", "4.9.2"];
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["4.2.1", "4.9.0", "4.9.2", "4.9.10", "4.10.0"]);
    }

    #[test]
    fn test_sort_versions_owned_strings() {
        let mut versions = vec!["2.7".to_string(), "3.6".to_string(), "3.10".to_string()];
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["2.7", "3.6", "3.10"]);
    }
}
