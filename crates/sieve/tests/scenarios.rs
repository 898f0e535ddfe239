//! Reference scenarios run against both targets.
//!
//! Every scenario filters the same four rows in memory and through SQLite and
//! expects the same ids from both.

mod common;

use common::{database, memory_ids, reference_rows, sqlite_ids};
use sieve::{
    any_of, between, contains, ends_with, gt, gte, ilike, insensitive, iregex, is_empty,
    is_not_empty, is_not_null, is_null, like, lt, lte, neq, neq_any, not_like, regex,
    starts_with, Collation, Conditions, Scalar, SieveError,
};

const SMALL: i64 = 1;
const BIG: i64 = 2;
const BIG2: i64 = 3;
const BAD: i64 = 4;

fn expect_with(collation: Collation, conditions: Conditions, negate: bool, expected: &[i64]) {
    let rows = reference_rows();
    let conn = database(&rows);

    let memory = memory_ids(&rows, &conditions, collation, negate).unwrap();
    assert_eq!(memory, expected, "in memory: {conditions:?}");

    let sql = sqlite_ids(&conn, &conditions, collation, negate).unwrap();
    assert_eq!(sql, expected, "sqlite: {conditions:?}");
}

fn expect(conditions: Conditions, expected: &[i64]) {
    expect_with(Collation::Binary, conditions, false, expected);
}

fn on(field: &str, condition: impl Into<sieve::Condition>) -> Conditions {
    Conditions::new().with(field, condition)
}

// ============================================================================
// Numeric comparisons
// ============================================================================

#[test]
fn numeric_bounds() {
    expect(on("value", gt(10)), &[BIG2]);
    expect(on("value", gte(10)), &[BIG, BIG2]);
    expect(on("value", lt(10)), &[SMALL]);
    expect(on("value", lte(10)), &[SMALL, BIG]);
}

#[test]
fn numeric_ranges() {
    expect(on("value", 5..=100), &[BIG, BIG2]);
    expect(on("value", 5..100), &[BIG]);
    expect(on("value", between(100, 5)), &[]);
}

#[test]
fn numeric_null() {
    expect(on("value", None::<i64>), &[BAD]);
    expect(on("value", is_null()), &[BAD]);
    expect(on("value", is_not_null()), &[SMALL, BIG, BIG2]);
}

// ============================================================================
// String comparisons
// ============================================================================

#[test]
fn string_bounds_are_binary() {
    expect(on("name", gt("big")), &[SMALL]);
    expect(on("name", gte("small")), &[SMALL]);
    expect(on("name", lt("small")), &[BIG, BIG2]);
    expect(on("name", lte("big")), &[BIG, BIG2]);
}

#[test]
fn string_ranges() {
    expect(on("name", "big".."small"), &[BIG]);
    expect(on("name", "big"..="small"), &[SMALL, BIG]);

    expect_with(Collation::NoCase, on("name", "big".."small"), false, &[BIG, BIG2]);
    expect_with(
        Collation::NoCase,
        on("name", "big"..="small"),
        false,
        &[SMALL, BIG, BIG2],
    );
}

#[test]
fn string_null() {
    expect(on("name", None::<&str>), &[BAD]);
}

#[test]
fn insensitive_equality() {
    expect(on("name", insensitive("Big")), &[BIG, BIG2]);
}

#[test]
fn like_family_case_sensitive() {
    expect(on("name", ilike("%big%")), &[BIG, BIG2]);
    expect(on("name", like("%big%")), &[BIG]);
    expect(on("name", not_like("%small%")), &[BIG, BIG2]);
    expect(on("name", starts_with("b")), &[BIG]);
    expect(on("name", ends_with("g")), &[BIG]);
    expect(on("name", contains("i")), &[BIG]);
}

#[test]
fn like_family_nocase() {
    let nocase = |conditions, expected: &[i64]| {
        expect_with(Collation::NoCase, conditions, false, expected)
    };
    nocase(on("name", like("%big%")), &[BIG, BIG2]);
    nocase(on("name", starts_with("b")), &[BIG, BIG2]);
    nocase(on("name", ends_with("g")), &[BIG, BIG2]);
    nocase(on("name", contains("i")), &[BIG, BIG2]);
    nocase(on("name", not_like("%BIG%")), &[SMALL]);
}

#[test]
fn emptiness() {
    expect(on("name", is_empty()), &[BAD]);
    expect(on("name", is_not_empty()), &[SMALL, BIG, BIG2]);
    expect(on("name", neq("big")), &[SMALL, BIG2, BAD]);
    expect(on("name", any_of(["big", "small"])), &[SMALL, BIG]);
}

#[test]
fn mixed_kind_membership_under_nocase() {
    let mixed = || vec![Scalar::from("BIG"), Scalar::from(5)];
    expect_with(Collation::NoCase, on("name", any_of(mixed())), false, &[BIG, BIG2]);
    expect_with(Collation::NoCase, on("name", neq_any(mixed())), false, &[SMALL, BAD]);
    expect_with(Collation::Binary, on("name", any_of(mixed())), false, &[BIG2]);
}

#[test]
fn nan_operands_are_rejected_on_both_targets() {
    let rows = reference_rows();
    let conn = database(&rows);
    let conditions = on("value", neq_any([f64::NAN]));

    let err = memory_ids(&rows, &conditions, Collation::Binary, false).unwrap_err();
    assert!(matches!(err, SieveError::InvalidCondition { .. }));
    let err = sqlite_ids(&conn, &conditions, Collation::Binary, false).unwrap_err();
    assert!(matches!(err, SieveError::InvalidCondition { .. }));
}

// ============================================================================
// Regular expressions
// ============================================================================

#[test]
fn regexes() {
    expect(on("name", regex("^bi.*")), &[BIG]);
    expect(on("name", regex("^Bi.*")), &[]);
    expect(on("name", iregex("^Bi.*")), &[BIG, BIG2]);
    expect(on("value", regex("^1")), &[SMALL, BIG, BIG2]);
}

#[test]
fn regex_shorthand() {
    let re = ::regex::Regex::new("^bi.*").unwrap();
    expect(on("name", re), &[BIG]);
}

#[test]
fn regex_without_support_is_rejected() {
    let query = sieve::SelectQuery::new("table1", sieve::Dialect::sqlite());
    let err = sieve::filter(query, &on("name", regex("^bi")), false).unwrap_err();
    assert!(matches!(err, SieveError::UnsupportedOperation { .. }));
}

// ============================================================================
// Compound expressions
// ============================================================================

#[test]
fn compound_ilike_case() {
    let conditions = Conditions::new()
        .with("name", ilike("%big%"))
        .with("value", lte(10));
    expect(conditions, &[BIG]);
}

#[test]
fn negated_compound_keeps_every_failing_row() {
    let conditions = Conditions::new()
        .with("name", ilike("%small%"))
        .with("value", gte(10));
    expect_with(Collation::Binary, conditions.clone(), false, &[]);
    expect_with(Collation::Binary, conditions, true, &[SMALL, BIG, BIG2, BAD]);
}

#[test]
fn negation_keeps_nulls() {
    expect_with(Collation::Binary, on("value", gte(10)), true, &[SMALL, BAD]);
    expect_with(Collation::Binary, on("name", like("%big%")), true, &[SMALL, BIG2, BAD]);
}

#[test]
fn empty_conditions() {
    expect(Conditions::new(), &[SMALL, BIG, BIG2, BAD]);
    expect_with(Collation::Binary, Conditions::new(), true, &[]);
}
