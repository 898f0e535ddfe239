//! In-memory evaluation of conditions.
//!
//! [`Predicate::compile`] turns a [`Conditions`] map into a predicate over a
//! single record; [`Predicate::filter`] applies it to a slice, keeping the
//! original relative order.
//!
//! Null handling follows value semantics rather than SQL's three-valued
//! logic: `Literal(Null)` matches null fields, `NotEqual` and `In` treat null
//! as an ordinary member, and every ordered, pattern, case-insensitive and
//! regex test is false for a null field.

use std::cmp::Ordering;

use regex::Regex;
use tracing::debug;

use crate::condition::{build_regex, Condition, Conditions};
use crate::error::{Result, SieveError};
use crate::op::{CmpOp, PatternMode};
use crate::pattern::like_regex;
use crate::record::Record;
use crate::value::{compare, equals, same_value, Collation, Mismatch, Scalar, Value};

#[derive(Debug, Clone)]
enum Test {
    Equals(Scalar),
    Compare(CmpOp, Scalar),
    NotIn(Vec<Scalar>),
    In(Vec<Scalar>),
    Range {
        low: Scalar,
        high: Scalar,
        inclusive_high: bool,
    },
    Pattern {
        regex: Regex,
        negated: bool,
    },
    Folded(Scalar),
    Regex(Regex),
}

#[derive(Debug, Clone)]
struct FieldTest {
    field: String,
    test: Test,
}

impl FieldTest {
    fn compile(field: &str, condition: &Condition, collation: Collation) -> Result<Self> {
        // Regex sources are checked by building them below.
        if !matches!(condition, Condition::Regex { .. }) {
            condition.validate(field)?;
        }
        let test = match condition {
            Condition::Literal(value) => Test::Equals(value.clone()),
            Condition::Bound { op, operand } => Test::Compare(*op, operand.clone()),
            Condition::NotEqual(set) => Test::NotIn(set.clone()),
            Condition::In(set) => Test::In(set.clone()),
            Condition::Range {
                low,
                high,
                inclusive_high,
            } => Test::Range {
                low: low.clone(),
                high: high.clone(),
                inclusive_high: *inclusive_high,
            },
            Condition::Pattern { template, mode } => {
                let case_insensitive =
                    matches!(mode, PatternMode::ILike) || collation.is_nocase();
                let regex = like_regex(template, case_insensitive).map_err(|e| {
                    SieveError::invalid(field, format!("invalid pattern '{template}': {e}"))
                })?;
                Test::Pattern {
                    regex,
                    negated: mode.is_negated(),
                }
            }
            Condition::CaseInsensitive(value) => Test::Folded(value.clone()),
            Condition::Regex {
                source,
                case_insensitive,
            } => Test::Regex(build_regex(field, source, *case_insensitive)?),
        };
        Ok(FieldTest {
            field: field.to_string(),
            test,
        })
    }

    fn mismatch(&self, m: Mismatch) -> SieveError {
        SieveError::TypeMismatch {
            field: self.field.clone(),
            expected: m.expected,
            actual: m.actual,
        }
    }

    fn eval(&self, value: &Value<'_>, collation: Collation) -> Result<bool> {
        match &self.test {
            Test::Equals(expected) => {
                equals(value, &expected.as_value(), collation).map_err(|m| self.mismatch(m))
            }
            Test::Compare(op, operand) => Ok(compare(value, &operand.as_value(), collation)
                .map_err(|m| self.mismatch(m))?
                .is_some_and(|ordering| op.eval_ordering(ordering))),
            Test::NotIn(set) => Ok(!set
                .iter()
                .any(|member| same_value(value, &member.as_value(), collation))),
            Test::In(set) => Ok(set
                .iter()
                .any(|member| same_value(value, &member.as_value(), collation))),
            Test::Range {
                low,
                high,
                inclusive_high,
            } => {
                let above_low = compare(value, &low.as_value(), collation)
                    .map_err(|m| self.mismatch(m))?
                    .is_some_and(|o| o != Ordering::Less);
                if !above_low {
                    return Ok(false);
                }
                Ok(compare(value, &high.as_value(), collation)
                    .map_err(|m| self.mismatch(m))?
                    .is_some_and(|o| {
                        o == Ordering::Less || (*inclusive_high && o == Ordering::Equal)
                    }))
            }
            Test::Pattern { regex, negated } => match value {
                Value::Null => Ok(false),
                Value::Text(s) => Ok(regex.is_match(s) != *negated),
                other => Err(self.mismatch(Mismatch {
                    expected: "text",
                    actual: other.kind_name(),
                })),
            },
            Test::Folded(expected) => equals(value, &expected.as_value(), Collation::NoCase)
                .map_err(|m| self.mismatch(m)),
            Test::Regex(regex) => Ok(value.to_text().is_some_and(|text| regex.is_match(&text))),
        }
    }
}

/// A compiled conjunction of field tests.
///
/// # Example
///
/// ```
/// use sieve::{gte, Collation, Conditions, Number, Predicate, Value};
///
/// let values = vec![1i64, 10, 100];
/// let conditions = Conditions::new().with("value", gte(10));
/// let predicate = Predicate::compile(&conditions, Collation::Binary).unwrap();
///
/// fn accessor<'a>(v: &'a i64, _field: &str) -> Value<'a> {
///     Value::Number(Number::I64(*v))
/// }
///
/// let kept = predicate.filter(&values, accessor, false).unwrap();
/// assert_eq!(kept, [&10, &100]);
/// ```
#[derive(Debug, Clone)]
pub struct Predicate {
    tests: Vec<FieldTest>,
    collation: Collation,
}

impl Predicate {
    /// Validates and compiles a conditions map.
    pub fn compile(conditions: &Conditions, collation: Collation) -> Result<Self> {
        let tests = conditions
            .iter()
            .map(|(field, condition)| FieldTest::compile(field, condition, collation))
            .collect::<Result<Vec<_>>>()?;
        debug!(fields = tests.len(), ?collation, "compiled in-memory predicate");
        Ok(Predicate { tests, collation })
    }

    pub fn collation(&self) -> Collation {
        self.collation
    }

    /// Returns `true` if every field test holds for `item`.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> Result<bool>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.all_hold(item, accessor)
    }

    /// Returns `true` if at least one field test fails for `item`.
    ///
    /// This is the OR of the inverted field tests, equal to NOT of
    /// [`matches`](Self::matches) because every test is two-valued.
    pub fn matches_negated<T, F>(&self, item: &T, accessor: F) -> Result<bool>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        Ok(!self.all_hold(item, accessor)?)
    }

    // Every test runs even after one fails, so a type mismatch surfaces no
    // matter where its field sits in the map.
    fn all_hold<T, F>(&self, item: &T, accessor: F) -> Result<bool>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let mut holds = true;
        for test in &self.tests {
            holds &= test.eval(&accessor(item, &test.field), self.collation)?;
        }
        Ok(holds)
    }

    fn test<T, F>(&self, item: &T, accessor: F, negate: bool) -> Result<bool>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        if negate {
            self.matches_negated(item, accessor)
        } else {
            self.matches(item, accessor)
        }
    }

    /// Filters a slice, returning references to matching items in order.
    ///
    /// An evaluation error on any item aborts the whole call.
    pub fn filter<'a, T, F>(
        &self,
        items: &'a [T],
        accessor: F,
        negate: bool,
    ) -> Result<Vec<&'a T>>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut results = Vec::new();
        for item in items {
            if self.test(item, &accessor, negate)? {
                results.push(item);
            }
        }
        Ok(results)
    }

    /// Filters and clones matching items.
    pub fn filter_cloned<T, F>(&self, items: &[T], accessor: F, negate: bool) -> Result<Vec<T>>
    where
        T: Clone,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        Ok(self
            .filter(items, accessor, negate)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Counts the matching items.
    pub fn count<T, F>(&self, items: &[T], accessor: F, negate: bool) -> Result<usize>
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let mut count = 0;
        for item in items {
            if self.test(item, &accessor, negate)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// A resident sequence of records, the in-memory filter target.
#[derive(Debug)]
pub struct Records<'a, T> {
    items: &'a [T],
    collation: Collation,
}

impl<T> Clone for Records<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Records<'_, T> {}

impl<'a, T> Records<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Records {
            items,
            collation: Collation::Binary,
        }
    }

    /// Sets how text is compared.
    pub fn collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn items(&self) -> &'a [T] {
        self.items
    }
}

impl<'a, T: Record> Records<'a, T> {
    /// Returns the records matching `conditions` (or, when `negate` is set,
    /// the records failing at least one of them) in their original order.
    pub fn filter(self, conditions: &Conditions, negate: bool) -> Result<Vec<&'a T>> {
        let predicate = Predicate::compile(conditions, self.collation)?;
        let matched = predicate.filter(self.items, T::accessor, negate)?;
        debug!(
            records = self.items.len(),
            matched = matched.len(),
            negate,
            "filtered resident records"
        );
        Ok(matched)
    }
}

impl<'a, T> From<&'a [T]> for Records<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Records::new(items)
    }
}

impl<'a, T> From<&'a Vec<T>> for Records<'a, T> {
    fn from(items: &'a Vec<T>) -> Self {
        Records::new(items)
    }
}
