//! Condition values and the field → condition map.
//!
//! A [`Condition`] describes how one field should be matched. A
//! [`Conditions`] map holds one condition per field; all of its entries are
//! conjoined by the evaluators.
//!
//! Bare values are lifted into conditions by `From` conversions, so a map can
//! mix wrapped and shorthand forms:
//!
//! ```
//! use sieve::{gte, Condition, Conditions};
//!
//! let conditions = Conditions::new()
//!     .with("value", gte(10))        // wrapped
//!     .with("kind", "big")           // Literal("big")
//!     .with("deleted_at", None::<i64>) // Literal(Null)
//!     .with("score", 5..100);        // Range, exclusive high
//!
//! assert_eq!(conditions.get("kind"), Some(&Condition::Literal("big".into())));
//! ```

use std::ops::{Range, RangeInclusive};

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SieveError};
use crate::op::{CmpOp, PatternMode};
use crate::value::{Number, Scalar, Timestamp};

/// How a single field should be matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact match. A `Null` payload means "is null".
    Literal(Scalar),
    /// Ordered comparison against an operand.
    Bound { op: CmpOp, operand: Scalar },
    /// Field equals none of the listed values (null included).
    NotEqual(Vec<Scalar>),
    /// Field equals one of the listed values (null included).
    In(Vec<Scalar>),
    /// `low <= v` and `v < high` (or `v <= high` when `inclusive_high`).
    Range {
        low: Scalar,
        high: Scalar,
        inclusive_high: bool,
    },
    /// LIKE-style template match.
    Pattern { template: String, mode: PatternMode },
    /// Equality ignoring case.
    CaseInsensitive(Scalar),
    /// Regular expression search over the field's text representation.
    Regex {
        source: String,
        case_insensitive: bool,
    },
}

impl Condition {
    /// Short name of this condition's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::Literal(_) => "literal",
            Condition::Bound { .. } => "bound",
            Condition::NotEqual(_) => "not_equal",
            Condition::In(_) => "in",
            Condition::Range { .. } => "range",
            Condition::Pattern { .. } => "pattern",
            Condition::CaseInsensitive(_) => "case_insensitive",
            Condition::Regex { .. } => "regex",
        }
    }

    /// Checks this condition's payload for `field`.
    pub fn validate(&self, field: &str) -> Result<()> {
        if self.has_nan_operand() {
            return Err(SieveError::invalid(field, "NaN operands are not allowed"));
        }
        match self {
            Condition::Bound { op, operand } if operand.is_null() => Err(SieveError::invalid(
                field,
                format!("{op} operand must be orderable, got null"),
            )),
            Condition::Range { low, high, .. } => {
                if low.is_null() || high.is_null() {
                    return Err(SieveError::invalid(field, "range endpoints must not be null"));
                }
                if low.kind_name() != high.kind_name() {
                    return Err(SieveError::invalid(
                        field,
                        format!(
                            "range endpoints must share a type, got {} and {}",
                            low.kind_name(),
                            high.kind_name()
                        ),
                    ));
                }
                Ok(())
            }
            Condition::Regex {
                source,
                case_insensitive,
            } => build_regex(field, source, *case_insensitive).map(|_| ()),
            _ => Ok(()),
        }
    }

    fn has_nan_operand(&self) -> bool {
        match self {
            Condition::Literal(value) | Condition::CaseInsensitive(value) => value.is_nan(),
            Condition::Bound { operand, .. } => operand.is_nan(),
            Condition::NotEqual(set) | Condition::In(set) => set.iter().any(Scalar::is_nan),
            Condition::Range { low, high, .. } => low.is_nan() || high.is_nan(),
            Condition::Pattern { .. } | Condition::Regex { .. } => false,
        }
    }
}

/// Compiles a regex condition's source, reporting failures against `field`.
pub(crate) fn build_regex(field: &str, source: &str, case_insensitive: bool) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| SieveError::invalid(field, format!("invalid regex: {e}")))
}

impl From<Scalar> for Condition {
    fn from(value: Scalar) -> Self {
        Condition::Literal(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Condition {
    fn from(value: Option<T>) -> Self {
        Condition::Literal(Scalar::from(value))
    }
}

impl<T: Into<Scalar>> From<Range<T>> for Condition {
    fn from(range: Range<T>) -> Self {
        Condition::Range {
            low: range.start.into(),
            high: range.end.into(),
            inclusive_high: false,
        }
    }
}

impl<T: Into<Scalar>> From<RangeInclusive<T>> for Condition {
    fn from(range: RangeInclusive<T>) -> Self {
        let (low, high) = range.into_inner();
        Condition::Range {
            low: low.into(),
            high: high.into(),
            inclusive_high: true,
        }
    }
}

impl From<regex::Regex> for Condition {
    fn from(regex: regex::Regex) -> Self {
        Condition::Regex {
            source: regex.as_str().to_string(),
            case_insensitive: false,
        }
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Condition {
    fn from(values: Vec<T>) -> Self {
        Condition::In(values.into_iter().map(Into::into).collect())
    }
}

macro_rules! literal_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Condition {
                fn from(value: $source) -> Self {
                    Condition::Literal(Scalar::from(value))
                }
            }
        )*
    };
}

literal_from!(
    bool, &str, String, &String, Number, Timestamp, i8, i16, i32, i64, isize, u8, u16, u32, u64,
    usize, f32, f64
);

/// Field → condition map, conjoined by the evaluators.
///
/// Entries keep insertion order so translated fragments read in the order
/// they were written; inserting a field twice replaces the earlier entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    entries: Vec<(String, Condition)>,
}

impl Conditions {
    /// Creates an empty map. An empty map matches every record.
    pub fn new() -> Self {
        Conditions::default()
    }

    /// Adds a condition, replacing any existing one for the same field.
    pub fn with(mut self, field: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.insert(field, condition);
        self
    }

    /// Inserts a condition, returning the one it replaced.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        condition: impl Into<Condition>,
    ) -> Option<Condition> {
        let field = field.into();
        let condition = condition.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => Some(std::mem::replace(existing, condition)),
            None => {
                self.entries.push((field, condition));
                None
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, condition)| condition)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.entries
            .iter()
            .map(|(field, condition)| (field.as_str(), condition))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates every entry, failing on the first invalid condition.
    pub fn validate(&self) -> Result<()> {
        self.iter()
            .try_for_each(|(field, condition)| condition.validate(field))
    }
}

impl<K, C> FromIterator<(K, C)> for Conditions
where
    K: Into<String>,
    C: Into<Condition>,
{
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (field, condition) in iter {
            conditions.insert(field, condition);
        }
        conditions
    }
}

/// Builds a [`Conditions`] map from `field => condition` pairs.
///
/// ```
/// use sieve::{conditions, ilike, lte};
///
/// let c = conditions! {
///     "name" => ilike("%big%"),
///     "value" => lte(10),
/// };
/// assert_eq!(c.len(), 2);
/// ```
#[macro_export]
macro_rules! conditions {
    () => {
        $crate::Conditions::new()
    };
    ($($field:expr => $condition:expr),+ $(,)?) => {
        $crate::Conditions::new()$(.with($field, $condition))+
    };
}
