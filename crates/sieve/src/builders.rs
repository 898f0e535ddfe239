//! Constructor functions for condition values.
//!
//! ```
//! use sieve::{contains, gt, is_not_null, Conditions};
//!
//! let conditions = Conditions::new()
//!     .with("value", gt(10))
//!     .with("name", contains("i"))
//!     .with("owner", is_not_null());
//! assert_eq!(conditions.len(), 3);
//! ```

use crate::condition::Condition;
use crate::op::{CmpOp, PatternMode};
use crate::pattern::escape_like;
use crate::value::{Number, Scalar, Timestamp};

/// Operand types with a natural ordering.
///
/// Bounds and ranges only accept these, which keeps null and other
/// unorderable operands out at compile time.
pub trait Orderable: Into<Scalar> {}

impl Orderable for &str {}
impl Orderable for String {}
impl Orderable for Number {}
impl Orderable for Timestamp {}
impl Orderable for bool {}
impl Orderable for i8 {}
impl Orderable for i16 {}
impl Orderable for i32 {}
impl Orderable for i64 {}
impl Orderable for isize {}
impl Orderable for u8 {}
impl Orderable for u16 {}
impl Orderable for u32 {}
impl Orderable for u64 {}
impl Orderable for usize {}
impl Orderable for f32 {}
impl Orderable for f64 {}

fn bound(op: CmpOp, operand: impl Orderable) -> Condition {
    Condition::Bound {
        op,
        operand: operand.into(),
    }
}

fn pattern(template: String, mode: PatternMode) -> Condition {
    Condition::Pattern { template, mode }
}

// numeric and other ordered values

pub fn gt(value: impl Orderable) -> Condition {
    bound(CmpOp::Gt, value)
}

pub fn lt(value: impl Orderable) -> Condition {
    bound(CmpOp::Lt, value)
}

pub fn gte(value: impl Orderable) -> Condition {
    bound(CmpOp::Gte, value)
}

pub fn lte(value: impl Orderable) -> Condition {
    bound(CmpOp::Lte, value)
}

/// `low <= v <= high`.
pub fn between<T: Orderable>(low: T, high: T) -> Condition {
    Condition::Range {
        low: low.into(),
        high: high.into(),
        inclusive_high: true,
    }
}

/// `low <= v < high`.
pub fn between_exclusive<T: Orderable>(low: T, high: T) -> Condition {
    Condition::Range {
        low: low.into(),
        high: high.into(),
        inclusive_high: false,
    }
}

/// Field is not equal to `value`. Null fields match unless `value` is null.
pub fn neq(value: impl Into<Scalar>) -> Condition {
    Condition::NotEqual(vec![value.into()])
}

/// Field is equal to none of `values`.
pub fn neq_any<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Condition {
    Condition::NotEqual(values.into_iter().map(Into::into).collect())
}

/// Field is equal to one of `values`.
pub fn any_of<T: Into<Scalar>>(values: impl IntoIterator<Item = T>) -> Condition {
    Condition::In(values.into_iter().map(Into::into).collect())
}

// null and emptiness

/// Null or the empty string.
///
/// This is a plain membership test, not the negation of [`is_not_empty`]'s
/// payload; a numeric field is only ever empty when null.
pub fn is_empty() -> Condition {
    Condition::In(vec![Scalar::Null, Scalar::Text(String::new())])
}

pub fn is_null() -> Condition {
    Condition::Literal(Scalar::Null)
}

pub fn is_not_null() -> Condition {
    Condition::NotEqual(vec![Scalar::Null])
}

pub fn is_not_empty() -> Condition {
    Condition::NotEqual(vec![Scalar::Null, Scalar::Text(String::new())])
}

// strings

/// Equality ignoring case.
pub fn insensitive(value: impl Into<Scalar>) -> Condition {
    Condition::CaseInsensitive(value.into())
}

/// Case-sensitive match against a LIKE template.
pub fn like(template: impl Into<String>) -> Condition {
    pattern(template.into(), PatternMode::Like)
}

/// Case-insensitive match against a LIKE template.
pub fn ilike(template: impl Into<String>) -> Condition {
    pattern(template.into(), PatternMode::ILike)
}

/// Negation of [`like`]. Null fields never match.
pub fn not_like(template: impl Into<String>) -> Condition {
    pattern(template.into(), PatternMode::NotLike)
}

pub fn starts_with(prefix: &str) -> Condition {
    pattern(format!("{}%", escape_like(prefix)), PatternMode::Like)
}

pub fn ends_with(suffix: &str) -> Condition {
    pattern(format!("%{}", escape_like(suffix)), PatternMode::Like)
}

pub fn contains(needle: &str) -> Condition {
    pattern(format!("%{}%", escape_like(needle)), PatternMode::Like)
}

// regular expressions

/// Case-sensitive regex search.
pub fn regex(source: impl Into<String>) -> Condition {
    Condition::Regex {
        source: source.into(),
        case_insensitive: false,
    }
}

/// Case-insensitive regex search.
pub fn iregex(source: impl Into<String>) -> Condition {
    Condition::Regex {
        source: source.into(),
        case_insensitive: true,
    }
}
