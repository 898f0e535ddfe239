//! Runtime value types for field comparison.
//!
//! [`Value`] is what a record hands back for one of its fields; [`Scalar`] is
//! the owned operand a condition stores. Both share the same kinds: null,
//! booleans, numbers, text and timestamps.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use sieve::{Number, Value};
///
/// struct Row {
///     name: Option<String>,
///     value: i64,
/// }
///
/// fn accessor<'a>(row: &'a Row, field: &str) -> Value<'a> {
///     match field {
///         "name" => row.name.as_deref().map_or(Value::Null, Value::Text),
///         "value" => Value::Number(Number::I64(row.value)),
///         _ => Value::Null,
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Field is null, absent, or unknown.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value (borrowed).
    Text(&'a str),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the name of this value's kind, as used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text representation of a non-null value.
    ///
    /// Text is returned as-is; other kinds use their `Display` form.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(Cow::Borrowed(s)),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Timestamp(t) => Some(Cow::Owned(t.to_string())),
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Comparisons between different representations are exact for mixed
/// signed/unsigned integers and go through `f64` when a float is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types. NaN is unordered.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::I64(a), Number::U64(b)) => Some(if a < 0 {
                Ordering::Less
            } else {
                (a as u64).cmp(&b)
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch, saturating at
    /// the representable range.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owned operand stored in a condition.
///
/// Unlike [`Value`], which borrows from the record, `Scalar` owns its data so
/// conditions can outlive the records they are evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Timestamp(Timestamp),
}

impl Scalar {
    /// Borrows this scalar as a [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(*n),
            Scalar::Text(s) => Value::Text(s),
            Scalar::Timestamp(t) => Value::Timestamp(*t),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// A float NaN, which equals and orders against nothing.
    pub fn is_nan(&self) -> bool {
        matches!(self, Scalar::Number(Number::F64(n)) if n.is_nan())
    }

    pub fn kind_name(&self) -> &'static str {
        self.as_value().kind_name()
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&String> for Scalar {
    fn from(s: &String) -> Self {
        Scalar::Text(s.clone())
    }
}

impl From<Number> for Scalar {
    fn from(n: Number) -> Self {
        Scalar::Number(n)
    }
}

impl From<Timestamp> for Scalar {
    fn from(t: Timestamp) -> Self {
        Scalar::Timestamp(t)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

macro_rules! scalar_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Scalar {
                fn from(n: $source) -> Self {
                    Scalar::Number(Number::from(n))
                }
            }
        )*
    };
}

scalar_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// How text is compared by an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    /// Case-sensitive, byte order.
    #[default]
    Binary,
    /// Case-folded before equality, ordering and pattern matching.
    NoCase,
}

impl Collation {
    pub fn is_nocase(self) -> bool {
        matches!(self, Collation::NoCase)
    }

    /// Applies this collation's case folding to a string.
    pub fn fold(self, s: &str) -> Cow<'_, str> {
        match self {
            Collation::Binary => Cow::Borrowed(s),
            Collation::NoCase => Cow::Owned(s.to_lowercase()),
        }
    }
}

/// Kinds of the two sides of a failed comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mismatch {
    pub expected: &'static str,
    pub actual: &'static str,
}

/// Orders a field value against an operand.
///
/// Null on either side is unordered (`Ok(None)`); non-null values of
/// different kinds cannot be ordered at all.
pub(crate) fn compare(
    field: &Value<'_>,
    operand: &Value<'_>,
    collation: Collation,
) -> Result<Option<Ordering>, Mismatch> {
    match (field, operand) {
        (Value::Null, _) | (_, Value::Null) => Ok(None),
        (Value::Number(a), Value::Number(b)) => Ok(a.compare(*b)),
        (Value::Text(a), Value::Text(b)) => Ok(Some(collation.fold(a).cmp(&collation.fold(b)))),
        (Value::Timestamp(a), Value::Timestamp(b)) => Ok(Some(a.cmp(b))),
        (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
        (a, b) => Err(Mismatch {
            expected: b.kind_name(),
            actual: a.kind_name(),
        }),
    }
}

/// Value equality where `null == null` holds.
pub(crate) fn equals(
    field: &Value<'_>,
    operand: &Value<'_>,
    collation: Collation,
) -> Result<bool, Mismatch> {
    match (field, operand) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Null, _) | (_, Value::Null) => Ok(false),
        _ => compare(field, operand, collation).map(|o| o == Some(Ordering::Equal)),
    }
}

/// Membership equality: values of different kinds are simply unequal.
pub(crate) fn same_value(field: &Value<'_>, member: &Value<'_>, collation: Collation) -> bool {
    equals(field, member, collation).unwrap_or(false)
}
