//! Field access for in-memory records.
//!
//! The [`Record`] trait is implemented by `#[derive(Record)]` from the
//! `sieve-macros` crate, or by hand.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{Timestamp, Value};

/// A record whose fields can be read by name.
///
/// # Derive Usage
///
/// ```ignore
/// use sieve::Record;
///
/// #[derive(sieve_macros::Record)]
/// struct Row {
///     #[sieve(Text)]
///     name: Option<String>,
///     #[sieve(Number)]
///     value: Option<i64>,
/// }
///
/// assert_eq!(Row::NAME, "name");
/// ```
///
/// # Manual Implementation
///
/// ```
/// use sieve::{Number, Record, Value};
///
/// struct Row {
///     name: Option<String>,
///     value: i64,
/// }
///
/// impl Record for Row {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => self.name.as_deref().map_or(Value::Null, Value::Text),
///             "value" => Value::Number(Number::I64(self.value)),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of `field`, or [`Value::Null`] if the field is null
    /// or unknown.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Accessor function compatible with [`Predicate::filter`].
    ///
    /// [`Predicate::filter`]: crate::Predicate::filter
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

/// Converts host time types to a [`Timestamp`].
///
/// Used by `#[derive(Record)]` for fields marked `#[sieve(Timestamp)]`.
pub trait RecordTimestamp {
    fn record_timestamp(&self) -> Timestamp;
}

impl RecordTimestamp for i64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl RecordTimestamp for u64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl RecordTimestamp for Timestamp {
    fn record_timestamp(&self) -> Timestamp {
        *self
    }
}

impl RecordTimestamp for SystemTime {
    fn record_timestamp(&self) -> Timestamp {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => Timestamp(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => {
                Timestamp(i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms))
            }
        }
    }
}
