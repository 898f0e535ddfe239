//! The filtering entry point.
//!
//! [`filter`] accepts either kind of collection: resident records are
//! evaluated in memory, lazy queries receive a translated predicate. The
//! choice is made by the collection's type through [`Filterable`], or at run
//! time through the [`Collection`] enum when the kind is only known then.
//!
//! ```
//! use sieve::{filter, gte, Conditions, Dialect, Number, Record, SelectQuery, Value};
//!
//! struct Row(i64);
//!
//! impl Record for Row {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "value" => Value::Number(Number::I64(self.0)),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! let conditions = Conditions::new().with("value", gte(10));
//!
//! let rows = vec![Row(1), Row(10), Row(100)];
//! let kept = filter(&rows, &conditions, false).unwrap();
//! assert_eq!(kept.len(), 2);
//!
//! let query = filter(SelectQuery::new("rows", Dialect::sqlite()), &conditions, true).unwrap();
//! assert_eq!(query.to_string(), r#"SELECT * FROM "rows" WHERE ("value" >= ?1) IS NOT TRUE"#);
//! ```

use tracing::debug;

use crate::condition::Conditions;
use crate::error::Result;
use crate::memory::Records;
use crate::record::Record;
use crate::sql::SelectQuery;

mod sealed {
    pub trait Sealed {}
}

/// A collection that conditions can be applied to.
///
/// Implemented for resident records (`&[T]`, `&Vec<T>`, [`Records`]), lazy
/// queries ([`SelectQuery`]) and the run-time [`Collection`] wrapper. The
/// trait is sealed; other collection kinds are rejected at compile time.
pub trait Filterable: sealed::Sealed {
    /// What filtering produces: matching records, or a new query.
    type Output;

    /// Human-readable kind, used in diagnostics.
    fn kind(&self) -> &'static str;

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output>;
}

impl<T: Record> sealed::Sealed for Records<'_, T> {}

impl<'a, T: Record> Filterable for Records<'a, T> {
    type Output = Vec<&'a T>;

    fn kind(&self) -> &'static str {
        "records"
    }

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output> {
        self.filter(conditions, negate)
    }
}

impl<T: Record> sealed::Sealed for &[T] {}

impl<'a, T: Record> Filterable for &'a [T] {
    type Output = Vec<&'a T>;

    fn kind(&self) -> &'static str {
        "records"
    }

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output> {
        Records::new(self).filter(conditions, negate)
    }
}

impl<T: Record> sealed::Sealed for &Vec<T> {}

impl<'a, T: Record> Filterable for &'a Vec<T> {
    type Output = Vec<&'a T>;

    fn kind(&self) -> &'static str {
        "records"
    }

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output> {
        Records::new(self).filter(conditions, negate)
    }
}

impl sealed::Sealed for SelectQuery {}

impl Filterable for SelectQuery {
    type Output = SelectQuery;

    fn kind(&self) -> &'static str {
        "query"
    }

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output> {
        SelectQuery::filter(&self, conditions, negate)
    }
}

impl sealed::Sealed for &SelectQuery {}

impl Filterable for &SelectQuery {
    type Output = SelectQuery;

    fn kind(&self) -> &'static str {
        "query"
    }

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output> {
        SelectQuery::filter(self, conditions, negate)
    }
}

/// A collection whose kind is decided at run time.
#[derive(Debug, Clone)]
pub enum Collection<'a, T> {
    Records(Records<'a, T>),
    Query(SelectQuery),
}

impl<'a, T> From<Records<'a, T>> for Collection<'a, T> {
    fn from(records: Records<'a, T>) -> Self {
        Collection::Records(records)
    }
}

impl<'a, T> From<&'a [T]> for Collection<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Collection::Records(Records::new(items))
    }
}

impl<T> From<SelectQuery> for Collection<'_, T> {
    fn from(query: SelectQuery) -> Self {
        Collection::Query(query)
    }
}

/// The result of filtering a [`Collection`].
#[derive(Debug, Clone)]
pub enum Filtered<'a, T> {
    Records(Vec<&'a T>),
    Query(SelectQuery),
}

impl<'a, T> Filtered<'a, T> {
    pub fn into_records(self) -> Option<Vec<&'a T>> {
        match self {
            Filtered::Records(records) => Some(records),
            Filtered::Query(_) => None,
        }
    }

    pub fn into_query(self) -> Option<SelectQuery> {
        match self {
            Filtered::Query(query) => Some(query),
            Filtered::Records(_) => None,
        }
    }
}

impl<T: Record> sealed::Sealed for Collection<'_, T> {}

impl<'a, T: Record> Filterable for Collection<'a, T> {
    type Output = Filtered<'a, T>;

    fn kind(&self) -> &'static str {
        match self {
            Collection::Records(_) => "records",
            Collection::Query(_) => "query",
        }
    }

    fn apply(self, conditions: &Conditions, negate: bool) -> Result<Self::Output> {
        match self {
            Collection::Records(records) => {
                records.apply(conditions, negate).map(Filtered::Records)
            }
            Collection::Query(query) => query.apply(conditions, negate).map(Filtered::Query),
        }
    }
}

/// Applies `conditions` to `collection`.
///
/// Without `negate`, keeps the elements satisfying every condition. With
/// `negate`, keeps the elements failing at least one of them, so the two
/// calls partition the collection. Invalid conditions fail the whole call.
pub fn filter<C: Filterable>(
    collection: C,
    conditions: &Conditions,
    negate: bool,
) -> Result<C::Output> {
    debug!(
        collection = collection.kind(),
        fields = conditions.len(),
        negate,
        "applying conditions"
    );
    collection.apply(conditions, negate)
}
