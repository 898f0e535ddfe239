//! Sieve - hash-style conditions evaluated in memory or translated to SQL.
//!
//! A [`Conditions`] map pairs field names with [`Condition`] values built by
//! small constructor functions ([`gt`], [`ilike`], [`is_not_empty`], ...). The
//! same map can then be applied to two kinds of collection:
//!
//! - resident records implementing [`Record`], evaluated by [`Predicate`]
//! - a lazy [`SelectQuery`], which receives a predicate [`Fragment`] in the
//!   store's own grammar and stays unexecuted
//!
//! Both targets select the same elements for the same data, including null
//! fields and negated conjunctions.
//!
//! # Quick Start
//!
//! ```rust
//! use sieve::{filter, ilike, gte, Conditions, Dialect, Number, Record, SelectQuery, Value};
//!
//! struct Row {
//!     name: Option<String>,
//!     value: Option<i64>,
//! }
//!
//! impl Record for Row {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => self.name.as_deref().map_or(Value::Null, Value::Text),
//!             "value" => self.value.map_or(Value::Null, |v| Value::Number(Number::I64(v))),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! let rows = vec![
//!     Row { name: Some("small".into()), value: Some(1) },
//!     Row { name: Some("big".into()), value: Some(10) },
//!     Row { name: Some("BIG".into()), value: Some(100) },
//!     Row { name: None, value: None },
//! ];
//!
//! let conditions = Conditions::new()
//!     .with("name", ilike("%big%"))
//!     .with("value", gte(50));
//!
//! let kept = filter(&rows, &conditions, false).unwrap();
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0].name.as_deref(), Some("BIG"));
//!
//! let rest = filter(&rows, &conditions, true).unwrap();
//! assert_eq!(rest.len(), 3);
//!
//! let query = filter(SelectQuery::new("rows", Dialect::postgres()), &conditions, false).unwrap();
//! assert_eq!(
//!     query.to_string(),
//!     r#"SELECT * FROM "rows" WHERE "name" ILIKE $1 AND "value" >= $2"#
//! );
//! ```
//!
//! # Derive
//!
//! With the `derive` feature, `#[derive(Record)]` generates the field
//! accessor from `#[sieve(...)]` attributes.

mod builders;
mod condition;
mod error;
mod filter;
mod memory;
mod op;
mod pattern;
mod record;
mod value;

pub mod sql;

pub use builders::*;
pub use condition::{Condition, Conditions};
pub use error::{Result, SieveError};
pub use filter::{filter, Collection, Filterable, Filtered};
pub use memory::{Predicate, Records};
pub use op::{CmpOp, PatternMode};
pub use pattern::escape_like;
pub use record::{Record, RecordTimestamp};
pub use sql::{Backend, Dialect, Dir, Fragment, OrderBy, SelectQuery, SqlParam, Statement};
pub use value::{Collation, Number, Scalar, Timestamp, Value};

#[cfg(feature = "derive")]
pub use sieve_macros::Record;
