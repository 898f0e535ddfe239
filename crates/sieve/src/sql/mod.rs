//! Lazy query objects and condition translation for SQL stores.
//!
//! A [`SelectQuery`] is an immutable description of a `SELECT`; filtering it
//! returns a new query with one more predicate fragment and never touches a
//! store. Rendering to a [`Statement`] happens only when the caller asks.
//!
//! ```
//! use sieve::{gte, ilike, Conditions, Dialect, SelectQuery, SqlParam};
//!
//! let query = SelectQuery::new("table1", Dialect::sqlite());
//! let conditions = Conditions::new()
//!     .with("name", ilike("%small%"))
//!     .with("value", gte(10));
//!
//! let filtered = query.filter(&conditions, false).unwrap();
//! let statement = filtered.to_statement();
//! assert_eq!(
//!     statement.sql,
//!     r#"SELECT * FROM "table1" WHERE "name" LIKE ?1 ESCAPE '\' AND "value" >= ?2"#
//! );
//! assert_eq!(statement.params[1], SqlParam::Integer(10));
//!
//! // The original query is unchanged.
//! assert!(query.fragments().is_empty());
//! ```

mod dialect;
mod fragment;
mod ordering;
mod translate;

use std::fmt;

use tracing::debug;

use crate::condition::Conditions;
use crate::error::Result;

pub use dialect::{Backend, Dialect};
pub use fragment::{Fragment, SqlParam, Statement};
pub use ordering::{Dir, OrderBy};
pub use translate::{translate, translate_field};

/// An unexecuted `SELECT` against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<String>,
    dialect: Dialect,
    fragments: Vec<Fragment>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
}

impl SelectQuery {
    /// `SELECT * FROM table`.
    pub fn new(table: impl Into<String>, dialect: Dialect) -> Self {
        SelectQuery {
            table: table.into(),
            columns: Vec::new(),
            dialect,
            fragments: Vec::new(),
            orderings: Vec::new(),
            limit: None,
        }
    }

    /// Restricts the selected columns.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    pub fn order_asc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Dir::Asc)
    }

    pub fn order_desc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Dir::Desc)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Predicate fragments, in the order they were added.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Returns a copy of this query with `fragment` conjoined to its predicate.
    pub fn where_fragment(&self, fragment: Fragment) -> SelectQuery {
        let mut next = self.clone();
        next.fragments.push(fragment);
        next
    }

    /// Returns a copy of this query restricted to rows matching `conditions`,
    /// or failing none of them when `negate` is set.
    pub fn filter(&self, conditions: &Conditions, negate: bool) -> Result<SelectQuery> {
        let fragment = translate(conditions, &self.dialect, negate)?;
        debug!(
            table = %self.table,
            dialect = self.dialect.name(),
            fields = conditions.len(),
            negate,
            "filtered select query"
        );
        Ok(match fragment {
            Some(fragment) => self.where_fragment(fragment),
            None => self.clone(),
        })
    }

    /// Renders the query and collects its parameters.
    pub fn to_statement(&self) -> Statement {
        let mut sql = String::from("SELECT ");
        let mut params = Vec::new();

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            let columns: Vec<String> = self
                .columns
                .iter()
                .map(|c| self.dialect.quote_ident(c))
                .collect();
            sql.push_str(&columns.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.dialect.quote_ident(&self.table));

        if !self.fragments.is_empty() {
            sql.push_str(" WHERE ");
            // each filter call is one conjunct; group them only when there are several
            let predicate = if self.fragments.len() == 1 {
                self.fragments[0].clone()
            } else {
                Fragment::join(self.fragments.iter().cloned().map(Fragment::group), " AND ")
            };
            predicate.render_into(&self.dialect, &mut sql, &mut params);
        }

        if !self.orderings.is_empty() {
            sql.push_str(" ORDER BY ");
            ordering::order_list(&self.orderings).render_into(&self.dialect, &mut sql, &mut params);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Statement { sql, params }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_statement().sql)
    }
}
