//! Predicate fragments in the store's native grammar.
//!
//! A [`Fragment`] keeps SQL text, identifiers and bound parameters apart
//! until it is rendered, so parameters are numbered across a whole query and
//! identifiers are quoted by the dialect that finally renders them.

use crate::sql::dialect::Dialect;
use crate::value::{Number, Scalar};

/// A parameter bound alongside the rendered SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&Scalar> for SqlParam {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Null => SqlParam::Null,
            Scalar::Bool(b) => SqlParam::Bool(*b),
            Scalar::Number(Number::I64(n)) => SqlParam::Integer(*n),
            Scalar::Number(Number::U64(n)) => match i64::try_from(*n) {
                Ok(n) => SqlParam::Integer(n),
                Err(_) => SqlParam::Real(*n as f64),
            },
            Scalar::Number(Number::F64(n)) => SqlParam::Real(*n),
            Scalar::Text(s) => SqlParam::Text(s.clone()),
            Scalar::Timestamp(t) => SqlParam::Integer(t.as_millis()),
        }
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(s: String) -> Self {
        SqlParam::Text(s)
    }
}

/// Rendered SQL plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Sql(String),
    Ident(String),
    Param(SqlParam),
}

/// A unit of predicate syntax appended to a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    parts: Vec<Part>,
}

impl Fragment {
    pub fn new() -> Self {
        Fragment::default()
    }

    /// Raw SQL. Never pass caller data here; bind it with [`param`](Self::param).
    pub fn sql(mut self, text: &str) -> Self {
        match self.parts.last_mut() {
            Some(Part::Sql(existing)) => existing.push_str(text),
            _ => self.parts.push(Part::Sql(text.to_string())),
        }
        self
    }

    /// An identifier, quoted at render time.
    pub fn ident(mut self, name: &str) -> Self {
        self.parts.push(Part::Ident(name.to_string()));
        self
    }

    /// A bound parameter.
    pub fn param(mut self, param: impl Into<SqlParam>) -> Self {
        self.parts.push(Part::Param(param.into()));
        self
    }

    /// Appends another fragment's parts.
    pub fn append(mut self, other: Fragment) -> Self {
        for part in other.parts {
            self = match part {
                Part::Sql(text) => self.sql(&text),
                part => {
                    self.parts.push(part);
                    self
                }
            };
        }
        self
    }

    /// Joins fragments with `separator`. Empty input yields an empty fragment.
    pub fn join(fragments: impl IntoIterator<Item = Fragment>, separator: &str) -> Fragment {
        let mut joined = Fragment::new();
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                joined = joined.sql(separator);
            }
            joined = joined.append(fragment);
        }
        joined
    }

    /// Wraps this fragment in parentheses.
    pub fn group(self) -> Fragment {
        Fragment::new().sql("(").append(self).sql(")")
    }

    /// `(self) IS NOT TRUE`: true when this fragment is false or null.
    pub fn is_not_true(self) -> Fragment {
        self.group().sql(" IS NOT TRUE")
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn params(&self) -> impl Iterator<Item = &SqlParam> {
        self.parts.iter().filter_map(|part| match part {
            Part::Param(param) => Some(param),
            _ => None,
        })
    }

    /// Renders into `sql`, numbering placeholders after those in `params`.
    pub(crate) fn render_into(
        &self,
        dialect: &Dialect,
        sql: &mut String,
        params: &mut Vec<SqlParam>,
    ) {
        for part in &self.parts {
            match part {
                Part::Sql(text) => sql.push_str(text),
                Part::Ident(name) => sql.push_str(&dialect.quote_ident(name)),
                Part::Param(param) => {
                    params.push(param.clone());
                    sql.push_str(&dialect.placeholder(params.len()));
                }
            }
        }
    }

    /// Renders this fragment on its own.
    pub fn render(&self, dialect: &Dialect) -> Statement {
        let mut sql = String::new();
        let mut params = Vec::new();
        self.render_into(dialect, &mut sql, &mut params);
        Statement { sql, params }
    }
}
