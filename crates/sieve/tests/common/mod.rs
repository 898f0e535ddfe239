//! Shared fixtures: a row type and a SQLite table holding the same rows.

#![allow(dead_code)]

use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection};
use sieve::{Collation, Conditions, Dialect, Number, Record, Records, SelectQuery, SqlParam, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: i64,
    pub name: Option<String>,
    pub value: Option<i64>,
}

impl Row {
    pub fn new(id: i64, name: Option<&str>, value: Option<i64>) -> Self {
        Row {
            id,
            name: name.map(String::from),
            value,
        }
    }
}

impl Record for Row {
    fn field_value(&self, field: &str) -> Value<'_> {
        match field {
            "id" => Value::Number(Number::I64(self.id)),
            "name" => self.name.as_deref().map_or(Value::Null, Value::Text),
            "value" => self
                .value
                .map_or(Value::Null, |v| Value::Number(Number::I64(v))),
            _ => Value::Null,
        }
    }
}

/// small/1, big/10, BIG/100 and a row of nulls.
pub fn reference_rows() -> Vec<Row> {
    vec![
        Row::new(1, Some("small"), Some(1)),
        Row::new(2, Some("big"), Some(10)),
        Row::new(3, Some("BIG"), Some(100)),
        Row::new(4, None, None),
    ]
}

/// `regexp(pattern, text)`, the function SQLite calls for `text REGEXP pattern`.
fn register_regexp(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let pattern: String = ctx.get(0)?;
            let text = match ctx.get_raw(1) {
                ValueRef::Null => return Ok(None),
                ValueRef::Integer(i) => i.to_string(),
                ValueRef::Real(f) => f.to_string(),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    String::from_utf8_lossy(bytes).into_owned()
                }
            };
            let regex =
                Regex::new(&pattern).map_err(|e| rusqlite::Error::UserFunctionError(Box::new(e)))?;
            Ok(Some(regex.is_match(&text)))
        },
    )
}

/// An in-memory database with `table1` populated from `rows`.
pub fn database(rows: &[Row]) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    register_regexp(&conn).unwrap();
    conn.execute(
        "CREATE TABLE table1 (id INTEGER PRIMARY KEY, name TEXT, value INTEGER)",
        [],
    )
    .unwrap();
    for row in rows {
        conn.execute(
            "INSERT INTO table1 (id, name, value) VALUES (?1, ?2, ?3)",
            params![row.id, row.name, row.value],
        )
        .unwrap();
    }
    conn
}

fn bind(param: &SqlParam) -> SqliteValue {
    match param {
        SqlParam::Null => SqliteValue::Null,
        SqlParam::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        SqlParam::Integer(i) => SqliteValue::Integer(*i),
        SqlParam::Real(f) => SqliteValue::Real(*f),
        SqlParam::Text(s) => SqliteValue::Text(s.clone()),
    }
}

/// Runs `query` and returns the selected ids in id order.
pub fn query_ids(conn: &Connection, query: &SelectQuery) -> Vec<i64> {
    let statement = query.to_statement();
    let mut stmt = conn
        .prepare(&statement.sql)
        .unwrap_or_else(|e| panic!("{e}: {}", statement.sql));
    let ids = stmt
        .query_map(params_from_iter(statement.params.iter().map(bind)), |row| {
            row.get::<_, i64>(0)
        })
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    ids
}

pub fn sqlite_dialect(collation: Collation) -> Dialect {
    Dialect::sqlite()
        .with_regex(true)
        .with_collation(collation)
}

pub fn base_query(collation: Collation) -> SelectQuery {
    SelectQuery::new("table1", sqlite_dialect(collation))
        .select(["id"])
        .order_asc("id")
}

/// Ids selected from `conn` for `conditions`.
pub fn sqlite_ids(
    conn: &Connection,
    conditions: &Conditions,
    collation: Collation,
    negate: bool,
) -> sieve::Result<Vec<i64>> {
    let query = sieve::filter(base_query(collation), conditions, negate)?;
    Ok(query_ids(conn, &query))
}

/// Ids kept by the in-memory evaluator for `conditions`.
pub fn memory_ids(
    rows: &[Row],
    conditions: &Conditions,
    collation: Collation,
    negate: bool,
) -> sieve::Result<Vec<i64>> {
    let records = Records::new(rows).collation(collation);
    Ok(sieve::filter(records, conditions, negate)?
        .into_iter()
        .map(|row| row.id)
        .collect())
}
