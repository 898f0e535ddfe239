//! Store dialects and their capabilities.

use serde::{Deserialize, Serialize};

use crate::value::Collation;

/// The store a query is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Postgres => "postgres",
        }
    }
}

/// Rendering rules and capabilities of a target store.
///
/// Dialects deserialize from configuration; omitted keys take their
/// defaults:
///
/// ```
/// use sieve::{Backend, Collation, Dialect};
///
/// let dialect: Dialect = serde_json::from_str(r#"{ "backend": "postgres" }"#).unwrap();
/// assert_eq!(dialect.backend, Backend::Postgres);
/// assert_eq!(dialect.collation, Collation::Binary);
/// assert!(dialect.supports_regex());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub backend: Backend,
    /// Whether regex conditions can be translated. `None` uses the backend's
    /// default: Postgres has native operators, SQLite only has `REGEXP` once
    /// the host registers a `regexp` function on the connection.
    pub regex: Option<bool>,
    /// How the store compares text.
    pub collation: Collation,
}

impl Dialect {
    pub fn sqlite() -> Self {
        Dialect {
            backend: Backend::Sqlite,
            ..Dialect::default()
        }
    }

    pub fn postgres() -> Self {
        Dialect {
            backend: Backend::Postgres,
            ..Dialect::default()
        }
    }

    /// Declares whether the connection can evaluate regexes.
    pub fn with_regex(mut self, supported: bool) -> Self {
        self.regex = Some(supported);
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    pub fn name(&self) -> &'static str {
        self.backend.as_str()
    }

    pub fn supports_regex(&self) -> bool {
        self.regex
            .unwrap_or(matches!(self.backend, Backend::Postgres))
    }

    /// Placeholder for the `index`-th (1-based) bound parameter.
    pub fn placeholder(&self, index: usize) -> String {
        match self.backend {
            Backend::Sqlite => format!("?{index}"),
            Backend::Postgres => format!("${index}"),
        }
    }

    /// Quotes an identifier; dotted names are quoted per segment.
    pub fn quote_ident(&self, name: &str) -> String {
        name.split('.')
            .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders() {
        assert_eq!(Dialect::sqlite().placeholder(3), "?3");
        assert_eq!(Dialect::postgres().placeholder(1), "$1");
    }

    #[test]
    fn quoting() {
        let d = Dialect::sqlite();
        assert_eq!(d.quote_ident("name"), "\"name\"");
        assert_eq!(d.quote_ident("table1.name"), "\"table1\".\"name\"");
        assert_eq!(d.quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn regex_capability() {
        assert!(!Dialect::sqlite().supports_regex());
        assert!(Dialect::sqlite().with_regex(true).supports_regex());
        assert!(Dialect::postgres().supports_regex());
        assert!(!Dialect::postgres().with_regex(false).supports_regex());
    }

    #[test]
    fn deserializes_with_defaults() {
        let d: Dialect = serde_json::from_str("{}").unwrap();
        assert_eq!(d, Dialect::sqlite());

        let json = r#"{ "backend": "sqlite", "regex": true, "collation": "no_case" }"#;
        let d: Dialect = serde_json::from_str(json).unwrap();
        assert!(d.supports_regex());
        assert_eq!(d.collation, Collation::NoCase);
    }
}
