//! Ordering clauses for rendered queries.
//!
//! Provides [`Dir`] for sort direction and [`OrderBy`] for field-based ordering.

use crate::sql::fragment::Fragment;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Dir::Asc => "ASC",
            Dir::Desc => "DESC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Dir,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// `"field" ASC` or `"field" DESC`.
    pub fn to_fragment(&self) -> Fragment {
        Fragment::new()
            .ident(&self.field)
            .sql(" ")
            .sql(self.dir.as_sql())
    }
}

/// Renders the clause list after `ORDER BY`; empty input yields an empty fragment.
pub(crate) fn order_list(orderings: &[OrderBy]) -> Fragment {
    Fragment::join(orderings.iter().map(OrderBy::to_fragment), ", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;

    #[test]
    fn dir_display() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
        assert!(Dir::default().is_asc());
        assert!(Dir::Desc.is_desc());
    }

    #[test]
    fn order_by_constructors() {
        let asc = OrderBy::asc("name");
        assert_eq!(asc.field, "name");
        assert_eq!(asc.dir, Dir::Asc);

        let desc = OrderBy::desc("value");
        assert_eq!(desc.dir, Dir::Desc);
    }

    #[test]
    fn renders_clause_list() {
        let list = order_list(&[OrderBy::desc("value"), OrderBy::asc("name")]);
        assert_eq!(
            list.render(&Dialect::sqlite()).sql,
            "\"value\" DESC, \"name\" ASC"
        );
        assert!(order_list(&[]).is_empty());
    }
}
