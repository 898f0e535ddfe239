//! Translation of conditions into predicate fragments.
//!
//! The rendered predicate is built to select exactly the rows the in-memory
//! evaluator keeps for the same data, so null handling is spelled out
//! explicitly instead of being left to SQL's three-valued logic:
//!
//! | condition              | SQL                                      |
//! |------------------------|------------------------------------------|
//! | `Literal(Null)`        | `c IS NULL`                              |
//! | `NotEqual([x])`        | `(c IS NULL OR c <> ?)`                  |
//! | `NotEqual([Null, x])`  | `(c IS NOT NULL AND c <> ?)`             |
//! | `In([Null, x, y])`     | `(c IS NULL OR c IN (?, ?))`             |
//! | negated conjunction    | `(...) IS NOT TRUE`                      |

use tracing::trace;

use crate::condition::{Condition, Conditions};
use crate::error::{Result, SieveError};
use crate::op::{CmpOp, PatternMode};
use crate::pattern::{canonical_like, like_to_glob};
use crate::sql::dialect::{Backend, Dialect};
use crate::sql::fragment::{Fragment, SqlParam};
use crate::value::Scalar;

/// Translates `conditions` into a single predicate fragment.
///
/// Returns `None` when there is nothing to add: an empty, non-negated map
/// keeps every row. A negated empty map keeps none.
///
/// Every entry is validated and translated before anything is returned, so a
/// failure never leaves a partial predicate behind.
pub fn translate(
    conditions: &Conditions,
    dialect: &Dialect,
    negate: bool,
) -> Result<Option<Fragment>> {
    conditions.validate()?;

    let mut fields = Vec::with_capacity(conditions.len());
    for (field, condition) in conditions.iter() {
        let fragment = translate_field(field, condition, dialect)?;
        trace!(field, kind = condition.kind(), "translated condition");
        fields.push(fragment);
    }

    let conjunction = Fragment::join(fields, " AND ");
    Ok(match (conjunction.is_empty(), negate) {
        (true, false) => None,
        (true, true) => Some(Fragment::new().sql("1 = 0")),
        (false, false) => Some(conjunction),
        (false, true) => Some(conjunction.is_not_true()),
    })
}

/// Translates one field's condition.
pub fn translate_field(field: &str, condition: &Condition, dialect: &Dialect) -> Result<Fragment> {
    let column = Column {
        name: field,
        fold: dialect.collation.is_nocase(),
    };
    Ok(match condition {
        Condition::Literal(Scalar::Null) | Condition::CaseInsensitive(Scalar::Null) => {
            column.is_null()
        }
        Condition::Literal(value) => column.compare("=", value),
        Condition::Bound { op, operand } => column.compare(op.sql(), operand),
        Condition::Range {
            low,
            high,
            inclusive_high,
        } => {
            let upper = if *inclusive_high {
                CmpOp::Lte
            } else {
                CmpOp::Lt
            };
            Fragment::join(
                [
                    column.compare(CmpOp::Gte.sql(), low),
                    column.compare(upper.sql(), high),
                ],
                " AND ",
            )
            .group()
        }
        Condition::In(set) => column.membership(set, false),
        Condition::NotEqual(set) => column.membership(set, true),
        Condition::CaseInsensitive(value) => Column { fold: true, ..column }.compare("=", value),
        Condition::Pattern { template, mode } => column.pattern(template, *mode, dialect),
        Condition::Regex {
            source,
            case_insensitive,
        } => column.regex(source, *case_insensitive, dialect)?,
    })
}

/// A column reference plus whether text comparisons on it are case-folded.
#[derive(Clone, Copy)]
struct Column<'a> {
    name: &'a str,
    fold: bool,
}

impl Column<'_> {
    fn plain(&self) -> Fragment {
        Fragment::new().ident(self.name)
    }

    fn lhs(&self, folded: bool) -> Fragment {
        if folded {
            Fragment::new().sql("lower(").ident(self.name).sql(")")
        } else {
            self.plain()
        }
    }

    fn rhs(value: &Scalar, folded: bool) -> Fragment {
        let param = SqlParam::from(value);
        if folded {
            Fragment::new().sql("lower(").param(param).sql(")")
        } else {
            Fragment::new().param(param)
        }
    }

    fn folds(&self, value: &Scalar) -> bool {
        self.fold && matches!(value, Scalar::Text(_))
    }

    fn is_null(&self) -> Fragment {
        self.plain().sql(" IS NULL")
    }

    fn is_not_null(&self) -> Fragment {
        self.plain().sql(" IS NOT NULL")
    }

    fn compare(&self, op: &str, value: &Scalar) -> Fragment {
        let folded = self.folds(value);
        self.lhs(folded)
            .sql(" ")
            .sql(op)
            .sql(" ")
            .append(Column::rhs(value, folded))
    }

    fn membership(&self, set: &[Scalar], negated: bool) -> Fragment {
        let has_null = set.iter().any(Scalar::is_null);
        let values: Vec<&Scalar> = set.iter().filter(|v| !v.is_null()).collect();

        let core = match values.as_slice() {
            [] => {
                return match (negated, has_null) {
                    (false, true) => self.is_null(),
                    (false, false) => Fragment::new().sql("1 = 0"),
                    (true, true) => self.is_not_null(),
                    (true, false) => Fragment::new().sql("1 = 1"),
                };
            }
            [single] => self.compare(if negated { "<>" } else { "=" }, single),
            many => {
                let (text, other): (Vec<&Scalar>, Vec<&Scalar>) =
                    many.iter().copied().partition(|v| self.folds(v));
                if text.is_empty() || other.is_empty() {
                    self.in_list(many, negated, !text.is_empty())
                } else {
                    // folded text members and the rest need separate lists
                    Fragment::join(
                        [
                            self.in_list(&text, negated, true),
                            self.in_list(&other, negated, false),
                        ],
                        if negated { " AND " } else { " OR " },
                    )
                    .group()
                }
            }
        };

        match (negated, has_null) {
            (false, false) => core,
            // a null field is unequal to every non-null member
            (false, true) | (true, false) => self.is_null().sql(" OR ").append(core).group(),
            (true, true) => self.is_not_null().sql(" AND ").append(core).group(),
        }
    }

    fn in_list(&self, values: &[&Scalar], negated: bool, folded: bool) -> Fragment {
        let list = Fragment::join(values.iter().map(|v| Column::rhs(v, folded)), ", ");
        self.lhs(folded)
            .sql(if negated { " NOT IN " } else { " IN " })
            .append(list.group())
    }

    fn pattern(&self, template: &str, mode: PatternMode, dialect: &Dialect) -> Fragment {
        let case_insensitive = matches!(mode, PatternMode::ILike) || self.fold;
        let negated = mode.is_negated();
        let not = if negated { "NOT " } else { "" };

        match dialect.backend {
            Backend::Postgres => {
                let op = if case_insensitive { "ILIKE" } else { "LIKE" };
                self.plain()
                    .sql(" ")
                    .sql(not)
                    .sql(op)
                    .sql(" ")
                    .param(canonical_like(template))
            }
            // SQLite's LIKE ignores ASCII case; GLOB is its case-sensitive match.
            Backend::Sqlite if case_insensitive => self
                .plain()
                .sql(" ")
                .sql(not)
                .sql("LIKE ")
                .param(canonical_like(template))
                .sql(" ESCAPE '\\'"),
            Backend::Sqlite => self
                .plain()
                .sql(" ")
                .sql(not)
                .sql("GLOB ")
                .param(like_to_glob(template)),
        }
    }

    fn regex(&self, source: &str, case_insensitive: bool, dialect: &Dialect) -> Result<Fragment> {
        if !dialect.supports_regex() {
            return Err(SieveError::UnsupportedOperation {
                operation: "regex",
                target: dialect.name().to_string(),
            });
        }
        Ok(match dialect.backend {
            Backend::Postgres => {
                let op = if case_insensitive { " ~* " } else { " ~ " };
                self.plain().sql(op).param(source)
            }
            Backend::Sqlite => {
                let source = if case_insensitive {
                    format!("(?i){source}")
                } else {
                    source.to_string()
                };
                self.plain().sql(" REGEXP ").param(source)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::value::Collation;

    fn sqlite(conditions: &Conditions) -> (String, Vec<SqlParam>) {
        render(conditions, &Dialect::sqlite(), false)
    }

    fn render(conditions: &Conditions, dialect: &Dialect, negate: bool) -> (String, Vec<SqlParam>) {
        let fragment = translate(conditions, dialect, negate)
            .unwrap()
            .unwrap_or_default();
        let statement = fragment.render(dialect);
        (statement.sql, statement.params)
    }

    #[test]
    fn literals() {
        let (sql, params) = sqlite(&Conditions::new().with("name", "big"));
        assert_eq!(sql, "\"name\" = ?1");
        assert_eq!(params, [SqlParam::Text("big".into())]);

        let (sql, params) = sqlite(&Conditions::new().with("name", is_null()));
        assert_eq!(sql, "\"name\" IS NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn bounds_and_ranges() {
        let (sql, _) = sqlite(&Conditions::new().with("value", gte(10)));
        assert_eq!(sql, "\"value\" >= ?1");

        let (sql, params) = sqlite(&Conditions::new().with("value", 5..100));
        assert_eq!(sql, "(\"value\" >= ?1 AND \"value\" < ?2)");
        assert_eq!(params, [SqlParam::Integer(5), SqlParam::Integer(100)]);

        let (sql, _) = sqlite(&Conditions::new().with("value", 5..=100));
        assert_eq!(sql, "(\"value\" >= ?1 AND \"value\" <= ?2)");
    }

    #[test]
    fn not_equal_keeps_nulls() {
        let (sql, _) = sqlite(&Conditions::new().with("value", neq(10)));
        assert_eq!(sql, "(\"value\" IS NULL OR \"value\" <> ?1)");

        let (sql, _) = sqlite(&Conditions::new().with("value", is_not_null()));
        assert_eq!(sql, "\"value\" IS NOT NULL");

        let (sql, params) = sqlite(&Conditions::new().with("name", is_not_empty()));
        assert_eq!(sql, "(\"name\" IS NOT NULL AND \"name\" <> ?1)");
        assert_eq!(params, [SqlParam::Text(String::new())]);
    }

    #[test]
    fn membership() {
        let (sql, _) = sqlite(&Conditions::new().with("name", is_empty()));
        assert_eq!(sql, "(\"name\" IS NULL OR \"name\" = ?1)");

        let (sql, _) = sqlite(&Conditions::new().with("value", any_of([1, 2, 3])));
        assert_eq!(sql, "\"value\" IN (?1, ?2, ?3)");

        let (sql, _) = sqlite(&Conditions::new().with("value", neq_any([1, 2])));
        assert_eq!(sql, "(\"value\" IS NULL OR \"value\" NOT IN (?1, ?2))");

        let (sql, _) = sqlite(&Conditions::new().with("value", any_of(Vec::<i64>::new())));
        assert_eq!(sql, "1 = 0");
        let (sql, _) = sqlite(&Conditions::new().with("value", neq_any(Vec::<i64>::new())));
        assert_eq!(sql, "1 = 1");
    }

    #[test]
    fn sqlite_patterns() {
        let (sql, params) = sqlite(&Conditions::new().with("name", like("%big%")));
        assert_eq!(sql, "\"name\" GLOB ?1");
        assert_eq!(params, [SqlParam::Text("*big*".into())]);

        let (sql, params) = sqlite(&Conditions::new().with("name", ilike("%big%")));
        assert_eq!(sql, "\"name\" LIKE ?1 ESCAPE '\\'");
        assert_eq!(params, [SqlParam::Text("%big%".into())]);

        let (sql, _) = sqlite(&Conditions::new().with("name", not_like("%big%")));
        assert_eq!(sql, "\"name\" NOT GLOB ?1");
    }

    #[test]
    fn postgres_patterns() {
        let pg = Dialect::postgres();
        let (sql, params) = render(&Conditions::new().with("name", like("%big%")), &pg, false);
        assert_eq!(sql, "\"name\" LIKE $1");
        assert_eq!(params, [SqlParam::Text("%big%".into())]);

        let (sql, _) = render(&Conditions::new().with("name", ilike("%big%")), &pg, false);
        assert_eq!(sql, "\"name\" ILIKE $1");

        let (sql, _) = render(&Conditions::new().with("name", not_like("%big%")), &pg, false);
        assert_eq!(sql, "\"name\" NOT LIKE $1");
    }

    #[test]
    fn case_insensitive_equality() {
        let (sql, _) = sqlite(&Conditions::new().with("name", insensitive("SMALL")));
        assert_eq!(sql, "lower(\"name\") = lower(?1)");

        let (sql, _) = sqlite(&Conditions::new().with("value", insensitive(10)));
        assert_eq!(sql, "\"value\" = ?1");
    }

    #[test]
    fn nocase_collation_folds_text() {
        let dialect = Dialect::sqlite().with_collation(Collation::NoCase);
        let (sql, _) = render(&Conditions::new().with("name", gte("big")), &dialect, false);
        assert_eq!(sql, "lower(\"name\") >= lower(?1)");

        let (sql, _) = render(&Conditions::new().with("value", gte(10)), &dialect, false);
        assert_eq!(sql, "\"value\" >= ?1");

        let (sql, _) = render(&Conditions::new().with("name", like("big%")), &dialect, false);
        assert_eq!(sql, "\"name\" LIKE ?1 ESCAPE '\\'");
    }

    #[test]
    fn nocase_membership_folds_text_members_only() {
        let dialect = Dialect::sqlite().with_collation(Collation::NoCase);
        let mixed = [Scalar::from("BIG"), Scalar::from(5)];

        let (sql, params) = render(
            &Conditions::new().with("name", any_of(mixed.clone())),
            &dialect,
            false,
        );
        assert_eq!(sql, "(lower(\"name\") IN (lower(?1)) OR \"name\" IN (?2))");
        assert_eq!(params, [SqlParam::Text("BIG".into()), SqlParam::Integer(5)]);

        let (sql, _) = render(&Conditions::new().with("name", neq_any(mixed)), &dialect, false);
        assert_eq!(
            sql,
            "(\"name\" IS NULL OR (lower(\"name\") NOT IN (lower(?1)) AND \"name\" NOT IN (?2)))"
        );

        let (sql, _) = render(
            &Conditions::new().with("name", any_of(["big", "small"])),
            &dialect,
            false,
        );
        assert_eq!(sql, "lower(\"name\") IN (lower(?1), lower(?2))");
    }

    #[test]
    fn regex_requires_support() {
        let conditions = Conditions::new().with("name", regex("^bi"));
        let err = translate(&conditions, &Dialect::sqlite(), false).unwrap_err();
        assert_eq!(
            err,
            SieveError::UnsupportedOperation {
                operation: "regex",
                target: "sqlite".into()
            }
        );

        let (sql, params) = render(&conditions, &Dialect::sqlite().with_regex(true), false);
        assert_eq!(sql, "\"name\" REGEXP ?1");
        assert_eq!(params, [SqlParam::Text("^bi".into())]);

        let (sql, params) = render(
            &Conditions::new().with("name", iregex("^BI")),
            &Dialect::sqlite().with_regex(true),
            false,
        );
        assert_eq!(sql, "\"name\" REGEXP ?1");
        assert_eq!(params, [SqlParam::Text("(?i)^BI".into())]);

        let (sql, _) = render(
            &Conditions::new().with("name", iregex("^BI")),
            &Dialect::postgres(),
            false,
        );
        assert_eq!(sql, "\"name\" ~* $1");
    }

    #[test]
    fn conjunction_and_negation() {
        let conditions = Conditions::new()
            .with("name", ilike("%small%"))
            .with("value", gte(10));
        let (sql, _) = sqlite(&conditions);
        assert_eq!(sql, "\"name\" LIKE ?1 ESCAPE '\\' AND \"value\" >= ?2");

        let (sql, _) = render(&conditions, &Dialect::sqlite(), true);
        assert_eq!(
            sql,
            "(\"name\" LIKE ?1 ESCAPE '\\' AND \"value\" >= ?2) IS NOT TRUE"
        );
    }

    #[test]
    fn empty_conditions() {
        assert_eq!(
            translate(&Conditions::new(), &Dialect::sqlite(), false).unwrap(),
            None
        );
        let (sql, _) = render(&Conditions::new(), &Dialect::sqlite(), true);
        assert_eq!(sql, "1 = 0");
    }

    #[test]
    fn invalid_condition_fails_whole_translation() {
        let conditions = Conditions::new().with("name", "big").with(
            "value",
            Condition::Bound {
                op: CmpOp::Gt,
                operand: Scalar::Null,
            },
        );
        let err = translate(&conditions, &Dialect::postgres(), false).unwrap_err();
        assert!(matches!(err, SieveError::InvalidCondition { .. }));
    }
}
