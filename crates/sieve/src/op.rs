//! Comparison and pattern operators carried by conditions.

use std::cmp::Ordering;
use std::fmt;

/// Ordered comparison operator of a bound condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl CmpOp {
    /// Evaluates this operator given the ordering of field against operand.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Gte => ordering != Ordering::Less,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Lte => ordering != Ordering::Greater,
        }
    }

    /// The SQL comparison operator.
    pub fn sql(self) -> &'static str {
        match self {
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Gt => "gt",
            CmpOp::Gte => "gte",
            CmpOp::Lt => "lt",
            CmpOp::Lte => "lte",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pattern matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternMode {
    /// Case-sensitive match.
    Like,
    /// Case-insensitive match.
    ILike,
    /// Negation of `Like`. Null values still never match.
    NotLike,
}

impl PatternMode {
    pub fn is_negated(self) -> bool {
        matches!(self, PatternMode::NotLike)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatternMode::Like => "like",
            PatternMode::ILike => "ilike",
            PatternMode::NotLike => "not_like",
        }
    }
}

impl fmt::Display for PatternMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
