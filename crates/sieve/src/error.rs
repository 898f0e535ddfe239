//! Error types for the sieve crate.

use thiserror::Error;

/// Errors raised while validating, compiling, or evaluating conditions.
///
/// Every error is raised before any filtering result is produced: a call
/// either returns the full result or one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SieveError {
    /// A condition's payload violates its constructor's precondition.
    #[error("invalid condition for field '{field}': {reason}")]
    InvalidCondition { field: String, reason: String },

    /// A condition cannot be expressed for the selected target.
    #[error("{operation} is not supported by the {target} target")]
    UnsupportedOperation {
        operation: &'static str,
        target: String,
    },

    /// A field value was compared against an operand of an incompatible type.
    #[error("type mismatch on field '{field}': condition expects {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl SieveError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SieveError::InvalidCondition {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
