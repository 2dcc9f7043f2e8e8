//! Errors raised while rendering SQL.

use thiserror::Error;

/// SQL rendering failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SqlError {
    /// A table, alias or column name is not a plain SQL identifier.
    #[error("invalid SQL {context} name '{name}': must start with letter/underscore, contain only [a-zA-Z0-9_], and be at most 63 characters")]
    InvalidIdentifier {
        /// What the identifier was used as (`"table"`, `"order column"`, ...).
        context: &'static str,
        /// The rejected identifier.
        name: String,
    },

    /// A predicate or order references a join alias that was never declared.
    #[error("unknown join alias '{0}'")]
    UnknownAlias(String),
}
