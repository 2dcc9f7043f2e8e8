//! Errors surfaced by [`Paginator::paginate`](crate::Paginator::paginate).

use thiserror::Error;

use crate::cursor::CursorError;
use crate::order::OrderError;
use crate::source::BoxError;

/// Pagination failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaginationError {
    /// `limit` must be at least 1.
    #[error("limit must be greater than zero")]
    InvalidLimit,
    /// Both `after` and `before` were supplied.
    #[error("'after' and 'before' cursors cannot be combined")]
    ConflictingCursors,
    /// A cursor token could not be decoded (strict mode only).
    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),
    /// A cursor does not carry one value per order term (strict mode only).
    #[error("cursor has {actual} values but the order has {expected} terms")]
    CursorMismatch {
        /// Number of order terms.
        expected: usize,
        /// Number of cursor values.
        actual: usize,
    },
    /// A cursor was supplied but the order has no terms to seek on.
    #[error("a cursor cannot be used with an empty order")]
    UnorderedCursor,
    /// The order specification is invalid.
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),
    /// The request was dispatched to a method name that is not attached.
    #[error("unknown pagination method '{0}'")]
    UnknownMethod(String),
    /// The data source failed; the error is passed through unchanged.
    #[error("data source error: {0}")]
    Source(#[source] BoxError),
}

impl PaginationError {
    /// Wrap a data-source failure.
    pub fn data_source<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Source(Box::new(err))
    }

    /// Returns `true` when the caller's request was at fault.
    #[must_use]
    pub const fn is_request_error(&self) -> bool {
        !matches!(self, Self::Source(_))
    }

    /// The data-source error, if this is one.
    #[must_use]
    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Source(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
