//! The data-store collaborator.
//!
//! Pagination performs no I/O of its own. It asks a [`DataSource`] for the
//! rows matching a predicate under an order (with a lookahead limit) and for
//! the number of rows matching the caller's filter. Both calls are async and
//! independent; failures propagate unchanged.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

use crate::order::Order;
use crate::predicate::Predicate;
use crate::value::Value;

/// Boxed error type accepted from data-store adapters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A fetched row.
///
/// Exposes column values by name and, for joined order terms, the values of
/// associated entities by join alias.
pub trait Record {
    /// Value of a column of this row, `None` if the column is absent.
    fn value(&self, column: &str) -> Option<Value>;

    /// Value of a column of the associated entity loaded under `alias`.
    fn association_value(&self, alias: &str, column: &str) -> Option<Value> {
        let _ = (alias, column);
        None
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn value(&self, column: &str) -> Option<Value> {
        (**self).value(column)
    }

    fn association_value(&self, alias: &str, column: &str) -> Option<Value> {
        (**self).association_value(alias, column)
    }
}

impl Record for Map<String, JsonValue> {
    fn value(&self, column: &str) -> Option<Value> {
        self.get(column).and_then(Value::from_json)
    }

    fn association_value(&self, alias: &str, column: &str) -> Option<Value> {
        match self.get(alias)? {
            JsonValue::Object(assoc) => assoc.value(column),
            _ => None,
        }
    }
}

impl Record for JsonValue {
    fn value(&self, column: &str) -> Option<Value> {
        self.as_object()?.value(column)
    }

    fn association_value(&self, alias: &str, column: &str) -> Option<Value> {
        self.as_object()?.association_value(alias, column)
    }
}

/// Row fetch handed to [`DataSource::find_all`].
#[derive(Debug, Clone)]
pub struct FindQuery<O> {
    /// Caller filter merged (AND) with the cursor predicate.
    pub filter: Option<Predicate>,
    /// Order the rows must be returned in.
    pub order: Order,
    /// Maximum number of rows to return.
    pub limit: usize,
    /// Pass-through fetch options (joins, includes, ...).
    pub options: O,
}

/// Count handed to [`DataSource::count`].
#[derive(Debug, Clone)]
pub struct CountQuery<O> {
    /// Caller filter only; pagination bounds are never included.
    pub filter: Option<Predicate>,
    /// Pass-through fetch options (joins, includes, ...).
    pub options: O,
}

/// Data-store capability required by the paginator.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Row type returned by [`find_all`](Self::find_all).
    type Record: Record + Send;
    /// Pass-through options forwarded untouched to both calls.
    type Options: Clone + Default + Send + Sync;
    /// Adapter failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Primary-key field(s) used as the tie-break suffix of every order.
    fn primary_key(&self) -> Vec<String> {
        vec!["id".to_string()]
    }

    /// Fetch rows matching `query.filter`, ordered by `query.order`, at most `query.limit`.
    async fn find_all(
        &self,
        query: FindQuery<Self::Options>,
    ) -> Result<Vec<Self::Record>, Self::Error>;

    /// Count rows matching `query.filter`.
    async fn count(&self, query: CountQuery<Self::Options>) -> Result<u64, Self::Error>;
}
