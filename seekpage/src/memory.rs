//! In-memory [`DataSource`] over a vector of records.
//!
//! Filters with [`Predicate::matches`] and sorts with [`Order::compare`], so
//! it follows the same NULL placement table as the keyset predicates. Handy
//! for tests and as a reference for adapter authors.

use std::convert::Infallible;

use async_trait::async_trait;

use crate::order::Order;
use crate::predicate::Predicate;
use crate::source::{CountQuery, DataSource, FindQuery, Record};

/// In-memory data source.
///
/// ```
/// use futures::executor::block_on;
/// use seekpage::{MemoryStore, PageRequest, Paginator};
/// use serde_json::json;
///
/// let store = MemoryStore::new(vec![json!({"id": 2}), json!({"id": 1})]);
/// let page = block_on(Paginator::default().paginate(&store, PageRequest::new(1))).unwrap();
/// assert_eq!(page.edges[0].node["id"], 1);
/// assert!(page.page_info.has_next_page);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    rows: Vec<R>,
    primary_key: Vec<String>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R> MemoryStore<R> {
    /// Store `rows` keyed by `id`.
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            primary_key: vec!["id".to_string()],
        }
    }

    /// Use a different primary key.
    #[must_use]
    pub fn with_primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a row.
    pub fn insert(&mut self, row: R) {
        self.rows.push(row);
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Record> MemoryStore<R> {
    fn matching<'a>(&'a self, filter: Option<&'a Predicate>) -> impl Iterator<Item = &'a R> + 'a {
        self.rows
            .iter()
            .filter(move |row| filter.is_none_or(|f| f.matches(*row)))
    }

    /// Rows matching `filter`, sorted by `order`, at most `limit`.
    pub fn select(&self, filter: Option<&Predicate>, order: &Order, limit: usize) -> Vec<R>
    where
        R: Clone,
    {
        let mut rows: Vec<&R> = self.matching(filter).collect();
        // Stable sort keeps insertion order among ties of a partial order
        rows.sort_by(|a, b| order.compare(*a, *b));
        rows.into_iter().take(limit).cloned().collect()
    }
}

#[async_trait]
impl<R> DataSource for MemoryStore<R>
where
    R: Record + Clone + Send + Sync,
{
    type Record = R;
    type Options = ();
    type Error = Infallible;

    fn primary_key(&self) -> Vec<String> {
        self.primary_key.clone()
    }

    async fn find_all(&self, query: FindQuery<()>) -> Result<Vec<R>, Infallible> {
        Ok(self.select(query.filter.as_ref(), &query.order, query.limit))
    }

    async fn count(&self, query: CountQuery<()>) -> Result<u64, Infallible> {
        Ok(self.matching(query.filter.as_ref()).count() as u64)
    }
}
