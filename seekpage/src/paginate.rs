//! Page assembly: normalize the order, resolve the cursor, fetch one row past
//! the limit, and turn the rows into a [`Page`].

use futures::TryFutureExt;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::config::{CursorPrecedence, PaginateConfig, PrimaryKey};
use crate::cursor::Cursor;
use crate::error::PaginationError;
use crate::keyset::KeysetCondition;
use crate::order::{Order, OrderItem};
use crate::page::{Edge, Page, PageInfo};
use crate::predicate::Predicate;
use crate::source::{CountQuery, DataSource, FindQuery};

/// One pagination call.
///
/// Deserializes from the request object shape
/// `{"limit": 2, "after": "...", "order": [["counter", "desc"]], "where": {...}}`.
/// Pass-through fetch options are never read from JSON.
///
/// ```
/// use seekpage::{Direction, OrderItem, PageRequest};
///
/// let request: PageRequest = PageRequest::new(10)
///     .order_by(OrderItem::new("counter", Direction::Desc))
///     .after("WzMsMV0");
/// assert_eq!(request.limit, 10);
/// assert_eq!(request.after.as_deref(), Some("WzMsMV0"));
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "O: Default"))]
pub struct PageRequest<O = ()> {
    /// Maximum number of rows on the page.
    pub limit: usize,
    /// Return rows strictly after this cursor.
    #[serde(default)]
    pub after: Option<String>,
    /// Return rows strictly before this cursor.
    #[serde(default)]
    pub before: Option<String>,
    /// Sort order; the primary key is appended unless configured otherwise.
    #[serde(default)]
    pub order: Vec<OrderItem>,
    /// Caller filter.
    #[serde(default, rename = "where")]
    pub filter: Option<Predicate>,
    /// Pass-through fetch options handed to the data source.
    #[serde(skip)]
    pub options: O,
}

impl<O: Default> PageRequest<O> {
    /// Request the first `limit` rows.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            after: None,
            before: None,
            order: Vec::new(),
            filter: None,
            options: O::default(),
        }
    }
}

impl<O> PageRequest<O> {
    /// Page forward from a cursor.
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Page backward from a cursor.
    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Replace the sort order.
    #[must_use]
    pub fn order(mut self, items: Vec<OrderItem>) -> Self {
        self.order = items;
        self
    }

    /// Append one order item.
    #[must_use]
    pub fn order_by(mut self, item: impl Into<OrderItem>) -> Self {
        self.order.push(item.into());
        self
    }

    /// Set the caller filter.
    #[must_use]
    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the pass-through fetch options.
    #[must_use]
    pub fn options(mut self, options: O) -> Self {
        self.options = options;
        self
    }
}

/// Which way the page is walked.
#[derive(Debug)]
enum Traversal {
    First,
    After(Cursor),
    Before(Cursor),
}

/// Page assembler.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginateConfig,
}

impl Paginator {
    /// Create a paginator with the given settings.
    #[must_use]
    pub const fn new(config: PaginateConfig) -> Self {
        Self { config }
    }

    /// The active settings.
    #[must_use]
    pub const fn config(&self) -> &PaginateConfig {
        &self.config
    }

    /// Attach to a data source under the configured method name.
    pub fn attach<S: DataSource>(self, source: S) -> Paginated<S> {
        Paginated {
            source,
            paginator: self,
        }
    }

    /// Fetch one page from `source`.
    ///
    /// Rows are fetched with `limit + 1` so the extra row tells whether more
    /// rows exist in the walked direction. The row count uses the caller's
    /// filter only.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(method = %self.config.method_name, limit = request.limit)
    )]
    pub async fn paginate<S: DataSource>(
        &self,
        source: &S,
        request: PageRequest<S::Options>,
    ) -> Result<Page<S::Record>, PaginationError> {
        let PageRequest {
            limit,
            after,
            before,
            order,
            filter,
            options,
        } = request;

        if limit == 0 {
            return Err(PaginationError::InvalidLimit);
        }

        let primary_key = self
            .config
            .primary_key_field
            .as_ref()
            .map_or_else(|| source.primary_key(), PrimaryKey::fields);
        let order = Order::normalize(
            &order,
            &primary_key,
            self.config.omit_primary_key_from_order,
        )?;

        let traversal = self.traversal(after.as_deref(), before.as_deref(), &order)?;
        let (fetch_order, keyset) = match &traversal {
            Traversal::First => (order.clone(), None),
            Traversal::After(cursor) => (order.clone(), KeysetCondition::after(&order, cursor)),
            Traversal::Before(cursor) => (
                order.reversed(true),
                KeysetCondition::before(&order, cursor),
            ),
        };
        let keyset = keyset.map(|k| k.to_predicate());
        debug!(order = %fetch_order, ?traversal, "fetching page");
        trace!(?keyset, "keyset predicate");

        let find = source.find_all(FindQuery {
            filter: Predicate::merge(filter.clone(), keyset),
            order: fetch_order,
            limit: limit.saturating_add(1),
            options: options.clone(),
        });
        let count = source.count(CountQuery { filter, options });
        let (mut rows, total_count) = futures::try_join!(
            find.map_err(PaginationError::data_source),
            count.map_err(PaginationError::data_source),
        )?;

        let fetched = rows.len();
        let has_more = fetched > limit;
        rows.truncate(limit);

        let (has_next_page, has_previous_page) = match traversal {
            Traversal::First => (has_more, false),
            Traversal::After(_) => (has_more, true),
            Traversal::Before(_) => {
                rows.reverse();
                (true, has_more)
            },
        };
        debug!(fetched, has_next_page, has_previous_page, total_count, "page assembled");

        let edges: Vec<_> = rows
            .into_iter()
            .map(|row| {
                let cursor = Cursor::from_record(&row, &order).encode();
                Edge::new(row, cursor)
            })
            .collect();
        let page_info = PageInfo::from_edges(&edges, has_next_page, has_previous_page);

        Ok(Page::new(edges, page_info, total_count))
    }

    fn traversal(
        &self,
        after: Option<&str>,
        before: Option<&str>,
        order: &Order,
    ) -> Result<Traversal, PaginationError> {
        let after = after.filter(|t| !t.is_empty());
        let before = before.filter(|t| !t.is_empty());

        let (token, backward) = match (after, before) {
            (Some(_), Some(_)) if self.config.cursor_precedence == CursorPrecedence::Reject => {
                return Err(PaginationError::ConflictingCursors);
            },
            (Some(token), _) => (token, false),
            (None, Some(token)) => (token, true),
            (None, None) => return Ok(Traversal::First),
        };
        if order.is_empty() {
            return Err(PaginationError::UnorderedCursor);
        }

        let Some(cursor) = self.resolve_cursor(token, order)? else {
            return Ok(Traversal::First);
        };
        Ok(if backward {
            Traversal::Before(cursor)
        } else {
            Traversal::After(cursor)
        })
    }

    /// Decode a token against the order. In lenient mode unusable cursors
    /// resolve to `None`, which serves the first page.
    fn resolve_cursor(
        &self,
        token: &str,
        order: &Order,
    ) -> Result<Option<Cursor>, PaginationError> {
        let strict = self.config.strict_cursors;
        match Cursor::decode(token) {
            Ok(cursor) if cursor.is_valid_for(order) => Ok(Some(cursor)),
            Ok(cursor) if strict => Err(PaginationError::CursorMismatch {
                expected: order.len(),
                actual: cursor.len(),
            }),
            Ok(cursor) => {
                debug!(
                    expected = order.len(),
                    actual = cursor.len(),
                    "cursor does not match order, serving first page"
                );
                Ok(None)
            },
            Err(err) if strict => Err(err.into()),
            Err(err) => {
                debug!(error = %err, "malformed cursor, serving first page");
                Ok(None)
            },
        }
    }
}

/// Start configuring pagination for a data source.
///
/// ```
/// use seekpage::{with_pagination, MemoryStore, PaginateConfig};
///
/// let users = with_pagination(PaginateConfig::new().method_name("list"))
///     .attach(MemoryStore::<serde_json::Value>::new(vec![]));
/// assert_eq!(users.method_name(), "list");
/// ```
#[must_use]
pub const fn with_pagination(config: PaginateConfig) -> Paginator {
    Paginator::new(config)
}

/// A data source with pagination attached.
#[derive(Debug, Clone)]
pub struct Paginated<S> {
    source: S,
    paginator: Paginator,
}

impl<S: DataSource> Paginated<S> {
    /// Name the pagination method answers to.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.paginator.config.method_name
    }

    /// The underlying data source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Detach, returning the data source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Fetch one page.
    pub async fn paginate(
        &self,
        request: PageRequest<S::Options>,
    ) -> Result<Page<S::Record>, PaginationError> {
        self.paginator.paginate(&self.source, request).await
    }

    /// Fetch one page through the method named `method`.
    pub async fn call(
        &self,
        method: &str,
        request: PageRequest<S::Options>,
    ) -> Result<Page<S::Record>, PaginationError> {
        if method != self.method_name() {
            return Err(PaginationError::UnknownMethod(method.to_string()));
        }
        self.paginate(request).await
    }
}
