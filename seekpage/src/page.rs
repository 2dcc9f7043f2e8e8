//! Page result types for pagination responses.
//!
//! The shapes follow the GraphQL connection model and serialize in camelCase:
//!
//! ```json
//! {
//!   "edges": [{ "node": { "id": 5 }, "cursor": "WzEsNV0" }],
//!   "pageInfo": {
//!     "hasNextPage": true,
//!     "hasPreviousPage": false,
//!     "startCursor": "WzEsNV0",
//!     "endCursor": "WzEsNV0"
//!   },
//!   "totalCount": 5
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One row of a page together with its cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The row.
    pub node: T,
    /// Opaque cursor of the row under the request's order.
    pub cursor: String,
}

impl<T> Edge<T> {
    /// Create an edge.
    pub const fn new(node: T, cursor: String) -> Self {
        Self { node, cursor }
    }
}

/// Page information for paginated responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether there are rows after this page.
    pub has_next_page: bool,
    /// Whether there are rows before this page.
    pub has_previous_page: bool,
    /// Cursor of the first row, if any.
    pub start_cursor: Option<String>,
    /// Cursor of the last row, if any.
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// Create page info with no cursors.
    #[must_use]
    pub const fn new(has_next_page: bool, has_previous_page: bool) -> Self {
        Self {
            has_next_page,
            has_previous_page,
            start_cursor: None,
            end_cursor: None,
        }
    }

    /// Page info whose start/end cursors come from the first and last edge.
    #[must_use]
    pub fn from_edges<T>(edges: &[Edge<T>], has_next_page: bool, has_previous_page: bool) -> Self {
        Self::new(has_next_page, has_previous_page)
            .with_start_cursor(edges.first().map(|e| e.cursor.clone()))
            .with_end_cursor(edges.last().map(|e| e.cursor.clone()))
    }

    /// Set the start cursor.
    #[must_use]
    pub fn with_start_cursor(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }

    /// Set the end cursor.
    #[must_use]
    pub fn with_end_cursor(mut self, cursor: Option<String>) -> Self {
        self.end_cursor = cursor;
        self
    }
}

/// A page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows in display order.
    pub edges: Vec<Edge<T>>,
    /// Navigation metadata.
    pub page_info: PageInfo,
    /// Rows matching the caller's filter, ignoring pagination bounds.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Create a page.
    pub const fn new(edges: Vec<Edge<T>>, page_info: PageInfo, total_count: u64) -> Self {
        Self {
            edges,
            page_info,
            total_count,
        }
    }

    /// An empty page.
    #[must_use]
    pub fn empty(total_count: u64) -> Self {
        Self::new(Vec::new(), PageInfo::default(), total_count)
    }

    /// Rows without their cursors.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    /// Consume the page, keeping only the rows.
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    /// Map rows while preserving cursors and page info.
    pub fn map_nodes<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            edges: self
                .edges
                .into_iter()
                .map(|e| Edge::new(f(e.node), e.cursor))
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }
}
