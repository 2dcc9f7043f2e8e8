// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code items in docs
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Direction tables read better one arm per variant
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # seekpage - Keyset Pagination
//!
//! Cursor-based (keyset) pagination over any ordered, filtered collection:
//! multi-column orders with per-column direction, explicit NULL placement,
//! columns of joined entities, and forward/backward traversal.
//!
//! The crate performs no I/O. A [`DataSource`] runs the fetch and the count;
//! this crate decides what to ask for and assembles the [`Page`].
//!
//! ## Quick Start
//!
//! ```
//! # use seekpage::prelude::*;
//! # use futures::executor::block_on;
//! # use serde_json::json;
//! let store = MemoryStore::new(vec![
//!     json!({"id": 1, "counter": 3}),
//!     json!({"id": 2, "counter": 4}),
//!     json!({"id": 3, "counter": 4}),
//!     json!({"id": 4, "counter": 2}),
//!     json!({"id": 5, "counter": 1}),
//! ]);
//! let tests = with_pagination(PaginateConfig::default()).attach(store);
//!
//! let request = PageRequest::new(3).order_by(("counter", Direction::Asc));
//! let first = block_on(tests.paginate(request.clone())).unwrap();
//! let ids: Vec<_> = first.nodes().map(|n| n["id"].as_i64().unwrap()).collect();
//! assert_eq!(ids, [5, 4, 1]);
//! assert!(first.page_info.has_next_page);
//!
//! let end = first.page_info.end_cursor.unwrap();
//! let second = block_on(tests.paginate(request.after(end))).unwrap();
//! let ids: Vec<_> = second.nodes().map(|n| n["id"].as_i64().unwrap()).collect();
//! assert_eq!(ids, [2, 3]);
//! assert!(!second.page_info.has_next_page);
//! ```
//!
//! ## Keyset Predicates
//!
//! For an order `a ASC, b DESC, id ASC` and a cursor `(1, 2, 3)` the
//! predicate handed to the data source reads
//!
//! ```text
//! (a IS NULL OR a > 1)
//!   OR (a = 1 AND (b < 2 OR (b = 2 AND id > 3)))
//! ```
//!
//! Plain `ASC` sorts NULLs last and plain `DESC` sorts them first; the
//! `NULLS FIRST`/`NULLS LAST` variants say so explicitly. Backward pages walk
//! the reversed order and are returned in display order.
//!
//! ## Cursors
//!
//! A cursor is the row's sort-key tuple as a JSON array in URL-safe base64.
//! Cursors are **not encrypted**. Malformed cursors serve the first page
//! unless `strictCursors` is enabled in [`PaginateConfig`].

mod config;
mod cursor;
mod error;
mod keyset;
mod memory;
mod order;
mod page;
mod paginate;
mod parse;
mod predicate;
mod source;
mod value;

pub use config::{CursorPrecedence, DEFAULT_METHOD_NAME, PaginateConfig, PrimaryKey};
pub use cursor::{Cursor, CursorError, IntoCursor, parse_cursor};
pub use error::PaginationError;
pub use keyset::{KeysetCondition, keyset_predicate};
pub use memory::MemoryStore;
pub use order::{Direction, NullsOrder, Order, OrderError, OrderItem, OrderTerm};
pub use page::{Edge, Page, PageInfo};
pub use paginate::{PageRequest, Paginated, Paginator, with_pagination};
pub use parse::{ParseError, parse_where};
pub use predicate::{
    ColumnRef, CompoundPredicate, Condition, LogicalOp, Operator, Predicate, and, or, simple,
};
pub use source::{BoxError, CountQuery, DataSource, FindQuery, Record};
pub use value::Value;

/// Prelude module for convenient imports.
///
/// ```
/// use seekpage::prelude::*;
/// let order = Order::normalize(&[OrderItem::from("counter")], &["id".to_string()], false).unwrap();
/// assert_eq!(order.to_string(), "counter ASC, id ASC");
/// ```
pub mod prelude {
    pub use crate::{
        ColumnRef, Cursor, CursorError, CursorPrecedence, DataSource, Direction, Edge, IntoCursor,
        KeysetCondition, LogicalOp, MemoryStore, Operator, Order, OrderItem, OrderTerm, Page,
        PageInfo, PageRequest, PaginateConfig, Paginated, PaginationError, Paginator, Predicate,
        Record, Value, and, keyset_predicate, or, parse_cursor, parse_where, simple,
        with_pagination,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::{Value as JsonValue, json};

    fn store() -> MemoryStore<JsonValue> {
        MemoryStore::new(vec![
            json!({"id": 1, "counter": 3, "extra": 4}),
            json!({"id": 2, "counter": 4, "extra": 4}),
            json!({"id": 3, "counter": 4, "extra": 3}),
            json!({"id": 4, "counter": 2, "extra": 3}),
            json!({"id": 5, "counter": 1, "extra": 3}),
        ])
    }

    #[test]
    fn test_order_to_cursor_to_predicate() {
        let order = Order::normalize(
            &[OrderItem::new("counter", Direction::Desc)],
            &["id".to_string()],
            false,
        )
        .unwrap();
        let row = json!({"id": 2, "counter": 4});
        let token = Cursor::from_record(&row, &order).encode();

        let cursor = parse_cursor(Some(&token)).unwrap();
        let pred = keyset_predicate(&order, &cursor).unwrap();
        assert!(pred.matches(&json!({"id": 3, "counter": 4})));
        assert!(pred.matches(&json!({"id": 1, "counter": 3})));
        assert!(!pred.matches(&json!({"id": 2, "counter": 4})));
        assert!(!pred.matches(&json!({"id": 1, "counter": 4})));
    }

    #[test]
    fn test_multi_column_order_pages() {
        let tests = with_pagination(PaginateConfig::default()).attach(store());
        let request = PageRequest::new(3)
            .order_by(("counter", Direction::Desc))
            .order_by(("extra", Direction::Asc));

        let first = block_on(tests.paginate(request.clone())).unwrap();
        let ids: Vec<_> = first.nodes().filter_map(|n| n["id"].as_i64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let end = first.page_info.end_cursor.unwrap();
        let second = block_on(tests.paginate(request.after(end))).unwrap();
        let ids: Vec<_> = second.nodes().filter_map(|n| n["id"].as_i64()).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[test]
    fn test_filter_from_json() {
        let tests = with_pagination(PaginateConfig::default()).attach(store());
        let request = PageRequest::new(5)
            .order_by(("counter", Direction::Asc))
            .filter(parse_where(r#"{"extra": 3}"#).unwrap());
        let page = block_on(tests.paginate(request)).unwrap();
        let ids: Vec<_> = page.nodes().filter_map(|n| n["id"].as_i64()).collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert_eq!(page.total_count, 3);
    }
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
