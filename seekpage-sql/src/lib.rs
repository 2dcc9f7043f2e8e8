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
#![allow(clippy::format_push_string)] // String building style preference

//! # seekpage-sql - SQL Rendering for Keyset Pages
//!
//! Turns the predicates and orders produced by [`seekpage`] into
//! parameterized SQL for Postgres and `SQLite`, so a database-backed
//! [`seekpage::DataSource`] only has to bind parameters and map rows.
//!
//! ## Quick Start
//!
//! ```
//! use seekpage::{Cursor, KeysetCondition, Order, OrderItem, Value};
//! use seekpage_sql::SelectBuilder;
//!
//! let order = Order::normalize(&[OrderItem::from("counter")], &["id".to_string()], false).unwrap();
//! let cursor = Cursor::new(vec![Value::Int(3), Value::Int(1)]);
//! let keyset = KeysetCondition::after(&order, &cursor).unwrap();
//!
//! let query = SelectBuilder::postgres("tests")
//!     .filter(keyset.to_predicate())
//!     .order(order)
//!     .limit(3)
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     query.sql,
//!     concat!(
//!         r#"SELECT "tests".* FROM "tests" WHERE "#,
//!         r#"(("tests"."counter" IS NULL OR "tests"."counter" > $1) "#,
//!         r#"OR ("tests"."counter" = $2 AND "tests"."id" > $3)) "#,
//!         r#"ORDER BY "tests"."counter" ASC, "tests"."id" ASC LIMIT 3"#,
//!     )
//! );
//! assert_eq!(query.params, [Value::Int(3), Value::Int(3), Value::Int(1)]);
//! ```
//!
//! ## NULL Placement
//!
//! Plain `ASC` sorts NULLs last and plain `DESC` sorts them first. Postgres
//! agrees; `SQLite` does not, so the [`Sqlite`] dialect always spells the
//! NULLS clause out.
//!
//! ## Identifiers
//!
//! Table, alias and column names are validated and double-quoted. Values are
//! always bound as parameters.

mod dialect;
mod error;
mod render;
mod select;
mod validate;

pub use dialect::{Dialect, Postgres, Sqlite};
pub use error::SqlError;
pub use render::{Scope, render_order, render_predicate};
pub use select::{Join, SelectBuilder, SqlQuery};
pub use validate::is_valid_sql_identifier;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Dialect, Join, Postgres, Scope, SelectBuilder, SqlError, SqlQuery, Sqlite, render_order,
        render_predicate,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
