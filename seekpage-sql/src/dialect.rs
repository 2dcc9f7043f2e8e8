//! SQL dialect implementations for Postgres and `SQLite`.
//!
//! Each dialect handles the specific syntax differences between databases.

use seekpage::{Direction, NullsOrder};

/// SQL dialect trait for database-specific syntax.
pub trait Dialect: Clone + Copy {
    /// Format a parameter placeholder (e.g., `$1` for Postgres, `?1` for `SQLite`).
    fn param(&self, idx: usize) -> String;

    /// Quote an already validated identifier.
    fn quote(&self, ident: &str) -> String {
        format!("\"{ident}\"")
    }

    /// NULL placement the database applies when a direction carries no
    /// NULLS qualifier.
    fn implicit_nulls(&self, ascending: bool) -> NullsOrder;

    /// Format the direction part of an ORDER BY term.
    ///
    /// Plain `ASC`/`DESC` are spelled out with an explicit NULLS clause
    /// whenever the database default would disagree with [`Direction::nulls`].
    fn direction(&self, direction: Direction) -> &'static str {
        if direction.explicit_nulls().is_some()
            || self.implicit_nulls(direction.is_ascending()) == direction.nulls()
        {
            return direction.as_str();
        }
        match direction.nulls() {
            NullsOrder::First if direction.is_ascending() => Direction::AscNullsFirst.as_str(),
            NullsOrder::First => Direction::DescNullsFirst.as_str(),
            NullsOrder::Last if direction.is_ascending() => Direction::AscNullsLast.as_str(),
            NullsOrder::Last => Direction::DescNullsLast.as_str(),
        }
    }
}

/// Postgres dialect.
///
/// NULLs sort as larger than every value, which matches plain `ASC`/`DESC`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("${idx}")
    }

    #[inline]
    fn implicit_nulls(&self, ascending: bool) -> NullsOrder {
        if ascending {
            NullsOrder::Last
        } else {
            NullsOrder::First
        }
    }
}

/// `SQLite` dialect.
///
/// NULLs sort as smaller than every value, so plain directions always get an
/// explicit NULLS clause (supported since `SQLite` 3.30).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    #[inline]
    fn param(&self, idx: usize) -> String {
        format!("?{idx}")
    }

    #[inline]
    fn implicit_nulls(&self, ascending: bool) -> NullsOrder {
        if ascending {
            NullsOrder::First
        } else {
            NullsOrder::Last
        }
    }
}
