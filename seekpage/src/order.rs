//! Sort order: parsing loose caller input, normalizing it into a total
//! order, and reversing it for backward pagination.
//!
//! # Accepted input shapes
//!
//! | JSON | Meaning |
//! |------|---------|
//! | `"counter"` | `counter ASC` |
//! | `["counter"]` | `counter ASC` |
//! | `["counter", "desc"]` | `counter DESC` |
//! | `["is_valid", "DESC NULLS FIRST"]` | explicit NULL placement |
//! | `[{"as": "persons"}, "name", "asc"]` | column of the joined entity `persons` |
//!
//! # Direction table
//!
//! | Direction | Strictly-after operator | NULLs sort |
//! |-----------|-------------------------|------------|
//! | `ASC` | `>` | last |
//! | `DESC` | `<` | first |
//! | `ASC NULLS FIRST` | `>` | first |
//! | `ASC NULLS LAST` | `>` | last |
//! | `DESC NULLS FIRST` | `<` | first |
//! | `DESC NULLS LAST` | `<` | last |

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::predicate::{ColumnRef, Operator};
use crate::source::Record;
use crate::value::Value;

/// Errors raised while interpreting an order specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OrderError {
    /// The direction token is not one of the six supported spellings.
    #[error("unknown sort direction '{0}'")]
    UnknownDirection(String),
    /// An order item names an empty column.
    #[error("order column name cannot be empty")]
    EmptyColumn,
    /// An order item has an unsupported shape.
    #[error("invalid order item: {0}")]
    InvalidItem(String),
}

/// Where NULLs sort relative to non-null values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    /// NULLs before every non-null value.
    First,
    /// NULLs after every non-null value.
    Last,
}

/// Sort direction with optional explicit NULL placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    /// `ASC` (NULLs last).
    #[default]
    Asc,
    /// `DESC` (NULLs first).
    Desc,
    /// `ASC NULLS FIRST`
    AscNullsFirst,
    /// `ASC NULLS LAST`
    AscNullsLast,
    /// `DESC NULLS FIRST`
    DescNullsFirst,
    /// `DESC NULLS LAST`
    DescNullsLast,
}

impl Direction {
    /// Whether values sort smallest first.
    #[must_use]
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Asc | Self::AscNullsFirst | Self::AscNullsLast)
    }

    /// Operator selecting values strictly after a boundary under this direction.
    #[must_use]
    pub const fn comparison(self) -> Operator {
        if self.is_ascending() {
            Operator::Gt
        } else {
            Operator::Lt
        }
    }

    /// Effective NULL placement.
    #[must_use]
    pub const fn nulls(self) -> NullsOrder {
        match self {
            Self::Asc | Self::AscNullsLast | Self::DescNullsLast => NullsOrder::Last,
            Self::Desc | Self::AscNullsFirst | Self::DescNullsFirst => NullsOrder::First,
        }
    }

    /// NULL placement spelled out by the direction itself, if any.
    #[must_use]
    pub const fn explicit_nulls(self) -> Option<NullsOrder> {
        match self {
            Self::Asc | Self::Desc => None,
            Self::AscNullsFirst | Self::DescNullsFirst => Some(NullsOrder::First),
            Self::AscNullsLast | Self::DescNullsLast => Some(NullsOrder::Last),
        }
    }

    /// Direction used to walk the same order backward.
    ///
    /// With `enforce_null_order` both the direction and the NULL placement
    /// flip, so NULLs keep their position relative to non-null values once the
    /// reversed result is read back to front. Without it only the base
    /// direction toggles and any NULLS qualifier is dropped.
    #[must_use]
    pub const fn reversed(self, enforce_null_order: bool) -> Self {
        if !enforce_null_order {
            return if self.is_ascending() { Self::Desc } else { Self::Asc };
        }
        match self {
            Self::Asc | Self::AscNullsLast => Self::DescNullsFirst,
            Self::Desc | Self::DescNullsFirst => Self::AscNullsLast,
            Self::DescNullsLast => Self::AscNullsFirst,
            Self::AscNullsFirst => Self::DescNullsLast,
        }
    }

    /// Canonical SQL spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::AscNullsFirst => "ASC NULLS FIRST",
            Self::AscNullsLast => "ASC NULLS LAST",
            Self::DescNullsFirst => "DESC NULLS FIRST",
            Self::DescNullsLast => "DESC NULLS LAST",
        }
    }

    /// Compare two values under this direction, NULL placement included.
    #[must_use]
    pub fn compare(self, a: &Value, b: &Value) -> Ordering {
        let nulls_first = matches!(self.nulls(), NullsOrder::First);
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) if nulls_first => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, true) if nulls_first => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if self.is_ascending() => a.sort_cmp(b),
            (false, false) => a.sort_cmp(b).reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = OrderError;

    /// Case-insensitive; any run of whitespace separates the words.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = s.split_whitespace().map(str::to_ascii_uppercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["ASC"] => Ok(Self::Asc),
            ["DESC"] => Ok(Self::Desc),
            ["ASC", "NULLS", "FIRST"] => Ok(Self::AscNullsFirst),
            ["ASC", "NULLS", "LAST"] => Ok(Self::AscNullsLast),
            ["DESC", "NULLS", "FIRST"] => Ok(Self::DescNullsFirst),
            ["DESC", "NULLS", "LAST"] => Ok(Self::DescNullsLast),
            _ => Err(OrderError::UnknownDirection(s.to_string())),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = OrderError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.as_str().to_string()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One term of a canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderTerm {
    /// Column sorted on.
    pub column: ColumnRef,
    /// Sort direction and NULL placement.
    pub direction: Direction,
}

impl OrderTerm {
    /// Create a term.
    pub const fn new(column: ColumnRef, direction: Direction) -> Self {
        Self { column, direction }
    }

    /// `column ASC` on the paginated entity.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(ColumnRef::column(column), Direction::Asc)
    }

    /// `column DESC` on the paginated entity.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(ColumnRef::column(column), Direction::Desc)
    }

    /// Same column walked backward.
    #[must_use]
    pub fn reversed(&self, enforce_null_order: bool) -> Self {
        Self::new(self.column.clone(), self.direction.reversed(enforce_null_order))
    }
}

impl fmt::Display for OrderTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

/// Loosely specified order item as supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderItem {
    /// A column of the paginated entity; direction defaults to `ASC`.
    Column {
        /// Column name.
        column: String,
        /// Direction, `None` meaning `ASC`.
        direction: Option<Direction>,
    },
    /// A column of a joined entity; direction defaults to `ASC`.
    Joined {
        /// Join alias of the associated entity.
        alias: String,
        /// Column name on the associated entity.
        column: String,
        /// Direction, `None` meaning `ASC`.
        direction: Option<Direction>,
    },
}

impl OrderItem {
    /// Column with an explicit direction.
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self::Column {
            column: column.into(),
            direction: Some(direction),
        }
    }

    /// Column of a joined entity with an explicit direction.
    pub fn joined(alias: impl Into<String>, column: impl Into<String>, direction: Direction) -> Self {
        Self::Joined {
            alias: alias.into(),
            column: column.into(),
            direction: Some(direction),
        }
    }

    /// Parse one item from its JSON form (see the module docs).
    pub fn from_json(json: &JsonValue) -> Result<Self, OrderError> {
        match json {
            JsonValue::String(column) => Ok(Self::Column {
                column: column.clone(),
                direction: None,
            }),
            JsonValue::Array(parts) => match parts.as_slice() {
                [JsonValue::Object(entity), rest @ ..] => {
                    let alias = entity
                        .get("as")
                        .and_then(JsonValue::as_str)
                        .ok_or_else(|| OrderError::InvalidItem(json.to_string()))?;
                    let (column, direction) = column_and_direction(rest, json)?;
                    Ok(Self::Joined {
                        alias: alias.to_string(),
                        column,
                        direction,
                    })
                },
                parts => {
                    let (column, direction) = column_and_direction(parts, json)?;
                    Ok(Self::Column { column, direction })
                },
            },
            _ => Err(OrderError::InvalidItem(json.to_string())),
        }
    }

    /// Parse a whole order list from JSON (an array of items).
    pub fn list_from_json(json: &JsonValue) -> Result<Vec<Self>, OrderError> {
        match json {
            JsonValue::Array(items) => items.iter().map(Self::from_json).collect(),
            _ => Err(OrderError::InvalidItem(json.to_string())),
        }
    }

    fn into_term(self) -> Result<OrderTerm, OrderError> {
        let (column, direction) = match self {
            Self::Column { column, direction } => (ColumnRef::Column(column), direction),
            Self::Joined {
                alias,
                column,
                direction,
            } => (ColumnRef::Joined { alias, column }, direction),
        };
        if column.column_name().is_empty() {
            return Err(OrderError::EmptyColumn);
        }
        Ok(OrderTerm::new(column, direction.unwrap_or_default()))
    }
}

/// `[column]` or `[column, direction]`; an empty or null direction means ASC.
fn column_and_direction(
    parts: &[JsonValue],
    whole: &JsonValue,
) -> Result<(String, Option<Direction>), OrderError> {
    let invalid = || OrderError::InvalidItem(whole.to_string());
    match parts {
        [JsonValue::String(column)] => Ok((column.clone(), None)),
        [JsonValue::String(column), JsonValue::Null] => Ok((column.clone(), None)),
        [JsonValue::String(column), JsonValue::String(dir)] if dir.trim().is_empty() => {
            Ok((column.clone(), None))
        },
        [JsonValue::String(column), JsonValue::String(dir)] => {
            Ok((column.clone(), Some(dir.parse()?)))
        },
        _ => Err(invalid()),
    }
}

impl From<&str> for OrderItem {
    fn from(column: &str) -> Self {
        Self::Column {
            column: column.to_string(),
            direction: None,
        }
    }
}

impl From<(&str, Direction)> for OrderItem {
    fn from((column, direction): (&str, Direction)) -> Self {
        Self::new(column, direction)
    }
}

impl<'de> Deserialize<'de> for OrderItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Self::from_json(&json).map_err(serde::de::Error::custom)
    }
}

/// Canonical order: a sequence of fully specified terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Order(Vec<OrderTerm>);

impl Order {
    /// Wrap already canonical terms.
    #[must_use]
    pub const fn new(terms: Vec<OrderTerm>) -> Self {
        Self(terms)
    }

    /// Normalize loose items into a canonical order.
    ///
    /// Every primary-key field not already present as a plain term is
    /// appended as `ASC`, which makes the order total, unless
    /// `omit_primary_key` is set. Duplicates are kept and column existence is
    /// not checked; both are the data store's concern.
    pub fn normalize(
        items: &[OrderItem],
        primary_key: &[String],
        omit_primary_key: bool,
    ) -> Result<Self, OrderError> {
        let mut terms = items
            .iter()
            .cloned()
            .map(OrderItem::into_term)
            .collect::<Result<Vec<_>, _>>()?;

        if !omit_primary_key {
            let missing: Vec<&String> = primary_key
                .iter()
                .filter(|pk| {
                    !terms
                        .iter()
                        .any(|t| matches!(&t.column, ColumnRef::Column(c) if c == *pk))
                })
                .collect();
            terms.extend(missing.into_iter().map(|pk| OrderTerm::asc(pk.clone())));
        }

        Ok(Self(terms))
    }

    /// The order used to walk backward from a cursor.
    #[must_use]
    pub fn reversed(&self, enforce_null_order: bool) -> Self {
        Self(
            self.0
                .iter()
                .map(|t| t.reversed(enforce_null_order))
                .collect(),
        )
    }

    /// Terms in priority order.
    #[must_use]
    pub fn terms(&self) -> &[OrderTerm] {
        &self.0
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the order has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the terms.
    pub fn iter(&self) -> std::slice::Iter<'_, OrderTerm> {
        self.0.iter()
    }

    /// Compare two records under this order.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        self.0
            .iter()
            .map(|t| t.direction.compare(&t.column.read(a), &t.column.read(b)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<'a> IntoIterator for &'a Order {
    type Item = &'a OrderTerm;
    type IntoIter = std::slice::Iter<'a, OrderTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
