//! Keyset pagination condition generation.

use crate::cursor::Cursor;
use crate::order::{NullsOrder, Order, OrderTerm};
use crate::predicate::{Condition, Operator, Predicate, and, or};
use crate::value::Value;

/// Keyset pagination condition.
///
/// Expresses "strictly after this row under this order" as a [`Predicate`]
/// for the data-store collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetCondition {
    /// The order walked from the cursor. Already reversed for `before`.
    pub order: Order,
    /// The cursor values, one per order term.
    pub cursor_values: Vec<Value>,
}

impl KeysetCondition {
    /// Condition selecting rows after `cursor` under `order`.
    ///
    /// Returns `None` when the order is empty or the cursor does not carry
    /// exactly one value per term.
    #[must_use]
    pub fn new(order: &Order, cursor: &Cursor) -> Option<Self> {
        if order.is_empty() || !cursor.is_valid_for(order) {
            return None;
        }
        Some(Self {
            order: order.clone(),
            cursor_values: cursor.values().to_vec(),
        })
    }

    /// Alias of [`KeysetCondition::new`] for forward traversal.
    #[must_use]
    pub fn after(order: &Order, cursor: &Cursor) -> Option<Self> {
        Self::new(order, cursor)
    }

    /// Condition selecting rows before `cursor` under `order`.
    ///
    /// Walks the order reversed with NULL placement enforced, so the nearest
    /// predecessors come first. The caller reverses the fetched rows back.
    #[must_use]
    pub fn before(order: &Order, cursor: &Cursor) -> Option<Self> {
        Self::new(&order.reversed(true), cursor)
    }

    /// Convert to a predicate.
    ///
    /// For terms `[t0, .., tn]` and values `[c0, .., cn]` this builds
    /// `(t0 ahead of c0) OR (t0 = c0 AND <same for the remaining terms>)`.
    ///
    /// For `a ASC, b ASC` after `(1, 2)`: `a > 1 OR (a = 1 AND b > 2)`.
    ///
    /// "Ahead" is `>` for ascending terms and `<` for descending ones, with
    /// two corrections on every term but the last:
    ///
    /// - a `NULL` cursor value under NULLS FIRST becomes `IS NOT NULL`, since
    ///   every non-null value sorts after it;
    /// - a non-null cursor value under NULLS LAST becomes `IS NULL OR <op> c`,
    ///   since `NULL` sorts after every value.
    ///
    /// See: <https://use-the-index-luke.com/no-offset>
    #[must_use]
    pub fn to_predicate(&self) -> Predicate {
        build(self.order.terms(), &self.cursor_values).unwrap_or_else(|| and(vec![]))
    }
}

/// Build the keyset predicate for `cursor` under `order`.
///
/// Returns `None` on an empty order or a cursor whose length does not match.
///
/// ```
/// use seekpage::{keyset_predicate, Cursor, Order, OrderTerm, Value};
///
/// let order = Order::new(vec![OrderTerm::asc("counter"), OrderTerm::asc("id")]);
/// let cursor = Cursor::new(vec![Value::Int(3), Value::Int(1)]);
/// assert!(keyset_predicate(&order, &cursor).is_some());
/// assert!(keyset_predicate(&order, &Cursor::new(vec![Value::Int(3)])).is_none());
/// ```
#[must_use]
pub fn keyset_predicate(order: &Order, cursor: &Cursor) -> Option<Predicate> {
    KeysetCondition::new(order, cursor).map(|c| c.to_predicate())
}

fn build(terms: &[OrderTerm], values: &[Value]) -> Option<Predicate> {
    let (term, rest_terms) = terms.split_first()?;
    let (value, rest_values) = values.split_first()?;

    let ahead = ahead_of(term, value, !rest_terms.is_empty());
    let Some(rest) = build(rest_terms, rest_values) else {
        return Some(ahead);
    };
    let tied = compare(term, Operator::Eq, value.clone());
    Some(or(vec![ahead, and(vec![tied, rest])]))
}

fn ahead_of(term: &OrderTerm, value: &Value, has_next: bool) -> Predicate {
    let op = term.direction.comparison();
    if !has_next {
        return compare(term, op, value.clone());
    }
    match (value.is_null(), term.direction.nulls()) {
        (true, NullsOrder::First) => Predicate::not_null(term.column.clone()),
        (false, NullsOrder::Last) => or(vec![
            Predicate::is_null(term.column.clone()),
            compare(term, op, value.clone()),
        ]),
        _ => compare(term, op, value.clone()),
    }
}

fn compare(term: &OrderTerm, op: Operator, value: Value) -> Predicate {
    Predicate::Simple(Condition {
        column: term.column.clone(),
        op,
        value,
    })
}
