//! Runtime JSON parsing for Mongo-style caller filters.
//!
//! # Supported Syntax
//!
//! | Syntax | Example | Predicate |
//! |--------|---------|-----------|
//! | Implicit `$eq` | `{"name": "Alice"}` | `name = 'Alice'` |
//! | `null` | `{"is_valid": null}` | `is_valid IS NULL` |
//! | Explicit operator | `{"age": {"$gte": 18}}` | `age >= 18` |
//! | Several operators | `{"age": {"$gte": 18, "$lt": 65}}` | `age >= 18 AND age < 65` |
//! | Multiple fields | `{"a": 1, "b": 2}` | `a = 1 AND b = 2` |
//! | `$and` | `{"$and": [{...}, {...}]}` | `(...) AND (...)` |
//! | `$or` | `{"$or": [{...}, {...}]}` | `(...) OR (...)` |
//! | Joined column | `{"$persons.name$": "bob"}` | `persons.name = 'bob'` |
//!
//! Operators: `$eq $ne $gt $gte $lt $lte`.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::predicate::{ColumnRef, CompoundPredicate, Condition, Operator, Predicate};
use crate::value::Value;

/// Error type for JSON filter parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Invalid JSON syntax or encoding.
    #[error("Invalid JSON syntax or encoding")]
    InvalidJson,
    /// Unknown operator (e.g., `$foo`).
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),
    /// Expected an object but got something else.
    #[error("Expected JSON object")]
    ExpectedObject,
    /// Expected an array but got something else.
    #[error("Expected JSON array")]
    ExpectedArray,
    /// Expected a scalar value but got something else.
    #[error("Expected a scalar value")]
    ExpectedValue,
    /// Field name is empty.
    #[error("Field name cannot be empty")]
    EmptyFieldName,
    /// Filter object is empty.
    #[error("Filter object cannot be empty")]
    EmptyFilter,
}

/// Parse a Mongo-style filter from a JSON string.
///
/// ```
/// use seekpage::{parse_where, simple, Operator};
///
/// let filter = parse_where(r#"{"extra": 3}"#).unwrap();
/// assert_eq!(filter, simple("extra", Operator::Eq, 3));
/// ```
pub fn parse_where(json_str: &str) -> Result<Predicate, ParseError> {
    Predicate::parse(json_str)
}

impl Predicate {
    /// Parse a Mongo-style filter from a JSON string.
    pub fn parse(json_str: &str) -> Result<Self, ParseError> {
        let json: JsonValue =
            serde_json::from_str(json_str).map_err(|_| ParseError::InvalidJson)?;
        Self::from_json(&json)
    }

    /// Parse a Mongo-style filter from a parsed JSON value.
    pub fn from_json(json: &JsonValue) -> Result<Self, ParseError> {
        let JsonValue::Object(obj) = json else {
            return Err(ParseError::ExpectedObject);
        };

        let mut predicates = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key.is_empty() {
                return Err(ParseError::EmptyFieldName);
            }

            if let Some(column) = joined_key(key) {
                predicates.push(parse_field_filter(column, value)?);
            } else if key.starts_with('$') {
                let compound = match key.as_str() {
                    "$and" => CompoundPredicate::and(parse_filter_array(value)?),
                    "$or" => CompoundPredicate::or(parse_filter_array(value)?),
                    _ => return Err(ParseError::UnknownOperator(key.clone())),
                };
                predicates.push(Self::Compound(compound));
            } else {
                predicates.push(parse_field_filter(ColumnRef::column(key.as_str()), value)?);
            }
        }

        // Combine multiple filters with implicit AND
        single_or_and(predicates)
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Self::from_json(&json).map_err(serde::de::Error::custom)
    }
}

/// `$alias.column$` addresses a column of a joined entity.
fn joined_key(key: &str) -> Option<ColumnRef> {
    let inner = key.strip_prefix('$')?.strip_suffix('$')?;
    let (alias, column) = inner.split_once('.')?;
    if alias.is_empty() || column.is_empty() {
        return None;
    }
    Some(ColumnRef::joined(alias, column))
}

fn single_or_and(mut predicates: Vec<Predicate>) -> Result<Predicate, ParseError> {
    match predicates.len() {
        0 => Err(ParseError::EmptyFilter),
        1 => Ok(predicates.remove(0)),
        _ => Ok(Predicate::Compound(CompoundPredicate::and(predicates))),
    }
}

/// Parse an array of filter expressions (for $and/$or).
fn parse_filter_array(json: &JsonValue) -> Result<Vec<Predicate>, ParseError> {
    let JsonValue::Array(arr) = json else {
        return Err(ParseError::ExpectedArray);
    };
    arr.iter().map(Predicate::from_json).collect()
}

/// Parse a field filter: `{"$op": value, ...}` or just `value` (implicit $eq).
fn parse_field_filter(column: ColumnRef, value: &JsonValue) -> Result<Predicate, ParseError> {
    let JsonValue::Object(ops) = value else {
        return Ok(condition(column, Operator::Eq, scalar(value)?));
    };
    single_or_and(parse_operators(&column, ops)?)
}

fn parse_operators(
    column: &ColumnRef,
    ops: &Map<String, JsonValue>,
) -> Result<Vec<Predicate>, ParseError> {
    ops.iter()
        .map(|(op_key, op_value)| {
            if !op_key.starts_with('$') {
                return Err(ParseError::ExpectedValue);
            }
            let op = Operator::from_mongo(op_key)
                .ok_or_else(|| ParseError::UnknownOperator(op_key.clone()))?;
            Ok(condition(column.clone(), op, scalar(op_value)?))
        })
        .collect()
}

fn scalar(json: &JsonValue) -> Result<Value, ParseError> {
    Value::from_json(json).ok_or(ParseError::ExpectedValue)
}

const fn condition(column: ColumnRef, op: Operator, value: Value) -> Predicate {
    Predicate::Simple(Condition { column, op, value })
}
