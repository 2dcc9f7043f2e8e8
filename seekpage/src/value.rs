//! Scalar values carried by cursors and predicates.

use std::cmp::Ordering;

use serde_json::{Number, Value as JsonValue};

/// A scalar sort-key or filter value.
///
/// Only JSON-representable scalars are supported, which is what makes a
/// cursor round-trip exactly through its textual encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL `NULL` / JSON `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert from a JSON value.
    ///
    /// Objects and arrays are not scalars and yield `None`, as do unsigned
    /// integers that do not fit in an `i64`.
    ///
    /// ```
    /// use seekpage::Value;
    /// use serde_json::json;
    ///
    /// assert_eq!(Value::from_json(&json!(42)), Some(Value::Int(42)));
    /// assert_eq!(Value::from_json(&json!("a")), Some(Value::String("a".into())));
    /// assert_eq!(Value::from_json(&json!([1])), None);
    /// ```
    #[must_use]
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        match json {
            JsonValue::Null => Some(Self::Null),
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::Int(i))
                } else if n.is_u64() {
                    None
                } else {
                    n.as_f64().map(Self::Float)
                }
            },
            JsonValue::String(s) => Some(Self::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    /// Convert to a JSON value. Non-finite floats have no JSON form and become `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::Number(Number::from(*i)),
            Self::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::String(s) => JsonValue::String(s.clone()),
        }
    }

    /// Ordering between two non-null values.
    ///
    /// Numbers compare numerically across `Int` and `Float`, strings
    /// lexicographically, booleans `false < true`. Values of different kinds
    /// order by kind: booleans, then numbers, then strings. NULL placement is
    /// decided by the order term, so `Null` here only sorts before everything
    /// to keep the function total.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                let (a, b) = (self.as_f64(), other.as_f64());
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            },
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            _ => f64::NAN,
        }
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::String(_) => 3,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
