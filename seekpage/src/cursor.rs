//! Cursor encoding/decoding for pagination.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::order::Order;
use crate::source::Record;
use crate::value::Value;

/// Maximum allowed cursor size in bytes (4KB).
/// This prevents DoS attacks via oversized cursor payloads.
const MAX_CURSOR_SIZE: usize = 4 * 1024;

/// Maximum number of values allowed in a cursor.
const MAX_CURSOR_FIELDS: usize = 64;

/// A cursor: the sort-key values of one row, one per order term.
///
/// Cursors encode as a JSON array wrapped in URL-safe base64 without padding,
/// e.g. `[3,1]` becomes `WzMsMV0`.
///
/// # Security Note
///
/// Cursors use simple base64 encoding, **not encryption**. The cursor content
/// is easily decoded by clients. Do not sort on columns whose values must stay
/// private, since those values end up inside the token.
#[derive(Debug, Clone, PartialEq, Default)]
#[must_use = "cursor must be encoded with .encode() or used to build a keyset predicate"]
pub struct Cursor(Vec<Value>);

impl Cursor {
    /// Create a cursor from sort-key values.
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Read the sort-key tuple of `record` under `order`.
    ///
    /// Plain terms read the row's own column, joined terms read the value of
    /// the associated entity. Missing values are recorded as `null`.
    pub fn from_record<R: Record + ?Sized>(record: &R, order: &Order) -> Self {
        Self(order.iter().map(|term| term.column.read(record)).collect())
    }

    /// The sort-key values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cursor carries no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the cursor has one value per term of `order`.
    #[must_use]
    pub fn is_valid_for(&self, order: &Order) -> bool {
        self.0.len() == order.len()
    }

    /// Encode the cursor to an opaque URL-safe token.
    ///
    /// Note: This uses simple base64, not encryption. See [`Cursor`] security note.
    #[must_use]
    pub fn encode(&self) -> String {
        let json = JsonValue::Array(self.0.iter().map(Value::to_json).collect());
        URL_SAFE_NO_PAD.encode(json.to_string())
    }

    /// Decode a cursor from its token.
    ///
    /// Accepts the standard base64 alphabet and `=` padding as well.
    pub fn decode(encoded: &str) -> Result<Self, CursorError> {
        if encoded.is_empty() {
            return Err(CursorError::Empty);
        }
        // Check size before decoding to prevent DoS attacks
        if encoded.len() > MAX_CURSOR_SIZE {
            return Err(CursorError::TooLarge);
        }

        let normalized: String = encoded
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                c => c,
            })
            .collect();
        let bytes = URL_SAFE_NO_PAD
            .decode(normalized)
            .map_err(|_| CursorError::InvalidBase64)?;

        let json: JsonValue =
            serde_json::from_slice(&bytes).map_err(|_| CursorError::InvalidFormat)?;
        let JsonValue::Array(items) = json else {
            return Err(CursorError::InvalidFormat);
        };
        if items.len() > MAX_CURSOR_FIELDS {
            return Err(CursorError::TooManyFields);
        }

        items
            .iter()
            .map(Value::from_json)
            .collect::<Option<Vec<_>>>()
            .map(Self)
            .ok_or(CursorError::InvalidFormat)
    }
}

impl From<Vec<Value>> for Cursor {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Errors that can occur when parsing a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The token is empty.
    #[error("cursor is empty")]
    Empty,
    /// The base64 encoding is invalid.
    #[error("invalid base64 encoding in cursor")]
    InvalidBase64,
    /// The payload is not a JSON array of scalars.
    #[error("invalid cursor format (expected JSON array of scalars)")]
    InvalidFormat,
    /// The cursor exceeds the maximum allowed size.
    #[error("cursor exceeds maximum size ({}KB limit)", MAX_CURSOR_SIZE / 1024)]
    TooLarge,
    /// The cursor has too many values.
    #[error("cursor has too many fields (max {MAX_CURSOR_FIELDS})")]
    TooManyFields,
}

impl CursorError {
    /// Returns `true` if this is an encoding/format error.
    ///
    /// Includes `InvalidBase64` and `InvalidFormat`.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::InvalidBase64 | Self::InvalidFormat)
    }

    /// Returns `true` if this is a size/limit error.
    ///
    /// Includes `TooLarge` and `TooManyFields`.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLarge | Self::TooManyFields)
    }
}

/// Lenient decode: absent, empty or malformed tokens yield `None`.
///
/// ```
/// use seekpage::{parse_cursor, Cursor, Value};
///
/// let token = Cursor::new(vec![Value::Int(3), Value::Int(1)]).encode();
/// assert_eq!(parse_cursor(Some(&token)).unwrap().len(), 2);
/// assert!(parse_cursor(Some("not a cursor!")).is_none());
/// assert!(parse_cursor(None).is_none());
/// ```
#[must_use]
pub fn parse_cursor(token: Option<&str>) -> Option<Cursor> {
    token.into_cursor()
}

/// Trait for types that can be converted into a cursor.
///
/// Invalid or missing input converts to `None`, so request parameters can be
/// passed straight through.
pub trait IntoCursor {
    /// Convert into an optional cursor.
    /// Returns None if the input is invalid or missing.
    fn into_cursor(self) -> Option<Cursor>;
}

impl IntoCursor for Cursor {
    fn into_cursor(self) -> Option<Cursor> {
        Some(self)
    }
}

impl IntoCursor for &str {
    fn into_cursor(self) -> Option<Cursor> {
        Cursor::decode(self).ok()
    }
}

impl IntoCursor for String {
    fn into_cursor(self) -> Option<Cursor> {
        self.as_str().into_cursor()
    }
}

impl IntoCursor for &String {
    fn into_cursor(self) -> Option<Cursor> {
        self.as_str().into_cursor()
    }
}

impl<T: IntoCursor> IntoCursor for Option<T> {
    fn into_cursor(self) -> Option<Cursor> {
        self.and_then(IntoCursor::into_cursor)
    }
}
