//! Attachment-time pagination settings.

use serde::{Deserialize, Serialize};

/// Default name of the attached pagination method.
pub const DEFAULT_METHOD_NAME: &str = "paginate";

/// Primary-key field(s) appended to every order as the tie-break suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    /// A single key column, e.g. `"id"`.
    One(String),
    /// A composite key, e.g. `["tenant", "id"]`.
    Many(Vec<String>),
}

impl PrimaryKey {
    /// Key columns in order.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::One(field) => vec![field.clone()],
            Self::Many(fields) => fields.clone(),
        }
    }
}

impl From<&str> for PrimaryKey {
    fn from(field: &str) -> Self {
        Self::One(field.to_string())
    }
}

impl From<Vec<String>> for PrimaryKey {
    fn from(fields: Vec<String>) -> Self {
        Self::Many(fields)
    }
}

/// What to do when a request carries both `after` and `before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CursorPrecedence {
    /// Fail with [`PaginationError::ConflictingCursors`](crate::PaginationError::ConflictingCursors).
    #[default]
    Reject,
    /// Honor `after` and ignore `before`.
    After,
}

/// Pagination settings, deserializable from camelCase JSON.
///
/// ```
/// use seekpage::{PaginateConfig, PrimaryKey};
///
/// let config: PaginateConfig =
///     serde_json::from_str(r#"{"methodName": "list", "primaryKeyField": ["tenant", "id"]}"#)
///         .unwrap();
/// assert_eq!(config.method_name, "list");
/// assert_eq!(
///     config.primary_key_field,
///     Some(PrimaryKey::Many(vec!["tenant".into(), "id".into()]))
/// );
/// assert!(!config.strict_cursors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PaginateConfig {
    /// Name the pagination method answers to.
    pub method_name: String,
    /// Tie-break key; `None` asks the data source.
    pub primary_key_field: Option<PrimaryKey>,
    /// Skip appending the primary key to the order.
    pub omit_primary_key_from_order: bool,
    /// Fail on malformed or mismatched cursors instead of serving the first page.
    pub strict_cursors: bool,
    /// Handling of requests carrying both cursors.
    pub cursor_precedence: CursorPrecedence,
}

impl Default for PaginateConfig {
    fn default() -> Self {
        Self {
            method_name: DEFAULT_METHOD_NAME.to_string(),
            primary_key_field: None,
            omit_primary_key_from_order: false,
            strict_cursors: false,
            cursor_precedence: CursorPrecedence::default(),
        }
    }
}

impl PaginateConfig {
    /// Default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method name.
    #[must_use]
    pub fn method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = name.into();
        self
    }

    /// Set the primary-key field(s).
    #[must_use]
    pub fn primary_key_field(mut self, key: impl Into<PrimaryKey>) -> Self {
        self.primary_key_field = Some(key.into());
        self
    }

    /// Skip appending the primary key to the order.
    #[must_use]
    pub const fn omit_primary_key_from_order(mut self, omit: bool) -> Self {
        self.omit_primary_key_from_order = omit;
        self
    }

    /// Fail on malformed or mismatched cursors.
    #[must_use]
    pub const fn strict_cursors(mut self, strict: bool) -> Self {
        self.strict_cursors = strict;
        self
    }

    /// Set the handling of requests carrying both cursors.
    #[must_use]
    pub const fn cursor_precedence(mut self, precedence: CursorPrecedence) -> Self {
        self.cursor_precedence = precedence;
        self
    }
}
