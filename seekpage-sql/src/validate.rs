//! Identifier validation for SQL injection prevention.
//!
//! Table names, join aliases and column names reach the SQL text unescaped
//! (inside double quotes), so every one of them is checked here first.
//! Values are always bound as parameters and never validated.

use crate::error::SqlError;

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string is a safe SQL identifier.
///
/// A valid SQL identifier:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
/// - Is not empty and not longer than 63 characters
///
/// # Examples
///
/// ```
/// use seekpage_sql::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("tests"));
/// assert!(is_valid_sql_identifier("personId"));
/// assert!(is_valid_sql_identifier("_private"));
///
/// assert!(!is_valid_sql_identifier(""));
/// assert!(!is_valid_sql_identifier("123abc"));
/// assert!(!is_valid_sql_identifier("persons.name"));
/// assert!(!is_valid_sql_identifier("name\"; DROP"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check an identifier, naming what it was used for on failure.
pub(crate) fn check_identifier(name: &str, context: &'static str) -> Result<(), SqlError> {
    if is_valid_sql_identifier(name) {
        Ok(())
    } else {
        Err(SqlError::InvalidIdentifier {
            context,
            name: name.to_string(),
        })
    }
}
