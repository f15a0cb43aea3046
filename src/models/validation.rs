//! Boundary validation helpers
//!
//! Raw form and query values arrive as strings. They are normalized here
//! before any service sees them.

use thiserror::Error;

/// A request value that could not be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for '{field}': {message}")]
pub struct ValidationError {
    /// Name of the offending form or query field
    pub field: String,
    /// Human readable reason
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Trim a value and drop it when blank
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an optional integer field; blank means absent
pub fn parse_optional_int(field: &str, raw: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ValidationError::new(field, format!("'{}' is not a whole number", value))),
    }
}

/// Require a non-blank field
pub fn required(field: &str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
