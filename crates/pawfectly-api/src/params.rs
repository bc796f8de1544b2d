//! Parse-or-reject helpers for query string values.

use crate::error::ApiError;

pub fn required_text<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))
}

pub fn required_id(value: Option<&str>, name: &str) -> Result<i64, ApiError> {
    required_text(value, name)?
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("{name} must be a numeric id")))
}
