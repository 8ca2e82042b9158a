//! Request field validation shared by the category and item routes.
//!
//! Every helper returns [`ApiError::BadRequest`] naming the offending field.

use whereisit_core::{CategoryId, Contact, ItemStatus};

use crate::error::{ApiError, ApiResult};

/// Longest category or item name accepted.
pub const MAX_NAME_LEN: usize = 255;

/// Longest username accepted.
pub const MAX_USERNAME_LEN: usize = 155;

/// Longest secret key accepted.
pub const MAX_KEY_LEN: usize = 255;

/// Trim a required text field and check its length in characters.
pub fn required_text(field: &str, value: &str, max_len: usize) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(ApiError::BadRequest(format!(
            "{} is too long: {} characters, at most {} allowed",
            field, len, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text. Blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A key must not be blank. It is passed on exactly as submitted.
pub fn required_key(field: &str, value: &str) -> ApiResult<String> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    key_length(field, value)?;
    Ok(value.to_string())
}

/// A replacement key may be absent or blank (keep the current key).
pub fn replacement_key(field: &str, value: Option<String>) -> ApiResult<Option<String>> {
    if let Some(key) = &value {
        key_length(field, key)?;
    }
    Ok(value)
}

fn key_length(field: &str, value: &str) -> ApiResult<()> {
    if value.chars().count() > MAX_KEY_LEN {
        return Err(ApiError::BadRequest(format!(
            "{} is too long: at most {} characters allowed",
            field, MAX_KEY_LEN
        )));
    }
    Ok(())
}

pub fn contact(value: &str) -> ApiResult<Contact> {
    Contact::parse(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub fn status(code: i32) -> ApiResult<ItemStatus> {
    ItemStatus::try_from(code).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// At least one category must be chosen. Duplicates are dropped.
pub fn categories(ids: &[CategoryId]) -> ApiResult<Vec<CategoryId>> {
    if ids.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one category is required".to_string(),
        ));
    }
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    Ok(ids)
}
