//! Input validation helpers used by the request handlers

use crate::error::{AppError, AppResult};
use crate::utils::dates::parse_iso_date;

/// Trim a required text field, failing when nothing is left
pub fn required_text(value: &str, msg: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(msg));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, collapsing blanks to `None`
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn positive_id(value: i64, msg: &str) -> AppResult<i64> {
    if value > 0 {
        Ok(value)
    } else {
        Err(AppError::validation(msg))
    }
}

pub fn optional_positive(value: Option<i64>, msg: &str) -> AppResult<Option<i64>> {
    match value {
        Some(v) if v <= 0 => Err(AppError::validation(msg)),
        other => Ok(other),
    }
}

/// Optional http(s) URL; empty strings count as absent
pub fn optional_url(value: Option<&str>, msg: &str) -> AppResult<Option<String>> {
    match optional_text(value) {
        Some(url) if !is_http_url(&url) => Err(AppError::validation(msg)),
        other => Ok(other),
    }
}

/// Optional ISO-8601 date, normalized to "YYYY-MM-DD"
pub fn optional_date(value: Option<&str>, msg: &str) -> AppResult<Option<String>> {
    match optional_text(value) {
        Some(raw) => parse_iso_date(&raw)
            .map(|d| Some(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| AppError::validation(msg)),
        None => Ok(None),
    }
}

/// Lowercased, trimmed email when it looks deliverable
pub fn normalize_email(value: &str) -> Option<String> {
    let email = value.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;

    if local.is_empty()
        || domain.len() < 3
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return None;
    }

    Some(email)
}

pub fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));

    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !rest.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
