//! Date and time utilities

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};

/// Parse a duration such as "3600", "45s", "30m", "1h" or "7d"
///
/// A bare number is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("Empty duration");
    }

    let (digits, unit) = match trimmed.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => trimmed.split_at(idx),
        None => (trimmed, "s"),
    };

    let amount: i64 = digits
        .parse()
        .with_context(|| format!("Invalid duration '{}'", input))?;

    let duration = match unit.trim() {
        "s" => Duration::seconds(amount),
        "m" => Duration::minutes(amount),
        "h" => Duration::hours(amount),
        "d" => Duration::days(amount),
        other => bail!("Unknown duration unit '{}' in '{}'", other, input),
    };

    if duration <= Duration::zero() {
        bail!("Duration must be positive: '{}'", input);
    }

    Ok(duration)
}

/// Parse an ISO-8601 calendar date ("YYYY-MM-DD")
///
/// A full timestamp is accepted and truncated to its date part.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
