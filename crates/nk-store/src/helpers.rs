//! Timestamp and row helpers shared by both backends.
//!
//! Stored timestamps use the shape a browser's `toISOString()` produces
//! (`2026-01-02T03:04:05.678Z`), so records written by any client of the
//! collection parse and sort the same way.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::StoreError;

/// Current time truncated to what a stored timestamp can hold.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[must_use]
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// Accepts any RFC 3339 offset and `SQLite`'s `datetime('now')` format
/// (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `StoreError::Parse` if the string matches neither format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::Parse(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional timestamp. Absent and empty both read as `None`.
///
/// # Errors
///
/// Returns `StoreError::Parse` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, StoreError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable TEXT column.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `StoreError::LibSql` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, StoreError> {
    Ok(row.get::<Option<String>>(idx)?)
}
