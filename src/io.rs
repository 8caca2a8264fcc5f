pub mod csv;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive formats, interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse an RFC 3339 timestamp, or a naive one in UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let value = value.trim();
    let error = match DateTime::parse_from_rfc3339(value) {
        Ok(timestamp) => return Ok(timestamp.to_utc()),
        Err(error) => error,
    };
    if let Ok(timestamp) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(timestamp.to_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|timestamp| timestamp.and_utc())
        .ok_or(error)
}
