//! Timestamp encoding for the Any driver.
//!
//! The sqlx Any driver cannot decode `DateTime<Utc>` columns, so instants are
//! stored as RFC 3339 text in UTC with second precision. The format is fixed
//! width with a trailing `Z`, which makes lexicographic comparison of stored
//! values equivalent to chronological comparison; range queries rely on this.

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};

/// Encode an instant for storage, e.g. `2026-08-22T12:30:00Z`.
pub fn encode_ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Decode a stored instant.
pub fn decode_ts(s: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("bad timestamp {s:?}: {e}")))
}
