//! # Temporal Types: UTC-Only Timestamps
//!
//! `Timestamp` is UTC with a `Z` suffix, truncated to seconds. Record
//! versions carry their creation/update instants in this form so that the
//! canonical bytes of a record (and therefore its digest) do not depend on
//! the offset or sub-second precision of whoever produced it.
//!
//! Non-UTC inputs are rejected by [`Timestamp::parse`]; use
//! [`Timestamp::parse_lenient`] when ingesting external data.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            CoreError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Midnight UTC of a calendar date (`YYYY-MM-DD`).
    ///
    /// Agreement start/end bounds are usually supplied as bare dates.
    pub fn from_date(s: &str) -> Result<Self, CoreError> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| CoreError::InvalidTimestamp(format!("invalid date {s:?}: {e}")))?;
        let dt = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("invalid date {s:?}")))?;
        Ok(Self(dt.and_utc()))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
