//! Common SQL storage helpers for SQLite and PostgreSQL
//!
//! Both backends store timestamps as unix seconds, so the row-to-record
//! conversions share these helpers.

use chrono::{DateTime, Utc};

/// Convert DateTime to a unix-seconds column value
#[inline]
pub fn datetime_to_unix(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

/// Parse DateTime from a unix-seconds column value
#[inline]
pub fn datetime_from_unix(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_else(Utc::now)
}

/// Parse optional DateTime from a nullable unix-seconds column
#[inline]
pub fn opt_datetime_from_unix(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.map(datetime_from_unix)
}
