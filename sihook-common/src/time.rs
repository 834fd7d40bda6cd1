//! Timestamp utilities

use chrono::{DateTime, NaiveDateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Check whether a wall-clock timestamp lies strictly before the current UTC time
///
/// The timestamp carries no zone; it is compared as if it were UTC.
pub fn is_before_now(timestamp: &NaiveDateTime) -> bool {
    *timestamp < now().naive_utc()
}
