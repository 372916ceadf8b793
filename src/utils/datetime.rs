//! Date and time formatting for entry timestamps
//!
//! Entries carry UTC timestamps; these helpers render them in local time the
//! way the command-line consumer shows them.

use chrono::{DateTime, Local, Utc};

/// Medium time style, e.g. `14:03:27`
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Date and medium time, e.g. `2025-01-31 14:03:27`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp as local time of day
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

/// Format a timestamp as local date and time
pub fn format_date_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format(DATE_TIME_FORMAT).to_string()
}

/// Format a timestamp relative to `now`, e.g. "just now", "5m ago", "3h ago"
///
/// Anything older than a day falls back to [`format_date_time`].
pub fn format_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(timestamp);
    if age.num_seconds() < 60 {
        "just now".to_string()
    } else if age.num_minutes() < 60 {
        format!("{}m ago", age.num_minutes())
    } else if age.num_hours() < 24 {
        format!("{}h ago", age.num_hours())
    } else {
        format_date_time(timestamp)
    }
}
