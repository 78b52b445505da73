//! Display helpers shared by the terminal front ends.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

/// Fallback when a configured format string does not parse.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `format` if chrono accepts every specifier in it, else the default.
///
/// chrono panics while rendering an invalid format, so user-supplied
/// strings go through here once at startup.
pub fn checked_date_format(format: &str) -> String {
    let invalid = format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if invalid {
        DEFAULT_DATE_FORMAT.to_string()
    } else {
        format.to_string()
    }
}

/// Render `at` in local time.
pub fn local_timestamp(at: &DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}

/// First line of `text`, cut to `max_chars` with a trailing ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    let first = text.trim().lines().next().unwrap_or_default();
    let multiline = text.trim().lines().nth(1).is_some();
    if first.chars().count() <= max_chars && !multiline {
        return first.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = first.chars().take(keep).collect();
    out.push_str("...");
    out
}
