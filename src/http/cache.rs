//! HTTP cache validation module
//!
//! Provides `Last-Modified` formatting and `If-Modified-Since` evaluation.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let time: DateTime<Utc> = time.into();
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header value
///
/// Returns `None` for anything that is not a valid RFC 2822 style date.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Check whether the client's cached copy is still current
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no entity tags are
/// generated, its presence always means a full response. Comparison is done at whole
/// seconds because HTTP dates carry no sub-second part.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the client also sent If-None-Match
/// * `modified` - File modification time
///
/// # Returns
/// Returns true if the client copy is fresh (should return 304), false otherwise
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}
