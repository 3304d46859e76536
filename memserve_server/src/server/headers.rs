//! Conditional-request header parsing.
//!
//! All parsing here is permissive, per HTTP convention: malformed or
//! non-UTF-8 header values degrade to "header absent" and never raise
//! errors.

use std::time::{SystemTime, UNIX_EPOCH};

use http::header::{HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH};

/// Join every value of a (possibly repeated) header with `", "`, matching
/// the flattened-multimap view of request headers.
pub(crate) fn joined_header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Parse `If-None-Match` into its entity-tag entries: comma-split, trimmed,
/// empties dropped. Tags stay in their verbatim (quoted) form.
pub(crate) fn if_none_match_entries(headers: &HeaderMap) -> Vec<String> {
    joined_header_value(headers, &IF_NONE_MATCH)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Evaluate the `If-None-Match` condition against the response's ETag.
///
/// Returns `true` when the condition holds (the stored entity differs from
/// every listed tag, so processing continues) and `false` when a tag or the
/// `*` wildcard matched, which short-circuits to 304 for GET/HEAD.
pub(crate) fn check_if_none_match(etag: &str, entries: &[String]) -> bool {
    if entries.iter().any(|entry| entry == "*") {
        return false;
    }
    if entries.iter().any(|entry| entry == etag) {
        return false;
    }
    true
}

/// Parse `If-Modified-Since` into unix seconds, accepting an HTTP-date or an
/// ISO-8601 timestamp, floored to whole seconds. Unparsable values count as
/// absent.
pub(crate) fn if_modified_since(headers: &HeaderMap) -> Option<u64> {
    let value = joined_header_value(headers, &IF_MODIFIED_SINCE)?;
    parse_timestamp(&value)
}

fn parse_timestamp(value: &str) -> Option<u64> {
    if value.is_empty() {
        return None;
    }
    if let Ok(time) = httpdate::parse_http_date(value) {
        return unix_seconds(time);
    }
    let parsed = chrono::DateTime::parse_from_rfc3339(value).ok()?;
    u64::try_from(parsed.timestamp()).ok()
}

fn unix_seconds(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .map(|elapsed| elapsed.as_secs())
}

/// Copy the named headers (and only those) out of a prepared header map.
pub(crate) fn headers_subset(headers: &HeaderMap, keep: &[HeaderName]) -> HeaderMap {
    let mut subset = HeaderMap::new();
    for name in keep {
        for value in headers.get_all(name) {
            subset.append(name.clone(), value.clone());
        }
    }
    subset
}
