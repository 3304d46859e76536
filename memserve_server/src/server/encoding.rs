//! `Accept-Encoding` negotiation.
//!
//! Qualities are fixed-point: ×1000 of the header's 0–1 q-value, truncated
//! to three decimal digits, defaulting to 1000 when no usable `q=` parameter
//! is present.

use http::header::{ACCEPT_ENCODING, HeaderMap};
use memserve_manifest::ContentEncoding;

use super::headers::joined_header_value;

const DEFAULT_QUALITY: u16 = 1000;

/// Parse the request's `Accept-Encoding` into priority-ordered groups of
/// equally-preferred encodings.
///
/// Encodings outside `accepted` are dropped. Groups are ordered by strictly
/// descending quality; within a group, encodings keep their header
/// appearance order. An empty `accepted` list disables negotiation: the
/// result is always empty. A missing or malformed header is not an error,
/// just an empty result.
pub fn accept_encoding_groups(
    headers: &HeaderMap,
    accepted: &[ContentEncoding],
) -> Vec<Vec<ContentEncoding>> {
    if accepted.is_empty() {
        return Vec::new();
    }
    let header = match joined_header_value(headers, &ACCEPT_ENCODING) {
        Some(value) => value,
        None => return Vec::new(),
    };

    let mut found: Vec<(ContentEncoding, u16)> = Vec::new();
    for token in header.split(',') {
        let token = token.trim();
        let mut parts = token.split(';');
        let name = parts.next().unwrap_or_default().trim();
        let quality = match parts.next().and_then(|param| param.strip_prefix("q=")) {
            None => DEFAULT_QUALITY,
            Some(raw) => {
                let value = raw.parse::<f64>().unwrap_or(1.0);
                (value.clamp(0.0, 1.0) * 1000.0).floor() as u16
            }
        };
        let Some(encoding) = ContentEncoding::from_token(name) else {
            continue;
        };
        if !accepted.contains(&encoding) {
            continue;
        }
        found.push((encoding, quality));
    }

    let mut by_quality: std::collections::BTreeMap<u16, Vec<ContentEncoding>> =
        std::collections::BTreeMap::new();
    for (encoding, quality) in found {
        by_quality.entry(quality).or_default().push(encoding);
    }
    by_quality.into_iter().rev().map(|(_, group)| group).collect()
}
