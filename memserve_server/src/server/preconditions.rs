//! Conditional-request evaluation (RFC 9110 §13.2.2, GET/HEAD traffic).

use http::header::{CACHE_CONTROL, CONTENT_LOCATION, ETAG, EXPIRES, HeaderMap, HeaderName, VARY};
use http::{Request, Response, StatusCode};

use super::headers::{check_if_none_match, if_modified_since, if_none_match_entries};
use crate::assets::{AssetBody, AssetRecord};

/// The only headers a 304 response may carry over from the prepared 200
/// response. Notably absent: `Content-Type` and every payload header.
const NOT_MODIFIED_HEADERS: [HeaderName; 5] = [CONTENT_LOCATION, ETAG, VARY, CACHE_CONTROL, EXPIRES];

/// Evaluate the request's preconditions against an asset and the headers
/// already prepared for the would-be 200 response.
///
/// `If-None-Match` is evaluated first; when that header is present at all,
/// `If-Modified-Since` is ignored. Returns the finished 304 response when a
/// precondition short-circuits, `None` when the caller should proceed with
/// the full response.
pub(crate) fn handle_preconditions<B>(
    request: &Request<B>,
    asset: &AssetRecord,
    response_headers: &HeaderMap,
) -> Option<Response<Option<AssetBody>>> {
    let entries = if_none_match_entries(request.headers());
    if !entries.is_empty() {
        let etag = response_headers
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if check_if_none_match(etag, &entries) {
            return None;
        }
        return Some(not_modified(response_headers));
    }

    if let Some(since) = if_modified_since(request.headers()) {
        if asset.file_info().last_modified_time <= since {
            return Some(not_modified(response_headers));
        }
    }

    None
}

fn not_modified(response_headers: &HeaderMap) -> Response<Option<AssetBody>> {
    let mut response = Response::new(None);
    *response.status_mut() = StatusCode::NOT_MODIFIED;
    *response.headers_mut() = super::headers::headers_subset(response_headers, &NOT_MODIFIED_HEADERS);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::HeaderValue;
    use http::header::{CONTENT_TYPE, LAST_MODIFIED};
    use memserve_manifest::{AssetKey, AssetMetadata, FileInfo};
    use pretty_assertions::assert_eq;

    fn asset(last_modified_time: u64) -> AssetRecord {
        let metadata = AssetMetadata {
            kind: "wasm-inline".into(),
            content_type: "text/html".into(),
            file_info: FileInfo {
                hash: "h1".into(),
                size: 2,
                asset_path: "index.html".into(),
                last_modified_time,
            },
            is_text: true,
        };
        AssetRecord::new(AssetKey::new("/index.html"), metadata, Bytes::from_static(b"ok"))
    }

    fn prepared_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        headers.insert(ETAG, HeaderValue::from_static("\"h1\""));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=31536000"));
        headers.insert(
            LAST_MODIFIED,
            HeaderValue::from_static("Tue, 14 Nov 2023 22:13:20 GMT"),
        );
        headers
    }

    fn request(headers: &[(&HeaderName, &str)]) -> Request<()> {
        let mut builder = Request::builder().method("GET").uri("/index.html");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_matching_etag_yields_304_with_restricted_headers() {
        use http::header::IF_NONE_MATCH;
        let request = request(&[(&IF_NONE_MATCH, "\"h1\"")]);
        let response = handle_preconditions(&request, &asset(1700000000), &prepared_headers())
            .expect("must short-circuit");
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.body().is_none());
        assert_eq!(response.headers().get(ETAG).unwrap(), "\"h1\"");
        assert_eq!(response.headers().get(CACHE_CONTROL).unwrap(), "max-age=31536000");
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert!(response.headers().get(LAST_MODIFIED).is_none());
    }

    #[test]
    fn test_wildcard_always_matches() {
        use http::header::IF_NONE_MATCH;
        let request = request(&[(&IF_NONE_MATCH, "*")]);
        let response = handle_preconditions(&request, &asset(0), &prepared_headers());
        assert_eq!(response.unwrap().status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_if_none_match_takes_precedence_over_if_modified_since() {
        use http::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
        // ETag matches, so the (much older) If-Modified-Since must not be
        // consulted: still 304.
        let request = request(&[
            (&IF_NONE_MATCH, "\"h1\""),
            (&IF_MODIFIED_SINCE, "Thu, 01 Jan 1970 00:00:01 GMT"),
        ]);
        let response = handle_preconditions(&request, &asset(1700000000), &prepared_headers());
        assert_eq!(response.unwrap().status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_failed_if_none_match_skips_if_modified_since() {
        use http::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
        // ETag differs → proceed, even though If-Modified-Since alone would
        // have produced a 304.
        let request = request(&[
            (&IF_NONE_MATCH, "\"other\""),
            (&IF_MODIFIED_SINCE, "Tue, 14 Nov 2023 22:13:20 GMT"),
        ]);
        assert!(handle_preconditions(&request, &asset(1700000000), &prepared_headers()).is_none());
    }

    #[test]
    fn test_if_modified_since_at_or_after_mtime_yields_304() {
        use http::header::IF_MODIFIED_SINCE;
        let request = request(&[(&IF_MODIFIED_SINCE, "Tue, 14 Nov 2023 22:13:20 GMT")]);
        let response = handle_preconditions(&request, &asset(1700000000), &prepared_headers());
        assert_eq!(response.unwrap().status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_if_modified_since_before_mtime_proceeds() {
        use http::header::IF_MODIFIED_SINCE;
        let request = request(&[(&IF_MODIFIED_SINCE, "Tue, 14 Nov 2023 00:00:00 GMT")]);
        assert!(handle_preconditions(&request, &asset(1700000000), &prepared_headers()).is_none());
    }

    #[test]
    fn test_unparsable_if_modified_since_is_ignored() {
        use http::header::IF_MODIFIED_SINCE;
        let request = request(&[(&IF_MODIFIED_SINCE, "yesterday-ish")]);
        assert!(handle_preconditions(&request, &asset(1700000000), &prepared_headers()).is_none());
    }

    #[test]
    fn test_no_conditional_headers_proceeds() {
        let request = request(&[]);
        assert!(handle_preconditions(&request, &asset(1700000000), &prepared_headers()).is_none());
    }
}
