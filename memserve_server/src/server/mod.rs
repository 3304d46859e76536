//! The static server: request dispatch, response assembly, and the
//! decision helpers it is composed of.

mod cache;
mod encoding;
mod headers;
mod preconditions;
mod resolve;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use http::header::{
    ACCEPT, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_TYPE, ETAG, HeaderMap, HeaderValue,
    LAST_MODIFIED,
};
use http::{Method, Request, Response, StatusCode};
use memserve_manifest::{ContentEncoding, ServerConfig};
use tracing::{debug, warn};

use crate::assets::{AssetBody, AssetRecord, AssetTable};

pub use cache::CachePolicy;
pub use encoding::accept_encoding_groups;

/// A response produced by the static server. The body is absent on 304s.
pub type AssetResponse = Response<Option<AssetBody>>;

/// Per-response knobs passed to [`StaticServer::serve_asset`].
#[derive(Default)]
pub struct AssetInit {
    /// Response status; defaults to 200.
    pub status: Option<StatusCode>,
    /// Header overrides applied on top of the seeded `Content-Type`.
    pub headers: Option<HeaderMap>,
    /// Cache-Control policy; `None` adds no header.
    pub cache: Option<CachePolicy>,
}

/// Serves assets from a startup-populated [`AssetTable`] according to a
/// normalized [`ServerConfig`].
///
/// The server holds no mutable state: requests may be handled concurrently
/// with plain shared references.
pub struct StaticServer {
    config: ServerConfig,
    assets: AssetTable,
}

impl StaticServer {
    pub fn new(config: ServerConfig, assets: AssetTable) -> Self {
        Self { config, assets }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    /// Resolve a request path to an asset (direct, auto-ext, auto-index).
    pub fn matching_asset(&self, path: &str) -> Option<Arc<AssetRecord>> {
        resolve::matching_asset(&self.config, &self.assets, path)
    }

    /// Negotiate the request's `Accept-Encoding` against the configured
    /// compression list.
    pub fn accept_encodings<B>(&self, request: &Request<B>) -> Vec<Vec<ContentEncoding>> {
        encoding::accept_encoding_groups(request.headers(), &self.config.compression)
    }

    /// Whether a request path gets the long-lived Cache-Control treatment.
    pub fn extended_cache_matches(&self, path: &str) -> bool {
        cache::extended_cache_matches(&self.config, path)
    }

    /// Evaluate request preconditions against prepared response headers.
    pub fn handle_preconditions<B>(
        &self,
        request: &Request<B>,
        asset: &AssetRecord,
        response_headers: &HeaderMap,
    ) -> Option<AssetResponse> {
        preconditions::handle_preconditions(request, asset, response_headers)
    }

    /// Assemble the response for one resolved asset.
    ///
    /// Seeds `Content-Type`, applies caller overrides and the cache policy,
    /// negotiates the encoding, stamps `ETag`/`Last-Modified`, and runs the
    /// precondition check, which may replace everything with a 304.
    pub fn serve_asset<B>(
        &self,
        request: &Request<B>,
        asset: &AssetRecord,
        init: AssetInit,
    ) -> AssetResponse {
        let mut headers = HeaderMap::new();
        set_header(&mut headers, CONTENT_TYPE, asset.content_type());
        if let Some(overrides) = init.headers {
            headers.extend(overrides);
        }
        if let Some(policy) = init.cache {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static(policy.header_value()));
        }

        let accept_encodings = self.accept_encodings(request);
        let entry = asset.store_entry(&accept_encodings);
        if let Some(encoding) = entry.content_encoding() {
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static(encoding.token()));
        }
        set_header(&mut headers, ETAG, &entry.etag());
        let mtime = asset.file_info().last_modified_time;
        if mtime != 0 {
            let date = httpdate::fmt_http_date(UNIX_EPOCH + Duration::from_secs(mtime));
            set_header(&mut headers, LAST_MODIFIED, &date);
        }

        if let Some(not_modified) = self.handle_preconditions(request, asset, &headers) {
            return not_modified;
        }

        let mut response = Response::new(Some(entry));
        *response.status_mut() = init.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = headers;
        response
    }

    /// Handle one inbound request.
    ///
    /// Returns `None` for non-GET/HEAD methods and for misses the fallback
    /// configuration cannot cover; producing the generic 404 is then the
    /// embedding host's job.
    pub fn serve_request<B>(&self, request: &Request<B>) -> Option<AssetResponse> {
        if request.method() != Method::GET && request.method() != Method::HEAD {
            return None;
        }
        let path = request.uri().path();

        if let Some(asset) = self.matching_asset(path) {
            let cache = self
                .extended_cache_matches(path)
                .then_some(CachePolicy::Extended);
            return Some(self.serve_asset(
                request,
                &asset,
                AssetInit {
                    cache,
                    ..AssetInit::default()
                },
            ));
        }

        if accepts_text_html(request.headers()) {
            if let Some(key) = &self.config.spa_entrypoint {
                if let Some(asset) = self.assets.get(key) {
                    debug!(path, %key, "serving SPA entrypoint for unmatched path");
                    return Some(self.serve_asset(
                        request,
                        &asset,
                        AssetInit {
                            cache: Some(CachePolicy::Never),
                            ..AssetInit::default()
                        },
                    ));
                }
            }
            if let Some(key) = &self.config.not_found_page {
                if let Some(asset) = self.assets.get(key) {
                    debug!(path, %key, "serving not-found page for unmatched path");
                    return Some(self.serve_asset(
                        request,
                        &asset,
                        AssetInit {
                            status: Some(StatusCode::NOT_FOUND),
                            cache: Some(CachePolicy::Never),
                            ..AssetInit::default()
                        },
                    ));
                }
            }
        }

        None
    }
}

/// Whether the request's `Accept` header tolerates an HTML response.
///
/// HTML is refused only when the header lists a bare `*` range while naming
/// neither `text/html` nor `*/*`; in particular an absent header accepts
/// HTML.
fn accepts_text_html(request_headers: &HeaderMap) -> bool {
    let value = headers::joined_header_value(request_headers, &ACCEPT).unwrap_or_default();
    let accept: HashSet<&str> = value
        .split(',')
        .map(|entry| entry.split(';').next().unwrap_or_default().trim())
        .collect();
    !(accept.contains("*") && !accept.contains("text/html") && !accept.contains("*/*"))
}

fn set_header(headers: &mut HeaderMap, name: http::header::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => warn!(%name, "dropping response header with invalid value"),
    }
}
