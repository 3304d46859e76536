//! Cache-Control policy selection.

use memserve_manifest::ServerConfig;

/// Cache-Control treatment requested for a response.
///
/// The dispatcher picks `Extended` for paths on the extended-cache list and
/// `Never` for fallback pages (SPA entrypoint, 404 page); everything else
/// gets no `Cache-Control` header at all.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CachePolicy {
    /// Immutable-ish content: `max-age=31536000`.
    Extended,
    /// Fallback responses that must not be cached: `no-store`.
    Never,
}

impl CachePolicy {
    pub(crate) const fn header_value(self) -> &'static str {
        match self {
            CachePolicy::Extended => "max-age=31536000",
            CachePolicy::Never => "no-store",
        }
    }
}

/// Whether a request path is on the extended-cache list. Entries are tried
/// in configured order; any single match decides.
pub(crate) fn extended_cache_matches(config: &ServerConfig, path: &str) -> bool {
    config
        .extended_cache
        .iter()
        .any(|matcher| matcher.matches(path))
}
