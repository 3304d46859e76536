use regex::Regex;

use crate::key::AssetKey;

/// Fully-normalized static server configuration.
///
/// Normalization (default values, path cleanup, pattern compilation) is the
/// job of the embedding host's configuration loader; the serving core treats
/// every field here as final.
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Prefix prepended to the request path before table lookup, mapping the
    /// public URL space onto the manifest key space.
    pub public_dir_prefix: String,
    /// Extension suffixes tried, in order, when a direct lookup misses.
    pub auto_ext: Vec<String>,
    /// Directory index file names tried, in order, for directory-shaped paths.
    pub auto_index: Vec<String>,
    /// Content encodings the server is willing to negotiate. Empty disables
    /// negotiation entirely.
    pub compression: Vec<ContentEncoding>,
    /// Paths granted a long-lived `Cache-Control`. First match wins.
    pub extended_cache: Vec<PathMatcher>,
    /// Asset served for unmatched HTML-accepting requests (client-side
    /// routing entrypoint), if any.
    pub spa_entrypoint: Option<AssetKey>,
    /// Asset served as the 404 page for unmatched HTML-accepting requests,
    /// if any.
    pub not_found_page: Option<AssetKey>,
}

/// One entry of the extended-cache path list.
#[derive(Clone, Debug)]
pub enum PathMatcher {
    /// Matches the path exactly, or as a prefix when the literal ends in `/`.
    Literal(String),
    /// Matches when the compiled pattern tests positive anywhere in the path.
    Pattern(Regex),
}

impl PathMatcher {
    /// Test a request path against this matcher.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Literal(literal) if literal.ends_with('/') => path.starts_with(literal.as_str()),
            PathMatcher::Literal(literal) => literal.as_str() == path,
            PathMatcher::Pattern(pattern) => pattern.is_match(path),
        }
    }
}

/// Content encodings the negotiator understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ContentEncoding {
    Br,
    Gzip,
}

impl ContentEncoding {
    /// Parse an `Accept-Encoding` token. Unknown tokens yield `None` and are
    /// dropped by the negotiator rather than treated as errors.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "br" => Some(ContentEncoding::Br),
            "gzip" => Some(ContentEncoding::Gzip),
            _ => None,
        }
    }

    /// The token used in `Accept-Encoding` and `Content-Encoding` headers.
    pub const fn token(self) -> &'static str {
        match self {
            ContentEncoding::Br => "br",
            ContentEncoding::Gzip => "gzip",
        }
    }
}

impl std::fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
