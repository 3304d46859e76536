//! Error types of the serving core.

use memserve_manifest::AssetKey;
use thiserror::Error;

/// Errors raised while populating the asset table at startup.
///
/// Every variant is fatal: the load is aborted as a whole and no partial
/// table is handed out.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The manifest names an asset kind this build does not support.
    #[error("Unknown content asset type '{kind}'")]
    UnsupportedAssetKind { kind: String },

    /// The host's payload source could not produce bytes for an entry.
    #[error("failed to load payload for '{key}': {source}")]
    PayloadUnavailable {
        key: AssetKey,
        source: std::io::Error,
    },
}

/// Contract violations raised by [`AssetBody`](crate::AssetBody) read
/// operations within a single request.
///
/// These indicate caller bugs (double read, concurrent readers, reading
/// after cancel), never data problems, and are reported synchronously by
/// the violating operation.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum BodyError {
    /// The body's full-read operation was already performed.
    #[error("Body has already been consumed")]
    AlreadyConsumed,

    /// A reader currently holds the body's lock.
    #[error("Body is already locked and can't be consumed")]
    Locked,

    /// The underlying stream was already read from or cancelled.
    #[error("Body object should not be disturbed or locked")]
    Disturbed,
}
