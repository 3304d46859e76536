//! In-memory static asset serving with RFC 9110 conditional-request
//! handling.
//!
//! The serving core is the runtime half of a build pipeline that embeds
//! file bytes into a deployable unit: a manifest (see [`manifest`]) is
//! resolved into an [`AssetTable`] once at startup, and every request is
//! answered from memory; no filesystem or network I/O happens on the
//! request path.
//!
//! A [`StaticServer`] composes the pieces: path resolution (direct match,
//! auto-extension, auto-index), `Accept-Encoding` negotiation,
//! `If-None-Match`/`If-Modified-Since` precondition evaluation with 304
//! assembly, Cache-Control policy, and SPA/not-found fallbacks. Inbound and
//! outbound messages are plain [`http`] types; hooking the server into an
//! actual network boundary is the embedding host's job.

mod assets;
mod error;
pub mod server;

pub use memserve_manifest as manifest;

pub use assets::{
    AssetBody, AssetRecord, AssetTable, BodyReader, InMemorySource, PayloadSource,
    build_asset_table,
};
pub use error::{BodyError, LoadError};
pub use server::{AssetInit, AssetResponse, CachePolicy, StaticServer};
