//! Data model for the memserve static asset pipeline: the manifest emitted
//! by the build step and the normalized server configuration consumed by
//! [`memserve_server`](https://docs.rs/memserve_server).
//!
//! This crate contains no I/O and no request-time logic. The manifest is an
//! opaque build artifact to everything here; the configuration is expected
//! to arrive fully normalized (defaults applied, patterns compiled) from the
//! embedding host.

mod config;
mod key;
mod manifest;
mod metadata;

pub use crate::config::*;
pub use crate::key::*;
pub use crate::manifest::*;
pub use crate::metadata::*;
