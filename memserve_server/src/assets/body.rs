use std::cell::Cell;
use std::io::Read;

use bytes::Bytes;
use compact_str::CompactString;
use memserve_manifest::ContentEncoding;

use crate::error::BodyError;

/// A single-consumption streaming view of one stored asset representation.
///
/// A fresh body is created per request (never shared between requests), so
/// the `locked`/`disturbed`/`consumed` flags are request-local state. The
/// payload itself is a shared reference into the asset record's immutable
/// buffer; no bytes are copied.
#[derive(Debug)]
pub struct AssetBody {
    payload: Bytes,
    content_encoding: Option<ContentEncoding>,
    hash: CompactString,
    size: u64,
    locked: Cell<bool>,
    disturbed: Cell<bool>,
    consumed: Cell<bool>,
}

impl AssetBody {
    pub(crate) fn new(
        payload: Bytes,
        content_encoding: Option<ContentEncoding>,
        hash: CompactString,
        size: u64,
    ) -> Self {
        Self {
            payload,
            content_encoding,
            hash,
            size,
            locked: Cell::new(false),
            disturbed: Cell::new(false),
            consumed: Cell::new(false),
        }
    }

    /// Encoding of the selected representation, if it is not the identity.
    pub fn content_encoding(&self) -> Option<ContentEncoding> {
        self.content_encoding
    }

    /// Content hash of the selected representation.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// The hash in quoted entity-tag form, as served in the `ETag` header.
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.hash)
    }

    /// Size in bytes of the selected representation.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    pub fn is_disturbed(&self) -> bool {
        self.disturbed.get()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Consume the body and return the whole payload.
    ///
    /// Fails if the body was already consumed, a reader holds the lock, or
    /// the stream was disturbed (checked in that order). On success the body
    /// counts as consumed and, the payload being memory-resident, exhausted.
    pub fn bytes(&self) -> Result<Bytes, BodyError> {
        if self.consumed.get() {
            return Err(BodyError::AlreadyConsumed);
        }
        if self.locked.get() {
            return Err(BodyError::Locked);
        }
        if self.disturbed.get() {
            return Err(BodyError::Disturbed);
        }
        self.consumed.set(true);
        self.disturbed.set(true);
        Ok(self.payload.clone())
    }

    /// Borrow a streaming reader, locking the body until the reader is
    /// dropped. A second reader is rejected while the first one is alive.
    pub fn reader(&self) -> Result<BodyReader<'_>, BodyError> {
        if self.locked.get() {
            return Err(BodyError::Locked);
        }
        self.locked.set(true);
        Ok(BodyReader {
            body: self,
            position: 0,
        })
    }
}

/// Exclusive streaming reader over an [`AssetBody`].
///
/// Reading marks the body disturbed; dropping the reader releases the lock
/// (the web-stream `releaseLock` equivalent).
#[derive(Debug)]
pub struct BodyReader<'a> {
    body: &'a AssetBody,
    position: usize,
}

impl BodyReader<'_> {
    /// Abandon the stream. The body stays unconsumed but is disturbed, so a
    /// later full read fails with [`BodyError::Disturbed`].
    pub fn cancel(self) {
        self.body.disturbed.set(true);
    }
}

impl Read for BodyReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.body.disturbed.set(true);
        let remaining = &self.body.payload[self.position.min(self.body.payload.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

impl Drop for BodyReader<'_> {
    fn drop(&mut self) {
        self.body.locked.set(false);
    }
}
