use bytes::Bytes;
use compact_str::CompactString;
use memserve_manifest::{AssetKey, AssetMetadata, ContentEncoding, FileInfo};

use super::body::AssetBody;

/// One stored representation of an asset payload.
#[derive(Clone, Debug)]
struct StoredSource {
    payload: Bytes,
    hash: CompactString,
    size: u64,
}

/// In-memory representation of one servable file: immutable metadata plus
/// payload bytes captured once at load time.
///
/// Records are immutable for the process lifetime. Request handling never
/// touches a record directly for payload access; it asks for a fresh
/// [`AssetBody`] per request via [`store_entry`](AssetRecord::store_entry),
/// so concurrent requests cannot race on body-consumption state.
#[derive(Debug)]
pub struct AssetRecord {
    key: AssetKey,
    metadata: AssetMetadata,
    identity: StoredSource,
    encoded: Vec<(ContentEncoding, StoredSource)>,
}

impl AssetRecord {
    /// Construct a record from manifest metadata and its resolved payload.
    ///
    /// Invariant: `payload.len()` equals `metadata.file_info.size`.
    pub fn new(key: AssetKey, metadata: AssetMetadata, payload: Bytes) -> Self {
        debug_assert_eq!(payload.len() as u64, metadata.file_info.size);
        let identity = StoredSource {
            payload,
            hash: metadata.file_info.hash.clone(),
            size: metadata.file_info.size,
        };
        Self {
            key,
            metadata,
            identity,
            encoded: Vec::new(),
        }
    }

    /// Attach a pre-compressed representation of the payload.
    ///
    /// The serving core implements no encoder; hosts that pre-compress at
    /// build time register their variants here. Variants registered twice
    /// for the same encoding replace the earlier one.
    pub fn with_encoded_variant(
        mut self,
        encoding: ContentEncoding,
        payload: Bytes,
        hash: impl Into<CompactString>,
    ) -> Self {
        let source = StoredSource {
            size: payload.len() as u64,
            payload,
            hash: hash.into(),
        };
        self.encoded.retain(|(existing, _)| *existing != encoding);
        self.encoded.push((encoding, source));
        self
    }

    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    pub fn metadata(&self) -> &AssetMetadata {
        &self.metadata
    }

    pub fn content_type(&self) -> &str {
        &self.metadata.content_type
    }

    pub fn file_info(&self) -> &FileInfo {
        &self.metadata.file_info
    }

    /// Produce a fresh per-request body for the best stored representation.
    ///
    /// Walks the negotiated encoding groups in priority order; within the
    /// first group that has any stored variant, the smallest variant wins.
    /// When every group misses (or no groups were negotiated), the identity
    /// payload is selected and the body carries no content encoding.
    pub fn store_entry(&self, accept_encodings: &[Vec<ContentEncoding>]) -> AssetBody {
        for group in accept_encodings {
            let mut candidates: Vec<&(ContentEncoding, StoredSource)> = self
                .encoded
                .iter()
                .filter(|(encoding, _)| group.contains(encoding))
                .collect();
            if candidates.is_empty() {
                continue;
            }
            candidates.sort_by_key(|(_, source)| source.size);
            let (encoding, source) = candidates[0];
            return AssetBody::new(
                source.payload.clone(),
                Some(*encoding),
                source.hash.clone(),
                source.size,
            );
        }
        AssetBody::new(
            self.identity.payload.clone(),
            None,
            self.identity.hash.clone(),
            self.identity.size,
        )
    }
}
