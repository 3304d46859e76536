use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use compact_str::CompactString;
use memserve_manifest::{AssetKind, AssetManifest, AssetMetadata};
use tracing::info;

use super::record::AssetRecord;
use super::table::AssetTable;
use crate::error::LoadError;

/// Resolves a manifest entry's source locator into raw payload bytes.
///
/// This is the seam to the out-of-scope build pipeline: by the time the
/// loader runs, whatever `fileInfo.assetPath` means has to be resolvable to
/// bytes without request-time I/O. The loader calls this exactly once per
/// manifest entry, at startup.
pub trait PayloadSource {
    fn load(&self, metadata: &AssetMetadata) -> std::io::Result<Bytes>;
}

/// Payload source backed by a locator → bytes map, for hosts that embed
/// every payload in the deployable unit.
#[derive(Default)]
pub struct InMemorySource {
    payloads: HashMap<CompactString, Bytes>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the bytes behind an `assetPath` locator.
    pub fn insert(&mut self, asset_path: impl Into<CompactString>, payload: impl Into<Bytes>) {
        self.payloads.insert(asset_path.into(), payload.into());
    }
}

impl PayloadSource for InMemorySource {
    fn load(&self, metadata: &AssetMetadata) -> std::io::Result<Bytes> {
        self.payloads
            .get(&metadata.file_info.asset_path)
            .cloned()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no payload registered for '{}'", metadata.file_info.asset_path),
                )
            })
    }
}

/// Validate a manifest and populate an [`AssetTable`] from it.
///
/// Runs entirely at startup. The first entry with an unsupported kind (or an
/// unresolvable payload) aborts the whole load; a partial table is never
/// produced. Duplicate keys cannot occur in a manifest map, but if two
/// entries resolve to the same key the later one wins, matching
/// [`AssetTable::load`] upsert semantics.
pub fn build_asset_table<S: PayloadSource>(
    manifest: &AssetManifest,
    source: &S,
) -> Result<AssetTable, LoadError> {
    let mut table = AssetTable::new();
    for (key, metadata) in manifest {
        let kind = AssetKind::from_manifest(&metadata.kind).ok_or_else(|| {
            LoadError::UnsupportedAssetKind {
                kind: metadata.kind.to_string(),
            }
        })?;
        let record = match kind {
            AssetKind::WasmInline => {
                let payload =
                    source
                        .load(metadata)
                        .map_err(|source| LoadError::PayloadUnavailable {
                            key: key.clone(),
                            source,
                        })?;
                AssetRecord::new(key.clone(), metadata.clone(), payload)
            }
        };
        table.load(key.clone(), Arc::new(record));
    }
    info!(assets = table.len(), "static asset table loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memserve_manifest::AssetKey;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn manifest() -> AssetManifest {
        // Parsed from a document (not a serde_json::Value, which re-sorts
        // keys) so manifest ordering survives into the table.
        serde_json::from_str(
            r#"{
            "/index.html": {
                "type": "wasm-inline",
                "contentType": "text/html",
                "isText": true,
                "fileInfo": {
                    "hash": "h1",
                    "size": 11,
                    "assetPath": "dist/index.html",
                    "lastModifiedTime": 1700000000
                }
            },
            "/app.js": {
                "type": "wasm-inline",
                "contentType": "application/javascript",
                "isText": true,
                "fileInfo": {
                    "hash": "h2",
                    "size": 2,
                    "assetPath": "dist/app.js",
                    "lastModifiedTime": 1700000001
                }
            }
        }"#,
        )
        .unwrap()
    }

    fn source() -> InMemorySource {
        let mut source = InMemorySource::new();
        source.insert("dist/index.html", Bytes::from_static(b"hello world"));
        source.insert("dist/app.js", Bytes::from_static(b"ok"));
        source
    }

    #[test]
    fn test_builds_table_in_manifest_order() {
        let table = build_asset_table(&manifest(), &source()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.keys(),
            vec![AssetKey::new("/index.html"), AssetKey::new("/app.js")]
        );
        let record = table.get(&AssetKey::new("/index.html")).unwrap();
        assert_eq!(record.content_type(), "text/html");
        assert_eq!(record.file_info().hash, "h1");
    }

    #[test]
    fn test_unknown_kind_aborts_whole_load() {
        let manifest: AssetManifest = serde_json::from_value(json!({
            "/ok.txt": {
                "type": "wasm-inline",
                "contentType": "text/plain",
                "fileInfo": {"hash": "a", "size": 0, "assetPath": "ok.txt", "lastModifiedTime": 0}
            },
            "/bad.bin": {
                "type": "kv-store",
                "contentType": "application/octet-stream",
                "fileInfo": {"hash": "b", "size": 0, "assetPath": "bad.bin", "lastModifiedTime": 0}
            }
        }))
        .unwrap();
        let mut source = InMemorySource::new();
        source.insert("ok.txt", Bytes::new());
        source.insert("bad.bin", Bytes::new());

        let err = build_asset_table(&manifest, &source).unwrap_err();
        assert_eq!(err.to_string(), "Unknown content asset type 'kv-store'");
    }

    #[test]
    fn test_missing_payload_aborts_whole_load() {
        let err = build_asset_table(&manifest(), &InMemorySource::new()).unwrap_err();
        assert!(matches!(err, LoadError::PayloadUnavailable { .. }));
    }
}
