//! Request-path → asset resolution.

use std::sync::Arc;

use memserve_manifest::{AssetKey, ServerConfig};

use crate::assets::{AssetRecord, AssetTable};

/// Map a request path to an asset record.
///
/// In order: direct key lookup, then each `auto_ext` suffix, then (for any
/// path) each `auto_index` name under the path normalized to a single
/// trailing slash. First hit wins; directory-shaped paths (trailing `/`)
/// skip the direct and suffix probes.
pub(crate) fn matching_asset(
    config: &ServerConfig,
    assets: &AssetTable,
    path: &str,
) -> Option<Arc<AssetRecord>> {
    let asset_key = format!("{}{}", config.public_dir_prefix, path);

    if !asset_key.ends_with('/') {
        if let Some(asset) = assets.get(&AssetKey::new(asset_key.clone())) {
            return Some(asset);
        }
        for ext in &config.auto_ext {
            if let Some(asset) = assets.get(&AssetKey::new(format!("{asset_key}{ext}"))) {
                return Some(asset);
            }
        }
    }

    if !config.auto_index.is_empty() {
        let dir_key = format!("{}/", asset_key.trim_end_matches('/'));
        for index in &config.auto_index {
            if let Some(asset) = assets.get(&AssetKey::new(format!("{dir_key}{index}"))) {
                return Some(asset);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use memserve_manifest::{AssetMetadata, FileInfo};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn table(keys: &[&str]) -> AssetTable {
        let mut table = AssetTable::new();
        for key in keys {
            let metadata = AssetMetadata {
                kind: "wasm-inline".into(),
                content_type: "text/html".into(),
                file_info: FileInfo {
                    hash: (*key).into(),
                    size: 0,
                    asset_path: key.trim_start_matches('/').into(),
                    last_modified_time: 0,
                },
                is_text: true,
            };
            table.load(
                AssetKey::new(*key),
                Arc::new(AssetRecord::new(AssetKey::new(*key), metadata, Bytes::new())),
            );
        }
        table
    }

    fn config() -> ServerConfig {
        ServerConfig {
            auto_ext: vec![".html".to_string()],
            auto_index: vec!["index.html".to_string()],
            ..ServerConfig::default()
        }
    }

    #[rstest]
    // Direct match and auto-ext both beat auto-index.
    #[case(&["/a.html", "/a/index.html"], "/a", "/a.html")]
    #[case(&["/a", "/a.html"], "/a", "/a")]
    // Trailing slash skips the direct and suffix probes.
    #[case(&["/a.html", "/a/index.html"], "/a/", "/a/index.html")]
    #[case(&["/a///index.html", "/a/index.html"], "/a///", "/a/index.html")]
    #[case(&["/docs/index.html"], "/docs", "/docs/index.html")]
    fn test_resolution_order(
        #[case] keys: &[&str],
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        let table = table(keys);
        let resolved = matching_asset(&config(), &table, path).unwrap();
        assert_eq!(resolved.key(), &AssetKey::new(expected));
    }

    #[test]
    fn test_public_dir_prefix_prepended() {
        let table = table(&["/public/app.js"]);
        let config = ServerConfig {
            public_dir_prefix: "/public".to_string(),
            ..ServerConfig::default()
        };
        assert!(matching_asset(&config, &table, "/app.js").is_some());
        assert!(matching_asset(&config, &table, "/public/app.js").is_none());
    }

    #[test]
    fn test_miss_returns_none() {
        let table = table(&["/a.html"]);
        assert!(matching_asset(&config(), &table, "/b").is_none());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = table(&["/a.html"]);
        let config = config();
        let first = matching_asset(&config, &table, "/a").unwrap();
        let second = matching_asset(&config, &table, "/a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_no_auto_index_skips_directory_probe() {
        let table = table(&["/a/index.html"]);
        let config = ServerConfig {
            auto_ext: vec![".html".to_string()],
            ..ServerConfig::default()
        };
        assert!(matching_asset(&config, &table, "/a/").is_none());
    }
}
