use std::sync::Arc;

use indexmap::IndexMap;
use memserve_manifest::AssetKey;

use super::record::AssetRecord;

/// The startup-populated, read-only asset map.
///
/// Written once by the loader before any request is served, then only read.
/// Lookups hand out `Arc` clones of the records, so every caller observes
/// the same record identity and no payload bytes are ever copied.
#[derive(Debug, Default)]
pub struct AssetTable {
    assets: IndexMap<AssetKey, Arc<AssetRecord>>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record stored under `key`.
    pub fn load(&mut self, key: AssetKey, record: Arc<AssetRecord>) {
        self.assets.insert(key, record);
    }

    /// Look up a record by key.
    pub fn get(&self, key: &AssetKey) -> Option<Arc<AssetRecord>> {
        self.assets.get(key).cloned()
    }

    /// Snapshot of the keys in insertion order, independent of the table.
    pub fn keys(&self) -> Vec<AssetKey> {
        self.assets.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
