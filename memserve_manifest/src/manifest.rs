use indexmap::IndexMap;

use crate::key::AssetKey;
use crate::metadata::AssetMetadata;

/// The static asset manifest: an insertion-ordered map from asset key to
/// metadata, produced by the build step and consumed once at startup.
pub type AssetManifest = IndexMap<AssetKey, AssetMetadata>;
