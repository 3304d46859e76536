use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Build-time file metadata carried by the manifest for one asset.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Content hash computed by the build step; served as the `ETag` value.
    pub hash: CompactString,
    /// Payload size in bytes.
    pub size: u64,
    /// Locator understood by the host's payload source. Never read by the
    /// serving core itself.
    pub asset_path: CompactString,
    /// Last modification time in unix seconds; `0` means unknown.
    pub last_modified_time: u64,
}

/// One manifest entry: everything the loader needs to construct an asset
/// record, minus the payload bytes themselves.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    /// Raw asset kind string. Kept as written in the manifest so that the
    /// loader (not the deserializer) rejects kinds it does not support.
    #[serde(rename = "type")]
    pub kind: CompactString,
    /// MIME type served as `Content-Type`.
    pub content_type: String,
    pub file_info: FileInfo,
    /// Whether the payload is text. Carried through from the build step;
    /// the serving core attaches no behavior to it.
    #[serde(default)]
    pub is_text: bool,
}

/// Asset kinds the loader knows how to construct.
///
/// The manifest stores kinds as free-form strings; this enum is the closed
/// set a build of the serving core actually supports. Anything else must
/// fail the whole load.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AssetKind {
    /// Payload embedded in the deployable unit and resolved to bytes at
    /// startup ("wasm-inline" in the manifest).
    WasmInline,
}

impl AssetKind {
    /// Look up the kind for a manifest `type` string.
    pub fn from_manifest(kind: &str) -> Option<Self> {
        match kind {
            "wasm-inline" => Some(AssetKind::WasmInline),
            _ => None,
        }
    }

    /// The string this kind uses in manifests.
    pub const fn manifest_name(self) -> &'static str {
        match self {
            AssetKind::WasmInline => "wasm-inline",
        }
    }
}
