use nutype::nutype;

/// Canonical identifier of an asset in the table.
///
/// Keys look like absolute request paths (e.g. `/index.html`) and are unique
/// within a manifest. The path resolver builds candidate keys by string
/// concatenation, so no normalization happens here.
#[nutype(derive(Serialize, Deserialize, Clone, Display, Debug, Eq, PartialEq, Hash, AsRef))]
pub struct AssetKey(String);
