//! The in-memory asset store: records, per-request bodies, the table, and
//! the startup loader that populates it from a manifest.

mod body;
mod loader;
mod record;
mod table;

pub use body::{AssetBody, BodyReader};
pub use loader::{InMemorySource, PayloadSource, build_asset_table};
pub use record::AssetRecord;
pub use table::AssetTable;
