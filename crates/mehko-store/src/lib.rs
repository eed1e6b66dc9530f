//! Storage layer: the manifest JSON index and the per-form asset directories.

mod assets;
mod error;
mod manifest;

pub use assets::{AssetLayout, FormMeta};
pub use error::StoreError;
pub use manifest::{ManifestStore, upsert};
