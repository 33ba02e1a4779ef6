//! Persistent two-view catalog and the files generated from it.

pub mod broadcast;
pub mod error;
pub mod key;
pub mod legacy;
pub mod merge;
pub mod raw_text;
pub mod spreadsheet;
pub mod store;
pub mod types;

pub use broadcast::{broadcast_file_name, broadcast_view, render_broadcast, write_broadcast};
pub use error::CatalogError;
pub use key::{image_name, normalize_key};
pub use legacy::LEGACY_PROVIDER;
pub use merge::{CatalogMerger, MergeOutcome, MergeStats};
pub use raw_text::{raw_text_file_name, render_raw_text, write_raw_text};
pub use spreadsheet::{spreadsheet_file_name, write_spreadsheet};
pub use store::CatalogStore;
pub use types::{
    CatalogEntry, CatalogMetadata, PrivateCatalog, PrivateMetadata, PublicCatalog, PublicProduct,
    CATALOG_VERSION,
};
