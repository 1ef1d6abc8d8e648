//! Error types for the repository crate.

mod record_store_error;
mod search_index_error;

pub use record_store_error::RecordStoreError;
pub use search_index_error::SearchIndexError;
