//! Trait definitions for the synchronizer's external collaborators.

mod record_store;
mod search_index_provider;
mod sync_state_store;

pub use record_store::RecordStore;
pub use search_index_provider::SearchIndexProvider;
pub use sync_state_store::SyncStateStore;
