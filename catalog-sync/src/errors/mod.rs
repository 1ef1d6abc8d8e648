//! Error types for the catalog synchronizer.

use thiserror::Error;

use catalog_sync_repository::{RecordStoreError, SearchIndexError};

/// Errors that can occur during a synchronization pass.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Error from the search index backend.
    #[error("Search index error: {0}")]
    Index(#[from] SearchIndexError),

    /// Error from the authoritative record store.
    #[error("Record store error: {0}")]
    Store(#[from] RecordStoreError),

    /// Another reindex is already in flight.
    ///
    /// Returned by the fail-fast mutual exclusion guard; callers are
    /// expected to skip the pass rather than queue behind the running one.
    #[error("A sync is already in progress")]
    SyncInProgress,
}
