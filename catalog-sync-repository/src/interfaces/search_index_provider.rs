//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch,
//! Elasticsearch, etc.).

use async_trait::async_trait;

use catalog_sync_shared::ProductDocument;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into the synchronizer as `Arc<dyn
/// SearchIndexProvider>` to enable dependency injection and testing with
/// mock backends. The synchronizer depends only on this narrow contract,
/// not on the full capability of the search backend.
///
/// # Note on Document Creation
///
/// There is no separate `create_document` function. Documents are fully
/// derived from their records, so `upsert_document` always writes the whole
/// document keyed by its id: it creates the document if absent and
/// overwrites it otherwise. Last-write-wins is correct by construction.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the search index and its alias exist, creating them if
    /// necessary.
    ///
    /// Idempotent: calling this any number of times results in at most one
    /// index creation against the backend.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index is ready for use
    /// * `Err(SearchIndexError::Connectivity)` - If the backend is unreachable
    /// * `Err(SearchIndexError::SchemaConflict)` - If the index exists with an
    ///   incompatible mapping
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Insert or overwrite a single document, keyed by its product id.
    async fn upsert_document(&self, document: &ProductDocument) -> Result<(), SearchIndexError>;

    /// Upsert multiple documents and return a summary of successful and
    /// failed operations.
    ///
    /// Individual failures are collected into the summary instead of
    /// aborting the batch, so the caller can retry exactly the failed ids.
    async fn bulk_upsert_documents(
        &self,
        documents: &[ProductDocument],
    ) -> Result<BatchOperationSummary, SearchIndexError>;

    /// Delete a document from the search index.
    ///
    /// If the document doesn't exist, the operation is considered
    /// successful.
    async fn delete_document(&self, record_id: i64) -> Result<(), SearchIndexError>;
}
