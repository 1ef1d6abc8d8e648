//! Record store trait definition.
//!
//! Read-only interface over the authoritative relational catalog. The
//! synchronizer never writes to the store; upstream CRUD services own the
//! records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_sync_shared::ProductRecord;

use crate::errors::RecordStoreError;

/// A trait that defines read access to the authoritative product store.
///
/// Pagination is keyset-based (`id > after_id ORDER BY id`) so a full scan
/// over an unbounded record set stays bounded in memory and stable under
/// concurrent inserts.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the next page of records ordered by id.
    ///
    /// # Arguments
    ///
    /// * `after_id` - Exclusive lower bound on the id; `None` starts from the
    ///   beginning
    /// * `limit` - Maximum number of records to return
    async fn fetch_page(
        &self,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ProductRecord>, RecordStoreError>;

    /// Fetch the next page of records modified at or after `since`.
    async fn fetch_modified_since(
        &self,
        since: DateTime<Utc>,
        after_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ProductRecord>, RecordStoreError>;

    /// Total number of records in the store.
    async fn count_records(&self) -> Result<i64, RecordStoreError>;

    /// Number of records modified at or after `since`.
    async fn count_modified_since(&self, since: DateTime<Utc>) -> Result<i64, RecordStoreError>;
}
