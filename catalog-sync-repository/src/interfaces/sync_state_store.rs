//! Sync state store trait definition.
//!
//! Persists the last-successful-sync watermark so a restart can resume with
//! an incremental pass instead of a full scan.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::RecordStoreError;

/// Persistence for the synchronizer's watermark.
#[async_trait]
pub trait SyncStateStore: Send + Sync {
    /// Load the watermark of the last fully successful sync, if any.
    async fn load_watermark(&self) -> Result<Option<DateTime<Utc>>, RecordStoreError>;

    /// Persist a new watermark.
    async fn save_watermark(&self, watermark: DateTime<Utc>) -> Result<(), RecordStoreError>;
}
