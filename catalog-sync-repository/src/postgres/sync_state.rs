//! PostgreSQL implementation of the sync state store.
//!
//! Stores the last-successful-sync watermark in a `sync_state` table so the
//! synchronizer can resume incrementally after restarts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::RecordStoreError;
use crate::interfaces::SyncStateStore;

/// Key of the product sync watermark row.
const SYNC_STATE_ID: &str = "products";

/// PostgreSQL-backed sync state store.
///
/// Persists the watermark with an upsert so updates are atomic.
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE sync_state (
///     id TEXT PRIMARY KEY,
///     watermark TIMESTAMPTZ NOT NULL
/// );
/// ```
pub struct PostgresSyncStateStore {
    pool: sqlx::PgPool,
}

impl PostgresSyncStateStore {
    /// Creates a new PostgreSQL sync state store instance.
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStateStore for PostgresSyncStateStore {
    async fn load_watermark(&self) -> Result<Option<DateTime<Utc>>, RecordStoreError> {
        let watermark: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT watermark FROM sync_state WHERE id = $1")
                .bind(SYNC_STATE_ID)
                .fetch_optional(&self.pool)
                .await?;

        Ok(watermark)
    }

    async fn save_watermark(&self, watermark: DateTime<Utc>) -> Result<(), RecordStoreError> {
        sqlx::query(
            "INSERT INTO sync_state (id, watermark) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET watermark = $2",
        )
        .bind(SYNC_STATE_ID)
        .bind(watermark)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
