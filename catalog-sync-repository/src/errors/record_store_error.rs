//! Record store error types.

use thiserror::Error;

/// Errors from the authoritative record store.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row could not be converted into a domain record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl RecordStoreError {
    /// Create an invalid record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
