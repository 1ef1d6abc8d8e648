//! # Catalog Sync
//!
//! Synchronizer that keeps the OpenSearch product index consistent with the
//! authoritative PostgreSQL catalog.
//!
//! ## Architecture
//!
//! 1. **RecordStore**: Reads authoritative product records (PostgreSQL)
//! 2. **IndexSynchronizer**: Pages through records, upserts documents with
//!    bounded retries, and tracks a sync watermark
//! 3. **SearchIndexProvider**: Writes documents into the search index
//!    (OpenSearch)
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`synchronizer`]: The reconciliation logic
//! - [`errors`]: Error types for the synchronizer
//!
//! The synchronizer runs once at startup (a full reindex when no watermark
//! exists, an incremental pass otherwise) and then periodically on an
//! interval. It is also usable as a library so an administrative surface can
//! trigger a reindex on demand.

pub mod config;
pub mod errors;
pub mod synchronizer;

pub use config::Dependencies;
pub use errors::SyncError;
pub use synchronizer::{IndexSynchronizer, ReindexReport, SynchronizerConfig};

use thiserror::Error;

/// Errors that can occur during service initialization or execution.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Synchronization error.
    #[error("Sync error: {0}")]
    SyncError(#[from] SyncError),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
