//! # Catalog Sync Repository
//!
//! This crate provides the external-collaborator seams for the catalog
//! synchronizer: the search index provider trait with an OpenSearch
//! implementation, and the record store and sync state traits with
//! PostgreSQL implementations.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod types;

pub use errors::{RecordStoreError, SearchIndexError};
pub use interfaces::{RecordStore, SearchIndexProvider, SyncStateStore};
pub use opensearch::OpenSearchProvider;
pub use postgres::{PostgresProductStore, PostgresSyncStateStore};
pub use types::{BatchOperationResult, BatchOperationSummary};
