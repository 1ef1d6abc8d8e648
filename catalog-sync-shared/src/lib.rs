//! # Catalog Sync Shared
//!
//! Shared domain types for the catalog search synchronizer.

pub mod types;

pub use types::{ProductDocument, ProductRecord};
