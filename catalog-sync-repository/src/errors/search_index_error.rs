//! Search index error types.
//!
//! This module defines the unified error type for all search index
//! operations, covering both backend-level failures (connectivity,
//! serialization) and application-level ones (schema conflicts, validation).

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait for all search index operations.
/// Connectivity failures are non-fatal by policy: callers log them and keep
/// running with a possibly stale or absent index.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// The search backend is unreachable.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// The index already exists with an incompatible mapping.
    ///
    /// Surfaced, never auto-resolved: resolving a mapping conflict requires
    /// an operator decision (reindex into a new version).
    #[error("Schema conflict on field '{field}': index has '{actual}', expected '{expected}'")]
    SchemaConflict {
        field: String,
        expected: String,
        actual: String,
    },

    /// A single-document upsert failed.
    #[error("Upsert error: {0}")]
    Upsert(String),

    /// Failed to delete a document.
    #[error("Delete error: {0}")]
    Delete(String),

    /// Failed to create the search index or its alias.
    #[error("Index creation error: {0}")]
    IndexCreation(String),

    /// Failed to parse a response from the search backend.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failed to serialize a document for the search backend.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input (e.g. an empty batch where one is required).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SearchIndexError {
    /// Create a connectivity error.
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    /// Create a schema conflict error.
    pub fn schema_conflict(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::SchemaConflict {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an upsert error.
    pub fn upsert(msg: impl Into<String>) -> Self {
        Self::Upsert(msg.into())
    }

    /// Create a delete error.
    pub fn delete(msg: impl Into<String>) -> Self {
        Self::Delete(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreation(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Whether the failure is worth retrying (transient backend trouble,
    /// as opposed to a schema or validation problem).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connectivity(_) | Self::Upsert(_) | Self::Unknown(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_conflict_message() {
        let err = SearchIndexError::schema_conflict("price", "float", "keyword");
        assert_eq!(
            err.to_string(),
            "Schema conflict on field 'price': index has 'keyword', expected 'float'"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SearchIndexError::connectivity("down").is_retryable());
        assert!(SearchIndexError::upsert("503").is_retryable());
        assert!(!SearchIndexError::schema_conflict("a", "b", "c").is_retryable());
        assert!(!SearchIndexError::validation("bad").is_retryable());
    }
}
