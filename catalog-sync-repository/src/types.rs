//! Result types for batch search index operations.

use crate::errors::SearchIndexError;

/// Result of a batch operation for a single document.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// The product id the document is keyed by.
    pub record_id: i64,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and
/// individual results.
///
/// Individual failures are reported here rather than aborting the whole
/// batch, so callers can retry exactly the documents that failed.
#[derive(Debug, Clone)]
pub struct BatchOperationSummary {
    /// Total number of documents in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each document.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Summary for an empty batch.
    pub fn empty() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    /// Ids of the documents that failed.
    pub fn failed_ids(&self) -> Vec<i64> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.record_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_ids() {
        let summary = BatchOperationSummary {
            total: 3,
            succeeded: 2,
            failed: 1,
            results: vec![
                BatchOperationResult {
                    record_id: 1,
                    success: true,
                    error: None,
                },
                BatchOperationResult {
                    record_id: 2,
                    success: false,
                    error: Some(SearchIndexError::upsert("503")),
                },
                BatchOperationResult {
                    record_id: 3,
                    success: true,
                    error: None,
                },
            ],
        };

        assert_eq!(summary.failed_ids(), vec![2]);
    }
}
