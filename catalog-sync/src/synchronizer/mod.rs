//! Index synchronizer for the product catalog.
//!
//! Reconciles the search index against the authoritative record store, both
//! at cold start (full reindex) and incrementally via a last-modified
//! watermark.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use catalog_sync_repository::{RecordStore, SearchIndexProvider, SyncStateStore};
use catalog_sync_shared::ProductDocument;

use crate::errors::SyncError;

/// Configuration for the synchronizer.
#[derive(Debug, Clone)]
pub struct SynchronizerConfig {
    /// Number of records fetched and upserted per page.
    pub batch_size: usize,
    /// Retry attempts per failed document before it is reported as failed.
    pub max_retries: usize,
    /// Initial backoff before the first retry; doubles per attempt.
    pub retry_backoff: Duration,
    /// Timeout applied to each batch upsert and each retried upsert.
    pub batch_timeout: Duration,
    /// Overall deadline for a sync pass; `None` means unbounded.
    ///
    /// On expiry the pass returns a partial report with the remaining
    /// records counted as skipped instead of hanging indefinitely.
    pub deadline: Option<Duration>,
}

impl Default for SynchronizerConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            max_retries: 3,
            retry_backoff: Duration::from_millis(250),
            batch_timeout: Duration::from_secs(30),
            deadline: None,
        }
    }
}

/// Outcome of a synchronization pass.
///
/// `skipped` counts records the pass never attempted because the overall
/// deadline expired; `failed` counts records whose upsert still failed after
/// bounded retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexReport {
    /// Records in scope for the pass.
    pub total: u64,
    /// Documents written successfully.
    pub succeeded: u64,
    /// Documents that failed after retries.
    pub failed: u64,
    /// Records never attempted (deadline expiry).
    pub skipped: u64,
}

impl ReindexReport {
    /// Whether every in-scope record was written successfully.
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// Reconciles the search index against the authoritative record store.
///
/// The synchronizer is stateless per call; the only persistent state is the
/// sync watermark (via `SyncStateStore`) and the index itself. At most one
/// pass runs at a time: an overlapping call fails fast with
/// [`SyncError::SyncInProgress`] instead of interleaving writes.
///
/// Collaborators are injected as trait objects so tests can drive the
/// synchronizer against in-memory fakes.
pub struct IndexSynchronizer {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn SearchIndexProvider>,
    sync_state: Arc<dyn SyncStateStore>,
    config: SynchronizerConfig,
    in_flight: Mutex<()>,
}

impl IndexSynchronizer {
    /// Create a new synchronizer with default configuration.
    pub fn new(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn SearchIndexProvider>,
        sync_state: Arc<dyn SyncStateStore>,
    ) -> Self {
        Self::with_config(store, provider, sync_state, SynchronizerConfig::default())
    }

    /// Create a new synchronizer with custom configuration.
    pub fn with_config(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn SearchIndexProvider>,
        sync_state: Arc<dyn SyncStateStore>,
        config: SynchronizerConfig,
    ) -> Self {
        Self {
            store,
            provider,
            sync_state,
            config,
            in_flight: Mutex::new(()),
        }
    }

    /// Ensure the search index exists with the expected schema.
    ///
    /// Idempotent; see `SearchIndexProvider::ensure_index_exists`. Callers
    /// treat a `Connectivity` failure as non-fatal: it is logged and the
    /// process keeps running with a possibly absent index.
    pub async fn ensure_index_exists(&self) -> Result<(), SyncError> {
        self.provider.ensure_index_exists().await?;
        Ok(())
    }

    /// Run a sync pass, choosing the cheapest correct strategy.
    ///
    /// With no watermark (first run, or no prior fully successful pass) this
    /// is a full reindex; otherwise only records modified at or after the
    /// watermark are re-synced.
    pub async fn sync(&self) -> Result<ReindexReport, SyncError> {
        match self.sync_state.load_watermark().await? {
            Some(since) => self.incremental_sync(since).await,
            None => self.full_reindex().await,
        }
    }

    /// Rebuild every document from every record.
    ///
    /// Upserts are keyed by record id, so re-running converges to the same
    /// index state regardless of how many times it is invoked. Returns the
    /// per-pass report; on full success the watermark is advanced to the
    /// instant the scan started (records mutated mid-scan fall after it and
    /// are picked up by the next incremental pass).
    #[instrument(skip(self))]
    pub async fn full_reindex(&self) -> Result<ReindexReport, SyncError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SyncError::SyncInProgress)?;

        let watermark = Utc::now();
        let total = self.store.count_records().await? as u64;
        info!(total, "Starting full reindex");

        let report = self.run_scan(total, None).await?;
        self.finish_pass(&report, watermark).await?;

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "Full reindex finished"
        );
        Ok(report)
    }

    /// Re-sync only the records modified at or after `since`.
    #[instrument(skip(self))]
    pub async fn incremental_sync(&self, since: DateTime<Utc>) -> Result<ReindexReport, SyncError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| SyncError::SyncInProgress)?;

        let watermark = Utc::now();
        let total = self.store.count_modified_since(since).await? as u64;
        debug!(total, since = %since, "Starting incremental sync");

        let report = self.run_scan(total, Some(since)).await?;
        self.finish_pass(&report, watermark).await?;

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "Incremental sync finished"
        );
        Ok(report)
    }

    /// Advance the watermark only after a fully successful pass.
    ///
    /// A partial pass keeps the old watermark so the missed records stay in
    /// scope for the next attempt.
    async fn finish_pass(
        &self,
        report: &ReindexReport,
        watermark: DateTime<Utc>,
    ) -> Result<(), SyncError> {
        if report.is_complete() {
            self.sync_state.save_watermark(watermark).await?;
        } else {
            warn!(
                failed = report.failed,
                skipped = report.skipped,
                "Sync pass incomplete, watermark not advanced"
            );
        }
        Ok(())
    }

    /// Page through the record set and upsert each page.
    async fn run_scan(
        &self,
        total: u64,
        since: Option<DateTime<Utc>>,
    ) -> Result<ReindexReport, SyncError> {
        let started = Instant::now();
        let mut succeeded: u64 = 0;
        let mut failed: u64 = 0;
        let mut last_id: Option<i64> = None;

        loop {
            if self.deadline_exceeded(started) {
                let skipped = total.saturating_sub(succeeded + failed);
                warn!(
                    succeeded,
                    failed, skipped, "Sync deadline exceeded, returning partial report"
                );
                return Ok(ReindexReport {
                    total,
                    succeeded,
                    failed,
                    skipped,
                });
            }

            let limit = self.config.batch_size as i64;
            let page = match since {
                Some(ts) => self.store.fetch_modified_since(ts, last_id, limit).await?,
                None => self.store.fetch_page(last_id, limit).await?,
            };
            if page.is_empty() {
                break;
            }
            last_id = page.last().map(|r| r.id);

            let documents: Vec<ProductDocument> =
                page.iter().map(ProductDocument::from_record).collect();
            let (batch_ok, mut pending) = self.upsert_batch(&documents).await;
            succeeded += batch_ok;

            if !pending.is_empty() {
                let recovered = self.retry_failed(&mut pending, started).await;
                succeeded += recovered;
                failed += pending.len() as u64;
            }
        }

        Ok(ReindexReport {
            total,
            succeeded,
            failed,
            skipped: 0,
        })
    }

    /// Upsert one page of documents under the batch timeout.
    ///
    /// Returns the success count and the documents that still need a retry.
    /// A timed-out or wholly failed batch marks every document in it as
    /// pending rather than aborting the pass.
    async fn upsert_batch(&self, documents: &[ProductDocument]) -> (u64, Vec<ProductDocument>) {
        match timeout(
            self.config.batch_timeout,
            self.provider.bulk_upsert_documents(documents),
        )
        .await
        {
            Ok(Ok(summary)) => {
                let failed_ids = summary.failed_ids();
                if !failed_ids.is_empty() {
                    warn!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Batch upsert completed with failures"
                    );
                    for result in summary.results.iter().filter(|r| !r.success) {
                        if let Some(ref err) = result.error {
                            debug!(record_id = result.record_id, error = %err, "Document upsert failed");
                        }
                    }
                }
                let pending = documents
                    .iter()
                    .filter(|d| failed_ids.contains(&d.id))
                    .cloned()
                    .collect();
                (summary.succeeded as u64, pending)
            }
            Ok(Err(e)) => {
                warn!(error = %e, count = documents.len(), "Batch upsert failed");
                (0, documents.to_vec())
            }
            Err(_) => {
                warn!(count = documents.len(), "Batch upsert timed out");
                (0, documents.to_vec())
            }
        }
    }

    /// Retry failed documents with bounded attempts and doubling backoff.
    ///
    /// Recovered documents are removed from `pending`; whatever remains is
    /// reported as failed. Non-retryable failures (schema or validation
    /// problems) are not attempted again.
    async fn retry_failed(&self, pending: &mut Vec<ProductDocument>, started: Instant) -> u64 {
        let mut recovered: u64 = 0;
        let mut permanent: Vec<ProductDocument> = Vec::new();
        let mut backoff = self.config.retry_backoff;

        for attempt in 1..=self.config.max_retries {
            if pending.is_empty() || self.deadline_exceeded(started) {
                break;
            }
            sleep(backoff).await;

            let mut still_failed = Vec::new();
            for doc in pending.drain(..) {
                match timeout(
                    self.config.batch_timeout,
                    self.provider.upsert_document(&doc),
                )
                .await
                {
                    Ok(Ok(())) => {
                        debug!(record_id = doc.id, attempt, "Retry upsert succeeded");
                        recovered += 1;
                    }
                    Ok(Err(e)) if e.is_retryable() => {
                        warn!(record_id = doc.id, attempt, error = %e, "Retry upsert failed");
                        still_failed.push(doc);
                    }
                    Ok(Err(e)) => {
                        warn!(record_id = doc.id, error = %e, "Upsert failure is not retryable");
                        permanent.push(doc);
                    }
                    Err(_) => {
                        warn!(record_id = doc.id, attempt, "Retry upsert timed out");
                        still_failed.push(doc);
                    }
                }
            }
            *pending = still_failed;
            backoff = backoff.saturating_mul(2);
        }

        pending.extend(permanent);
        recovered
    }

    fn deadline_exceeded(&self, started: Instant) -> bool {
        self.config
            .deadline
            .map_or(false, |d| started.elapsed() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SynchronizerConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.max_retries, 3);
        assert!(config.deadline.is_none());
    }

    #[test]
    fn test_report_completeness() {
        let complete = ReindexReport {
            total: 3,
            succeeded: 3,
            failed: 0,
            skipped: 0,
        };
        assert!(complete.is_complete());

        let partial = ReindexReport {
            total: 3,
            succeeded: 1,
            failed: 1,
            skipped: 1,
        };
        assert!(!partial.is_complete());
    }
}
