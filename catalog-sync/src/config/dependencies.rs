//! Dependency initialization and wiring for the catalog synchronizer.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::time::sleep;
use tracing::{info, warn};

use catalog_sync_repository::opensearch::IndexConfig;
use catalog_sync_repository::{
    OpenSearchProvider, PostgresProductStore, PostgresSyncStateStore, SearchIndexProvider,
};

use crate::synchronizer::{IndexSynchronizer, SynchronizerConfig};
use crate::ServiceError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default PostgreSQL connection string.
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/catalog";

/// Default index alias.
const DEFAULT_INDEX_ALIAS: &str = "products";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default interval between periodic sync passes, in seconds.
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;

/// Default maximum pool size for the catalog database.
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from environment variable.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        match env::var("OPENSEARCH_CONNECTION_MODE")
            .unwrap_or_else(|_| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured synchronizer ready to run.
    pub synchronizer: IndexSynchronizer,
    /// Interval between periodic sync passes.
    pub sync_interval: Duration,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (default: postgres://localhost/catalog)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `INDEX_ALIAS`: Index alias name (default: "products")
    /// - `PRODUCTS_INDEX_VERSION`: Index version number (default: 0)
    /// - `SYNC_BATCH_SIZE`: Records per page (default: 500)
    /// - `SYNC_MAX_RETRIES`: Retry attempts per failed document (default: 3)
    /// - `SYNC_BATCH_TIMEOUT_SECS`: Timeout per batch upsert (default: 30)
    /// - `SYNC_DEADLINE_SECS`: Overall deadline per pass (default: unbounded)
    /// - `SYNC_INTERVAL_SECS`: Seconds between periodic passes (default: 300)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails (database unreachable,
    ///   or OpenSearch unreachable in fail-fast mode)
    pub async fn new() -> Result<Self, ServiceError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let connection_mode = ConnectionMode::from_env();
        let retry_interval = env_u64("OPENSEARCH_RETRY_INTERVAL_SECS", DEFAULT_RETRY_INTERVAL_SECS);
        let sync_interval = env_u64("SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS);

        info!(
            opensearch_url = %opensearch_url,
            connection_mode = ?connection_mode,
            sync_interval_secs = sync_interval,
            "Initializing dependencies"
        );

        let index_alias =
            env::var("INDEX_ALIAS").unwrap_or_else(|_| DEFAULT_INDEX_ALIAS.to_string());
        let index_version = env::var("PRODUCTS_INDEX_VERSION")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        let index_config = IndexConfig::new(index_alias, index_version);

        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_DB_MAX_CONNECTIONS)
            .connect(&database_url)
            .await
            .map_err(|e| {
                ServiceError::config(format!("Failed to connect to catalog database: {}", e))
            })?;

        info!("Catalog database connection established");

        let search_provider = Self::connect_to_opensearch(
            &opensearch_url,
            index_config,
            connection_mode,
            Duration::from_secs(retry_interval),
        )
        .await?;

        info!("OpenSearch connection established");

        let sync_config = SynchronizerConfig {
            batch_size: env_u64("SYNC_BATCH_SIZE", 500) as usize,
            max_retries: env_u64("SYNC_MAX_RETRIES", 3) as usize,
            batch_timeout: Duration::from_secs(env_u64("SYNC_BATCH_TIMEOUT_SECS", 30)),
            deadline: env::var("SYNC_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs),
            ..SynchronizerConfig::default()
        };

        let store = Arc::new(PostgresProductStore::new(pool.clone()));
        let sync_state = Arc::new(PostgresSyncStateStore::new(pool));

        let synchronizer = IndexSynchronizer::with_config(
            store,
            Arc::new(search_provider),
            sync_state,
            sync_config,
        );

        Ok(Self {
            synchronizer,
            sync_interval: Duration::from_secs(sync_interval),
        })
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        url: &str,
        index_config: IndexConfig,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchProvider, ServiceError> {
        loop {
            match OpenSearchProvider::new(url, index_config.clone()) {
                Ok(provider) => return Ok(provider),
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(ServiceError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %url,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}

/// Read a u64 environment variable with a default.
fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}
