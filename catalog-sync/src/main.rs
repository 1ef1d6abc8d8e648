//! Catalog Sync Main Entry Point
//!
//! This is the main binary for the catalog search synchronizer. It
//! reconciles the OpenSearch product index against the authoritative
//! PostgreSQL catalog: a full reindex or incremental pass at startup, then
//! periodic incremental passes until shutdown.

use dotenv::dotenv;
use std::env;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_sync::{Dependencies, ServiceError, SyncError};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ServiceError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_sync=info,catalog_sync_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "catalog-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "catalog-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting catalog search synchronizer");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    // Index bootstrap and the startup pass are non-fatal by policy: the
    // process keeps running with a possibly stale or absent index, and
    // search degrades gracefully until a later pass succeeds.
    if let Err(e) = deps.synchronizer.ensure_index_exists().await {
        error!(error = %e, "Failed to initialize search index, continuing without it");
    }

    match deps.synchronizer.sync().await {
        Ok(report) => info!(
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "Startup sync finished"
        ),
        Err(e) => error!(error = %e, "Startup sync failed"),
    }

    let mut ticker = interval(deps.sync_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the startup pass already ran.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match deps.synchronizer.sync().await {
                    Ok(report) => info!(
                        total = report.total,
                        succeeded = report.succeeded,
                        failed = report.failed,
                        skipped = report.skipped,
                        "Periodic sync finished"
                    ),
                    Err(SyncError::SyncInProgress) => {
                        warn!("Previous sync still running, skipping this interval");
                    }
                    Err(e) => error!(error = %e, "Periodic sync failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    info!("Catalog synchronizer shutdown complete");
    Ok(())
}
