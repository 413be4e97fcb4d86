//! Scheduled retention sweeper for S3-compatible object storage.
//!
//! One invocation reads its configuration from the environment, deletes
//! objects older than the configured TTL under each configured prefix,
//! prints the aggregate summary as a JSON line, and exits. Scheduling is
//! left to the invoker (cron or a cloud timer); re-invoking after a
//! failed run is safe because deletions are idempotent.

use chrono::Utc;

mod config;
mod error;
mod observability;
mod retention;
mod services;

use crate::{
    config::SweeperConfig,
    error::SweepResult,
    retention::{SweepSummary, run_sweep},
    services::object_store::S3ObjectStore,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    observability::init_tracing();

    match run().await {
        Ok(summary) => match serde_json::to_string(&summary) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize sweep summary"),
        },
        Err(e) => {
            tracing::error!(error = %e, "Sweep aborted");
            std::process::exit(1);
        }
    }
}

/// Execute one full sweep pass against the configured bucket.
async fn run() -> SweepResult<SweepSummary> {
    let config = SweeperConfig::from_env()?;
    let cutoff = config.cutoff(Utc::now());

    tracing::info!(
        bucket = %config.bucket,
        prefixes = config.prefixes.len(),
        ttl_seconds = config.ttl_seconds,
        cutoff = %cutoff,
        dry_run = config.dry_run,
        "Starting retention sweep"
    );

    let store = S3ObjectStore::from_env().await;
    run_sweep(&store, &config, cutoff).await
}
