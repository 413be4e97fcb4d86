//! Single-pass retention sweep.
//!
//! Runs one full pass over the configured prefixes: pages through the
//! listing, collects keys whose last-modified instant is at or before the
//! cutoff, and deletes them in bounded batches. Prefixes are processed
//! strictly sequentially; the only state shared between them is the
//! running totals.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::SweeperConfig,
    error::SweepResult,
    services::object_store::{MAX_DELETE_BATCH, ObjectStore},
};

/// Counters for a single prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixOutcome {
    /// Every object returned by the listing, before filtering.
    pub scanned: u64,
    /// Keys removed via successful delete calls.
    pub deleted: u64,
}

/// Aggregate result of one sweep invocation.
#[derive(Debug, Serialize)]
pub struct SweepSummary {
    pub bucket: String,
    pub prefixes: Vec<String>,
    pub ttl_seconds: i64,
    pub scanned: u64,
    pub deleted: u64,
}

/// Run one full retention pass and produce the aggregate summary.
///
/// Any backend error aborts the remaining prefixes and pages; deletions
/// performed before the failure are not rolled back.
pub async fn run_sweep(
    store: &dyn ObjectStore,
    config: &SweeperConfig,
    cutoff: DateTime<Utc>,
) -> SweepResult<SweepSummary> {
    let mut scanned = 0u64;
    let mut deleted = 0u64;

    for prefix in &config.prefixes {
        let outcome = sweep_prefix(store, config, prefix, cutoff).await?;
        tracing::info!(
            prefix = %prefix,
            scanned = outcome.scanned,
            deleted = outcome.deleted,
            "Prefix sweep complete"
        );
        scanned += outcome.scanned;
        deleted += outcome.deleted;
    }

    tracing::info!(scanned, deleted, "Sweep complete");

    Ok(SweepSummary {
        bucket: config.bucket.clone(),
        prefixes: config.prefixes.clone(),
        ttl_seconds: config.ttl_seconds,
        scanned,
        deleted,
    })
}

/// Page through one prefix, deleting expired objects as each page is
/// filtered.
async fn sweep_prefix(
    store: &dyn ObjectStore,
    config: &SweeperConfig,
    prefix: &str,
    cutoff: DateTime<Utc>,
) -> SweepResult<PrefixOutcome> {
    let mut outcome = PrefixOutcome::default();
    let mut token: Option<String> = None;

    loop {
        let page = store
            .list_page(&config.bucket, prefix, token.as_deref())
            .await?;
        outcome.scanned += page.entries.len() as u64;

        let mut expired: Vec<String> = Vec::new();
        for entry in page.entries {
            let Some(key) = entry.key else { continue };
            let Some(last_modified) = entry.last_modified else {
                continue;
            };
            // Guard against a listing that returns keys outside the
            // requested prefix.
            if !key.starts_with(prefix) {
                continue;
            }
            if last_modified <= cutoff {
                expired.push(key);
            }
        }

        for chunk in expired.chunks(MAX_DELETE_BATCH) {
            if config.dry_run {
                tracing::info!(
                    prefix = %prefix,
                    count = chunk.len(),
                    "DRY RUN: would delete object batch"
                );
            } else {
                store.delete_batch(&config.bucket, chunk).await?;
            }
            outcome.deleted += chunk.len() as u64;
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(outcome)
}
