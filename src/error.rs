//! Error types shared across the sweeper.

use thiserror::Error;

/// Errors that can abort a retention sweep.
///
/// Every variant is fatal to the invocation. There is no retry or
/// partial-success path; the scheduler is expected to observe the failure
/// and re-invoke, which is safe because deletions are idempotent.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Required configuration was missing or empty.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration value could not be parsed as an integer.
    #[error("invalid integer in configuration: {0}")]
    Conversion(#[from] std::num::ParseIntError),

    /// The storage backend rejected or failed a listing or delete call.
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type SweepResult<T> = Result<T, SweepError>;
