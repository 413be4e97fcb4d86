//! Retention sweep over configured bucket prefixes.
//!
//! One invocation performs a single pass: for each prefix, page through
//! the listing, delete objects whose age exceeds the TTL, and accumulate
//! per-prefix and total counters.

mod sweep;

pub use sweep::{SweepSummary, run_sweep};
