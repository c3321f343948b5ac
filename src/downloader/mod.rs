//! Download orchestration and rate limiting
//!
//! This module turns a discovered item list into per-item outcomes with
//! bounded concurrency, retry, and an optional completion rate limit.
//!
//! # Overview
//!
//! 1. **Session**: describe one run with [`session::DownloadSession`]
//! 2. **Execution**: process every item with [`executor::DownloadExecutor`]
//! 3. **Rate Limiting**: shared completion gate via [`rate_limit::RateLimiter`]
//! 4. **Aggregation**: input-order outcomes and [`session::DownloadSummary`]
//!
//! # Per-item procedure
//!
//! Each worker resolves a deterministic target path, skips files that
//! already look complete, rejects sources whose host is not allow-listed,
//! and otherwise transfers with up to three attempts and linear backoff.
//! A successful transfer is verified by size, gets a SHA-256 sidecar, and
//! registers with the rate limiter. Exactly one outcome is produced per
//! input item no matter how many retries occurred.
//!
//! # Error Handling
//!
//! No single item's failure aborts the batch. Errors inside an attempt are
//! logged and converted into retries; exhausted retries yield a `failed`
//! outcome for that item only.

pub mod config;
pub mod executor;
pub mod rate_limit;
pub mod session;
pub mod transfer;

pub use executor::DownloadExecutor;
pub use rate_limit::RateLimiter;
pub use session::{DownloadOutcome, DownloadSession, DownloadSummary, OutcomeStatus};
pub use transfer::{MediaTransfer, YtDlpTransfer};

use crate::output::OutputError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// External transfer tool reported a failure
    #[error("transfer error: {0}")]
    TransferError(String),

    /// Transfer tool could not be spawned
    #[error("tool error: {0}")]
    ToolError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Output error
    #[error("output error: {0}")]
    OutputError(#[from] OutputError),
}
