//! Download session, per-item outcomes, and run summaries

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::config::DEFAULT_WORKERS;
use super::DownloadError;
use crate::handle::Handle;
use crate::output::path::{run_dir, target_filename};
use crate::VideoItem;

/// Configuration for one creator run.
///
/// The target directory is derived once from the creator handle and the
/// session start time, so repeated runs never collide and a single run
/// writes every file under the same timestamped directory.
#[derive(Debug, Clone)]
pub struct DownloadSession {
    handle: Handle,
    workers: usize,
    proxy: Option<String>,
    rate_limit: Option<usize>,
    target_dir: PathBuf,
}

impl DownloadSession {
    /// Create a session and its target directory under `base_dir`.
    ///
    /// # Errors
    ///
    /// Fails if the target directory cannot be created.
    pub fn create(base_dir: PathBuf, handle: Handle) -> Result<Self, DownloadError> {
        let target_dir = run_dir(&base_dir, &handle, Local::now());
        std::fs::create_dir_all(&target_dir).map_err(|e| {
            DownloadError::IoError(format!("create {}: {e}", target_dir.display()))
        })?;

        Ok(Self {
            handle,
            workers: DEFAULT_WORKERS,
            proxy: None,
            rate_limit: None,
            target_dir,
        })
    }

    /// Set the worker-pool size (clamped to at least 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the proxy URL passed to the transfer tool.
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy.filter(|p| !p.is_empty());
        self
    }

    /// Cap successful completions per rolling minute (zero disables).
    pub fn with_rate_limit(mut self, rate_limit: Option<usize>) -> Self {
        self.rate_limit = rate_limit.filter(|l| *l > 0);
        self
    }

    /// The creator handle this session downloads for.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Worker-pool size.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Proxy URL, if configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Per-minute completion limit, if configured.
    pub fn rate_limit(&self) -> Option<usize> {
        self.rate_limit
    }

    /// The timestamped directory all of this run's files land in.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Deterministic target path for the item at a 1-based index.
    pub fn target_path(&self, index: usize, video_id: &str) -> PathBuf {
        self.target_dir.join(target_filename(index, video_id))
    }
}

/// Status tag of a per-item outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Transferred and verified during this run
    Downloaded,
    /// A plausible file already existed at the target path
    Skipped,
    /// Source host failed the allow-list check; never attempted
    Blocked,
    /// Every transfer attempt failed
    Failed,
}

impl OutcomeStatus {
    /// Whether this status counts as a successful outcome.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Downloaded | Self::Skipped)
    }

    /// Lowercase tag used in logs and summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::Skipped => "skipped",
            Self::Blocked => "blocked",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one item. Created exactly once per input item and
/// never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// 1-based sequence index, stable regardless of completion order
    pub index: usize,
    /// The item this outcome belongs to
    pub video: VideoItem,
    /// Success flag (`downloaded` and `skipped` count as success)
    pub success: bool,
    /// Status tag
    pub status: OutcomeStatus,
    /// Resolved local target path
    pub target: PathBuf,
}

impl DownloadOutcome {
    /// Build an outcome; the success flag is derived from the status.
    pub fn new(index: usize, video: VideoItem, status: OutcomeStatus, target: PathBuf) -> Self {
        Self {
            index,
            video,
            success: status.is_success(),
            status,
            target,
        }
    }
}

/// Summary counts over a completed run's outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Total outcomes
    pub total: usize,
    /// Items transferred this run
    pub downloaded: usize,
    /// Items already present
    pub skipped: usize,
    /// Items rejected by the host allow-list
    pub blocked: usize,
    /// Items whose attempts were exhausted
    pub failed: usize,
}

impl DownloadSummary {
    /// Tally outcomes into summary counts.
    pub fn from_outcomes(outcomes: &[DownloadOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Downloaded => summary.downloaded += 1,
                OutcomeStatus::Skipped => summary.skipped += 1,
                OutcomeStatus::Blocked => summary.blocked += 1,
                OutcomeStatus::Failed => summary.failed += 1,
            }
        }
        summary
    }
}
