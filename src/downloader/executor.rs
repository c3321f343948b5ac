//! Concurrent download executor
//!
//! A fixed-size pool of workers processes the discovered item list; no
//! item's processing depends on another's outcome. Workers share one rate
//! limiter and one target-directory namespace. File paths are unique per
//! item index, so no two workers ever write the same path.

use std::path::Path;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::config::{allowed_source, attempt_backoff, MAX_ATTEMPTS, MIN_PLAUSIBLE_BYTES};
use super::rate_limit::RateLimiter;
use super::session::{DownloadOutcome, DownloadSession, OutcomeStatus};
use super::transfer::MediaTransfer;
use crate::output::checksum::write_sidecar;
use crate::VideoItem;

/// Hook invoked once per completed outcome, in completion order.
pub type OutcomeHook = Box<dyn Fn(&DownloadOutcome) + Send + Sync>;

/// Download executor orchestrating one session's worker pool.
pub struct DownloadExecutor {
    session: DownloadSession,
    transfer: Arc<dyn MediaTransfer>,
    rate_limiter: Arc<RateLimiter>,
    max_attempts: u32,
    outcome_hook: Option<OutcomeHook>,
}

impl DownloadExecutor {
    /// Create an executor for a session and transfer implementation.
    ///
    /// The rate limiter is built from the session's configured limit and
    /// shared by every worker.
    pub fn new(session: DownloadSession, transfer: Arc<dyn MediaTransfer>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::per_minute(session.rate_limit()));
        Self {
            session,
            transfer,
            rate_limiter,
            max_attempts: MAX_ATTEMPTS,
            outcome_hook: None,
        }
    }

    /// Override the per-item attempt cap.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Register a hook called as each item finishes (completion order).
    pub fn with_outcome_hook(mut self, hook: OutcomeHook) -> Self {
        self.outcome_hook = Some(hook);
        self
    }

    /// The session this executor runs.
    pub fn session(&self) -> &DownloadSession {
        &self.session
    }

    /// Download every item, returning one outcome per item in input order.
    ///
    /// Completion order across workers is unspecified; outcomes are sorted
    /// by sequence index before being returned, so downstream consumers
    /// see deterministic output regardless of completion timing.
    pub async fn download_all(&self, videos: Vec<VideoItem>) -> Vec<DownloadOutcome> {
        if videos.is_empty() {
            return Vec::new();
        }

        info!(
            workers = self.session.workers(),
            items = videos.len(),
            dir = %self.session.target_dir().display(),
            "starting parallel download"
        );

        let mut outcomes: Vec<DownloadOutcome> = stream::iter(
            videos
                .into_iter()
                .enumerate()
                .map(|(i, video)| self.download_one(i + 1, video)),
        )
        .buffer_unordered(self.session.workers())
        .inspect(|outcome| {
            if let Some(hook) = &self.outcome_hook {
                hook(outcome);
            }
        })
        .collect()
        .await;

        outcomes.sort_by_key(|outcome| outcome.index);
        outcomes
    }

    /// Process one item through the skip/block/retry pipeline.
    async fn download_one(&self, index: usize, video: VideoItem) -> DownloadOutcome {
        let target = self.session.target_path(index, &video.id);

        if file_meets_threshold(&target) {
            debug!(video_id = %video.id, target = %target.display(), "already downloaded; skipping");
            return DownloadOutcome::new(index, video, OutcomeStatus::Skipped, target);
        }

        if !allowed_source(&video.url) {
            warn!(video_id = %video.id, url = %video.url, "source host not allow-listed; blocking");
            return DownloadOutcome::new(index, video, OutcomeStatus::Blocked, target);
        }

        for attempt in 1..=self.max_attempts {
            match self
                .transfer
                .transfer(&video.url, &target, self.session.proxy())
                .await
            {
                Ok(()) if file_meets_threshold(&target) => match write_sidecar(&target) {
                    Ok(_) => {
                        self.rate_limiter.register_completion().await;
                        debug!(video_id = %video.id, attempt, "download complete");
                        return DownloadOutcome::new(
                            index,
                            video,
                            OutcomeStatus::Downloaded,
                            target,
                        );
                    }
                    Err(e) => {
                        warn!(video_id = %video.id, attempt, error = %e, "checksum sidecar write failed");
                    }
                },
                Ok(()) => {
                    warn!(
                        video_id = %video.id,
                        attempt,
                        "transfer returned cleanly but produced no plausible file"
                    );
                }
                Err(e) => {
                    warn!(video_id = %video.id, attempt, error = %e, "transfer attempt failed");
                }
            }

            if attempt < self.max_attempts {
                sleep(attempt_backoff(attempt)).await;
            }
        }

        warn!(video_id = %video.id, attempts = self.max_attempts, "all attempts exhausted");
        DownloadOutcome::new(index, video, OutcomeStatus::Failed, target)
    }
}

/// Whether a file exists and exceeds the minimum plausible size.
///
/// A short file left behind by an interrupted run fails this check and is
/// re-downloaded; a large-but-corrupt file passes it, matching the
/// original skip contract (sidecars are not consulted here).
fn file_meets_threshold(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > MIN_PLAUSIBLE_BYTES)
        .unwrap_or(false)
}
