//! Integration tests for the download orchestrator
//!
//! The transfer capability is injected as a fake that materializes (or
//! refuses to materialize) files on disk, so retry, skip, block, and
//! ordering behavior run without any network or external tool.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tiktok_media_downloader::downloader::{
    DownloadError, DownloadExecutor, DownloadSession, DownloadSummary, MediaTransfer,
    OutcomeStatus,
};
use tiktok_media_downloader::output::checksum::{sha256_path, sidecar_path};
use tiktok_media_downloader::{Handle, VideoItem};

/// Transfer fake: fails the first `fail_first` calls, then writes `size`
/// bytes to the target path.
struct FakeTransfer {
    size: usize,
    fail_first: u32,
    calls: AtomicU32,
}

impl FakeTransfer {
    fn succeeding(size: usize) -> Arc<Self> {
        Arc::new(Self {
            size,
            fail_first: 0,
            calls: AtomicU32::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            size: 0,
            fail_first: u32::MAX,
            calls: AtomicU32::new(0),
        })
    }

    fn flaky(fail_first: u32, size: usize) -> Arc<Self> {
        Arc::new(Self {
            size,
            fail_first,
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaTransfer for FakeTransfer {
    async fn transfer(
        &self,
        _url: &str,
        target: &Path,
        _proxy: Option<&str>,
    ) -> Result<(), DownloadError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(DownloadError::TransferError("induced failure".into()));
        }
        std::fs::write(target, vec![0u8; self.size])
            .map_err(|e| DownloadError::IoError(e.to_string()))?;
        Ok(())
    }
}

fn item(id: &str) -> VideoItem {
    VideoItem::new(id, format!("https://www.tiktok.com/@creator1/video/{id}"))
}

fn session(base: &Path) -> DownloadSession {
    DownloadSession::create(base.to_path_buf(), Handle::parse("creator1").unwrap()).unwrap()
}

#[tokio::test]
async fn test_one_outcome_per_item_in_input_order() {
    let base = tempfile::TempDir::new().unwrap();
    let transfer = FakeTransfer::succeeding(2048);
    let executor = DownloadExecutor::new(session(base.path()).with_workers(2), transfer);

    let outcomes = executor
        .download_all(vec![item("111"), item("222"), item("333")])
        .await;

    assert_eq!(outcomes.len(), 3);
    for (i, outcome) in outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i + 1);
        assert_eq!(outcome.status, OutcomeStatus::Downloaded);
        assert!(outcome.success);
        assert!(outcome.target.is_file());
    }
    assert_eq!(outcomes[0].video.id, "111");
    assert_eq!(outcomes[2].video.id, "333");
}

#[tokio::test]
async fn test_second_run_skips_existing_files() {
    let base = tempfile::TempDir::new().unwrap();
    let session = session(base.path()).with_workers(2);
    let videos = vec![item("111"), item("222")];

    let first = DownloadExecutor::new(session.clone(), FakeTransfer::succeeding(2048))
        .download_all(videos.clone())
        .await;
    assert!(first.iter().all(|o| o.status == OutcomeStatus::Downloaded));

    // Same target directory, same items: nothing is transferred again.
    let second_transfer = FakeTransfer::failing();
    let second = DownloadExecutor::new(session, second_transfer.clone())
        .download_all(videos)
        .await;

    assert!(second.iter().all(|o| o.status == OutcomeStatus::Skipped));
    assert!(second.iter().all(|o| o.success));
    assert_eq!(second_transfer.calls(), 0);
}

#[tokio::test]
async fn test_disallowed_host_is_blocked_without_attempts() {
    let base = tempfile::TempDir::new().unwrap();
    let transfer = FakeTransfer::succeeding(2048);
    let executor = DownloadExecutor::new(session(base.path()), transfer.clone());

    let rogue = VideoItem::new("666", "https://evil.example/video/666");
    let outcomes = executor.download_all(vec![rogue]).await;

    assert_eq!(outcomes[0].status, OutcomeStatus::Blocked);
    assert!(!outcomes[0].success);
    assert_eq!(transfer.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_attempts_yield_failed() {
    let base = tempfile::TempDir::new().unwrap();
    let transfer = FakeTransfer::failing();
    let executor = DownloadExecutor::new(session(base.path()), transfer.clone());

    let start = tokio::time::Instant::now();
    let outcomes = executor.download_all(vec![item("111")]).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
    assert!(!outcomes[0].success);
    assert_eq!(transfer.calls(), 3);
    // Linear backoff between attempts: 1s + 2s.
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_flaky_transfer_succeeds_on_final_attempt() {
    let base = tempfile::TempDir::new().unwrap();
    let transfer = FakeTransfer::flaky(2, 2048);
    let executor = DownloadExecutor::new(session(base.path()), transfer.clone());

    let outcomes = executor.download_all(vec![item("111")]).await;

    assert_eq!(outcomes[0].status, OutcomeStatus::Downloaded);
    assert_eq!(transfer.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_undersized_output_counts_as_failed_attempt() {
    let base = tempfile::TempDir::new().unwrap();
    // Transfer "succeeds" but leaves an implausibly small file.
    let transfer = FakeTransfer::succeeding(100);
    let executor = DownloadExecutor::new(session(base.path()), transfer.clone());

    let outcomes = executor.download_all(vec![item("111")]).await;

    assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
    assert_eq!(transfer.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stale_partial_file_is_retried_not_skipped() {
    let base = tempfile::TempDir::new().unwrap();
    let session = session(base.path());
    let target = session.target_path(1, "111");
    std::fs::write(&target, vec![0u8; 100]).unwrap();

    let outcomes = DownloadExecutor::new(session, FakeTransfer::failing())
        .download_all(vec![item("111")])
        .await;

    // A short leftover from an interrupted run never masquerades as done.
    assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
}

#[tokio::test]
async fn test_sidecar_digest_matches_file_contents() {
    let base = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(session(base.path()), FakeTransfer::succeeding(2048));

    let outcomes = executor.download_all(vec![item("111")]).await;
    let target = &outcomes[0].target;

    let stored = std::fs::read_to_string(sidecar_path(target)).unwrap();
    assert_eq!(stored, sha256_path(target).unwrap());
}

#[tokio::test]
async fn test_summary_over_mixed_outcomes() {
    let base = tempfile::TempDir::new().unwrap();
    let executor = DownloadExecutor::new(
        session(base.path()).with_workers(2),
        FakeTransfer::succeeding(2048),
    );

    let videos = vec![
        item("111"),
        VideoItem::new("666", "https://evil.example/video/666"),
        item("333"),
    ];
    let outcomes = executor.download_all(videos).await;
    let summary = DownloadSummary::from_outcomes(&outcomes);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.downloaded, 2);
    assert_eq!(summary.blocked, 1);
    assert_eq!(summary.failed, 0);
}
