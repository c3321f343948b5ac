//! Download command implementation

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::CliError;
use crate::discovery::{DiscoveryEngine, TikwmCatalog, YtDlpExtractor};
use crate::downloader::{DownloadExecutor, DownloadSession, DownloadSummary, YtDlpTransfer};
use crate::profile::ProfileClient;
use crate::Handle;

/// Maximum allowed concurrency to prevent self-inflicted rate limiting
const MAX_CONCURRENCY: usize = 32;

/// Parse and validate a worker-pool size.
fn parse_workers(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("workers must be at least 1".to_string());
    }
    if value > MAX_CONCURRENCY {
        return Err(format!("workers {value} exceeds maximum of {MAX_CONCURRENCY}"));
    }
    Ok(value)
}

/// Discover and download a creator's public videos.
#[derive(Debug, Parser)]
#[command(name = "tiktok-media-downloader", version)]
pub struct Cli {
    /// Creator handle, with or without a leading @
    pub handle: String,

    /// Base directory downloads are placed under
    #[arg(long, default_value = "downloads")]
    pub output_dir: PathBuf,

    /// Worker-pool size
    #[arg(long, default_value_t = 4, value_parser = parse_workers)]
    pub workers: usize,

    /// Proxy URL handed to the transfer tool
    #[arg(long)]
    pub proxy: Option<String>,

    /// Cap on successful downloads per rolling minute (0 disables)
    #[arg(long)]
    pub rate_limit: Option<usize>,

    /// Bound on catalog pages scanned during discovery
    #[arg(long, default_value_t = 10)]
    pub max_pages: u32,

    /// HTTP timeout in seconds for discovery and profile requests
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Skip the profile lookup
    #[arg(long)]
    pub no_profile: bool,
}

impl Cli {
    /// Run the full discover-then-download flow.
    pub async fn execute(&self) -> Result<(), CliError> {
        let handle = Handle::parse(&self.handle)?;
        let timeout = Duration::from_secs(self.timeout_secs.max(1));

        if !self.no_profile {
            if let Some(profile) = ProfileClient::new()
                .with_timeout(timeout)
                .fetch_profile(&handle)
                .await
            {
                info!(
                    nickname = %profile.nickname,
                    followers = profile.follower_count,
                    videos = profile.video_count,
                    verified = profile.verified,
                    private = profile.private,
                    "profile found"
                );
            }
        }

        let engine = DiscoveryEngine::new(
            Arc::new(YtDlpExtractor::new().with_timeout(timeout)),
            Arc::new(TikwmCatalog::new().with_timeout(timeout)),
        )
        .with_max_pages(self.max_pages);

        let videos = engine.discover(&handle).await;
        if videos.is_empty() {
            info!(handle = %handle, "nothing to download");
            return Ok(());
        }

        let session = DownloadSession::create(self.output_dir.clone(), handle)?
            .with_workers(self.workers)
            .with_proxy(self.proxy.clone())
            .with_rate_limit(self.rate_limit);

        let progress = ProgressBar::new(videos.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?,
        );

        let executor = DownloadExecutor::new(session, Arc::new(YtDlpTransfer::new()))
            .with_outcome_hook(Box::new({
                let progress = progress.clone();
                move |outcome| {
                    progress.set_message(format!("{} {}", outcome.status, outcome.video.id));
                    progress.inc(1);
                }
            }));

        let outcomes = executor.download_all(videos).await;
        progress.finish_and_clear();

        let summary = DownloadSummary::from_outcomes(&outcomes);
        info!(
            total = summary.total,
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            blocked = summary.blocked,
            failed = summary.failed,
            dir = %executor.session().target_dir().display(),
            "run complete"
        );

        Ok(())
    }
}
