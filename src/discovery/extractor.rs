//! Flat profile extraction via the external `yt-dlp` tool
//!
//! The extraction tool is invoked once per discovery call in flat-playlist
//! mode: it enumerates a profile's entries without resolving individual
//! formats, which is fast but best-effort. The adapter is deliberately
//! narrow so the engine can be tested with a fake in its place.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::{DiscoveryError, DiscoveryResult, MediaExtractor};

/// Cap on flat-playlist entries requested from the extraction tool.
const PLAYLIST_END: u32 = 500;

/// Default deadline for one extraction run.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One item reference reported by the extraction tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRef {
    /// Item permalink as reported upstream
    pub url: String,
    /// Display title, if reported
    pub title: Option<String>,
    /// Thumbnail URL, if reported
    pub thumbnail: Option<String>,
}

/// Flat-playlist JSON shape emitted by `yt-dlp --dump-single-json`.
#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    entries: Vec<FlatEntry>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    url: Option<String>,
    title: Option<String>,
    thumbnail: Option<String>,
}

/// [`MediaExtractor`] implementation that shells out to `yt-dlp`.
pub struct YtDlpExtractor {
    binary: String,
    timeout: Duration,
}

impl YtDlpExtractor {
    /// Create an extractor using the `yt-dlp` binary found on `PATH`.
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the tool binary path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Override the extraction deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn parse_output(stdout: &[u8]) -> DiscoveryResult<Vec<ExtractedRef>> {
        let playlist: FlatPlaylist = serde_json::from_slice(stdout)
            .map_err(|e| DiscoveryError::ParseError(format!("flat playlist: {e}")))?;

        Ok(playlist
            .entries
            .into_iter()
            .filter_map(|entry| {
                entry.url.map(|url| ExtractedRef {
                    url,
                    title: entry.title,
                    thumbnail: entry.thumbnail,
                })
            })
            .collect())
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn list_profile(&self, profile_url: &str) -> DiscoveryResult<Vec<ExtractedRef>> {
        debug!(url = profile_url, "running flat extraction");

        let playlist_end = PLAYLIST_END.to_string();
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "--dump-single-json",
            "--flat-playlist",
            "--no-warnings",
            "--playlist-end",
            playlist_end.as_str(),
            profile_url,
        ])
        .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| DiscoveryError::Timeout(self.timeout))?
            .map_err(|e| DiscoveryError::ExtractionError(format!("{}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DiscoveryError::ExtractionError(
                stderr.lines().last().unwrap_or("unknown failure").to_string(),
            ));
        }

        Self::parse_output(&output.stdout)
    }
}
