//! External transfer capability boundary
//!
//! The actual extraction of video bitstreams is delegated entirely to the
//! external `yt-dlp` tool. The interface is deliberately narrow (submit
//! one URL, get success or failure) so the executor's retry policy can be
//! tested independently of the transfer mechanism.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use super::DownloadError;

/// One-shot media transfer into a target path.
#[async_trait]
pub trait MediaTransfer: Send + Sync {
    /// Transfer the media at `url` into `target`.
    ///
    /// A clean return does NOT guarantee a plausible file on disk; the
    /// caller verifies the target's size afterward.
    ///
    /// # Errors
    ///
    /// Returns an error when the tool cannot be spawned or reports a
    /// failure. Errors here are retried by the executor.
    async fn transfer(
        &self,
        url: &str,
        target: &Path,
        proxy: Option<&str>,
    ) -> Result<(), DownloadError>;
}

/// [`MediaTransfer`] implementation that shells out to `yt-dlp`.
pub struct YtDlpTransfer {
    binary: String,
}

impl YtDlpTransfer {
    /// Create a transfer using the `yt-dlp` binary found on `PATH`.
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }

    /// Override the tool binary path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Default for YtDlpTransfer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTransfer for YtDlpTransfer {
    async fn transfer(
        &self,
        url: &str,
        target: &Path,
        proxy: Option<&str>,
    ) -> Result<(), DownloadError> {
        debug!(url, target = %target.display(), "invoking transfer tool");

        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "--quiet",
            "--no-progress",
            "--no-warnings",
            "--no-check-certificates",
            "--retries",
            "3",
            "-f",
            "best",
            "-o",
        ])
        .arg(target)
        .kill_on_drop(true);

        if let Some(proxy) = proxy {
            cmd.args(["--proxy", proxy]);
        }
        cmd.arg(url);

        let output = cmd
            .output()
            .await
            .map_err(|e| DownloadError::ToolError(format!("{}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DownloadError::TransferError(
                stderr.lines().last().unwrap_or("unknown failure").to_string(),
            ));
        }

        Ok(())
    }
}
