//! # TikTok Media Downloader Library
//!
//! A library for discovering and downloading a creator's public videos
//! with bounded concurrency, retry, rate limiting, and integrity sidecars.
//!
//! ## Features
//!
//! - **Multi-Source Discovery**: merges flat profile extraction (via the
//!   external `yt-dlp` tool) with a paginated catalog API, deduplicating
//!   by video id and backing off from upstream throttling signals
//! - **Concurrent Downloads**: a bounded worker pool with per-item retry
//!   and linear backoff
//! - **Rate Limiting**: optional cap on successful completions per rolling
//!   minute, shared across all workers
//! - **Integrity Sidecars**: SHA-256 digest written next to every
//!   downloaded file
//! - **Graceful Degradation**: no single item or discovery strategy
//!   failure aborts a run
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tiktok_media_downloader::discovery::{DiscoveryEngine, TikwmCatalog, YtDlpExtractor};
//! use tiktok_media_downloader::downloader::{DownloadExecutor, DownloadSession, YtDlpTransfer};
//! use tiktok_media_downloader::Handle;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = Handle::parse("@creator1")?;
//!
//! let engine = DiscoveryEngine::new(
//!     Arc::new(YtDlpExtractor::new()),
//!     Arc::new(TikwmCatalog::new()),
//! );
//! let videos = engine.discover(&handle).await;
//!
//! let session = DownloadSession::create("downloads".into(), handle)?.with_workers(4);
//! let executor = DownloadExecutor::new(session, Arc::new(YtDlpTransfer::new()));
//! let outcomes = executor.download_all(videos).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`handle`] - Creator handle parsing and normalization
//! - [`discovery`] - Multi-source video discovery with throttle cooldown
//! - [`downloader`] - Concurrent download orchestration
//! - [`output`] - Per-run directory layout and checksum sidecars
//! - [`profile`] - Best-effort creator profile lookup
//!
//! ## External Boundaries
//!
//! Both the flat extraction and the actual media transfer are delegated to
//! the external `yt-dlp` executable behind narrow async traits
//! ([`discovery::MediaExtractor`], [`downloader::MediaTransfer`]), so
//! retry and merge policy can be tested with injected fakes.

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// Multi-source video discovery
pub mod discovery;

/// Download orchestration
pub mod downloader;

/// Creator handle parsing and normalization
pub mod handle;

/// Output layout and integrity sidecars
pub mod output;

/// Creator profile lookup
pub mod profile;

// Re-export commonly used types
pub use handle::Handle;

/// One discoverable media item with a stable platform identifier.
///
/// Created by the discovery engine and consumed read-only by the download
/// orchestrator; never mutated after discovery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoItem {
    /// Platform-assigned identifier, unique within a creator's catalog
    pub id: String,
    /// Source permalink
    pub url: String,
    /// Display title, when the upstream source reported one
    pub description: Option<String>,
    /// Thumbnail URL, when the upstream source reported one
    pub thumbnail_url: Option<String>,
}

impl VideoItem {
    /// Create an item with no description or thumbnail.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            description: None,
            thumbnail_url: None,
        }
    }
}
