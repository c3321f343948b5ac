//! Multi-source video discovery
//!
//! This module enumerates a creator's videos by combining two independent
//! strategies and merging the results:
//!
//! 1. **Flat extraction**: one call to the external media extraction tool
//!    for the profile URL, yielding a best-effort flat list of permalinks
//! 2. **Paginated catalog**: successive pages of a REST-style catalog API,
//!    with throttle detection and cooldown
//!
//! Results are deduplicated by video id, flat-extraction items first, then
//! newly discovered catalog items in page order. Either strategy may fail
//! partially or completely; discovery degrades to "fewer items found" and
//! never surfaces an error to the caller.
//!
//! # Components
//!
//! - [`engine`] - The merge/dedup/cooldown loop
//! - [`extractor`] - `yt-dlp` flat-playlist adapter
//! - [`catalog`] - TikWM posts API client
//! - [`throttle`] - Bounded throttle-signal window
//! - [`video_id`] - Permalink id extraction

use async_trait::async_trait;

use crate::handle::Handle;

pub mod catalog;
pub mod engine;
pub mod extractor;
pub mod throttle;
pub mod video_id;

pub use catalog::{CatalogPage, CatalogVideo, TikwmCatalog};
pub use engine::DiscoveryEngine;
pub use extractor::{ExtractedRef, YtDlpExtractor};

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Upstream throttling signal (HTTP 403/429)
    #[error("throttled by upstream (HTTP {0})")]
    Throttled(u16),

    /// Non-success HTTP status other than a throttling signal
    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),

    /// Response parse error
    #[error("parse error: {0}")]
    ParseError(String),

    /// External extraction tool error
    #[error("extraction error: {0}")]
    ExtractionError(String),

    /// Operation exceeded its deadline
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Result type for discovery operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Flat profile extraction boundary.
///
/// Implementations return a best-effort list of item references for a
/// profile URL. The adapter is treated as unreliable: any failure is
/// non-fatal to discovery.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// List item references found on a profile page.
    ///
    /// # Arguments
    /// * `profile_url` - Canonical profile URL (see [`Handle::profile_url`])
    ///
    /// # Errors
    /// Returns an error on tool, network, or parse failure; callers are
    /// expected to log and continue without flat-extraction results.
    async fn list_profile(&self, profile_url: &str) -> DiscoveryResult<Vec<ExtractedRef>>;
}

/// Paginated catalog API boundary.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one catalog page (1-based) for a handle.
    ///
    /// # Errors
    /// [`DiscoveryError::Throttled`] signals an upstream 403/429 and feeds
    /// the engine's throttle window; any other error skips the page.
    async fn fetch_page(&self, handle: &Handle, page: u32) -> DiscoveryResult<CatalogPage>;
}
