//! Paginated catalog API client
//!
//! Queries the TikWM posts endpoint page by page for a handle. The payload
//! is dynamic dict-shaped JSON; parsing resolves fields in a fixed order
//! (nested `data.videos`, else empty) instead of speculating per call site.
//! Throttling statuses (403/429) are surfaced as a dedicated error variant
//! so the engine can feed its cooldown window.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{CatalogSource, DiscoveryError, DiscoveryResult};
use crate::handle::Handle;

/// Items requested per catalog page.
pub const PAGE_SIZE: u32 = 30;

const DEFAULT_BASE_URL: &str = "https://www.tikwm.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// One page of catalog results.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    /// Video records in upstream-reported order
    pub videos: Vec<CatalogVideo>,
}

/// One video record from the catalog API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogVideo {
    /// Platform video id; records without one are unusable and skipped
    #[serde(default)]
    pub video_id: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Thumbnail URL
    #[serde(default)]
    pub cover: Option<String>,
}

/// [`CatalogSource`] implementation over the TikWM posts API.
pub struct TikwmCatalog {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl TikwmCatalog {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create with custom base URL (for testing against a stub server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn page_url(&self, handle: &Handle, page: u32) -> String {
        let cursor = (page - 1) * PAGE_SIZE;
        format!(
            "{}/api/user/posts?unique_id=@{}&count={}&cursor={}",
            self.base_url,
            handle.as_str(),
            PAGE_SIZE,
            cursor
        )
    }
}

impl Default for TikwmCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a posts response body into a page.
///
/// Resolution order: the `data.videos` array, else an empty page. Records
/// keep whatever subset of fields the API reported.
pub fn parse_posts_response(payload: &Value) -> DiscoveryResult<CatalogPage> {
    let videos = match payload.get("data").and_then(|d| d.get("videos")) {
        Some(videos) => serde_json::from_value(videos.clone())
            .map_err(|e| DiscoveryError::ParseError(format!("videos array: {e}")))?,
        None => Vec::new(),
    };
    Ok(CatalogPage { videos })
}

#[async_trait]
impl CatalogSource for TikwmCatalog {
    async fn fetch_page(&self, handle: &Handle, page: u32) -> DiscoveryResult<CatalogPage> {
        let url = self.page_url(handle, page);
        debug!(page, url = %url, "fetching catalog page");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DiscoveryError::HttpError(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 403 || status == 429 {
            return Err(DiscoveryError::Throttled(status));
        }
        if status != 200 {
            return Err(DiscoveryError::UnexpectedStatus(status));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| DiscoveryError::ParseError(e.to_string()))?;

        parse_posts_response(&payload)
    }
}
