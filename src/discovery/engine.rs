//! Discovery engine: strategy merge, dedup, pagination, cooldown
//!
//! Runs the two discovery strategies in order and merges their results
//! into one deduplicated, order-preserving list. Flat extraction runs
//! once; the catalog is paged until a bounded page count, an exhausted
//! page, or the caller-visible end of the loop. Throttling signals feed a
//! bounded error window; a full window spanning under the threshold
//! triggers exactly one cooldown before paging resumes.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{info, warn};

use super::throttle::ThrottleWindow;
use super::video_id::extract_video_id;
use super::{CatalogSource, DiscoveryError, MediaExtractor};
use crate::handle::Handle;
use crate::VideoItem;

/// Default bound on catalog pages per discovery call.
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Delay between successful page requests, to reduce upstream load.
pub const PAGE_DELAY: Duration = Duration::from_millis(300);

/// Pause applied when the throttle window declares active throttling.
pub const THROTTLE_COOLDOWN: Duration = Duration::from_secs(120);

/// Merges flat extraction and catalog pagination into one item list.
///
/// Both strategies sit behind trait objects so tests can inject fakes.
/// Discovery is sequential and single-threaded; it runs to completion
/// before any download starts.
pub struct DiscoveryEngine {
    extractor: Arc<dyn MediaExtractor>,
    catalog: Arc<dyn CatalogSource>,
    max_pages: u32,
    page_delay: Duration,
    cooldown: Duration,
}

impl DiscoveryEngine {
    /// Create an engine over the given strategy implementations.
    pub fn new(extractor: Arc<dyn MediaExtractor>, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            extractor,
            catalog,
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: PAGE_DELAY,
            cooldown: THROTTLE_COOLDOWN,
        }
    }

    /// Bound the number of catalog pages scanned per call.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Override the inter-page delay.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Override the throttle cooldown duration.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Discover a creator's videos.
    ///
    /// Returns flat-extraction items first, then newly discovered catalog
    /// items in page order, with no duplicate ids. An empty list means
    /// "nothing to download"; it is not an error. No failure from either
    /// strategy propagates to the caller.
    pub async fn discover(&self, handle: &Handle) -> Vec<VideoItem> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut collected: Vec<VideoItem> = Vec::new();
        let mut window = ThrottleWindow::default();

        info!(handle = %handle, "scanning profile for available videos");

        self.run_flat_extraction(handle, &mut seen, &mut collected)
            .await;
        self.run_catalog_pages(handle, &mut seen, &mut collected, &mut window)
            .await;

        if collected.is_empty() {
            warn!(handle = %handle, "no videos discovered");
        } else {
            info!(handle = %handle, total = collected.len(), "discovery complete");
        }
        collected
    }

    /// Strategy A: one flat-extraction pass over the profile URL.
    ///
    /// Any failure is logged and swallowed; discovery continues with zero
    /// items from this strategy.
    async fn run_flat_extraction(
        &self,
        handle: &Handle,
        seen: &mut HashSet<String>,
        collected: &mut Vec<VideoItem>,
    ) {
        match self.extractor.list_profile(&handle.profile_url()).await {
            Ok(refs) => {
                for item_ref in refs {
                    let Some(id) = extract_video_id(&item_ref.url) else {
                        continue;
                    };
                    if !seen.insert(id.clone()) {
                        continue;
                    }
                    collected.push(VideoItem {
                        id,
                        url: item_ref.url,
                        description: item_ref.title,
                        thumbnail_url: item_ref.thumbnail,
                    });
                }
                if !collected.is_empty() {
                    info!(count = collected.len(), "flat extraction discovered videos");
                }
            }
            Err(e) => {
                warn!(error = %e, "flat extraction failed; continuing with catalog only");
            }
        }
    }

    /// Strategy B: bounded catalog pagination with throttle cooldown.
    async fn run_catalog_pages(
        &self,
        handle: &Handle,
        seen: &mut HashSet<String>,
        collected: &mut Vec<VideoItem>,
        window: &mut ThrottleWindow,
    ) {
        for page in 1..=self.max_pages {
            match self.catalog.fetch_page(handle, page).await {
                Ok(page_data) => {
                    let mut new_count = 0;
                    for video in page_data.videos {
                        let Some(id) = video.video_id.filter(|id| !id.is_empty()) else {
                            continue;
                        };
                        if !seen.insert(id.clone()) {
                            continue;
                        }
                        collected.push(VideoItem {
                            url: handle.video_url(&id),
                            id,
                            description: video.title,
                            thumbnail_url: video.cover,
                        });
                        new_count += 1;
                    }

                    // A page with nothing new means the catalog is exhausted.
                    if new_count == 0 {
                        break;
                    }
                    info!(page, added = new_count, total = collected.len(), "catalog page merged");
                    sleep(self.page_delay).await;
                }
                Err(DiscoveryError::Throttled(status)) => {
                    warn!(page, status, "catalog throttling signal");
                    window.record(Instant::now());
                    if window.cooldown_due() {
                        warn!(
                            cooldown_secs = self.cooldown.as_secs(),
                            "upstream appears to be throttling requests; cooling down"
                        );
                        sleep(self.cooldown).await;
                        window.clear();
                    }
                }
                Err(e) => {
                    warn!(page, error = %e, "catalog page failed; skipping");
                }
            }
        }
    }
}
