//! Integration tests for multi-source discovery
//!
//! Both strategies are injected as fakes so merge, dedup, pagination, and
//! cooldown behavior can be exercised without the network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tiktok_media_downloader::discovery::{
    CatalogPage, CatalogSource, CatalogVideo, DiscoveryEngine, DiscoveryError, DiscoveryResult,
    ExtractedRef, MediaExtractor,
};
use tiktok_media_downloader::Handle;

/// Extractor fake: either a fixed list of refs or a total failure.
struct FakeExtractor {
    refs: Option<Vec<ExtractedRef>>,
}

impl FakeExtractor {
    fn returning(refs: Vec<ExtractedRef>) -> Arc<Self> {
        Arc::new(Self { refs: Some(refs) })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self { refs: None })
    }
}

#[async_trait]
impl MediaExtractor for FakeExtractor {
    async fn list_profile(&self, _profile_url: &str) -> DiscoveryResult<Vec<ExtractedRef>> {
        match &self.refs {
            Some(refs) => Ok(refs.clone()),
            None => Err(DiscoveryError::ExtractionError("induced failure".into())),
        }
    }
}

/// Catalog fake: replays a queue of per-page responses, then empty pages.
struct ScriptedCatalog {
    pages: Mutex<VecDeque<DiscoveryResult<CatalogPage>>>,
}

impl ScriptedCatalog {
    fn new(pages: Vec<DiscoveryResult<CatalogPage>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
        })
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn fetch_page(&self, _handle: &Handle, _page: u32) -> DiscoveryResult<CatalogPage> {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(CatalogPage::default()))
    }
}

fn extracted(url: &str) -> ExtractedRef {
    ExtractedRef {
        url: url.to_string(),
        title: None,
        thumbnail: None,
    }
}

fn catalog_video(id: &str) -> CatalogVideo {
    CatalogVideo {
        video_id: Some(id.to_string()),
        ..CatalogVideo::default()
    }
}

fn page(ids: &[&str]) -> DiscoveryResult<CatalogPage> {
    Ok(CatalogPage {
        videos: ids.iter().map(|id| catalog_video(id)).collect(),
    })
}

fn engine(
    extractor: Arc<FakeExtractor>,
    catalog: Arc<ScriptedCatalog>,
) -> DiscoveryEngine {
    DiscoveryEngine::new(extractor, catalog).with_page_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_end_to_end_merge_and_dedup() {
    let handle = Handle::parse("creator1").unwrap();
    let extractor = FakeExtractor::returning(vec![extracted(
        "https://www.tiktok.com/@creator1/video/111",
    )]);
    let catalog = ScriptedCatalog::new(vec![page(&["111", "222"]), page(&[])]);

    let videos = engine(extractor, catalog).discover(&handle).await;

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id, "111");
    assert_eq!(videos[1].id, "222");
    // Strategy A's permalink is kept for the overlapping id.
    assert_eq!(videos[0].url, "https://www.tiktok.com/@creator1/video/111");
    // Catalog items get the canonical permalink.
    assert_eq!(videos[1].url, "https://www.tiktok.com/@creator1/video/222");
}

#[tokio::test]
async fn test_duplicate_ids_across_url_shapes() {
    let handle = Handle::parse("creator1").unwrap();
    // Same id reported through two different URL shapes.
    let extractor = FakeExtractor::returning(vec![
        extracted("https://www.tiktok.com/@creator1/video/7191058940519077123"),
        extracted("https://m.tiktok.com/v/7191058940519077123.html"),
    ]);
    let catalog = ScriptedCatalog::new(vec![page(&["7191058940519077123"]), page(&[])]);

    let videos = engine(extractor, catalog).discover(&handle).await;

    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "7191058940519077123");
}

#[tokio::test]
async fn test_extractor_failure_degrades_to_catalog_only() {
    let handle = Handle::parse("creator1").unwrap();
    let catalog = ScriptedCatalog::new(vec![page(&["111", "222"]), page(&[])]);

    let videos = engine(FakeExtractor::failing(), catalog)
        .discover(&handle)
        .await;

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id, "111");
}

#[tokio::test]
async fn test_failed_page_is_skipped_not_fatal() {
    let handle = Handle::parse("creator1").unwrap();
    let catalog = ScriptedCatalog::new(vec![
        Err(DiscoveryError::UnexpectedStatus(500)),
        page(&["333"]),
        page(&[]),
    ]);

    let videos = engine(FakeExtractor::failing(), catalog)
        .discover(&handle)
        .await;

    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].id, "333");
}

#[tokio::test]
async fn test_unresolvable_and_idless_records_are_dropped() {
    let handle = Handle::parse("creator1").unwrap();
    let extractor = FakeExtractor::returning(vec![
        extracted("https://www.tiktok.com/@creator1"),
        extracted("https://www.tiktok.com/@creator1/video/111"),
    ]);
    let catalog = ScriptedCatalog::new(vec![
        Ok(CatalogPage {
            videos: vec![CatalogVideo::default(), catalog_video("222")],
        }),
        page(&[]),
    ]);

    let videos = engine(extractor, catalog).discover(&handle).await;

    let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["111", "222"]);
}

#[tokio::test]
async fn test_both_strategies_empty_is_not_an_error() {
    let handle = Handle::parse("creator1").unwrap();
    let catalog = ScriptedCatalog::new(vec![page(&[])]);

    let videos = engine(FakeExtractor::failing(), catalog)
        .discover(&handle)
        .await;

    assert!(videos.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_throttle_signals_trigger_one_cooldown() {
    let handle = Handle::parse("creator1").unwrap();
    let extractor = FakeExtractor::returning(vec![extracted(
        "https://www.tiktok.com/@creator1/video/111",
    )]);
    // Five consecutive throttling signals fill the error window, then
    // pagination resumes and finds one more video.
    let catalog = ScriptedCatalog::new(vec![
        Err(DiscoveryError::Throttled(429)),
        Err(DiscoveryError::Throttled(429)),
        Err(DiscoveryError::Throttled(429)),
        Err(DiscoveryError::Throttled(429)),
        Err(DiscoveryError::Throttled(429)),
        page(&["999"]),
        page(&[]),
    ]);

    let start = tokio::time::Instant::now();
    let videos = engine(extractor, catalog).discover(&handle).await;
    let elapsed = start.elapsed();

    // Items discovered before the cooldown are retained, paging resumed.
    let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["111", "999"]);

    // Exactly one 120s cooldown, not one per signal.
    assert!(elapsed >= Duration::from_secs(120), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(240), "elapsed: {elapsed:?}");
}
