//! Video id extraction from permalink URLs
//!
//! Upstream sources report permalinks in several shapes; the numeric video
//! id is recovered by trying a fixed list of patterns in order. The first
//! pattern that matches wins.

use once_cell::sync::Lazy;
use regex::Regex;

/// Known permalink shapes, in resolution order:
/// a `/video/<digits>` path segment, a 19-digit token anywhere in a
/// tiktok.com URL, and a handle-qualified `/video/<digits>` path.
static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/video/(\d+)",
        r"tiktok\.com.*?(\d{19})",
        r"@[\w.\-]+/video/(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("hard-coded pattern compiles"))
    .collect()
});

/// Extract the numeric video id from a permalink URL, if any pattern
/// matches.
pub fn extract_video_id(url: &str) -> Option<String> {
    for pattern in ID_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(url) {
            if let Some(id) = caps.get(1) {
                return Some(id.as_str().to_string());
            }
        }
    }
    None
}
