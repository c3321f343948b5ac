//! Download configuration constants and source policy

use std::time::Duration;
use url::Url;

/// Maximum transfer attempts per item.
/// Three attempts with linear backoff recovers from transient upstream
/// hiccups without stalling a whole run on a dead item.
pub const MAX_ATTEMPTS: u32 = 3;

/// Minimum plausible size in bytes for a completed media file.
/// Anything at or below this is treated as an empty/placeholder response,
/// both when checking for an existing download and when verifying a
/// finished transfer.
pub const MIN_PLAUSIBLE_BYTES: u64 = 1024;

/// Default worker-pool size.
pub const DEFAULT_WORKERS: usize = 4;

/// Rolling window applied by the completion rate limiter.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Hosts accepted as transfer sources. Anything else is blocked without a
/// single transfer attempt; this guards against redirected or substituted
/// permalinks.
pub const ALLOWED_HOSTS: &[&str] = &["www.tiktok.com", "m.tiktok.com", "tiktok.com"];

/// Linear backoff before the next attempt: attempt 1 waits 1s, attempt 2
/// waits 2s, and so on.
pub fn attempt_backoff(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}

/// Whether a source URL's host is on the platform allow-list.
///
/// Unparseable URLs and URLs without a host are rejected.
pub fn allowed_source(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    match parsed.host_str() {
        Some(host) => {
            let host = host.to_lowercase();
            ALLOWED_HOSTS.iter().any(|allowed| *allowed == host)
        }
        None => false,
    }
}
