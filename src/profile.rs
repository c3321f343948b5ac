//! Creator profile lookup
//!
//! Best-effort lookup of a creator's public profile across a list of info
//! endpoints. Responses are dynamic dict-shaped JSON whose fields appear
//! under several possible keys depending on the endpoint and schema
//! version, so parsing follows one explicit resolution order per field:
//! the nested `data.user` object, else a flat `user`, else `data`;
//! counters come from `data.stats` first, then legacy flat fields, else
//! zero. Every failure is tolerated; callers receive `None` and carry on.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::handle::Handle;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A creator's public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name
    pub nickname: String,
    /// Stable unique id (usually equals the handle)
    pub unique_id: String,
    /// Bio text
    pub signature: String,
    /// Follower count
    pub follower_count: u64,
    /// Following count
    pub following_count: u64,
    /// Total like count
    pub heart_count: u64,
    /// Published video count
    pub video_count: u64,
    /// Whether the account is verified
    pub verified: bool,
    /// Whether the account is private
    pub private: bool,
}

/// Best-effort profile client over public info endpoints.
pub struct ProfileClient {
    client: Client,
    timeout: Duration,
    endpoints: Option<Vec<String>>,
}

impl ProfileClient {
    /// Create a client against the default endpoints.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: DEFAULT_TIMEOUT,
            endpoints: None,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the endpoint URL templates (for testing against stubs).
    ///
    /// Each template may contain `{handle}`, replaced per lookup.
    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    fn endpoint_urls(&self, handle: &Handle) -> Vec<String> {
        let templates = match &self.endpoints {
            Some(endpoints) => endpoints.clone(),
            None => vec![
                "https://www.tikwm.com/api/user/info?unique_id=@{handle}".to_string(),
                "https://api.tiktokuserinfo.com/user/info?username={handle}".to_string(),
            ],
        };
        templates
            .into_iter()
            .map(|t| t.replace("{handle}", handle.as_str()))
            .collect()
    }

    /// Fetch the profile for a handle, trying each endpoint in order.
    ///
    /// Returns `None` when no endpoint produced a parseable profile; this
    /// is informational only and never aborts a run.
    pub async fn fetch_profile(&self, handle: &Handle) -> Option<UserProfile> {
        for url in self.endpoint_urls(handle) {
            debug!(url = %url, "querying profile endpoint");
            let response = match self.client.get(&url).timeout(self.timeout).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "profile endpoint failed");
                    continue;
                }
            };
            if response.status().as_u16() != 200 {
                continue;
            }
            let payload: Value = match response.json().await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "profile response unparseable");
                    continue;
                }
            };
            if let Some(profile) = parse_profile(&payload, handle) {
                return Some(profile);
            }
        }
        warn!(handle = %handle, "unable to fetch profile from available endpoints");
        None
    }
}

impl Default for ProfileClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one endpoint payload into a profile.
///
/// Returns `None` when neither a user object nor a stats object is
/// present, so the caller can fall through to the next endpoint.
pub fn parse_profile(payload: &Value, handle: &Handle) -> Option<UserProfile> {
    fn non_empty_object(value: &Value) -> bool {
        value.as_object().map(|o| !o.is_empty()).unwrap_or(false)
    }

    let empty = Value::Object(Default::default());

    // Field resolution order: data.user, else user, else data.
    let user = payload
        .pointer("/data/user")
        .or_else(|| payload.get("user"))
        .or_else(|| payload.get("data"))
        .filter(|v| non_empty_object(v))
        .unwrap_or(&empty);
    let stats = payload.pointer("/data/stats").unwrap_or(&empty);

    if !non_empty_object(user) && !non_empty_object(stats) {
        return None;
    }

    let text = |v: &Value, key: &str, default: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };
    // Counters: stats object first, then the legacy flat field, else zero.
    let count = |nested_key: &str, flat_key: &str| {
        stats
            .get(nested_key)
            .and_then(Value::as_u64)
            .or_else(|| user.get(flat_key).and_then(Value::as_u64))
            .unwrap_or(0)
    };

    Some(UserProfile {
        nickname: text(user, "nickname", handle.as_str()),
        unique_id: text(user, "uniqueId", handle.as_str()),
        signature: text(user, "signature", "No bio"),
        follower_count: count("followerCount", "fans"),
        following_count: count("followingCount", "follow"),
        heart_count: count("heartCount", "heart"),
        video_count: count("videoCount", "video"),
        verified: user.get("verified").and_then(Value::as_bool).unwrap_or(false),
        private: user.get("private").and_then(Value::as_bool).unwrap_or(false),
    })
}
