//! Creator handle parsing and normalization
//!
//! Handles are public usernames on the source platform. User input may
//! carry a leading `@` and surrounding whitespace; both are stripped before
//! the handle is used anywhere else in the crate.

use std::fmt;

/// A normalized creator handle (no leading `@`, no surrounding whitespace).
///
/// # Examples
///
/// ```
/// use tiktok_media_downloader::handle::Handle;
///
/// let handle = Handle::parse(" @creator1 ").unwrap();
/// assert_eq!(handle.as_str(), "creator1");
/// assert_eq!(handle.profile_url(), "https://www.tiktok.com/@creator1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    /// Parse raw user input into a normalized handle.
    ///
    /// Strips surrounding whitespace and a single leading `@`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing remains after normalization. An empty
    /// handle is a caller error and is never retried.
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        let trimmed = raw.trim();
        let name = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
        if name.is_empty() {
            return Err(HandleError::Empty);
        }
        Ok(Self(name.to_string()))
    }

    /// The normalized handle without the `@` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical profile URL for this handle.
    pub fn profile_url(&self) -> String {
        format!("https://www.tiktok.com/@{}", self.0)
    }

    /// Canonical permalink for a video id under this handle.
    pub fn video_url(&self, video_id: &str) -> String {
        format!("https://www.tiktok.com/@{}/video/{}", self.0, video_id)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur during handle parsing
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    /// Nothing remained after stripping `@` and whitespace
    #[error("handle cannot be empty")]
    Empty,
}
