//! Per-run directory layout
//!
//! Target paths follow a two-level structure under the base directory:
//! `<base>/<SLUG>/<YYYYmmdd-HHMMSS>/<0001_id>.mp4`, where `SLUG` is a
//! filesystem-safe rendering of the creator handle and the timestamp is
//! fixed once per download session. Per-index filenames guarantee that no
//! two workers ever write the same path.

use crate::handle::Handle;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Filesystem-safe slug for a creator handle.
///
/// Uppercases the handle and replaces every character outside `A-Z`,
/// `0-9`, and `-` with `_`. An input that produces nothing falls back to
/// `UNKNOWN` so the run directory is always nameable.
pub fn handle_slug(handle: &str) -> String {
    let slug: String = handle
        .to_uppercase()
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.is_empty() {
        "UNKNOWN".to_string()
    } else {
        slug
    }
}

/// Run directory for a handle under `base`, stamped with the session start
/// time: `<base>/<SLUG>/<YYYYmmdd-HHMMSS>`.
pub fn run_dir(base: &Path, handle: &Handle, started_at: DateTime<Local>) -> PathBuf {
    base.join(handle_slug(handle.as_str()))
        .join(started_at.format("%Y%m%d-%H%M%S").to_string())
}

/// Target filename for the item at a 1-based sequence index: `0001_<id>.mp4`.
///
/// The index is zero-padded to four digits so listings sort in download
/// order.
pub fn target_filename(index: usize, video_id: &str) -> String {
    format!("{index:04}_{video_id}.mp4")
}
