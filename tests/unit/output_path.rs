//! Unit tests for output layout helpers

use std::path::Path;
use tiktok_media_downloader::output::checksum::sidecar_path;
use tiktok_media_downloader::output::path::{handle_slug, target_filename};

#[test]
fn test_slug_is_filesystem_safe() {
    assert_eq!(handle_slug("creator1"), "CREATOR1");
    assert_eq!(handle_slug("user.name_x"), "USER_NAME_X");
    assert_eq!(handle_slug("weird/..\\chars"), "WEIRD____CHARS");
    assert_eq!(handle_slug("keep-dash-42"), "KEEP-DASH-42");
}

#[test]
fn test_filename_encodes_sequence_and_id() {
    assert_eq!(target_filename(1, "111"), "0001_111.mp4");
    assert_eq!(target_filename(999, "111"), "0999_111.mp4");
    assert_eq!(target_filename(1000, "111"), "1000_111.mp4");
}

#[test]
fn test_sidecar_keeps_full_media_name() {
    assert_eq!(
        sidecar_path(Path::new("run/0007_123.mp4")),
        Path::new("run/0007_123.mp4.sha256")
    );
}
