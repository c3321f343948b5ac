//! Unit tests for handle normalization

use tiktok_media_downloader::Handle;

#[test]
fn test_handle_normalization_variants() {
    for raw in ["creator1", "@creator1", "  creator1  ", " @creator1\t"] {
        let handle = Handle::parse(raw).unwrap();
        assert_eq!(handle.as_str(), "creator1", "input: {raw:?}");
    }
}

#[test]
fn test_empty_handle_is_caller_error() {
    assert!(Handle::parse("").is_err());
    assert!(Handle::parse("@").is_err());
    assert!(Handle::parse(" \t ").is_err());
}

#[test]
fn test_handle_keeps_inner_at_signs() {
    // Only a single leading @ is stripped.
    let handle = Handle::parse("@user@place").unwrap();
    assert_eq!(handle.as_str(), "user@place");
}

#[test]
fn test_canonical_urls() {
    let handle = Handle::parse("@creator1").unwrap();
    assert_eq!(handle.profile_url(), "https://www.tiktok.com/@creator1");
    assert_eq!(
        handle.video_url("7191058940519077000"),
        "https://www.tiktok.com/@creator1/video/7191058940519077000"
    );
}
