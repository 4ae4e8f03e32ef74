//! Error handling and pipeline degradation tests.
//!
//! These verify that meaningful errors are returned for library misuse, and
//! that the pipeline treats unreadable clips as empty reports rather than
//! failures.

use std::time::Duration;

use playcall::{
    Commentator, CommentaryClient, CommentaryOptions, PlaycallError, SampleOptions, VideoClip,
};

/// A commentator whose endpoint will never be reached; used for paths where
/// no frames are sampled and therefore no request is issued.
fn offline_commentator(sample_options: SampleOptions) -> Commentator {
    let options = CommentaryOptions::new().with_endpoint("http://127.0.0.1:9/unreachable");
    Commentator::new(CommentaryClient::new("test-key", options), sample_options)
}

#[test]
fn open_nonexistent_file() {
    let result = VideoClip::open("this_file_does_not_exist.mp4");
    assert!(result.is_err());

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open clip"),
        "Error message should mention clip open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    // Create a temporary file with garbage content.
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = VideoClip::open(&invalid_file_path);
    assert!(result.is_err(), "Expected error for invalid media file");
}

#[test]
fn unreadable_clip_samples_as_empty() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("corrupt.mp4");
    std::fs::write(&invalid_file_path, b"\x00\x00garbage").expect("Failed to write invalid file");

    let commentator = offline_commentator(SampleOptions::new());
    let frames = commentator
        .sample_clip(&invalid_file_path)
        .expect("degraded sampling should not error");
    assert!(frames.is_empty());
}

#[tokio::test]
async fn unreadable_clip_yields_empty_report() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("corrupt.mp4");
    std::fs::write(&invalid_file_path, b"\x00\x00garbage").expect("Failed to write invalid file");

    // No frames are sampled, so the unreachable endpoint is never contacted.
    let commentator = offline_commentator(SampleOptions::new());
    let report = commentator
        .commentate_file(&invalid_file_path)
        .await
        .expect("empty pipeline should not error");
    assert!(report.is_empty());
    assert_eq!(report.render(), "");
}

#[test]
fn configuration_errors_beat_degradation() {
    // A zero interval is a caller bug and must surface even though the clip
    // itself would have degraded to empty.
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("corrupt.mp4");
    std::fs::write(&invalid_file_path, b"garbage").expect("Failed to write invalid file");

    let commentator =
        offline_commentator(SampleOptions::new().with_interval(Duration::ZERO));
    let result = commentator.sample_clip(&invalid_file_path);
    assert!(matches!(result, Err(PlaycallError::InvalidInterval)));
}

#[test]
fn missing_api_key_is_reported_at_startup() {
    // from_env reads OPENAI_API_KEY; clear it for this check.
    // Serialised by being the only test in this binary that touches it.
    unsafe {
        std::env::remove_var("OPENAI_API_KEY");
    }
    let result = CommentaryClient::from_env(CommentaryOptions::new());
    assert!(matches!(result, Err(PlaycallError::MissingApiKey)));
}
