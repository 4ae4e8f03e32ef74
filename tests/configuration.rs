//! SampleOptions and CommentaryOptions builder tests.

use std::time::Duration;

use playcall::{CommentaryOptions, PlaycallError, SampleOptions};

// ── SampleOptions ────────────────────────────────────────────────

#[test]
fn sample_defaults() {
    let options = SampleOptions::new();
    assert_eq!(options.interval(), Duration::from_secs(1));
    assert_eq!(options.max_frames(), 5);
    assert_eq!(options.jpeg_quality(), 90);
    assert_eq!(options.max_dimension(), None);
}

#[test]
fn sample_overrides() {
    let options = SampleOptions::new()
        .with_interval(Duration::from_millis(500))
        .with_max_frames(8)
        .with_jpeg_quality(75)
        .with_max_dimension(640);
    assert_eq!(options.interval(), Duration::from_millis(500));
    assert_eq!(options.max_frames(), 8);
    assert_eq!(options.jpeg_quality(), 75);
    assert_eq!(options.max_dimension(), Some(640));
}

#[test]
fn jpeg_quality_is_clamped() {
    assert_eq!(SampleOptions::new().with_jpeg_quality(0).jpeg_quality(), 1);
    assert_eq!(
        SampleOptions::new().with_jpeg_quality(255).jpeg_quality(),
        100
    );
}

#[test]
fn validate_rejects_zero_interval() {
    let options = SampleOptions::new().with_interval(Duration::ZERO);
    assert!(matches!(
        options.validate(),
        Err(PlaycallError::InvalidInterval)
    ));
}

#[test]
fn validate_rejects_zero_frame_cap() {
    let options = SampleOptions::new().with_max_frames(0);
    assert!(matches!(
        options.validate(),
        Err(PlaycallError::InvalidFrameCap)
    ));
}

#[test]
fn validate_accepts_defaults() {
    assert!(SampleOptions::new().validate().is_ok());
}

// ── CommentaryOptions ────────────────────────────────────────────

#[test]
fn commentary_defaults() {
    let options = CommentaryOptions::new();
    assert_eq!(
        options.endpoint(),
        "https://api.openai.com/v1/chat/completions"
    );
    assert_eq!(options.model(), "gpt-4o");
    assert_eq!(options.max_tokens(), 300);
    assert!(options.system_prompt().contains("sports commentator"));
}

#[test]
fn commentary_overrides() {
    let options = CommentaryOptions::new()
        .with_endpoint("http://localhost:11434/v1/chat/completions")
        .with_model("llava")
        .with_max_tokens(128)
        .with_system_prompt("You are a darts referee.");
    assert_eq!(
        options.endpoint(),
        "http://localhost:11434/v1/chat/completions"
    );
    assert_eq!(options.model(), "llava");
    assert_eq!(options.max_tokens(), 128);
    assert_eq!(options.system_prompt(), "You are a darts referee.");
}
