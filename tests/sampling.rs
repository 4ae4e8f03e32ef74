//! Stride and sampling-policy tests.
//!
//! The stride arithmetic is pure, so most properties need no media. Decode
//! tests at the bottom require fixture files under `tests/fixtures/` and
//! skip themselves when those are absent.

use std::{path::Path, time::Duration};

use playcall::{PlaycallError, SampleOptions, VideoClip, sample_positions, sample_stride};

// ── Stride ───────────────────────────────────────────────────────

#[test]
fn stride_30fps_one_second() {
    let stride = sample_stride(30.0, Duration::from_secs(1)).unwrap();
    assert_eq!(stride, 30);
}

#[test]
fn stride_truncates_fractional_frames() {
    // 29.97 fps NTSC material.
    let stride = sample_stride(29.97, Duration::from_secs(1)).unwrap();
    assert_eq!(stride, 29);
}

#[test]
fn stride_scales_with_interval() {
    let stride = sample_stride(30.0, Duration::from_secs(2)).unwrap();
    assert_eq!(stride, 60);
}

#[test]
fn stride_never_below_one() {
    // Sub-frame intervals and broken fps metadata still advance.
    let stride = sample_stride(5.0, Duration::from_millis(100)).unwrap();
    assert_eq!(stride, 1);

    let stride = sample_stride(0.0, Duration::from_secs(1)).unwrap();
    assert_eq!(stride, 1);
}

#[test]
fn zero_interval_is_rejected() {
    let result = sample_stride(30.0, Duration::ZERO);
    assert!(matches!(result, Err(PlaycallError::InvalidInterval)));
}

// ── Positions ────────────────────────────────────────────────────

#[test]
fn positions_30fps_one_second_cap_five() {
    // 30 fps, 1 s interval: frames 0, 30, 60, 90, 120.
    let positions = sample_positions(150, 30, 5);
    assert_eq!(positions, vec![0, 30, 60, 90, 120]);
}

#[test]
fn positions_capped_for_long_clips() {
    let positions = sample_positions(100_000, 30, 5);
    assert_eq!(positions.len(), 5);
    assert_eq!(positions, vec![0, 30, 60, 90, 120]);
}

#[test]
fn clip_shorter_than_stride_keeps_first_frame() {
    let positions = sample_positions(10, 30, 5);
    assert_eq!(positions, vec![0]);
}

#[test]
fn unknown_frame_count_keeps_first_frame() {
    // Containers without a usable duration report a frame count of zero;
    // the first frame is still sampled.
    let positions = sample_positions(0, 30, 5);
    assert_eq!(positions, vec![0]);
}

#[test]
fn positions_exhaust_short_clips_below_cap() {
    let positions = sample_positions(70, 30, 5);
    assert_eq!(positions, vec![0, 30, 60]);
}

// ── Decoding (fixture-gated) ─────────────────────────────────────

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn sampled_frames_are_capped_and_ordered() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut clip = VideoClip::open(path).expect("Failed to open fixture");
    let options = SampleOptions::new();
    let frames = clip.sampler().sample(&options).expect("Failed to sample");

    assert!(frames.len() <= options.max_frames());
    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame.ordinal, index + 1);
        // JPEG SOI marker.
        assert_eq!(&frame.jpeg()[..2], &[0xFF, 0xD8]);
    }

    // Capture order: source frame numbers strictly increase.
    for pair in frames.windows(2) {
        assert!(pair[0].frame_number < pair[1].frame_number);
    }
}

#[test]
fn max_dimension_bounds_encoded_frames() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut clip = VideoClip::open(path).expect("Failed to open fixture");
    let options = SampleOptions::new().with_max_frames(1).with_max_dimension(64);
    let frames = clip.sampler().sample(&options).expect("Failed to sample");
    assert_eq!(frames.len(), 1);

    let image = image::load_from_memory(frames[0].jpeg()).expect("Failed to decode JPEG");
    assert!(image.width().max(image.height()) <= 64);
}
