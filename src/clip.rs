//! Core [`VideoClip`] implementation.
//!
//! `VideoClip` opens a media file, locates its video stream, caches
//! [`ClipMetadata`], and hands out a
//! [`FrameSampler`](crate::sampler::FrameSampler) for frame extraction.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{
    error::PlaycallError,
    metadata::{ClipMetadata, VideoStreamInfo},
    sampler::FrameSampler,
};

/// An opened video clip.
///
/// Created via [`VideoClip::open`], this struct holds the demuxer context and
/// cached metadata. Use [`sampler()`](VideoClip::sampler) to obtain a
/// [`FrameSampler`] for the clip.
///
/// # Example
///
/// ```no_run
/// use playcall::{SampleOptions, VideoClip};
///
/// let mut clip = VideoClip::open("match.mp4").unwrap();
/// let frames = clip.sampler().sample(&SampleOptions::new()).unwrap();
/// assert!(frames.len() <= 5);
/// ```
pub struct VideoClip {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: ClipMetadata,
    /// Index of the best video stream, if one exists.
    pub(crate) video_stream_index: Option<usize>,
    /// Path to the opened clip (kept for diagnostics).
    pub(crate) path: PathBuf,
}

impl Debug for VideoClip {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoClip")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl VideoClip {
    /// Open a clip for frame sampling.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PlaycallError::ClipOpen`] if the file cannot be opened or
    /// has no recognisable media streams.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PlaycallError> {
        let path = path.as_ref();
        let clip_path = path.to_path_buf();

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| PlaycallError::ClipOpen {
            path: clip_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| PlaycallError::ClipOpen {
            path: clip_path.clone(),
            reason: error.to_string(),
        })?;

        let video_stream_index = input
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index());

        // Container-level duration.
        let duration_microseconds = input.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let format = input.format().name().to_string();

        let video = if let Some(index) = video_stream_index {
            let stream = input
                .stream(index)
                .ok_or(PlaycallError::NoVideoStream)?;
            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| PlaycallError::ClipOpen {
                    path: clip_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                })?;
            let decoder =
                decoder_context
                    .decoder()
                    .video()
                    .map_err(|error| PlaycallError::ClipOpen {
                        path: clip_path.clone(),
                        reason: format!("Failed to create video decoder: {error}"),
                    })?;

            let width = decoder.width();
            let height = decoder.height();

            // Frames per second from the stream's average frame rate, with a
            // fallback to the raw rate field.
            let frame_rate = stream.avg_frame_rate();
            let frames_per_second = if frame_rate.denominator() != 0 {
                frame_rate.numerator() as f64 / frame_rate.denominator() as f64
            } else {
                let rate = stream.rate();
                if rate.denominator() != 0 {
                    rate.numerator() as f64 / rate.denominator() as f64
                } else {
                    0.0
                }
            };

            let frame_count = if frames_per_second > 0.0 {
                (duration.as_secs_f64() * frames_per_second) as u64
            } else {
                0
            };

            let codec = decoder
                .codec()
                .map(|codec| codec.name().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            Some(VideoStreamInfo {
                width,
                height,
                frames_per_second,
                frame_count,
                codec,
            })
        } else {
            None
        };

        let metadata = ClipMetadata {
            video,
            duration,
            format,
        };

        Ok(Self {
            input,
            metadata,
            video_stream_index,
            path: clip_path,
        })
    }

    /// Get a reference to the cached clip metadata.
    ///
    /// Metadata is extracted once during [`open`](VideoClip::open) and does
    /// not require additional decoding.
    pub fn metadata(&self) -> &ClipMetadata {
        &self.metadata
    }

    /// Obtain a [`FrameSampler`] for extracting frames from this clip.
    ///
    /// The returned sampler borrows this clip mutably; each sampling pass
    /// creates a fresh decoder and reads the stream from the start.
    pub fn sampler(&mut self) -> FrameSampler<'_> {
        FrameSampler { clip: self }
    }
}
