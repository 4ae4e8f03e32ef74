//! Stride-based frame sampling.
//!
//! This module provides [`FrameSampler`] for subsampling decoded video
//! frames at a fixed time interval, and [`SampleOptions`] for configuring
//! the interval, the frame cap, and the JPEG output. Sampled frames are
//! returned as [`SampledFrame`] values carrying the encoded JPEG bytes.

use std::{io::Cursor, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use ffmpeg_next::{
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{RgbImage, codecs::jpeg::JpegEncoder};

use crate::{clip::VideoClip, error::PlaycallError};

/// Compute the frame stride for a given frame rate and sampling interval.
///
/// The stride is the gap, in frames, between consecutive sampled frames:
/// `fps × interval`, truncated, with a floor of 1 so that clips with broken
/// or very low frame-rate metadata still yield their first frame.
///
/// # Errors
///
/// Returns [`PlaycallError::InvalidInterval`] for a zero interval.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// let stride = playcall::sample_stride(30.0, Duration::from_secs(1)).unwrap();
/// assert_eq!(stride, 30);
/// ```
pub fn sample_stride(frames_per_second: f64, interval: Duration) -> Result<u64, PlaycallError> {
    if interval.is_zero() {
        return Err(PlaycallError::InvalidInterval);
    }
    let stride = (frames_per_second * interval.as_secs_f64()) as u64;
    Ok(stride.max(1))
}

/// Compute the frame numbers a sampling pass will keep.
///
/// Walks `0, stride, 2 × stride, …` up to (not including) `frame_count`,
/// stopping after `cap` entries. A clip with fewer frames than one stride
/// keeps exactly its first frame.
///
/// # Example
///
/// ```
/// let positions = playcall::sample_positions(150, 30, 5);
/// assert_eq!(positions, vec![0, 30, 60, 90, 120]);
/// ```
pub fn sample_positions(frame_count: u64, stride: u64, cap: usize) -> Vec<u64> {
    (0..frame_count.max(1))
        .step_by(stride.max(1) as usize)
        .take(cap)
        .collect()
}

/// Configuration for a sampling pass.
///
/// A builder in the usual style; a default-constructed value samples one
/// frame per second, keeps at most five, and encodes JPEG at quality 90 with
/// no downscaling.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use playcall::SampleOptions;
///
/// let options = SampleOptions::new()
///     .with_interval(Duration::from_secs(2))
///     .with_max_frames(3)
///     .with_max_dimension(640);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct SampleOptions {
    pub(crate) interval: Duration,
    pub(crate) max_frames: usize,
    pub(crate) jpeg_quality: u8,
    pub(crate) max_dimension: Option<u32>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleOptions {
    /// Create sampling options with default settings.
    ///
    /// Defaults: 1 second interval, at most 5 frames, JPEG quality 90,
    /// source resolution.
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_frames: 5,
            jpeg_quality: 90,
            max_dimension: None,
        }
    }

    /// Set the time interval between sampled frames.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the maximum number of frames kept per sampling pass.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Set the JPEG encoding quality. Clamped to `1..=100`.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Limit the longest edge of encoded frames, preserving aspect ratio.
    ///
    /// Useful to keep request payloads small when frames are destined for an
    /// image-accepting API.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    /// The configured sampling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The configured frame cap.
    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// The configured JPEG quality.
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// The configured longest-edge limit, if any.
    pub fn max_dimension(&self) -> Option<u32> {
        self.max_dimension
    }

    /// Check the options for values no sampling pass can honour.
    ///
    /// # Errors
    ///
    /// [`PlaycallError::InvalidInterval`] for a zero interval,
    /// [`PlaycallError::InvalidFrameCap`] for a zero frame cap.
    pub fn validate(&self) -> Result<(), PlaycallError> {
        if self.interval.is_zero() {
            return Err(PlaycallError::InvalidInterval);
        }
        if self.max_frames == 0 {
            return Err(PlaycallError::InvalidFrameCap);
        }
        Ok(())
    }
}

/// One sampled frame, JPEG-encoded.
///
/// Ordering follows capture order; `ordinal` is the 1-based position of the
/// frame within the sample sequence, `frame_number` the 0-based position of
/// the frame within the source stream.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// 1-based position within the sampled sequence.
    pub ordinal: usize,
    /// 0-based frame number within the source stream.
    pub frame_number: u64,
    jpeg: Vec<u8>,
}

impl SampledFrame {
    pub(crate) fn from_parts(ordinal: usize, frame_number: u64, jpeg: Vec<u8>) -> Self {
        Self {
            ordinal,
            frame_number,
            jpeg,
        }
    }

    /// The encoded JPEG bytes.
    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// Consume the frame, returning the encoded JPEG bytes.
    pub fn into_jpeg(self) -> Vec<u8> {
        self.jpeg
    }

    /// The JPEG bytes encoded as standard base64, for embedding in a
    /// text-safe payload.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.jpeg)
    }
}

/// Frame sampling for one clip.
///
/// Obtained via [`VideoClip::sampler`]. Each call to
/// [`sample`](FrameSampler::sample) creates a fresh decoder and reads the
/// stream from its start; the decoder is dropped when the call returns.
pub struct FrameSampler<'a> {
    pub(crate) clip: &'a mut VideoClip,
}

impl FrameSampler<'_> {
    /// Sample frames at the configured interval.
    ///
    /// Decodes the clip sequentially, counting frames in capture order.
    /// Every frame whose index is a multiple of the computed stride is
    /// scaled (RGB24, optionally downsized to the configured longest edge),
    /// JPEG-encoded, and kept. Sampling stops once
    /// [`max_frames`](SampleOptions::with_max_frames) frames are gathered or
    /// the stream is exhausted.
    ///
    /// # Errors
    ///
    /// - [`PlaycallError::InvalidInterval`] / [`PlaycallError::InvalidFrameCap`]
    ///   for unusable options.
    /// - [`PlaycallError::NoVideoStream`] if the clip has no video.
    /// - [`PlaycallError::FrameDecode`] / [`PlaycallError::Ffmpeg`] if
    ///   decoding fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use playcall::{SampleOptions, VideoClip};
    ///
    /// let mut clip = VideoClip::open("match.mp4")?;
    /// let frames = clip.sampler().sample(&SampleOptions::new())?;
    /// for frame in &frames {
    ///     println!("sample {} = source frame {}", frame.ordinal, frame.frame_number);
    /// }
    /// # Ok::<(), playcall::PlaycallError>(())
    /// ```
    pub fn sample(&mut self, options: &SampleOptions) -> Result<Vec<SampledFrame>, PlaycallError> {
        options.validate()?;

        let video_stream_index = self
            .clip
            .video_stream_index
            .ok_or(PlaycallError::NoVideoStream)?;
        let info = self
            .clip
            .metadata
            .video
            .as_ref()
            .ok_or(PlaycallError::NoVideoStream)?;

        let stride = sample_stride(info.frames_per_second, options.interval)?;
        log::debug!(
            "sampling {} at stride {} ({}fps, every {:?}, cap {})",
            self.clip.path.display(),
            stride,
            info.frames_per_second,
            options.interval,
            options.max_frames,
        );

        // Build a fresh decoder from the stream parameters.
        let stream = self
            .clip
            .input
            .stream(video_stream_index)
            .ok_or(PlaycallError::NoVideoStream)?;
        let decoder_context =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let (output_width, output_height) = match options.max_dimension {
            Some(max) => fit_dimensions(decoder.width(), decoder.height(), max),
            None => (decoder.width(), decoder.height()),
        };

        // Pixel-format converter: source format -> packed RGB24.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            output_width,
            output_height,
            ScalingFlags::BILINEAR,
        )?;

        let mut samples: Vec<SampledFrame> = Vec::with_capacity(options.max_frames);
        let mut frame_number: u64 = 0;
        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        let keep = |frame_number: u64,
                        decoded: &VideoFrame,
                        rgb: &mut VideoFrame,
                        scaler: &mut ScalingContext,
                        samples: &mut Vec<SampledFrame>|
         -> Result<(), PlaycallError> {
            scaler.run(decoded, rgb)?;
            let jpeg = encode_jpeg(rgb, output_width, output_height, options.jpeg_quality)?;
            samples.push(SampledFrame {
                ordinal: samples.len() + 1,
                frame_number,
                jpeg,
            });
            Ok(())
        };

        'demux: for (stream, packet) in self.clip.input.packets() {
            if stream.index() != video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                if frame_number % stride == 0 {
                    keep(
                        frame_number,
                        &decoded_frame,
                        &mut rgb_frame,
                        &mut scaler,
                        &mut samples,
                    )?;
                    if samples.len() >= options.max_frames {
                        break 'demux;
                    }
                }
                frame_number += 1;
            }
        }

        // Flush the decoder for any buffered frames.
        if samples.len() < options.max_frames {
            decoder.send_eof()?;
            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                if frame_number % stride == 0 {
                    keep(
                        frame_number,
                        &decoded_frame,
                        &mut rgb_frame,
                        &mut scaler,
                        &mut samples,
                    )?;
                    if samples.len() >= options.max_frames {
                        break;
                    }
                }
                frame_number += 1;
            }
        }

        log::debug!(
            "kept {} of {} decoded frame(s) from {}",
            samples.len(),
            frame_number,
            self.clip.path.display(),
        );
        Ok(samples)
    }
}

/// JPEG-encode a scaled RGB24 frame.
fn encode_jpeg(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, PlaycallError> {
    let buffer = frame_to_rgb_buffer(rgb_frame, width, height);
    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        PlaycallError::FrameDecode(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;

    let mut encoded = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    encoder.encode_image(&image)?;
    Ok(encoded.into_inner())
}

/// Copy pixel data from an FFmpeg video frame into a tightly-packed RGB
/// buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3); this
/// strips it so the result can be handed to [`image::RgbImage::from_raw`].
fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Compute dimensions that fit within `max_dimension` preserving aspect
/// ratio.
fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 || width.max(height) <= max_dimension {
        return (width, height);
    }
    let scale = max_dimension as f64 / width.max(height) as f64;
    let new_width = ((width as f64) * scale).round() as u32;
    let new_height = ((height as f64) * scale).round() as u32;
    (new_width.max(1), new_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::fit_dimensions;

    #[test]
    fn fit_leaves_small_frames_alone() {
        assert_eq!(fit_dimensions(320, 240, 640), (320, 240));
    }

    #[test]
    fn fit_scales_longest_edge() {
        assert_eq!(fit_dimensions(1920, 1080, 640), (640, 360));
    }

    #[test]
    fn fit_handles_portrait() {
        assert_eq!(fit_dimensions(1080, 1920, 640), (360, 640));
    }
}
