//! Error types for the `playcall` crate.
//!
//! This module defines [`PlaycallError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context to
//! diagnose a problem at the call site, including file paths, frame numbers,
//! and upstream error messages.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `playcall` operations.
///
/// Every public method that can fail returns `Result<T, PlaycallError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaycallError {
    /// The clip could not be opened.
    #[error("Failed to open clip at {path}: {reason}")]
    ClipOpen {
        /// Path that was passed to [`crate::VideoClip::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The clip does not contain a video stream.
    #[error("No video stream found in clip")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    FrameDecode(String),

    /// A sampling interval of zero was requested.
    #[error("Sampling interval must be greater than zero")]
    InvalidInterval,

    /// A frame cap of zero was requested.
    #[error("Frame cap must be greater than zero")]
    InvalidFrameCap,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate during frame encoding.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// The `OPENAI_API_KEY` environment variable is unset or empty.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// The completion service answered with a non-success status.
    #[error("Commentary request failed with status {status}: {message}")]
    CommentaryRequest {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body, as returned by the service.
        message: String,
    },

    /// The completion service answered 2xx but the body carried no usable
    /// choice.
    #[error("Commentary reply contained no usable text")]
    MalformedReply,

    /// An HTTP transport error while talking to the completion service.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<FfmpegError> for PlaycallError {
    fn from(error: FfmpegError) -> Self {
        PlaycallError::Ffmpeg(error.to_string())
    }
}
