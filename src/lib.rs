//! # playcall
//!
//! Sports-style AI commentary for short video clips.
//!
//! `playcall` samples still frames from a video at a fixed time interval
//! (powered by FFmpeg via the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)
//! crate), asks an OpenAI-compatible multimodal completion service to
//! commentate each frame, and assembles the replies into one numbered
//! play-by-play report.
//!
//! ## Quick Start
//!
//! ### One clip, one report
//!
//! ```no_run
//! use playcall::Commentator;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! // Reads OPENAI_API_KEY from the environment.
//! let commentator = Commentator::from_env()?;
//! let report = commentator.commentate_file("match.mp4").await?;
//! print!("{report}");
//! # Ok::<(), playcall::PlaycallError>(())
//! # });
//! ```
//!
//! ### Stage by stage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use playcall::{CommentaryClient, CommentaryOptions, SampleOptions, VideoClip};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let options = SampleOptions::new()
//!     .with_interval(Duration::from_secs(2))
//!     .with_max_frames(3);
//!
//! let mut clip = VideoClip::open("match.mp4")?;
//! let frames = clip.sampler().sample(&options)?;
//!
//! let client = CommentaryClient::from_env(CommentaryOptions::new())?;
//! let report = client.narrate(&frames).await?;
//! print!("{}", report.render());
//! # Ok::<(), playcall::PlaycallError>(())
//! # });
//! ```
//!
//! ## Pipeline
//!
//! Three stages, each its own module with explicit inputs and outputs:
//!
//! 1. **Sample** ([`sampler`]) — decode the clip, keep every Nth frame
//!    (stride = frame rate × interval), JPEG-encode, cap the count.
//! 2. **Request** ([`commentary`]) — one sequential chat-completions call
//!    per frame, image attached as a base64 data URI. Fail-fast: the first
//!    error aborts the report.
//! 3. **Assemble** ([`report`]) — numbered `Frame {k} Commentary:` sections
//!    in capture order.
//!
//! [`pipeline::Commentator`] composes the stages; [`server`] adapts them to
//! an HTTP upload form, and the `playcall` binary to the terminal.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system, and
//! `OPENAI_API_KEY` must be set for the commentary stage.

pub mod clip;
pub mod commentary;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod sampler;
pub mod server;

pub use clip::VideoClip;
pub use commentary::{CommentaryClient, CommentaryOptions};
pub use error::PlaycallError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use metadata::{ClipMetadata, VideoStreamInfo};
pub use pipeline::Commentator;
pub use report::{CommentaryReport, FrameCommentary};
pub use sampler::{FrameSampler, SampleOptions, SampledFrame, sample_positions, sample_stride};
