//! The sample → request → assemble pipeline.
//!
//! [`Commentator`] composes the three stages end to end: sample frames from
//! a clip on disk, request commentary for each, and assemble the report.
//! The stages stay independently callable so front-ends can interleave their
//! own progress reporting.

use std::path::Path;

use crate::{
    clip::VideoClip,
    commentary::{CommentaryClient, CommentaryOptions},
    error::PlaycallError,
    report::CommentaryReport,
    sampler::{SampleOptions, SampledFrame},
};

/// End-to-end commentary generation for video clips.
///
/// # Example
///
/// ```no_run
/// use playcall::Commentator;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let commentator = Commentator::from_env()?;
/// let report = commentator.commentate_file("match.mp4").await?;
/// println!("{report}");
/// # Ok::<(), playcall::PlaycallError>(())
/// # });
/// ```
pub struct Commentator {
    client: CommentaryClient,
    sample_options: SampleOptions,
}

impl Commentator {
    /// Create a commentator from a configured client and sampling options.
    pub fn new(client: CommentaryClient, sample_options: SampleOptions) -> Self {
        Self {
            client,
            sample_options,
        }
    }

    /// Create a commentator with default options, reading the API key from
    /// `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// [`PlaycallError::MissingApiKey`] if the variable is unset or empty.
    pub fn from_env() -> Result<Self, PlaycallError> {
        let client = CommentaryClient::from_env(CommentaryOptions::new())?;
        Ok(Self::new(client, SampleOptions::new()))
    }

    /// The sampling options this commentator applies.
    pub fn sample_options(&self) -> &SampleOptions {
        &self.sample_options
    }

    /// The underlying commentary client.
    pub fn client(&self) -> &CommentaryClient {
        &self.client
    }

    /// Stage 1: sample frames from a clip on disk.
    ///
    /// A clip that cannot be opened or decoded yields an **empty** sample
    /// list rather than an error; the condition is logged at `warn` and the
    /// eventual report is simply empty. Configuration errors
    /// ([`PlaycallError::InvalidInterval`], [`PlaycallError::InvalidFrameCap`])
    /// still propagate.
    pub fn sample_clip<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SampledFrame>, PlaycallError> {
        self.sample_options.validate()?;

        let path = path.as_ref();
        let mut clip = match VideoClip::open(path) {
            Ok(clip) => clip,
            Err(error) => {
                log::warn!("treating unreadable clip {} as empty: {error}", path.display());
                return Ok(Vec::new());
            }
        };

        match clip.sampler().sample(&self.sample_options) {
            Ok(frames) => Ok(frames),
            Err(error) => {
                log::warn!(
                    "treating undecodable clip {} as empty: {error}",
                    path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Stages 2 and 3: request commentary for sampled frames and assemble
    /// the report.
    ///
    /// Sequential and fail-fast; see
    /// [`CommentaryClient::narrate`](crate::CommentaryClient::narrate).
    pub async fn narrate(
        &self,
        frames: &[SampledFrame],
    ) -> Result<CommentaryReport, PlaycallError> {
        self.client.narrate(frames).await
    }

    /// Run the whole pipeline for one clip.
    ///
    /// An empty sample list (unreadable clip, or a clip the decoder produced
    /// nothing for) short-circuits to an empty report without touching the
    /// network.
    pub async fn commentate_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<CommentaryReport, PlaycallError> {
        let path = path.as_ref();
        let frames = self.sample_clip(path)?;
        if frames.is_empty() {
            log::info!("no frames sampled from {}", path.display());
            return Ok(CommentaryReport::new());
        }
        self.narrate(&frames).await
    }
}
