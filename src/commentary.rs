//! Commentary requests against a multimodal completion service.
//!
//! [`CommentaryClient`] turns sampled frames into commentary text by issuing
//! one chat-completions request per frame to an OpenAI-compatible endpoint,
//! with the frame attached as a base64 `image_url` data URI. Requests run
//! strictly in sequence; the first failure aborts the whole report.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{error::PlaycallError, report::CommentaryReport, sampler::SampledFrame};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_TOKENS: u32 = 300;
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a sports commentator providing live play-by-play and color commentary.";

/// Configuration for the commentary requester.
///
/// A builder mirroring [`SampleOptions`](crate::SampleOptions); the defaults
/// match the fixed prompt and limits the service was designed around.
///
/// # Example
///
/// ```
/// use playcall::CommentaryOptions;
///
/// let options = CommentaryOptions::new()
///     .with_model("gpt-4o-mini")
///     .with_max_tokens(200);
/// assert_eq!(options.model(), "gpt-4o-mini");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct CommentaryOptions {
    endpoint: String,
    model: String,
    max_tokens: u32,
    system_prompt: String,
}

impl Default for CommentaryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentaryOptions {
    /// Create options with default settings.
    ///
    /// Defaults: the OpenAI chat-completions endpoint, model `gpt-4o`,
    /// 300 max tokens, and the sports-commentator system role.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Point the client at a different OpenAI-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the model requested from the service.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Cap the length of each per-frame reply.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replace the system role text.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The configured per-reply token cap.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// The configured system role text.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

/// Client for a multimodal chat-completions service.
///
/// # Example
///
/// ```no_run
/// use playcall::{CommentaryClient, CommentaryOptions};
///
/// // Reads OPENAI_API_KEY from the environment.
/// let client = CommentaryClient::from_env(CommentaryOptions::new())?;
/// # Ok::<(), playcall::PlaycallError>(())
/// ```
pub struct CommentaryClient {
    http: reqwest::Client,
    api_key: String,
    options: CommentaryOptions,
}

impl CommentaryClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>, options: CommentaryOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            options,
        }
    }

    /// Create a client reading the API key from `OPENAI_API_KEY`.
    ///
    /// # Errors
    ///
    /// [`PlaycallError::MissingApiKey`] if the variable is unset or empty.
    pub fn from_env(options: CommentaryOptions) -> Result<Self, PlaycallError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(PlaycallError::MissingApiKey)?;
        Ok(Self::new(api_key, options))
    }

    /// The options this client was built with.
    pub fn options(&self) -> &CommentaryOptions {
        &self.options
    }

    /// Request commentary for every sampled frame, in order.
    ///
    /// Issues one request per frame, sequentially. Any service error aborts
    /// the loop and propagates; there is no retry and no partial report.
    /// An empty frame slice yields an empty report without touching the
    /// network.
    ///
    /// # Errors
    ///
    /// [`PlaycallError::CommentaryRequest`] for non-success statuses,
    /// [`PlaycallError::MalformedReply`] for unusable bodies, and
    /// [`PlaycallError::Http`] for transport failures.
    pub async fn narrate(
        &self,
        frames: &[SampledFrame],
    ) -> Result<CommentaryReport, PlaycallError> {
        let mut report = CommentaryReport::new();
        for frame in frames {
            let text = self.describe_frame(frame).await?;
            report.push(text);
        }
        Ok(report)
    }

    /// Request commentary for a single frame.
    ///
    /// # Errors
    ///
    /// Same as [`narrate`](CommentaryClient::narrate).
    pub async fn describe_frame(&self, frame: &SampledFrame) -> Result<String, PlaycallError> {
        log::debug!(
            "requesting commentary for sample {} (source frame {}, {} JPEG bytes)",
            frame.ordinal,
            frame.frame_number,
            frame.jpeg().len(),
        );

        let body = request_body(&self.options, frame);
        let response = self
            .http
            .post(&self.options.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlaycallError::CommentaryRequest {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ChatReply = response.json().await?;
        first_choice_text(reply)
    }
}

/// Build the chat-completions request payload for one frame.
///
/// The message list carries the fixed system role, a frame-numbered
/// instruction, and the JPEG attached as a base64 data URI.
fn request_body(options: &CommentaryOptions, frame: &SampledFrame) -> Value {
    json!({
        "model": options.model,
        "messages": [
            { "role": "system", "content": options.system_prompt },
            { "role": "user", "content": [
                { "type": "text", "text": frame_instruction(frame.ordinal) },
                { "type": "image_url",
                  "image_url": { "url": format!("data:image/jpeg;base64,{}", frame.to_base64()) } }
            ]}
        ],
        "max_tokens": options.max_tokens,
    })
}

/// The fixed per-frame user instruction.
fn frame_instruction(ordinal: usize) -> String {
    format!(
        "Here's frame {ordinal} of a video. Describe what you see and generate exciting commentary."
    )
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Pull the first choice's text out of a reply.
fn first_choice_text(reply: ChatReply) -> Result<String, PlaycallError> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(PlaycallError::MalformedReply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_reply(value: Value) -> Result<String, PlaycallError> {
        let reply: ChatReply = serde_json::from_value(value).expect("reply should deserialize");
        first_choice_text(reply)
    }

    #[test]
    fn reply_text_is_first_choice() {
        let text = parse_reply(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "What a play!" } },
                { "message": { "role": "assistant", "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(text, "What a play!");
    }

    #[test]
    fn reply_without_choices_is_malformed() {
        let result = parse_reply(json!({ "choices": [] }));
        assert!(matches!(result, Err(PlaycallError::MalformedReply)));
    }

    #[test]
    fn reply_with_null_content_is_malformed() {
        let result = parse_reply(json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        }));
        assert!(matches!(result, Err(PlaycallError::MalformedReply)));
    }

    #[test]
    fn frame_instruction_is_one_based() {
        assert!(frame_instruction(1).starts_with("Here's frame 1 of a video."));
    }

    #[test]
    fn request_body_shape() {
        let frame = SampledFrame::from_parts(2, 30, vec![0xFF, 0xD8, 0xFF]);
        let body = request_body(&CommentaryOptions::new(), &frame);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 300);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");

        let text = body["messages"][1]["content"][0]["text"]
            .as_str()
            .unwrap();
        assert!(text.contains("frame 2"));

        let url = body["messages"][1]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
