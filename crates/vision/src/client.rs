//! HTTP client for an OpenAI-compatible vision chat-completions endpoint.
//!
//! [`VisionClient`] sends one request per extraction: a text prompt plus the
//! image URL, expecting a single JSON object back. Budget hints are never
//! part of the request.

use std::env;
use std::time::Duration;

use serde::Deserialize;

/// Default base URL when `VISION_API_URL` is unset.
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Default model when `VISION_MODEL` is unset.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Configuration for the vision model endpoint.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Base URL of the OpenAI-compatible API, without a trailing slash.
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    /// Hard deadline for one extraction call.
    pub timeout_secs: u64,
}

impl VisionConfig {
    /// Load configuration from environment variables.
    ///
    /// `VISION_API_KEY` is required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self, VisionError> {
        let api_key = env::var("VISION_API_KEY")
            .map_err(|_| VisionError::Config("VISION_API_KEY must be set".to_string()))?;

        let timeout_secs = match env::var("VISION_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                VisionError::Config(format!("VISION_TIMEOUT_SECS must be an integer, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: env::var("VISION_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: env::var("VISION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_secs,
        })
    }
}

/// Errors from the vision model layer.
///
/// All variants are infrastructure or model failures; a successfully parsed
/// reply that matches nothing in the catalog is not an error.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// Invalid or missing configuration.
    #[error("Vision config error: {0}")]
    Config(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Vision request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("Vision API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The reply arrived but could not be turned into attributes.
    #[error("Malformed vision reply: {0}")]
    MalformedReply(String),

    /// The reply parsed but carries no matchable signal.
    #[error("Vision reply has no scorable attributes")]
    Unscorable,

    /// The query image could not be fetched or its dimensions read.
    #[error("Image probe failed: {0}")]
    ImageProbe(String),
}

/// Minimal chat-completions response shape; only the first choice's
/// message content is used.
#[derive(Debug, Deserialize)]
struct ChatResponse {
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

/// HTTP client for the vision endpoint.
pub struct VisionClient {
    client: reqwest::Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Create a client with a dedicated connection pool and the configured
    /// request timeout.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one extraction request and return the model's raw text reply.
    ///
    /// The prompt and the image URL travel in a single user message; the
    /// response format is pinned to a JSON object so the reply parses
    /// without prose around it.
    pub async fn describe_image(
        &self,
        image_url: &str,
        prompt: &str,
    ) -> Result<String, VisionError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } },
                ],
            }],
            "response_format": { "type": "json_object" },
            "max_tokens": 1024,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| VisionError::MalformedReply("empty completion".to_string()))
    }

    /// Fetch the query image and return its raw bytes.
    ///
    /// Used only when a crop rectangle needs converting to pixel bounds.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, VisionError> {
        let response = self.client.get(image_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::ImageProbe(format!(
                "image fetch returned {status} for {image_url}"
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_response_extracts_first_choice() {
        let json = r#"{
            "choices": [
                { "message": { "content": "{\"item_type\": \"pants\"}" } },
                { "message": { "content": "ignored" } }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"item_type\": \"pants\"}")
        );
    }

    #[test]
    fn chat_response_tolerates_null_content() {
        let json = r#"{ "choices": [ { "message": { "content": null } } ] }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
