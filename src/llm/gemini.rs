//! Client for the Gemini `generateContent` API.
//!
//! Behaviour:
//! - One single-turn request per call, the user text as the sole part.
//! - Non-success upstream statuses surface the upstream's own error
//!   message together with the exact status code; no retries.
//! - Candidate text and usage counters are extracted defensively: a
//!   payload without them yields the sentinel text and zero counters.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::Usage;

/// Model invoked for every chat turn.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API base.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variable for a custom API base (e.g. a local mock).
const GEMINI_URL_ENV: &str = "MANRAY_GEMINI_URL";

/// Environment variable overriding the model name.
const GEMINI_MODEL_ENV: &str = "MANRAY_GEMINI_MODEL";

/// HTTP client timeout for long generations.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Reply text used when the upstream payload carries no candidate text.
pub const NO_RESPONSE_SENTINEL: &str = "No response from the model.";

/// Fallback when an upstream failure body carries no message of its own.
const GENERIC_UPSTREAM_ERROR: &str = "The Gemini API returned an error";

/// Errors produced by the Gemini client.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// The request never completed at the transport level.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Api {
        /// Status code returned by the upstream.
        status: StatusCode,
        /// Upstream error message, or a generic fallback.
        message: String,
    },
}

/// Normalized result of one generation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiReply {
    /// Extracted candidate text, or [`NO_RESPONSE_SENTINEL`].
    pub text: String,
    /// Prompt/candidate token counts, zero when absent.
    pub usage: Usage,
}

/// Get the API base from the environment or use the Google default.
fn get_api_base() -> String {
    std::env::var(GEMINI_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

/// Get the model name from the environment or use the pinned default.
fn get_model() -> String {
    std::env::var(GEMINI_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string())
}

/// Async client for the `generateContent` endpoint.
pub struct GeminiClient {
    /// Shared HTTP client.
    http: Client,
    /// API base, without the `/v1beta/...` path.
    base_url: String,
    /// Model segment of the endpoint path.
    model: String,
    /// Credential passed as the `key` query parameter.
    api_key: String,
}

impl GeminiClient {
    /// Create a client using environment overrides for base URL and model.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, get_api_base())
    }

    /// Create a client against an explicit API base (tests point this at
    /// a loopback mock).
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, GeminiError> {
        let http = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: get_model(),
            api_key: api_key.into(),
        })
    }

    /// Send one single-turn generation request.
    ///
    /// # Errors
    /// [`GeminiError::Transport`] when the call never completes,
    /// [`GeminiError::Api`] when the upstream answers with a failure
    /// status.
    pub async fn generate(&self, prompt: &str) -> Result<GeminiReply, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<UpstreamErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| GENERIC_UPSTREAM_ERROR.to_string());
            return Err(GeminiError::Api { status, message });
        }

        let payload: GenerateResponse = response.json().await?;
        Ok(payload.into_reply())
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    error: Option<UpstreamErrorDetail>,
}

#[derive(Deserialize)]
struct UpstreamErrorDetail {
    message: Option<String>,
}

impl GenerateResponse {
    /// Extract the first candidate's first non-empty text part, and the
    /// usage counters, defaulting both.
    fn into_reply(self) -> GeminiReply {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string());

        let usage = self.usage_metadata.map_or_else(Usage::default, |meta| Usage {
            input_tokens: meta.prompt_token_count,
            output_tokens: meta.candidates_token_count,
        });

        GeminiReply { text, usage }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GeminiReply {
        serde_json::from_str::<GenerateResponse>(raw)
            .map(GenerateResponse::into_reply)
            .unwrap_or_else(|_| GeminiReply {
                text: String::from("parse failure"),
                usage: Usage::default(),
            })
    }

    #[test]
    fn test_reply_extraction_full_payload() {
        let reply = parse(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "Hello there"}]}}
                ],
                "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 11}
            }"#,
        );
        assert_eq!(reply.text, "Hello there");
        assert_eq!(reply.usage.input_tokens, 7);
        assert_eq!(reply.usage.output_tokens, 11);
    }

    #[test]
    fn test_reply_extraction_missing_candidates() {
        let reply = parse(r#"{"usageMetadata": {"promptTokenCount": 3}}"#);
        assert_eq!(reply.text, NO_RESPONSE_SENTINEL);
        assert_eq!(reply.usage.input_tokens, 3);
        assert_eq!(reply.usage.output_tokens, 0);
    }

    #[test]
    fn test_reply_extraction_empty_text_uses_sentinel() {
        let reply = parse(r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#);
        assert_eq!(reply.text, NO_RESPONSE_SENTINEL);
        assert_eq!(reply.usage, Usage::default());
    }

    #[test]
    fn test_reply_extraction_no_usage_metadata() {
        let reply = parse(r#"{"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}"#);
        assert_eq!(reply.text, "ok");
        assert_eq!(reply.usage, Usage::default());
    }

    #[test]
    fn test_first_part_of_first_candidate_wins() {
        let reply = parse(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                    {"content": {"parts": [{"text": "other candidate"}]}}
                ]
            }"#,
        );
        assert_eq!(reply.text, "first");
    }
}
