//! HTTP access to the relay, behind a trait so the send pipeline and
//! the probe loop can be exercised against scripted fakes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::protocol::{ChatRequest, ChatResponse, ErrorBody};

use super::types::SendOutcome;

/// Default relay base URL (the client has no discovery mechanism).
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Environment variable for a custom relay base URL.
const BACKEND_URL_ENV: &str = "MANRAY_BACKEND_URL";

/// HTTP client timeout; generations can take a while.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Fallback when a failure body carries no `error` field.
const GENERIC_API_ERROR: &str = "An error occurred";

/// What the client needs from the relay: a liveness probe and one-shot
/// chat sends that never escape as errors.
#[async_trait]
pub trait RelayApi: Send + Sync {
    /// Liveness probe; `true` when the relay answered with success.
    async fn probe(&self) -> bool;

    /// Relay one chat turn. Every failure converges into an outcome;
    /// this never panics and never returns a raw error.
    async fn send(&self, message: &str) -> SendOutcome;
}

/// Production implementation over reqwest.
pub struct HttpRelayApi {
    /// Shared HTTP client.
    http: Client,
    /// Relay base URL, without a trailing slash.
    base_url: String,
}

impl HttpRelayApi {
    /// Create a client against an explicit relay base URL.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Create a client using the environment override or the default
    /// base URL.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_env() -> Result<Self, reqwest::Error> {
        let base_url = std::env::var(BACKEND_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self::new(base_url)
    }
}

#[async_trait]
impl RelayApi for HttpRelayApi {
    async fn probe(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!("health probe failed: {err}");
                false
            }
        }
    }

    async fn send(&self, message: &str) -> SendOutcome {
        let url = format!("{}/chat", self.base_url);
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = match self.http.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(err) => {
                return SendOutcome::Transport {
                    message: err.to_string(),
                };
            }
        };

        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| GENERIC_API_ERROR.to_string());
            return SendOutcome::ApiError { message };
        }

        match response.json::<ChatResponse>().await {
            Ok(body) => SendOutcome::Reply {
                message: body.message,
            },
            Err(err) => SendOutcome::Transport {
                message: err.to_string(),
            },
        }
    }
}
