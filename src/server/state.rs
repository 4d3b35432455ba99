//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::llm::{GeminiClient, GeminiError};

/// Environment variable holding the Gemini credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Shared application state.
///
/// The relay is stateless across requests; this only carries immutable
/// configuration and the upstream client.
pub struct AppState {
    /// Gemini client, `None` when no credential is configured. The
    /// absence is enforced per request with HTTP 500 rather than at
    /// startup, so the relay still serves `/health` without a key.
    pub gemini: Option<GeminiClient>,
}

impl AppState {
    /// Create state with an explicit (possibly absent) upstream client.
    #[must_use]
    pub fn new(gemini: Option<GeminiClient>) -> Arc<Self> {
        Arc::new(Self { gemini })
    }

    /// Create state from the environment.
    ///
    /// # Errors
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn from_env() -> Result<Arc<Self>, GeminiError> {
        let gemini = match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Some(GeminiClient::new(key)?),
            _ => {
                tracing::warn!("{API_KEY_ENV} is not set; /chat will answer 500 until it is");
                None
            }
        };
        Ok(Arc::new(Self { gemini }))
    }
}
