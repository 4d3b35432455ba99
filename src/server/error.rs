//! Error types for the relay API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::llm::GeminiError;
use crate::protocol::ErrorBody;

/// Errors that can occur while handling a `/chat` request.
///
/// Every variant terminates in a JSON `{error}` body; nothing escapes
/// a handler uncaught.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The client sent an absent, empty or whitespace-only message.
    #[error("Message must not be empty")]
    EmptyMessage,

    /// The Gemini credential is not configured on the relay.
    #[error("API key is not configured on the backend")]
    MissingApiKey,

    /// The upstream call never completed at the transport level.
    #[error("Failed to reach the Gemini API: {0}")]
    UpstreamTransport(String),

    /// The upstream answered with a failure status; the relay mirrors it.
    #[error("{message}")]
    UpstreamApi {
        /// Status code reported by the upstream.
        status: StatusCode,
        /// Upstream error message.
        message: String,
    },
}

impl RelayError {
    /// Status code this error maps to on the wire.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyMessage => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::UpstreamTransport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamApi { status, .. } => *status,
        }
    }
}

impl From<GeminiError> for RelayError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Transport(inner) => Self::UpstreamTransport(inner.to_string()),
            GeminiError::Api { status, message } => Self::UpstreamApi { status, message },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
