//! Wire contract between the conversation client and the relay.
//!
//! Both sides of the system serialize exactly these shapes; keeping
//! them in one module means a contract change cannot drift silently.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message. Must be non-empty after trimming; an absent
    /// field deserializes to empty and is rejected the same way.
    #[serde(default)]
    pub message: String,
}

/// Successful body of `POST /chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The assistant's reply text.
    pub message: String,
    /// Token accounting reported by the upstream API.
    pub usage: Usage,
}

/// Token usage counters, zero when the upstream omits them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub input_tokens: u32,
    /// Tokens produced by the reply.
    pub output_tokens: u32,
}

/// Failure body for every relay error path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Fixed liveness marker.
    pub status: String,
}
