//! Upstream LLM integration.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiError, GeminiReply};
