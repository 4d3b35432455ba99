//! Core types for the conversation client.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a rendered message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Typed by the person at the keyboard.
    User,
    /// Produced by the relay (or by a local failure path).
    Assistant,
}

/// One rendered chat message. Immutable once appended; the render list
/// is the sole conversation history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Whether this message reports a failure.
    pub is_error: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Identifier of a reply-in-progress placeholder.
///
/// Random rather than time-derived, so rapid repeated sends can never
/// collide within one clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct PendingId(pub Uuid);

impl PendingId {
    /// Create a new identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PendingId {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PendingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Connectivity toward the relay, owned by the client app state and
/// mutated only by probe results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    /// A probe is in flight.
    Connecting,
    /// The last probe succeeded; sends are permitted.
    Online,
    /// The last probe failed; a retry is scheduled.
    Offline,
}

/// How one relayed send concluded. Every failure path converges here;
/// the render list is the terminal error sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The relay answered 2xx; empty text means "no reply".
    Reply {
        /// Reply text from the relay.
        message: String,
    },
    /// The relay answered a failure status with an `{error}` body.
    ApiError {
        /// Error text from the relay.
        message: String,
    },
    /// The request itself never completed.
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

/// Events emitted by client background tasks toward the UI loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    /// A probe resolved or started; carries the new state.
    Connectivity(Connectivity),
    /// A send resolved; carries the placeholder it belongs to.
    Reply {
        /// Placeholder recorded when the send was issued.
        id: PendingId,
        /// How the send concluded.
        outcome: SendOutcome,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_ids_are_unique() {
        let a = PendingId::new();
        let b = PendingId::new();
        assert_ne!(a, b);
    }
}
