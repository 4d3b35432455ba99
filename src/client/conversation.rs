//! Pure render-list reducer for the conversation.
//!
//! Owns the ordered list of rendered entries and every transition on
//! it. No rendering concerns live here, which is what lets the whole
//! message lifecycle be unit tested without a terminal.

use chrono::{DateTime, Utc};

use super::types::{Message, PendingId, Role, SendOutcome};

/// Welcome message appended on the first transition to online.
pub const WELCOME_TEXT: &str =
    "Backend connected successfully. I am Manray Assistant, ready to help you!";

/// Message appended after a session reset.
pub const NEW_SESSION_TEXT: &str = "New session started. What would you like to talk about?";

/// Assistant text shown when a successful reply carries no text.
pub const NO_REPLY_TEXT: &str = "No response from backend.";

/// One entry of the render list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// A settled message.
    Message(Message),
    /// A reply-in-progress placeholder.
    Pending(PendingId),
}

/// Ordered conversation state. Insertion order is conversation order.
#[derive(Debug, Default)]
pub struct Conversation {
    /// Render list; the sole conversation history.
    entries: Vec<Entry>,
    /// Set once the welcome message has been appended.
    welcomed: bool,
}

impl Conversation {
    /// Create an empty conversation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The render list, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the render list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of placeholders currently in the list.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Entry::Pending(_)))
            .count()
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>, now: DateTime<Utc>) {
        self.push_message(Role::User, content, false, now);
    }

    /// Append a placeholder for a reply in flight.
    pub fn begin_pending(&mut self, id: PendingId) {
        self.entries.push(Entry::Pending(id));
    }

    /// Remove a placeholder by its identifier.
    ///
    /// Returns whether it was present; removing an absent identifier is
    /// a no-op, so double removal under overlapping sends is harmless.
    pub fn remove_pending(&mut self, id: PendingId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Entry::Pending(other) if *other == id));
        self.entries.len() != before
    }

    /// Settle one send: remove its placeholder and append the result.
    pub fn resolve(&mut self, id: PendingId, outcome: SendOutcome, now: DateTime<Utc>) {
        let _ = self.remove_pending(id);
        match outcome {
            SendOutcome::Reply { message } => {
                if message.is_empty() {
                    self.push_message(Role::Assistant, NO_REPLY_TEXT, false, now);
                } else {
                    self.push_message(Role::Assistant, message, false, now);
                }
            }
            SendOutcome::ApiError { message } => {
                self.push_message(Role::Assistant, format!("Error: {message}"), true, now);
            }
            SendOutcome::Transport { message } => {
                self.push_message(
                    Role::Assistant,
                    format!("Network Error: {message}"),
                    true,
                    now,
                );
            }
        }
    }

    /// Append the welcome message, once per conversation lifetime.
    ///
    /// Returns whether the message was appended; later calls (repeat
    /// probes, re-renders) leave the list untouched.
    pub fn welcome(&mut self, now: DateTime<Utc>) -> bool {
        if self.welcomed {
            return false;
        }
        self.welcomed = true;
        self.push_message(Role::Assistant, WELCOME_TEXT, false, now);
        true
    }

    /// Clear the list and start a fresh session.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.entries.clear();
        self.push_message(Role::Assistant, NEW_SESSION_TEXT, false, now);
    }

    fn push_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        is_error: bool,
        now: DateTime<Utc>,
    ) {
        self.entries.push(Entry::Message(Message {
            role,
            content: content.into(),
            is_error,
            created_at: now,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn last_message(conversation: &Conversation) -> &Message {
        match conversation.entries().last() {
            Some(Entry::Message(message)) => message,
            other => panic!("expected a settled message, got {other:?}"),
        }
    }

    #[test]
    fn test_send_and_resolve_appends_user_plus_reply() {
        let mut conversation = Conversation::new();
        conversation.push_user("hello", now());
        let id = PendingId::new();
        conversation.begin_pending(id);
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.pending_count(), 1);

        conversation.resolve(
            id,
            SendOutcome::Reply {
                message: "hi there".to_string(),
            },
            now(),
        );

        // User + reply, placeholder gone.
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.pending_count(), 0);
        let reply = last_message(&conversation);
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.content, "hi there");
        assert!(!reply.is_error);
    }

    #[test]
    fn test_empty_reply_falls_back() {
        let mut conversation = Conversation::new();
        let id = PendingId::new();
        conversation.begin_pending(id);
        conversation.resolve(
            id,
            SendOutcome::Reply {
                message: String::new(),
            },
            now(),
        );
        assert_eq!(last_message(&conversation).content, NO_REPLY_TEXT);
    }

    #[test]
    fn test_api_error_is_flagged() {
        let mut conversation = Conversation::new();
        let id = PendingId::new();
        conversation.begin_pending(id);
        conversation.resolve(
            id,
            SendOutcome::ApiError {
                message: "rate limited".to_string(),
            },
            now(),
        );
        let message = last_message(&conversation);
        assert!(message.is_error);
        assert_eq!(message.content, "Error: rate limited");
    }

    #[test]
    fn test_transport_failure_is_flagged() {
        let mut conversation = Conversation::new();
        let id = PendingId::new();
        conversation.begin_pending(id);
        conversation.resolve(
            id,
            SendOutcome::Transport {
                message: "connection refused".to_string(),
            },
            now(),
        );
        let message = last_message(&conversation);
        assert!(message.is_error);
        assert_eq!(message.content, "Network Error: connection refused");
    }

    #[test]
    fn test_remove_pending_is_idempotent() {
        let mut conversation = Conversation::new();
        let id = PendingId::new();
        conversation.begin_pending(id);
        assert!(conversation.remove_pending(id));
        assert!(!conversation.remove_pending(id));
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_overlapping_sends_resolve_independently() {
        let mut conversation = Conversation::new();
        let first = PendingId::new();
        let second = PendingId::new();
        conversation.push_user("one", now());
        conversation.begin_pending(first);
        conversation.push_user("two", now());
        conversation.begin_pending(second);
        assert_eq!(conversation.pending_count(), 2);

        // Second resolves first; the first placeholder must survive.
        conversation.resolve(
            second,
            SendOutcome::Reply {
                message: "reply two".to_string(),
            },
            now(),
        );
        assert_eq!(conversation.pending_count(), 1);
        assert!(matches!(
            conversation.entries()[1],
            Entry::Pending(id) if id == first
        ));

        conversation.resolve(
            first,
            SendOutcome::Reply {
                message: "reply one".to_string(),
            },
            now(),
        );
        assert_eq!(conversation.pending_count(), 0);
        assert_eq!(conversation.len(), 4);
    }

    #[test]
    fn test_welcome_appends_only_once() {
        let mut conversation = Conversation::new();
        assert!(conversation.welcome(now()));
        assert!(!conversation.welcome(now()));
        assert!(!conversation.welcome(now()));
        assert_eq!(conversation.len(), 1);
        assert_eq!(last_message(&conversation).content, WELCOME_TEXT);
    }

    #[test]
    fn test_reset_clears_history_and_greets() {
        let mut conversation = Conversation::new();
        conversation.push_user("hello", now());
        conversation.begin_pending(PendingId::new());
        conversation.reset(now());
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.pending_count(), 0);
        assert_eq!(last_message(&conversation).content, NEW_SESSION_TEXT);
    }
}
