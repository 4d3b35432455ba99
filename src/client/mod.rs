//! Conversation client core.
//!
//! Everything here is UI-agnostic: the render-list reducer, the
//! connectivity probe loop and the relay API seam. The terminal
//! adapter in [`crate::tui`] maps this state to display primitives.

pub mod api;
pub mod connectivity;
pub mod conversation;
pub mod types;

pub use api::{HttpRelayApi, RelayApi};
pub use connectivity::{RETRY_DELAY, probe_until_online};
pub use conversation::{Conversation, Entry};
pub use types::{ClientEvent, Connectivity, Message, PendingId, Role, SendOutcome};
