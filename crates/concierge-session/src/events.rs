//! Session event types

use concierge_api::Agent;
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Store changes, broadcast in the order they were applied
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A message was appended to the log
    MessageAppended { message: Message },

    /// A dispatch started or finished
    LoadingChanged { is_loading: bool },

    /// The active agent switched
    AgentChanged { agent: Agent },

    /// The backend assigned the conversation id
    ConversationStarted { conversation_id: String },

    /// The session was reset
    Cleared,

    /// A completion arrived for a dispatch that a reset invalidated
    ResponseDiscarded { generation: u64 },
}

impl SessionEvent {
    /// Check if this event ends a dispatch
    pub fn ends_dispatch(&self) -> bool {
        matches!(
            self,
            SessionEvent::LoadingChanged { is_loading: false }
                | SessionEvent::ResponseDiscarded { .. }
        )
    }
}
