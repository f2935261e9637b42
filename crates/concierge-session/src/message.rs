//! Messages in the session log

use chrono::{DateTime, Utc};
use concierge_api::{Agent, ChatResponse, MessageMetadata, Source};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the session log. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            agent: None,
            timestamp: Utc::now(),
            sources: Vec::new(),
            metadata: None,
        }
    }

    /// Text typed by the user
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// User-side record of a document upload
    pub fn upload_notice(filename: &str) -> Self {
        Self::new(Role::User, format!("📁 Uploaded: {}", filename))
    }

    /// Assistant reply built from a backend response, tagged with `agent`
    pub fn from_response(response: ChatResponse, agent: Agent) -> Self {
        let metadata = if response.metadata.is_empty() {
            None
        } else {
            Some(response.metadata)
        };
        Self {
            agent: Some(agent),
            sources: response.sources,
            metadata,
            ..Self::new(Role::Assistant, response.message)
        }
    }

    /// Generic assistant-side failure notice: no agent, no sources
    pub fn apology(text: &str) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Why the backend picked this message's agent, when it said so
    pub fn agent_reason(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.invoked_agent_reason.as_deref())
    }
}
