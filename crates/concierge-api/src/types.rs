//! Wire types shared by the chat and upload endpoints

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Backend-selected agent specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Agent {
    #[default]
    General,
    Hr,
    It,
    Travel,
    DocChat,
}

impl Agent {
    /// Every agent, in display order
    pub const ALL: [Agent; 5] = [
        Agent::General,
        Agent::Hr,
        Agent::It,
        Agent::Travel,
        Agent::DocChat,
    ];

    /// Resolve a wire tag to an agent.
    ///
    /// Total: anything the backend sends that is not one of the known tags
    /// resolves to [`Agent::General`].
    pub fn resolve(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "general" => Agent::General,
            "hr" => Agent::Hr,
            "it" => Agent::It,
            "travel" => Agent::Travel,
            "doc_chat" => Agent::DocChat,
            other => {
                tracing::debug!("Unknown agent tag {:?}, falling back to general", other);
                Agent::General
            }
        }
    }

    /// The wire tag for this agent
    pub fn as_str(&self) -> &'static str {
        match self {
            Agent::General => "general",
            Agent::Hr => "hr",
            Agent::It => "it",
            Agent::Travel => "travel",
            Agent::DocChat => "doc_chat",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Agent::General => "Healthcare Assistant",
            Agent::Hr => "HR Specialist",
            Agent::It => "IT Support",
            Agent::Travel => "Travel Coordinator",
            Agent::DocChat => "Document Analyst",
        }
    }

    /// Badge icon
    pub fn icon(&self) -> &'static str {
        match self {
            Agent::General => "🏥",
            Agent::Hr => "👥",
            Agent::It => "🔧",
            Agent::Travel => "✈️",
            Agent::DocChat => "📄",
        }
    }
}

impl From<String> for Agent {
    fn from(tag: String) -> Self {
        Agent::resolve(&tag)
    }
}

impl From<Agent> for String {
    fn from(agent: Agent) -> Self {
        agent.as_str().to_string()
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citation attached to an assistant response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Relevance in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(
        default,
        rename = "lastModified",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<String>,
    /// Keys the backend sends that have no typed field (e.g. `size`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    /// Create a source with just a title and type
    pub fn new(title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: kind.into(),
            url: None,
            confidence: None,
            last_modified: None,
            extra: Map::new(),
        }
    }

    /// Confidence as a whole percentage, clamped to `[0, 100]`
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence
            .filter(|c| c.is_finite())
            .map(|c| (c.clamp(0.0, 1.0) * 100.0).round() as u8)
    }
}

/// Response metadata with the keys the backend is known to send.
///
/// Known keys are typed when their value has the expected JSON type. Anything
/// else, including a known key with an unexpected type, lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageMetadata {
    /// Why the backend routed the request to this agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoked_agent_reason: Option<String>,
    /// Response was produced by the upstream language model service
    #[serde(rename = "azure_openai", skip_serializing_if = "Option::is_none")]
    pub upstream_service: Option<bool>,
    /// The upstream language model service failed and the text explains why
    #[serde(rename = "azure_openai_error", skip_serializing_if = "Option::is_none")]
    pub upstream_service_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_called: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_uploaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Support ticket opened while handling the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_referenced: Option<String>,
    /// Everything else
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for MessageMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            invoked_agent_reason: take_typed(&mut extra, "invoked_agent_reason"),
            upstream_service: take_typed(&mut extra, "azure_openai"),
            upstream_service_error: take_typed(&mut extra, "azure_openai_error"),
            error: take_typed(&mut extra, "error"),
            function_called: take_typed(&mut extra, "function_called"),
            file_uploaded: take_typed(&mut extra, "file_uploaded"),
            filename: take_typed(&mut extra, "filename"),
            file_size: take_typed(&mut extra, "file_size"),
            file_type: take_typed(&mut extra, "file_type"),
            ticket_id: take_typed(&mut extra, "ticket_id"),
            policy_referenced: take_typed(&mut extra, "policy_referenced"),
            extra,
        })
    }
}

/// Remove `key` from `map` and return it as a `T`. A value of another type is
/// left in the map; `null` is dropped.
fn take_typed<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key)?;
    if value.is_null() {
        map.remove(key);
        return None;
    }
    match T::deserialize(value) {
        Ok(typed) => {
            map.remove(key);
            Some(typed)
        }
        Err(e) => {
            tracing::debug!(key, "Keeping metadata value untyped: {}", e);
            None
        }
    }
}

impl MessageMetadata {
    /// Whether the backend flagged the response as an error explanation
    pub fn is_error(&self) -> bool {
        self.error.unwrap_or(false) || self.upstream_service_error.unwrap_or(false)
    }

    /// Whether nothing at all was sent
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST {base}/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Empty for a conversation the backend has not seen yet
    pub conversation_id: String,
}

/// Response body of both `/chat` and `/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub agent: Agent,
    pub conversation_id: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    #[serde(default)]
    pub metadata: MessageMetadata,
}

/// Entry of `GET {base}/agents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    #[serde(rename = "type")]
    pub agent: Agent,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AgentList {
    pub agents: Vec<AgentInfo>,
}

/// What a quick action does when picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickActionKind {
    SwitchAgent,
    QuickMessage,
    ExternalLink,
}

/// Entry of `GET {base}/quick-actions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub action: QuickActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Agent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct QuickActionList {
    pub actions: Vec<QuickAction>,
}
