//! Read-only projections over the session state.
//!
//! Everything here is a pure function of its inputs; callers may recompute
//! on every render.

use chrono::{DateTime, Utc};
use concierge_api::{Agent, Source};

use crate::{
    message::Message,
    store::{SessionState, derive_title},
};

/// Conversation id reported before the backend has assigned one
pub const FALLBACK_CONVERSATION_ID: &str = "current";

/// Reason shown for an agent when the backend did not give one
pub const DEFAULT_AGENT_REASON: &str = "Selected based on message content analysis";

/// How many messages [`recent_sources`] looks back over
pub const RECENT_SOURCE_MESSAGES: usize = 3;

/// How many sources [`recent_sources`] keeps per message
pub const SOURCES_PER_MESSAGE: usize = 2;

/// Summary of a conversation for history lists
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation<'a> {
    pub id: String,
    pub title: String,
    pub messages: &'a [Message],
    pub last_active: DateTime<Utc>,
    pub agent: Agent,
}

/// List the session's conversations as of `now`.
///
/// A session holds at most one conversation, so this is empty or a single
/// element.
pub fn conversations(state: &SessionState, now: DateTime<Utc>) -> Vec<Conversation<'_>> {
    if state.messages().is_empty() {
        return vec![];
    }

    let id = match state.conversation_id() {
        "" => FALLBACK_CONVERSATION_ID.to_string(),
        id => id.to_string(),
    };
    let title = match state.conversation_title() {
        "" => state
            .messages()
            .iter()
            .find(|m| m.is_user())
            .map(|m| derive_title(&m.content))
            .unwrap_or_default(),
        title => title.to_string(),
    };

    vec![Conversation {
        id,
        title,
        messages: state.messages(),
        last_active: now,
        agent: state.current_agent(),
    }]
}

/// An agent that answered at least once in this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAgent {
    pub agent: Agent,
    pub reason: String,
}

/// Distinct agents on the log in first-seen order, each with the first
/// routing reason the backend gave for it.
pub fn active_agents(messages: &[Message]) -> Vec<ActiveAgent> {
    let mut seen: Vec<Agent> = Vec::new();
    for agent in messages.iter().filter_map(|m| m.agent) {
        if !seen.contains(&agent) {
            seen.push(agent);
        }
    }

    seen.into_iter()
        .map(|agent| {
            let reason = messages
                .iter()
                .filter(|m| m.agent == Some(agent))
                .find_map(|m| m.agent_reason())
                .unwrap_or(DEFAULT_AGENT_REASON)
                .to_string();
            ActiveAgent { agent, reason }
        })
        .collect()
}

/// Sources cited by one message
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGroup<'a> {
    pub agent: Option<Agent>,
    pub sources: &'a [Source],
}

/// The last few messages that cite sources, oldest first, with at most
/// [`SOURCES_PER_MESSAGE`] sources each.
pub fn recent_sources(messages: &[Message]) -> Vec<SourceGroup<'_>> {
    let with_sources: Vec<&Message> = messages.iter().filter(|m| !m.sources.is_empty()).collect();
    let skip = with_sources.len().saturating_sub(RECENT_SOURCE_MESSAGES);

    with_sources[skip..]
        .iter()
        .map(|m| SourceGroup {
            agent: m.agent,
            sources: &m.sources[..m.sources.len().min(SOURCES_PER_MESSAGE)],
        })
        .collect()
}

/// Coarse "time ago" label: minutes under an hour, hours under a day, then days.
pub fn format_last_active(last_active: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(last_active);
    let minutes = elapsed.num_minutes().max(0);
    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}
