//! /history command - show the conversation list

use super::CommandResult;
use crate::render::agent_badge;
use chrono::{DateTime, Utc};
use concierge_session::{
    SessionState,
    views::{conversations, format_last_active},
};

pub struct HistoryCommand;

impl HistoryCommand {
    pub fn execute(state: &SessionState, now: DateTime<Utc>) -> CommandResult {
        let list = conversations(state, now);
        if list.is_empty() {
            return CommandResult::Message("No conversations yet.".to_string());
        }

        let mut output = String::from("Conversations\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');

        for conversation in &list {
            output.push_str(&format!(
                "{}  {}\n",
                conversation.agent.icon(),
                conversation.title
            ));
            output.push_str(&format!(
                "    {} messages, active {}\n",
                conversation.messages.len(),
                format_last_active(conversation.last_active, now)
            ));
            output.push_str(&format!("    id: {}\n", conversation.id));
        }

        output.push('\n');
        output.push_str(&format!("Current agent: {}", agent_badge(state.current_agent())));
        if state.is_loading() {
            output.push_str(" (waiting for a response)");
        }

        CommandResult::Message(output)
    }
}
