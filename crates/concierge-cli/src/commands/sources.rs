//! /sources command - citations from the last few answers

use super::CommandResult;
use crate::render::format_source;
use concierge_session::{SessionState, views::recent_sources};

pub struct SourcesCommand;

impl SourcesCommand {
    pub fn execute(state: &SessionState) -> CommandResult {
        let groups = recent_sources(state.messages());
        if groups.is_empty() {
            return CommandResult::Message("No sources cited yet.".to_string());
        }

        let mut output = String::from("Recent sources:\n");
        for group in &groups {
            if let Some(agent) = group.agent {
                output.push_str(&format!("  {} {}\n", agent.icon(), agent.name()));
            }
            for source in group.sources {
                output.push_str(&format!("    - {}\n", format_source(source)));
            }
        }
        CommandResult::Message(output.trim_end().to_string())
    }
}
