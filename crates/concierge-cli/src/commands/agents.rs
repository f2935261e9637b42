//! /agents command - agents that answered in this session, or the backend catalog

use super::CommandResult;
use crate::render::agent_badge;
use concierge_api::AgentInfo;
use concierge_session::{SessionState, views::active_agents};

pub struct AgentsCommand;

impl AgentsCommand {
    pub fn execute(args: &str, state: &SessionState) -> CommandResult {
        if args.eq_ignore_ascii_case("all") {
            return CommandResult::FetchAgents;
        }

        let agents = active_agents(state.messages());
        if agents.is_empty() {
            return CommandResult::Message(
                "No agents have answered yet. Use /agents all to see who is available."
                    .to_string(),
            );
        }

        let mut output = String::from("Active agents\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');
        for active in &agents {
            let marker = if active.agent == state.current_agent() {
                "*"
            } else {
                " "
            };
            output.push_str(&format!("{} {}\n", marker, agent_badge(active.agent)));
            output.push_str(&format!("    {}\n", active.reason));
        }

        CommandResult::Message(output.trim_end().to_string())
    }

    /// Format the catalog returned by `GET /agents`
    pub fn catalog_text(catalog: &[AgentInfo]) -> String {
        if catalog.is_empty() {
            return "The backend lists no agents.".to_string();
        }

        let mut output = String::from("Available agents:\n");
        for info in catalog {
            output.push_str(&format!("  {} {}\n", info.icon, info.name));
            output.push_str(&format!("      {}\n", info.description));
        }
        output.trim_end().to_string()
    }
}
