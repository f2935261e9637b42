//! Slash commands for interactive mode

mod actions;
mod agents;
mod history;
mod sources;

pub use actions::{ActionsCommand, SuggestCommand};
pub use agents::AgentsCommand;
pub use history::HistoryCommand;
pub use sources::SourcesCommand;

use chrono::{DateTime, Utc};
use concierge_api::QuickAction;
use concierge_session::SessionState;
use std::path::PathBuf;

/// Result of executing a slash command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Clear the conversation
    Clear,
    /// Upload a document
    Upload(PathBuf),
    /// Send text as if the user had typed it
    Send(String),
    /// Fetch and show the backend's agent catalog
    FetchAgents,
    /// Fetch and show the backend's quick actions
    FetchQuickActions,
    /// Show a message to the user (not sent to the backend)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command.
///
/// `quick_actions` is the list last fetched with `/actions`.
pub fn execute_command(
    input: &str,
    state: &SessionState,
    quick_actions: &[QuickAction],
    now: DateTime<Utc>,
) -> Option<CommandResult> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let parts: Vec<&str> = rest.splitn(2, ' ').collect();
    let command = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "clear" | "c" => CommandResult::Clear,

        "quit" | "exit" | "q" => CommandResult::Exit,

        "upload" | "u" => {
            if args.is_empty() {
                CommandResult::Message("Usage: /upload <path>".to_string())
            } else {
                CommandResult::Upload(PathBuf::from(args))
            }
        }

        "history" => HistoryCommand::execute(state, now),

        "agents" | "a" => AgentsCommand::execute(args, state),

        "sources" | "s" => SourcesCommand::execute(state),

        "suggest" => SuggestCommand::execute(args, state),

        "actions" => ActionsCommand::execute(args, quick_actions),

        _ => CommandResult::Unknown(command),
    })
}

/// Parse a 1-based list index
fn parse_index(args: &str, len: usize) -> Result<usize, String> {
    match args.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ if len == 0 => Err("Nothing to pick from.".to_string()),
        _ => Err(format!("Pick a number from 1 to {}.", len)),
    }
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?         Show this help message
  /upload, /u <path>    Upload a document (pdf, doc, docx, txt, xls, xlsx)
  /history              Show the current conversation
  /agents, /a [all]     Agents that answered so far, or the full catalog
  /sources, /s          Sources cited in the last few answers
  /suggest [n]          List suggested follow-ups or send one
  /actions [n]          List quick actions or run one
  /clear, /c            Start a new conversation
  /quit, /exit, /q      Exit concierge

Examples:
  /upload ~/Documents/travel-policy.pdf
  /suggest 1            Send the first suggested follow-up
  /actions              Load quick actions from the backend"#
        .to_string()
}
