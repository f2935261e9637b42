//! /suggest and /actions commands

use super::{CommandResult, parse_index};
use crate::render::agent_badge;
use concierge_api::{QuickAction, QuickActionKind};
use concierge_session::SessionState;

/// Follow-ups offered by the latest response
pub struct SuggestCommand;

impl SuggestCommand {
    pub fn execute(args: &str, state: &SessionState) -> CommandResult {
        let suggestions = state.suggested_actions();

        if args.is_empty() {
            if suggestions.is_empty() {
                return CommandResult::Message("No suggestions right now.".to_string());
            }
            let mut output = String::from("Suggested:\n");
            for (i, text) in suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, text));
            }
            output.push_str("\nUse /suggest <n> to send one.");
            return CommandResult::Message(output);
        }

        match parse_index(args, suggestions.len()) {
            Ok(i) => CommandResult::Send(suggestions[i].clone()),
            Err(e) => CommandResult::Message(e),
        }
    }
}

/// Shortcuts published by the backend
pub struct ActionsCommand;

impl ActionsCommand {
    pub fn execute(args: &str, actions: &[QuickAction]) -> CommandResult {
        if args.is_empty() {
            return CommandResult::FetchQuickActions;
        }

        match parse_index(args, actions.len()) {
            Ok(i) => Self::run(&actions[i]),
            Err(_) if actions.is_empty() => {
                CommandResult::Message("Run /actions first to load quick actions.".to_string())
            }
            Err(e) => CommandResult::Message(e),
        }
    }

    fn run(action: &QuickAction) -> CommandResult {
        match action.action {
            QuickActionKind::QuickMessage => match action.message {
                Some(ref message) => CommandResult::Send(message.clone()),
                None => CommandResult::Message(action.description.clone()),
            },
            QuickActionKind::ExternalLink => match action.url {
                Some(ref url) => CommandResult::Message(format!("Open: {}", url)),
                None => CommandResult::Message(action.description.clone()),
            },
            // Routing is decided by the backend; describe who to ask instead
            QuickActionKind::SwitchAgent => match action.agent {
                Some(agent) => CommandResult::Message(format!(
                    "{}\nAsk about it and the {} will pick it up.",
                    action.description,
                    agent_badge(agent)
                )),
                None => CommandResult::Message(action.description.clone()),
            },
        }
    }

    /// Numbered list of the fetched actions
    pub fn list_text(actions: &[QuickAction]) -> String {
        if actions.is_empty() {
            return "The backend offers no quick actions.".to_string();
        }

        let mut output = String::from("Quick actions:\n");
        for (i, action) in actions.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} - {}\n",
                i + 1,
                action.label,
                action.description
            ));
        }
        output.push_str("\nUse /actions <n> to run one.");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{response, state_after};
    use concierge_api::Agent;

    fn action(kind: QuickActionKind) -> QuickAction {
        QuickAction {
            label: "🎫 IT Tickets".into(),
            action: kind,
            agent: None,
            message: None,
            url: None,
            description: "Get IT support".into(),
        }
    }

    #[tokio::test]
    async fn test_send_suggestion() {
        let mut reply = response(Agent::Hr, None, vec![]);
        reply.suggested_actions = vec!["Request leave".into(), "Check balance".into()];
        let state = state_after(vec![("leave", reply)]).await;

        assert_eq!(
            SuggestCommand::execute("2", &state),
            CommandResult::Send("Check balance".into())
        );
        let CommandResult::Message(list) = SuggestCommand::execute("", &state) else {
            panic!("expected a message");
        };
        assert!(list.contains("  1. Request leave\n  2. Check balance\n"));
        assert!(matches!(
            SuggestCommand::execute("3", &state),
            CommandResult::Message(_)
        ));
    }

    #[test]
    fn test_no_suggestions() {
        assert_eq!(
            SuggestCommand::execute("", &SessionState::default()),
            CommandResult::Message("No suggestions right now.".into())
        );
    }

    #[test]
    fn test_actions_fetch_then_pick() {
        assert_eq!(
            ActionsCommand::execute("", &[]),
            CommandResult::FetchQuickActions
        );
        assert_eq!(
            ActionsCommand::execute("1", &[]),
            CommandResult::Message("Run /actions first to load quick actions.".into())
        );

        let mut quick = action(QuickActionKind::QuickMessage);
        quick.message = Some("I'm having a technical issue".into());
        assert_eq!(
            ActionsCommand::execute("1", &[quick]),
            CommandResult::Send("I'm having a technical issue".into())
        );
    }

    #[test]
    fn test_link_and_switch_actions() {
        let mut link = action(QuickActionKind::ExternalLink);
        link.url = Some("https://intranet/benefits".into());
        assert_eq!(
            ActionsCommand::run(&link),
            CommandResult::Message("Open: https://intranet/benefits".into())
        );

        let mut switch = action(QuickActionKind::SwitchAgent);
        switch.agent = Some(Agent::It);
        let CommandResult::Message(text) = ActionsCommand::run(&switch) else {
            panic!("expected a message");
        };
        assert!(text.contains("🔧 IT Support"));
    }

    #[test]
    fn test_list_text() {
        let text = ActionsCommand::list_text(&[action(QuickActionKind::QuickMessage)]);
        assert!(text.starts_with("Quick actions:\n  1. 🎫 IT Tickets - Get IT support\n"));
    }
}
