//! Plain-text rendering of session messages and events

use concierge_api::{Agent, Source};
use concierge_session::{Message, SessionEvent};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Truncate a string to `max` characters, appending "..." if truncated.
/// Operates on Unicode char boundaries, not bytes.
pub fn truncate_chars(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let truncated: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Icon and display name, e.g. "👥 HR Specialist"
pub fn agent_badge(agent: Agent) -> String {
    format!("{} {}", agent.icon(), agent.name())
}

/// Longest source title shown before truncation
const SOURCE_TITLE_CHARS: usize = 60;

/// One-line citation
pub fn format_source(source: &Source) -> String {
    let mut line = format!(
        "{} ({})",
        truncate_chars(&source.title, SOURCE_TITLE_CHARS),
        source.kind
    );
    if let Some(percent) = source.confidence_percent() {
        line.push_str(&format!(" {}%", percent));
    }
    if let Some(ref url) = source.url {
        line.push_str(&format!(" <{}>", url));
    }
    line
}

pub fn format_message(message: &Message) -> String {
    if message.is_user() {
        return format!("you: {}", message.content);
    }

    let mut out = String::new();
    if let Some(agent) = message.agent {
        out.push_str(&format!("[{}]\n", agent_badge(agent)));
    }
    if message.metadata.as_ref().is_some_and(|m| m.is_error()) {
        out.push_str("(!) ");
    }
    out.push_str(&message.content);
    for source in &message.sources {
        out.push_str(&format!("\n  - {}", format_source(source)));
    }
    out
}

/// Text to print for an event, if any.
///
/// Typed input is already on screen, so user messages are only shown when
/// `echo_user` is set.
pub fn format_event(event: &SessionEvent, echo_user: bool) -> Option<String> {
    match event {
        SessionEvent::MessageAppended { message } if message.is_user() && !echo_user => None,
        SessionEvent::MessageAppended { message } => Some(format_message(message)),
        SessionEvent::ResponseDiscarded { .. } => Some("[Response discarded]".to_string()),
        _ => None,
    }
}

/// Print every event queued on `receiver` without waiting for more
pub fn drain(receiver: &mut broadcast::Receiver<SessionEvent>, echo_user: bool) {
    loop {
        match receiver.try_recv() {
            Ok(event) => {
                if let Some(text) = format_event(&event, echo_user) {
                    println!("{}\n", text);
                }
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Missed session events");
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_api::{ChatResponse, MessageMetadata};

    fn reply(metadata: MessageMetadata, sources: Vec<Source>) -> Message {
        Message::from_response(
            ChatResponse {
                message: "Your balance is 12 days.".into(),
                agent: Agent::Hr,
                conversation_id: "c1".into(),
                sources,
                suggested_actions: vec![],
                metadata,
            },
            Agent::Hr,
        )
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello...");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語...");
    }

    #[test]
    fn test_format_source() {
        let mut source = Source::new("Leave Policy", "SharePoint");
        assert_eq!(format_source(&source), "Leave Policy (SharePoint)");

        source.confidence = Some(0.876);
        source.url = Some("https://intranet/leave".into());
        assert_eq!(
            format_source(&source),
            "Leave Policy (SharePoint) 88% <https://intranet/leave>"
        );
    }

    #[test]
    fn test_format_assistant_message() {
        let text = format_message(&reply(
            MessageMetadata::default(),
            vec![Source::new("Leave Policy", "SharePoint")],
        ));
        assert_eq!(
            text,
            "[👥 HR Specialist]\nYour balance is 12 days.\n  - Leave Policy (SharePoint)"
        );
    }

    #[test]
    fn test_format_flagged_message() {
        let metadata = MessageMetadata {
            upstream_service_error: Some(true),
            ..Default::default()
        };
        assert!(format_message(&reply(metadata, vec![])).contains("(!) Your balance"));
    }

    #[test]
    fn test_apology_has_no_badge() {
        let text = format_message(&Message::apology("Sorry"));
        assert_eq!(text, "Sorry");
    }

    #[test]
    fn test_user_echo() {
        let event = SessionEvent::MessageAppended {
            message: Message::upload_notice("plan.pdf"),
        };
        assert_eq!(format_event(&event, false), None);
        assert_eq!(
            format_event(&event, true).as_deref(),
            Some("you: 📁 Uploaded: plan.pdf")
        );
        assert_eq!(
            format_event(&SessionEvent::LoadingChanged { is_loading: true }, true),
            None
        );
    }
}
