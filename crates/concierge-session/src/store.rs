//! Session state: message log, active agent, conversation identity, loading flag.

use concierge_api::Agent;

use crate::message::Message;

/// Maximum title length in characters before truncation
pub const TITLE_MAX_CHARS: usize = 30;

/// Derive a conversation title from the first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends `...` when
/// anything was cut. Operates on chars, not bytes.
pub fn derive_title(text: &str) -> String {
    let mut chars = text.chars();
    let truncated: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Everything the session knows about the active conversation.
///
/// Read access is public; mutation goes through [`crate::Session`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    messages: Vec<Message>,
    is_loading: bool,
    current_agent: Agent,
    conversation_id: String,
    conversation_title: String,
    suggested_actions: Vec<String>,
    /// Bumped by every dispatch and every reset
    generation: u64,
}

impl SessionState {
    /// Message log in causal order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn current_agent(&self) -> Agent {
        self.current_agent
    }

    /// Backend-assigned id, empty until the first successful response
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Empty until the first successful chat exchange
    pub fn conversation_title(&self) -> &str {
        &self.conversation_title
    }

    /// Follow-ups offered by the most recent successful response
    pub fn suggested_actions(&self) -> &[String] {
        &self.suggested_actions
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ---- Mutation, crate-internal ----

    /// Mark a dispatch as started. Returns its generation, or `None` when
    /// another dispatch is still loading.
    pub(crate) fn begin_dispatch(&mut self) -> Option<u64> {
        if self.is_loading {
            return None;
        }
        self.is_loading = true;
        self.generation += 1;
        Some(self.generation)
    }

    /// Whether a completion for `generation` may still touch the store
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.is_loading && self.generation == generation
    }

    pub(crate) fn finish_dispatch(&mut self) {
        self.is_loading = false;
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Adopt the backend's conversation id. First writer wins: once an id is
    /// stored it never changes. Returns `true` if the id was adopted.
    pub(crate) fn adopt_conversation_id(&mut self, id: &str) -> bool {
        if id.is_empty() || id == self.conversation_id {
            return false;
        }
        if !self.conversation_id.is_empty() {
            tracing::warn!(
                stored = %self.conversation_id,
                received = %id,
                "Backend returned a different conversation id, keeping the stored one"
            );
            return false;
        }
        self.conversation_id = id.to_string();
        true
    }

    /// Returns `true` if the agent changed
    pub(crate) fn set_agent(&mut self, agent: Agent) -> bool {
        let changed = self.current_agent != agent;
        self.current_agent = agent;
        changed
    }

    /// Set the title from `text` unless one is already set
    pub(crate) fn ensure_title(&mut self, text: &str) {
        if self.conversation_title.is_empty() && !text.is_empty() {
            self.conversation_title = derive_title(text);
        }
    }

    pub(crate) fn set_suggested_actions(&mut self, actions: Vec<String>) {
        self.suggested_actions = actions;
    }

    /// Back to initial values. Invalidates any in-flight dispatch.
    pub(crate) fn reset(&mut self) {
        self.messages.clear();
        self.conversation_id.clear();
        self.conversation_title.clear();
        self.suggested_actions.clear();
        self.current_agent = Agent::General;
        self.is_loading = false;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_short_is_verbatim() {
        assert_eq!(derive_title("help"), "help");
        let exactly_30 = "abcdefghijklmnopqrstuvwxyz0123";
        assert_eq!(exactly_30.chars().count(), 30);
        assert_eq!(derive_title(exactly_30), exactly_30);
    }

    #[test]
    fn test_derive_title_long_is_truncated() {
        assert_eq!(
            derive_title("abcdefghijklmnopqrstuvwxyz0123456789"),
            "abcdefghijklmnopqrstuvwxyz0123..."
        );
    }

    #[test]
    fn test_derive_title_counts_chars_not_bytes() {
        let text = "é".repeat(31);
        let title = derive_title(&text);
        assert_eq!(title, format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::default();
        assert!(state.messages().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.current_agent(), Agent::General);
        assert_eq!(state.conversation_id(), "");
        assert_eq!(state.conversation_title(), "");
    }

    #[test]
    fn test_begin_dispatch_is_exclusive() {
        let mut state = SessionState::default();
        let generation = state.begin_dispatch().unwrap();
        assert!(state.is_loading());
        assert!(state.begin_dispatch().is_none());
        assert!(state.is_current(generation));
        state.finish_dispatch();
        assert!(!state.is_current(generation));
        assert!(state.begin_dispatch().unwrap() > generation);
    }

    #[test]
    fn test_conversation_id_first_writer_wins() {
        let mut state = SessionState::default();
        assert!(!state.adopt_conversation_id(""));
        assert!(state.adopt_conversation_id("abc"));
        assert!(!state.adopt_conversation_id("abc"));
        assert!(!state.adopt_conversation_id("xyz"));
        assert_eq!(state.conversation_id(), "abc");
    }

    #[test]
    fn test_title_set_once() {
        let mut state = SessionState::default();
        state.ensure_title("first question");
        state.ensure_title("second question");
        assert_eq!(state.conversation_title(), "first question");
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        let mut state = SessionState::default();
        let generation = state.begin_dispatch().unwrap();
        state.push(Message::user("hi"));
        state.set_agent(Agent::Travel);
        state.adopt_conversation_id("abc");
        state.ensure_title("hi");
        state.set_suggested_actions(vec!["Book a flight".into()]);

        state.reset();

        assert!(!state.is_current(generation));
        assert!(state.messages().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.current_agent(), Agent::General);
        assert_eq!(state.conversation_id(), "");
        assert_eq!(state.conversation_title(), "");
        assert!(state.suggested_actions().is_empty());
    }
}
