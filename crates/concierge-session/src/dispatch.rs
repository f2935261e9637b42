//! Message and file dispatchers: one request/response cycle each, reconciled
//! into the session store.

use concierge_api::{Agent, ChatRequest, ChatResponse, FileUpload};

use crate::{
    events::SessionEvent,
    message::Message,
    session::{DispatchOutcome, Rejection, Session},
    store::SessionState,
};

/// Shown when a chat exchange fails for any reason
pub const CHAT_APOLOGY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Shown when an upload fails for any reason
pub const UPLOAD_APOLOGY: &str =
    "Sorry, I encountered an error uploading your file. Please try again.";

impl Session {
    /// Send user text to the chat endpoint.
    ///
    /// The user message is appended before the request goes out. Failures are
    /// recovered here: the caller always gets a consistent store back and
    /// loading is always released.
    pub async fn send_message(&self, text: &str) -> DispatchOutcome {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty message");
            return DispatchOutcome::Rejected(Rejection::EmptyMessage);
        }
        let Some(in_flight) = self.begin(Some(Message::user(text))) else {
            tracing::debug!("Ignoring message while another request is loading");
            return DispatchOutcome::Rejected(Rejection::Busy);
        };

        let request = ChatRequest {
            message: text.to_string(),
            conversation_id: in_flight.conversation_id.clone(),
        };

        match in_flight.run(self.transport.chat(&request)).await {
            None => {
                in_flight.discard();
                DispatchOutcome::Discarded
            }
            Some(Ok(response)) => {
                tracing::debug!(agent = %response.agent, "Chat response received");
                let agent = response.agent;
                let applied = in_flight.complete(|state, events| {
                    reconcile(state, events, response, agent);
                    state.ensure_title(text);
                });
                outcome(applied, DispatchOutcome::Completed)
            }
            Some(Err(e)) => {
                tracing::warn!(
                    timeout = e.is_timeout(),
                    server_error = e.is_server_error(),
                    "Chat request failed: {}",
                    e
                );
                let applied = in_flight.complete(|state, events| {
                    append(state, events, Message::apology(CHAT_APOLOGY));
                });
                outcome(applied, DispatchOutcome::Failed)
            }
        }
    }

    /// Upload a document for analysis.
    ///
    /// On success the session switches to [`Agent::DocChat`] whatever the
    /// response declares, and both the upload notice and the analysis are
    /// appended. The analysis keeps the agent tag the backend gave it.
    pub async fn upload_file(&self, file: &FileUpload) -> DispatchOutcome {
        let Some(in_flight) = self.begin(None) else {
            tracing::debug!("Ignoring upload while another request is loading");
            return DispatchOutcome::Rejected(Rejection::Busy);
        };

        let conversation_id = in_flight.conversation_id.clone();
        match in_flight
            .run(self.transport.upload(file, &conversation_id))
            .await
        {
            None => {
                in_flight.discard();
                DispatchOutcome::Discarded
            }
            Some(Ok(response)) => {
                tracing::debug!(filename = file.name(), "Upload analysed");
                let applied = in_flight.complete(|state, events| {
                    append(state, events, Message::upload_notice(file.name()));
                    reconcile(state, events, response, Agent::DocChat);
                });
                outcome(applied, DispatchOutcome::Completed)
            }
            Some(Err(e)) => {
                tracing::warn!(filename = file.name(), "Upload failed: {}", e);
                let applied = in_flight.complete(|state, events| {
                    append(state, events, Message::apology(UPLOAD_APOLOGY));
                });
                outcome(applied, DispatchOutcome::Failed)
            }
        }
    }
}

fn outcome(applied: bool, outcome: DispatchOutcome) -> DispatchOutcome {
    if applied {
        outcome
    } else {
        DispatchOutcome::Discarded
    }
}

fn append(state: &mut SessionState, events: &mut Vec<SessionEvent>, message: Message) {
    state.push(message.clone());
    events.push(SessionEvent::MessageAppended { message });
}

/// Fold a successful response into the store: conversation id, active agent,
/// suggestions, then the assistant message tagged with the response's agent.
fn reconcile(
    state: &mut SessionState,
    events: &mut Vec<SessionEvent>,
    response: ChatResponse,
    current_agent: Agent,
) {
    if state.adopt_conversation_id(&response.conversation_id) {
        events.push(SessionEvent::ConversationStarted {
            conversation_id: response.conversation_id.clone(),
        });
    }
    if state.set_agent(current_agent) {
        events.push(SessionEvent::AgentChanged {
            agent: current_agent,
        });
    }
    state.set_suggested_actions(response.suggested_actions.clone());
    let agent = response.agent;
    append(state, events, Message::from_response(response, agent));
}
